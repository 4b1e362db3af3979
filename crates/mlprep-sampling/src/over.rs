//! Over-sampling algorithms.
//!
//! Over-samplers grow the target class by `round(ratio * target_count)`
//! rows. A non-positive ratio adds nothing.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::Rng;
use tracing::warn;

use crate::labeled_counts;
use crate::models::svm_decision;
use crate::neighbors::{nearest, same_class};
use crate::Sampler;

/// Largest accepted over-sampling ratio.
pub const MAX_RATIO: f64 = 1000.0;

/// Number of rows to add for a target class of `count` rows.
fn samples_to_add(ratio: f64, count: usize) -> Result<usize, SamplingError> {
    if !ratio.is_finite() || ratio > MAX_RATIO {
        return Err(SamplingError::InvalidRatio(ratio));
    }
    Ok((ratio * count as f64).round().max(0.0) as usize)
}

fn target_rows(data: &Dataset, target: f64, required: usize) -> Result<Vec<usize>, SamplingError> {
    labeled_counts(data)?;
    let rows = data.class_indices(target);
    if rows.len() < required {
        return Err(SamplingError::InsufficientSamples {
            class: target,
            required,
            available: rows.len(),
        });
    }
    Ok(rows)
}

/// Duplicate randomly chosen target-class rows.
#[derive(Debug, Clone, Copy)]
pub struct RandomOverSampler {
    pub target: f64,
    pub ratio: f64,
}

impl RandomOverSampler {
    pub fn new(target: f64, ratio: f64) -> Self {
        Self { target, ratio }
    }
}

impl Sampler for RandomOverSampler {
    fn name(&self) -> &'static str {
        "RandomOverSampler"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let rows = target_rows(data, self.target, 1)?;
        let n_new = samples_to_add(self.ratio, rows.len())?;

        let mut indices: Vec<usize> = (0..data.n_samples()).collect();
        indices.extend((0..n_new).map(|_| rows[rng.gen_range(0..rows.len())]));
        Ok(data.select(&indices))
    }
}

/// Which rows seed synthetic samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoteKind {
    /// Every target row
    Regular,
    /// Target rows whose neighbourhood is mostly, but not entirely, other classes
    Borderline1,
    /// Target rows that are support vectors of a linear SVM
    Svm,
}

/// Synthetic minority over-sampling.
#[derive(Debug, Clone, Copy)]
pub struct Smote {
    pub target: f64,
    pub ratio: f64,
    pub kind: SmoteKind,
    /// Same-class neighbours to interpolate towards
    pub k_neighbors: usize,
    /// Neighbourhood used to judge danger and noise
    pub m_neighbors: usize,
}

/// A seed row and the direction new samples take from it.
#[derive(Debug, Clone, Copy)]
struct Seed {
    row: usize,
    extrapolate: bool,
}

impl Smote {
    pub fn new(target: f64, ratio: f64, kind: SmoteKind) -> Self {
        Self {
            target,
            ratio,
            kind,
            k_neighbors: 5,
            m_neighbors: 10,
        }
    }

    /// Count neighbours of `row` (among all rows) outside the target class.
    fn other_class_neighbours(&self, data: &Dataset, row: usize, all: &[usize]) -> usize {
        let labels = data.labels();
        nearest(data.features(), data.row(row), all, self.m_neighbors, Some(row))
            .into_iter()
            .filter(|&j| !same_class(labels[j], self.target))
            .count()
    }

    fn seeds(
        &self,
        data: &Dataset,
        rows: &[usize],
        rng: &mut StdRng,
    ) -> Result<Vec<Seed>, SamplingError> {
        let all: Vec<usize> = (0..data.n_samples()).collect();
        let m = self.m_neighbors.min(all.len().saturating_sub(1));

        let seeds = match self.kind {
            SmoteKind::Regular => rows
                .iter()
                .map(|&row| Seed {
                    row,
                    extrapolate: false,
                })
                .collect(),
            SmoteKind::Borderline1 => rows
                .iter()
                .copied()
                .filter(|&row| {
                    let others = self.other_class_neighbours(data, row, &all);
                    m > 0 && others * 2 >= m && others < m
                })
                .map(|row| Seed {
                    row,
                    extrapolate: false,
                })
                .collect(),
            SmoteKind::Svm => {
                let positive: Vec<bool> = data
                    .labels()
                    .iter()
                    .map(|&y| same_class(y, self.target))
                    .collect();
                // With nothing to separate from, every target row is on the margin.
                let decision = if positive.iter().all(|&p| p) {
                    vec![0.0; positive.len()]
                } else {
                    svm_decision(data.features(), &positive, rng.gen())?
                };

                rows.iter()
                    .copied()
                    .filter(|&row| decision[row] <= 1.0)
                    .filter_map(|row| {
                        let others = self.other_class_neighbours(data, row, &all);
                        if m > 0 && others == m {
                            // noise
                            return None;
                        }
                        Some(Seed {
                            row,
                            extrapolate: others * 2 < m,
                        })
                    })
                    .collect()
            }
        };
        Ok(seeds)
    }

    fn synthesize(
        base: ArrayView1<'_, f64>,
        neighbour: ArrayView1<'_, f64>,
        gap: f64,
        extrapolate: bool,
    ) -> Vec<f64> {
        base.iter()
            .zip(neighbour.iter())
            .map(|(b, n)| {
                if extrapolate {
                    b + gap * (b - n)
                } else {
                    b + gap * (n - b)
                }
            })
            .collect()
    }
}

impl Sampler for Smote {
    fn name(&self) -> &'static str {
        match self.kind {
            SmoteKind::Regular => "SMOTE",
            SmoteKind::Borderline1 => "BorderlineSMOTE",
            SmoteKind::Svm => "SVMSMOTE",
        }
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let rows = target_rows(data, self.target, 2)?;
        let n_new = samples_to_add(self.ratio, rows.len())?;
        if n_new == 0 {
            return Ok(data.clone());
        }

        let seeds = self.seeds(data, &rows, rng)?;
        if seeds.is_empty() {
            warn!("{}: no seed rows for class {}, data unchanged", self.name(), self.target);
            return Ok(data.clone());
        }

        let k = self.k_neighbors.min(rows.len() - 1);
        let features = data.features();
        let mut synthetic = Vec::with_capacity(n_new);
        for _ in 0..n_new {
            let seed = seeds[rng.gen_range(0..seeds.len())];
            let neighbours = nearest(features, data.row(seed.row), &rows, k, Some(seed.row));
            let partner = neighbours[rng.gen_range(0..neighbours.len())];
            let gap: f64 = rng.gen();
            synthetic.push(Self::synthesize(
                data.row(seed.row),
                data.row(partner),
                gap,
                seed.extrapolate,
            ));
        }

        let labels = vec![self.target; synthetic.len()];
        Ok(data.append(&synthetic, &labels))
    }
}
