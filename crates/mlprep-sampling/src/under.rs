//! Under-sampling algorithms.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::seq::index;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

use crate::models::kmeans_clusters;
use crate::neighbors::{knn_predict, nearest, same_class, squared_distance};
use crate::{labeled_counts, minority, Sampler};

/// Randomly drop rows of every class down to the minority count.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUnderSampler;

impl RandomUnderSampler {
    /// Indices of a balanced random subset, grouped by class.
    pub(crate) fn balanced_indices(
        data: &Dataset,
        rng: &mut StdRng,
    ) -> Result<Vec<usize>, SamplingError> {
        let counts = labeled_counts(data)?;
        let (_, n_min) = minority(&counts);

        let mut keep = Vec::with_capacity(n_min * counts.len());
        for (class, _) in counts {
            let members = data.class_indices(class);
            let mut picked: Vec<usize> = index::sample(rng, members.len(), n_min)
                .into_iter()
                .map(|i| members[i])
                .collect();
            picked.sort_unstable();
            keep.extend(picked);
        }
        Ok(keep)
    }
}

impl Sampler for RandomUnderSampler {
    fn name(&self) -> &'static str {
        "RandomUnderSampler"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let keep = Self::balanced_indices(data, rng)?;
        Ok(data.select(&keep))
    }
}

/// Remove Tomek links: pairs of mutual nearest neighbours with different
/// labels.
#[derive(Debug, Clone, Copy, Default)]
pub struct TomekLinks {
    /// Remove both ends of a link instead of only the non-minority end
    pub remove_both: bool,
}

impl TomekLinks {
    /// Rows that take part in a link and should be dropped.
    pub(crate) fn link_members(
        data: &Dataset,
        remove_both: bool,
    ) -> Result<BTreeSet<usize>, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, _) = minority(&counts);
        let labels = data.labels();
        let all: Vec<usize> = (0..data.n_samples()).collect();

        let nn: Vec<Option<usize>> = all
            .iter()
            .map(|&i| nearest(data.features(), data.row(i), &all, 1, Some(i)).first().copied())
            .collect();

        let mut drop = BTreeSet::new();
        for i in 0..data.n_samples() {
            let Some(j) = nn[i] else { continue };
            if nn[j] != Some(i) || same_class(labels[i], labels[j]) {
                continue;
            }
            for member in [i, j] {
                if remove_both || !same_class(labels[member], min_class) {
                    drop.insert(member);
                }
            }
        }
        Ok(drop)
    }
}

impl Sampler for TomekLinks {
    fn name(&self) -> &'static str {
        "TomekLinks"
    }

    fn fit_resample(&self, data: &Dataset, _rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let drop = Self::link_members(data, self.remove_both)?;
        let keep: Vec<usize> = (0..data.n_samples()).filter(|i| !drop.contains(i)).collect();
        Ok(data.select(&keep))
    }
}

/// Replace every non-minority class with k-means centroids, one per
/// minority row.
#[derive(Debug, Clone, Copy)]
pub struct ClusterCentroids {
    pub max_iter: usize,
}

impl Default for ClusterCentroids {
    fn default() -> Self {
        Self { max_iter: 100 }
    }
}

impl ClusterCentroids {
    /// Mean of every non-empty k-means cluster of `points`.
    fn centroids(
        &self,
        points: &Array2<f64>,
        k: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Vec<f64>>, SamplingError> {
        let clusters = kmeans_clusters(points, k, self.max_iter, rng.gen())?;

        let mut sums = vec![vec![0.0; points.ncols()]; k];
        let mut sizes = vec![0usize; k];
        for (row, &c) in points.outer_iter().zip(&clusters) {
            let Some(sum) = sums.get_mut(c) else { continue };
            sizes[c] += 1;
            for (total, value) in sum.iter_mut().zip(row.iter()) {
                *total += value;
            }
        }

        let centroids: Vec<Vec<f64>> = sums
            .into_iter()
            .zip(sizes)
            .filter(|&(_, size)| size > 0)
            .map(|(sum, size)| sum.into_iter().map(|v| v / size as f64).collect())
            .collect();
        if centroids.len() < k {
            debug!("ClusterCentroids: {} of {} clusters empty", k - centroids.len(), k);
        }
        Ok(centroids)
    }
}

impl Sampler for ClusterCentroids {
    fn name(&self) -> &'static str {
        "ClusterCentroids"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, n_min) = minority(&counts);

        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for &(class, _) in counts.iter().filter(|(c, _)| !same_class(*c, min_class)) {
            let members = data.class_indices(class);
            let points = data.select(&members).into_parts().0;
            for centroid in self.centroids(&points, n_min, rng)? {
                rows.push(centroid);
                labels.push(class);
            }
        }

        Ok(data.select(&data.class_indices(min_class)).append(&rows, &labels))
    }
}

/// NearMiss-1: keep the non-minority rows whose mean distance to their
/// nearest minority rows is smallest.
#[derive(Debug, Clone, Copy)]
pub struct NearMiss {
    pub n_neighbors: usize,
}

impl Default for NearMiss {
    fn default() -> Self {
        Self { n_neighbors: 3 }
    }
}

impl Sampler for NearMiss {
    fn name(&self) -> &'static str {
        "NearMiss"
    }

    fn fit_resample(&self, data: &Dataset, _rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, n_min) = minority(&counts);
        let minority_rows = data.class_indices(min_class);
        let features = data.features();

        let mut keep = minority_rows.clone();
        for &(class, _) in counts.iter().filter(|(c, _)| !same_class(*c, min_class)) {
            let mut scored: Vec<(f64, usize)> = data
                .class_indices(class)
                .into_iter()
                .map(|i| {
                    let near = nearest(features, data.row(i), &minority_rows, self.n_neighbors, None);
                    let mean = near
                        .iter()
                        .map(|&m| squared_distance(features.row(m), data.row(i)).sqrt())
                        .sum::<f64>()
                        / near.len().max(1) as f64;
                    (mean, i)
                })
                .collect();
            scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            keep.extend(scored.into_iter().take(n_min).map(|(_, i)| i));
        }

        Ok(data.select(&keep))
    }
}

/// Drop rows whose neighbourhood disagrees with their label.
#[derive(Debug, Clone, Copy)]
pub struct EditedNearestNeighbours {
    pub n_neighbors: usize,
    /// Keep a row only when every neighbour agrees, not just the majority
    pub unanimous: bool,
    /// Edit the minority class too
    pub all_classes: bool,
}

impl Default for EditedNearestNeighbours {
    fn default() -> Self {
        Self {
            n_neighbors: 3,
            unanimous: true,
            all_classes: false,
        }
    }
}

impl EditedNearestNeighbours {
    fn disagrees(&self, data: &Dataset, row: usize, all: &[usize]) -> bool {
        let labels = data.labels();
        let label = labels[row];
        if self.unanimous {
            nearest(data.features(), data.row(row), all, self.n_neighbors, Some(row))
                .iter()
                .any(|&j| !same_class(labels[j], label))
        } else {
            knn_predict(data, data.row(row), all, self.n_neighbors, Some(row))
                .map(|predicted| !same_class(predicted, label))
                .unwrap_or(false)
        }
    }
}

impl Sampler for EditedNearestNeighbours {
    fn name(&self) -> &'static str {
        "EditedNearestNeighbours"
    }

    fn fit_resample(&self, data: &Dataset, _rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, _) = minority(&counts);
        let labels = data.labels();
        let all: Vec<usize> = (0..data.n_samples()).collect();

        let keep: Vec<usize> = all
            .iter()
            .copied()
            .filter(|&i| {
                let editable = self.all_classes || !same_class(labels[i], min_class);
                !(editable && self.disagrees(data, i, &all))
            })
            .collect();
        Ok(data.select(&keep))
    }
}

/// Neighbourhood cleaning rule.
///
/// Non-minority rows misclassified by their neighbourhood are removed, and
/// so are the non-minority neighbours of every misclassified minority row.
#[derive(Debug, Clone, Copy)]
pub struct NeighbourhoodCleaningRule {
    pub n_neighbors: usize,
}

impl NeighbourhoodCleaningRule {
    pub fn new(n_neighbors: usize) -> Self {
        Self { n_neighbors }
    }
}

impl Sampler for NeighbourhoodCleaningRule {
    fn name(&self) -> &'static str {
        "NeighbourhoodCleaningRule"
    }

    fn fit_resample(&self, data: &Dataset, _rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, _) = minority(&counts);
        let labels = data.labels();
        let all: Vec<usize> = (0..data.n_samples()).collect();

        let mut drop = BTreeSet::new();
        for &i in &all {
            let neighbours = nearest(data.features(), data.row(i), &all, self.n_neighbors, Some(i));
            let predicted = crate::neighbors::vote(neighbours.iter().map(|&j| labels[j]));
            let misclassified = predicted.map(|p| !same_class(p, labels[i])).unwrap_or(false);
            if !misclassified {
                continue;
            }
            if same_class(labels[i], min_class) {
                drop.extend(
                    neighbours
                        .into_iter()
                        .filter(|&j| !same_class(labels[j], min_class)),
                );
            } else {
                drop.insert(i);
            }
        }

        let keep: Vec<usize> = all.into_iter().filter(|i| !drop.contains(i)).collect();
        Ok(data.select(&keep))
    }
}
