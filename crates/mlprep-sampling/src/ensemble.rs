//! Ensemble under-samplers.
//!
//! Both build several balanced subsets. The returned dataset is the
//! concatenation of those subsets in the order they were drawn.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use rand::rngs::StdRng;
use rand::seq::index;
use std::collections::BTreeSet;
use tracing::debug;

use crate::models::knn_classify;
use crate::neighbors::same_class;
use crate::under::RandomUnderSampler;
use crate::{labeled_counts, minority, Sampler};

/// Independent random under-samples.
#[derive(Debug, Clone, Copy)]
pub struct EasyEnsemble {
    pub n_subsets: usize,
}

impl Default for EasyEnsemble {
    fn default() -> Self {
        Self { n_subsets: 10 }
    }
}

impl Sampler for EasyEnsemble {
    fn name(&self) -> &'static str {
        "EasyEnsemble"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let subsets = (0..self.n_subsets.max(1))
            .map(|_| RandomUnderSampler::balanced_indices(data, rng).map(|keep| data.select(&keep)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Dataset::concat(&subsets).unwrap_or_else(|| data.select(&[])))
    }
}

/// Cascade of under-samples where rows a k-NN classifier already gets right
/// are retired from the pool after each round.
#[derive(Debug, Clone, Copy)]
pub struct BalanceCascade {
    pub max_subsets: usize,
    pub n_neighbors: usize,
}

impl Default for BalanceCascade {
    fn default() -> Self {
        Self {
            max_subsets: 10,
            n_neighbors: 3,
        }
    }
}

impl Sampler for BalanceCascade {
    fn name(&self) -> &'static str {
        "BalanceCascade"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let counts = labeled_counts(data)?;
        let (min_class, n_min) = minority(&counts);
        let labels = data.labels();
        let minority_rows = data.class_indices(min_class);

        // Non-minority rows still eligible for selection.
        let mut pool: BTreeSet<usize> = (0..data.n_samples())
            .filter(|&i| !same_class(labels[i], min_class))
            .collect();

        let mut subsets = Vec::new();
        while subsets.len() < self.max_subsets.max(1) {
            let mut subset = minority_rows.clone();
            let mut exhausted = false;
            for &(class, _) in counts.iter().filter(|(c, _)| !same_class(*c, min_class)) {
                let members: Vec<usize> = pool
                    .iter()
                    .copied()
                    .filter(|&i| same_class(labels[i], class))
                    .collect();
                if members.len() < n_min {
                    exhausted = true;
                    break;
                }
                subset.extend(index::sample(rng, members.len(), n_min).into_iter().map(|i| members[i]));
            }
            if exhausted {
                break;
            }

            subset.sort_unstable();
            for i in &subset {
                pool.remove(i);
            }
            let remaining: Vec<usize> = pool.iter().copied().collect();
            let predicted = knn_classify(data, &subset, &remaining, self.n_neighbors)?;
            let retired: Vec<usize> = remaining
                .iter()
                .zip(&predicted)
                .filter(|&(&i, &p)| same_class(p, labels[i]))
                .map(|(&i, _)| i)
                .collect();
            for i in &retired {
                pool.remove(i);
            }

            debug!(
                "BalanceCascade subset {}: {} rows, {} retired, {} left in pool",
                subsets.len() + 1,
                subset.len(),
                retired.len(),
                pool.len()
            );
            subsets.push(data.select(&subset));
        }

        Ok(Dataset::concat(&subsets).unwrap_or_else(|| data.select(&[])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use rand::SeedableRng;

    /// 40 class-0 rows on a line and 4 class-1 rows beyond them.
    fn skewed() -> Dataset {
        let n = 44;
        let features = Array2::from_shape_fn((n, 1), |(i, _)| i as f64);
        let labels = Array1::from_shape_fn(n, |i| if i >= 40 { 1.0 } else { 0.0 });
        Dataset::new(features, vec!["x".to_string()], labels).unwrap()
    }

    #[test]
    fn test_easy_ensemble_concatenates_balanced_subsets() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = EasyEnsemble { n_subsets: 3 }.fit_resample(&skewed(), &mut rng).unwrap();

        assert_eq!(out.n_samples(), 3 * 8);
        assert_eq!(out.class_counts(), vec![(0.0, 12), (1.0, 12)]);
    }

    #[test]
    fn test_balance_cascade_subsets_are_balanced() {
        let mut rng = StdRng::seed_from_u64(5);
        let out = BalanceCascade::default().fit_resample(&skewed(), &mut rng).unwrap();

        assert!(out.n_samples() >= 8);
        assert_eq!(out.n_samples() % 8, 0);
        let counts = out.class_counts();
        assert_eq!(counts[0].1, counts[1].1);
    }

    #[test]
    fn test_balance_cascade_stops_when_pool_runs_dry() {
        let mut rng = StdRng::seed_from_u64(5);
        let cascade = BalanceCascade {
            max_subsets: 100,
            n_neighbors: 3,
        };
        let out = cascade.fit_resample(&skewed(), &mut rng).unwrap();

        // Each round removes at least four pool rows, so at most ten rounds fit.
        assert!(out.n_samples() <= 10 * 8);
    }

    #[test]
    fn test_unlabeled_rejected() {
        let data = Dataset::unlabeled(Array2::zeros((2, 1)), vec!["x".to_string()]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(
            EasyEnsemble::default().fit_resample(&data, &mut rng),
            Err(SamplingError::MissingLabels)
        );
    }
}
