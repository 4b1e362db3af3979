//! Class-imbalance resampling.
//!
//! This crate provides:
//! - Ratio estimation for the class being over-sampled
//! - Under-sampling (random, Tomek links, cluster centroids, NearMiss,
//!   neighbourhood cleaning)
//! - Over-sampling (random, SMOTE regular, borderline and SVM variants)
//! - Combined SMOTE + Tomek / SMOTE + ENN and the EasyEnsemble and
//!   BalanceCascade ensembles
//! - A dispatcher mapping a configured method name to one of the above

mod combine;
mod dispatcher;
mod ensemble;
mod method;
mod models;
mod neighbors;
mod over;
mod ratio;
mod under;

pub use combine::{SmoteEnn, SmoteTomek};
pub use dispatcher::{sampler_for, RebalancingRequest, ResamplingDispatcher};
pub use ensemble::{BalanceCascade, EasyEnsemble};
pub use method::{MethodFamily, SamplingMethod};
pub use over::{RandomOverSampler, Smote, SmoteKind};
pub use ratio::estimate_ratio;
pub use under::{
    ClusterCentroids, EditedNearestNeighbours, NearMiss, NeighbourhoodCleaningRule,
    RandomUnderSampler, TomekLinks,
};

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use rand::rngs::StdRng;

/// A resampling algorithm.
pub trait Sampler: Send + Sync {
    /// Get the algorithm name.
    fn name(&self) -> &'static str;

    /// Fit on `data` and return the resampled dataset.
    ///
    /// Rows of the result are not in correspondence with rows of the input.
    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError>;
}

/// Class counts of a labeled dataset.
pub(crate) fn labeled_counts(data: &Dataset) -> Result<Vec<(f64, usize)>, SamplingError> {
    if !data.has_labels() {
        return Err(SamplingError::MissingLabels);
    }
    Ok(data.class_counts())
}

/// Smallest class and its size; ties go to the lower label.
pub(crate) fn minority(counts: &[(f64, usize)]) -> (f64, usize) {
    counts
        .iter()
        .copied()
        .min_by_key(|&(_, count)| count)
        .unwrap_or((0.0, 0))
}
