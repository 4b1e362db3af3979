//! Method dispatch for rebalancing a training set.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::combine::{SmoteEnn, SmoteTomek};
use crate::ensemble::{BalanceCascade, EasyEnsemble};
use crate::method::SamplingMethod;
use crate::over::{RandomOverSampler, Smote, SmoteKind};
use crate::ratio::estimate_ratio;
use crate::under::{
    ClusterCentroids, NearMiss, NeighbourhoodCleaningRule, RandomUnderSampler, TomekLinks,
};
use crate::Sampler;

/// Neighbourhood size used by the cleaning rule.
const NCR_NEIGHBORS: usize = 51;

/// A configured rebalancing: method, ratio (or auto) and target class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebalancingRequest {
    pub method: SamplingMethod,
    /// Over-sampling ratio; zero or negative means estimate it
    pub ratio: f64,
    /// Label of the class being over-sampled
    pub target_value: f64,
}

impl RebalancingRequest {
    pub fn new(method: SamplingMethod, ratio: f64, target_value: f64) -> Self {
        Self {
            method,
            ratio,
            target_value,
        }
    }

    /// Build a request from a configured method name.
    pub fn parse(method: &str, ratio: f64, target_value: f64) -> Result<Self, SamplingError> {
        Ok(Self::new(method.parse()?, ratio, target_value))
    }

    /// Check if the ratio should be estimated from the labels.
    #[inline]
    pub fn is_auto(&self) -> bool {
        self.ratio <= 0.0
    }
}

/// Create the sampler for `method`.
pub fn sampler_for(method: SamplingMethod, ratio: f64, target: f64) -> Box<dyn Sampler> {
    match method {
        SamplingMethod::UnderRandom => Box::new(RandomUnderSampler),
        SamplingMethod::UnderTomek => Box::new(TomekLinks::default()),
        SamplingMethod::UnderCluster => Box::new(ClusterCentroids::default()),
        SamplingMethod::UnderNearmiss => Box::new(NearMiss::default()),
        SamplingMethod::UnderNcr => Box::new(NeighbourhoodCleaningRule::new(NCR_NEIGHBORS)),
        SamplingMethod::OverRandom => Box::new(RandomOverSampler::new(target, ratio)),
        SamplingMethod::OverSmote => Box::new(Smote::new(target, ratio, SmoteKind::Regular)),
        SamplingMethod::OverSmoteb => Box::new(Smote::new(target, ratio, SmoteKind::Borderline1)),
        SamplingMethod::OverSmotesv => Box::new(Smote::new(target, ratio, SmoteKind::Svm)),
        SamplingMethod::OverunderSmoteTomek => Box::new(SmoteTomek::new(target, ratio)),
        SamplingMethod::OverunderSmoteEnn => Box::new(SmoteEnn::new(target, ratio)),
        SamplingMethod::EnsembleEasy => Box::new(EasyEnsemble::default()),
        SamplingMethod::EnsembleBc => Box::new(BalanceCascade::default()),
    }
}

/// Applies a [`RebalancingRequest`] to a training set.
#[derive(Debug, Clone, Copy)]
pub struct ResamplingDispatcher {
    seed: u64,
}

impl ResamplingDispatcher {
    /// Create a dispatcher whose random choices all derive from `seed`.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Resample `data` according to `request`.
    ///
    /// The result has as many label entries as rows, and only labels that
    /// occur in `data`. Row order is not related to the input.
    pub fn rebalance(
        &self,
        data: &Dataset,
        request: &RebalancingRequest,
    ) -> Result<Dataset, SamplingError> {
        if !data.has_labels() {
            return Err(SamplingError::MissingLabels);
        }
        if !request.ratio.is_finite() {
            return Err(SamplingError::InvalidRatio(request.ratio));
        }

        let ratio = if !request.method.uses_ratio() {
            request.ratio
        } else if request.is_auto() {
            let estimated = estimate_ratio(data.labels(), request.target_value)?;
            info!("Sampling ratio (estimated): {:.4}", estimated);
            estimated
        } else {
            info!("Sampling ratio: {:.4}", request.ratio);
            request.ratio
        };

        let sampler = sampler_for(request.method, ratio, request.target_value);
        info!("Sampling method: {} ({})", request.method, sampler.name());
        info!("Original samples: {}", data.n_samples());

        let mut rng = StdRng::seed_from_u64(self.seed);
        let resampled = sampler.fit_resample(data, &mut rng)?;

        info!("New samples: {}", resampled.n_samples());
        Ok(resampled)
    }
}
