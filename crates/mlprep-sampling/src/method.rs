//! The closed set of rebalancing methods.

use mlprep_core::error::SamplingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Rebalancing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingMethod {
    UnderRandom,
    UnderTomek,
    UnderCluster,
    UnderNearmiss,
    UnderNcr,
    OverRandom,
    OverSmote,
    OverSmoteb,
    OverSmotesv,
    OverunderSmoteTomek,
    OverunderSmoteEnn,
    EnsembleEasy,
    EnsembleBc,
}

/// Broad kind of a rebalancing method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFamily {
    Under,
    Over,
    Combined,
    Ensemble,
}

impl SamplingMethod {
    /// Get all methods.
    pub fn all() -> &'static [SamplingMethod] {
        &[
            SamplingMethod::UnderRandom,
            SamplingMethod::UnderTomek,
            SamplingMethod::UnderCluster,
            SamplingMethod::UnderNearmiss,
            SamplingMethod::UnderNcr,
            SamplingMethod::OverRandom,
            SamplingMethod::OverSmote,
            SamplingMethod::OverSmoteb,
            SamplingMethod::OverSmotesv,
            SamplingMethod::OverunderSmoteTomek,
            SamplingMethod::OverunderSmoteEnn,
            SamplingMethod::EnsembleEasy,
            SamplingMethod::EnsembleBc,
        ]
    }

    /// Configuration name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingMethod::UnderRandom => "under_random",
            SamplingMethod::UnderTomek => "under_tomek",
            SamplingMethod::UnderCluster => "under_cluster",
            SamplingMethod::UnderNearmiss => "under_nearmiss",
            SamplingMethod::UnderNcr => "under_ncr",
            SamplingMethod::OverRandom => "over_random",
            SamplingMethod::OverSmote => "over_smote",
            SamplingMethod::OverSmoteb => "over_smoteb",
            SamplingMethod::OverSmotesv => "over_smotesv",
            SamplingMethod::OverunderSmoteTomek => "overunder_smote_tomek",
            SamplingMethod::OverunderSmoteEnn => "overunder_smote_enn",
            SamplingMethod::EnsembleEasy => "ensemble_easy",
            SamplingMethod::EnsembleBc => "ensemble_bc",
        }
    }

    pub fn family(&self) -> MethodFamily {
        match self {
            SamplingMethod::UnderRandom
            | SamplingMethod::UnderTomek
            | SamplingMethod::UnderCluster
            | SamplingMethod::UnderNearmiss
            | SamplingMethod::UnderNcr => MethodFamily::Under,
            SamplingMethod::OverRandom
            | SamplingMethod::OverSmote
            | SamplingMethod::OverSmoteb
            | SamplingMethod::OverSmotesv => MethodFamily::Over,
            SamplingMethod::OverunderSmoteTomek | SamplingMethod::OverunderSmoteEnn => {
                MethodFamily::Combined
            }
            SamplingMethod::EnsembleEasy | SamplingMethod::EnsembleBc => MethodFamily::Ensemble,
        }
    }

    /// Whether the method consumes the sampling ratio.
    pub fn uses_ratio(&self) -> bool {
        matches!(self.family(), MethodFamily::Over | MethodFamily::Combined)
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            SamplingMethod::UnderRandom => "Randomly drop rows until every class matches the minority",
            SamplingMethod::UnderTomek => "Drop majority rows that form Tomek links",
            SamplingMethod::UnderCluster => "Replace majority classes with k-means centroids",
            SamplingMethod::UnderNearmiss => "Keep majority rows closest to the minority (NearMiss-1)",
            SamplingMethod::UnderNcr => "Neighbourhood cleaning rule",
            SamplingMethod::OverRandom => "Duplicate random target-class rows",
            SamplingMethod::OverSmote => "SMOTE interpolation between target-class neighbours",
            SamplingMethod::OverSmoteb => "Borderline-1 SMOTE seeded from rows in danger",
            SamplingMethod::OverSmotesv => "SMOTE seeded from linear SVM support vectors",
            SamplingMethod::OverunderSmoteTomek => "SMOTE followed by Tomek link cleaning",
            SamplingMethod::OverunderSmoteEnn => "SMOTE followed by edited nearest neighbours",
            SamplingMethod::EnsembleEasy => "Stack of independent random under-samples",
            SamplingMethod::EnsembleBc => "Balance cascade of classifier-guided under-samples",
        }
    }
}

impl fmt::Display for SamplingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SamplingMethod {
    type Err = SamplingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        SamplingMethod::all()
            .iter()
            .copied()
            .find(|m| m.as_str() == name)
            .ok_or_else(|| SamplingError::UnknownMethod(s.to_string()))
    }
}
