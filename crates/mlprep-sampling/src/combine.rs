//! Over-sampling followed by cleaning.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use rand::rngs::StdRng;

use crate::over::{Smote, SmoteKind};
use crate::under::{EditedNearestNeighbours, TomekLinks};
use crate::Sampler;

/// SMOTE, then drop both ends of every Tomek link.
#[derive(Debug, Clone, Copy)]
pub struct SmoteTomek {
    smote: Smote,
}

impl SmoteTomek {
    pub fn new(target: f64, ratio: f64) -> Self {
        Self {
            smote: Smote::new(target, ratio, SmoteKind::Regular),
        }
    }
}

impl Sampler for SmoteTomek {
    fn name(&self) -> &'static str {
        "SMOTETomek"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let grown = self.smote.fit_resample(data, rng)?;
        TomekLinks { remove_both: true }.fit_resample(&grown, rng)
    }
}

/// SMOTE, then edited nearest neighbours over every class.
#[derive(Debug, Clone, Copy)]
pub struct SmoteEnn {
    smote: Smote,
    enn: EditedNearestNeighbours,
}

impl SmoteEnn {
    pub fn new(target: f64, ratio: f64) -> Self {
        Self {
            smote: Smote::new(target, ratio, SmoteKind::Regular),
            enn: EditedNearestNeighbours {
                all_classes: true,
                ..EditedNearestNeighbours::default()
            },
        }
    }
}

impl Sampler for SmoteEnn {
    fn name(&self) -> &'static str {
        "SMOTEENN"
    }

    fn fit_resample(&self, data: &Dataset, rng: &mut StdRng) -> Result<Dataset, SamplingError> {
        let grown = self.smote.fit_resample(data, rng)?;
        self.enn.fit_resample(&grown, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};
    use rand::SeedableRng;

    fn overlapping() -> Dataset {
        Dataset::new(
            array![
                [0.0, 0.0],
                [0.2, 0.1],
                [0.1, 0.3],
                [0.3, 0.3],
                [0.4, 0.0],
                [0.9, 0.9],
                [1.0, 1.0],
                [1.1, 0.9],
                [0.95, 1.05],
            ],
            vec!["a".to_string(), "b".to_string()],
            Array1::from(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_smote_tomek_is_smote_then_links() {
        let data = overlapping();
        let out = SmoteTomek::new(1.0, 1.0)
            .fit_resample(&data, &mut StdRng::seed_from_u64(3))
            .unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let grown = Smote::new(1.0, 1.0, SmoteKind::Regular)
            .fit_resample(&data, &mut rng)
            .unwrap();
        assert_eq!(grown.n_samples(), 12);
        let links = TomekLinks::link_members(&grown, true).unwrap();

        assert_eq!(out.n_samples(), 12 - links.len());
        assert_eq!(out, TomekLinks { remove_both: true }.fit_resample(&grown, &mut rng).unwrap());
    }

    #[test]
    fn test_smote_enn_edits_every_class() {
        let data = overlapping();
        let out = SmoteEnn::new(1.0, 1.0)
            .fit_resample(&data, &mut StdRng::seed_from_u64(3))
            .unwrap();

        // (0.9, 0.9) sits among class-1 rows and is edited away.
        assert!(!(0..out.n_samples()).any(|i| out.row(i) == array![0.9, 0.9]));
        assert_eq!(out.n_samples(), out.labels().len());
        assert!(out.n_samples() <= 12);
    }
}
