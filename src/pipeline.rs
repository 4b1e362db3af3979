//! The dataset preparation pipeline.

use mlprep_config::{AppConfig, SamplingSettings};
use mlprep_core::error::{PrepResult, SamplingError};
use mlprep_core::types::{Dataset, Partition};
use mlprep_data::{get_data, shuffle_data};
use mlprep_sampling::{RebalancingRequest, ResamplingDispatcher};
use tracing::info;

/// Train and test sets ready for model fitting.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub train: Dataset,
    pub test: Dataset,
}

/// Build the rebalancing request described by `settings`.
pub fn rebalancing_request(settings: &SamplingSettings) -> Result<RebalancingRequest, SamplingError> {
    RebalancingRequest::parse(&settings.method, settings.ratio, settings.target_value)
}

/// Load both partitions, shuffle the training set, and rebalance it when
/// sampling is enabled.
pub fn prepare(config: &AppConfig) -> PrepResult<PreparedData> {
    let spec = &config.model;

    let train = get_data(spec, Partition::Train)?;
    let test = get_data(spec, Partition::Test)?;
    let train = shuffle_data(train, spec.seed, spec.shuffle);

    let train = if config.sampling.option {
        let request = rebalancing_request(&config.sampling)?;
        ResamplingDispatcher::new(spec.seed).rebalance(&train, &request)?
    } else {
        info!("Skipping sampling");
        train
    };

    Ok(PreparedData { train, test })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mlprep_core::error::PrepError;
    use std::fmt::Write as _;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    /// 16 negative rows and 4 positive rows, plus a two-row test file.
    fn project() -> (TempDir, AppConfig) {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("input")).unwrap();

        let mut train = String::from("x1,x2,label\n");
        for i in 0..20 {
            let label = if i < 16 { "neg" } else { "pos" };
            writeln!(train, "{},{},{}", i, i * 2, label).unwrap();
        }
        fs::write(dir.path().join("input/train.csv"), train).unwrap();
        fs::write(dir.path().join("input/test.csv"), "x1,x2\n1,2\n3,4\n").unwrap();

        let mut config = AppConfig::default();
        config.model.directory = dir.path().to_path_buf();
        config.model.target = "label".to_string();
        config.model.shuffle = true;
        (dir, config)
    }

    #[test]
    fn test_prepare_without_sampling() {
        let (_dir, config) = project();
        let data = prepare(&config).unwrap();

        assert_eq!(data.train.n_samples(), 20);
        assert_eq!(data.train.class_counts(), vec![(0.0, 16), (1.0, 4)]);
        assert!(!data.test.has_labels());
        assert_eq!(data.test.n_samples(), 2);
    }

    #[test]
    fn test_prepare_over_samples_to_parity() {
        let (_dir, mut config) = project();
        config.sampling = SamplingSettings {
            option: true,
            method: "over_random".to_string(),
            ratio: 0.0,
            target_value: 1.0,
        };

        let data = prepare(&config).unwrap();
        assert_eq!(data.train.class_counts(), vec![(0.0, 16), (1.0, 16)]);
    }

    #[test]
    fn test_unknown_method_aborts() {
        let (_dir, mut config) = project();
        config.sampling.option = true;
        config.sampling.method = "bogus".to_string();

        match prepare(&config) {
            Err(PrepError::Sampling(SamplingError::UnknownMethod(name))) => {
                assert_eq!(name, "bogus")
            }
            other => panic!("unexpected result: {:?}", other.map(|d| d.train.n_samples())),
        }
    }
}
