//! The loading step: turn an input file into features and labels.

use mlprep_core::error::DataError;
use mlprep_core::traits::RawFrame;
use mlprep_core::types::{Dataset, FeatureSelection, ModelSpec, ModelType, Partition};
use ndarray::{Array1, Array2};
use std::path::PathBuf;
use tracing::info;

use crate::reader::read_frame;

/// Cell spellings read as a missing value.
const MISSING_TOKENS: &[&str] = &["", "na", "n/a", "nan", "null", "none", "#n/a"];

fn is_missing(cell: &str) -> bool {
    let cell = cell.trim();
    MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

/// Path of the input file for `partition`: `<directory>/input/<file>.<extension>`.
pub fn input_path(spec: &ModelSpec, partition: Partition) -> PathBuf {
    let file = match partition {
        Partition::Train => &spec.train_file,
        Partition::Test => &spec.test_file,
    };
    spec.directory
        .join("input")
        .join(format!("{}.{}", file, spec.extension))
}

fn numeric_value(cell: &str) -> f64 {
    cell.parse().unwrap_or(f64::NAN)
}

/// Maps distinct label strings to `0..n` in sorted order.
///
/// Labels that all parse as numbers sort and compare numerically, so `1`
/// and `1.0` are one class spelled the way it was first seen. Anything else
/// sorts as text.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelEncoder {
    classes: Vec<String>,
    numeric: bool,
}

impl LabelEncoder {
    /// Learn the classes present in `values`.
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let labels: Vec<&str> = values.into_iter().map(str::trim).collect();
        let numeric = labels.iter().all(|c| c.parse::<f64>().is_ok());

        let classes: Vec<String> = if numeric {
            let mut pairs: Vec<(f64, &str)> =
                labels.iter().map(|&c| (numeric_value(c), c)).collect();
            pairs.sort_by(|a, b| a.0.total_cmp(&b.0));
            pairs.dedup_by(|a, b| a.0 == b.0);
            pairs.into_iter().map(|(_, c)| c.to_string()).collect()
        } else {
            let mut classes: Vec<String> = labels.iter().map(|c| c.to_string()).collect();
            classes.sort();
            classes.dedup();
            classes
        };
        Self { classes, numeric }
    }

    /// Distinct classes; the code of a class is its position.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Code of `value`, if it was seen during fitting.
    pub fn transform(&self, value: &str) -> Option<f64> {
        let value = value.trim();
        let position = if self.numeric {
            let number = value.parse::<f64>().ok()?;
            self.classes.iter().position(|c| numeric_value(c) == number)
        } else {
            self.classes.iter().position(|c| c == value)
        };
        position.map(|i| i as f64)
    }
}

/// Read the labels in column `target`, or `None` when any cell is missing.
fn extract_labels(
    frame: &RawFrame,
    target: usize,
    name: &str,
    model_type: ModelType,
) -> Result<Option<Array1<f64>>, DataError> {
    let cells: Vec<&str> = frame.rows.iter().map(|row| row[target].as_str()).collect();

    let missing = cells.iter().filter(|c| is_missing(c)).count();
    if missing > 0 {
        info!("Found {} records with NaN target values", missing);
        return Ok(None);
    }

    let labels: Vec<f64> = match model_type {
        ModelType::Classification => {
            let encoder = LabelEncoder::fit(cells.iter().copied());
            info!("Encoded {} classes: {:?}", encoder.classes().len(), encoder.classes());
            cells
                .iter()
                .map(|c| encoder.transform(c).unwrap_or(f64::NAN))
                .collect()
        }
        ModelType::Regression => cells
            .iter()
            .enumerate()
            .map(|(row, c)| {
                c.parse::<f64>().map_err(|_| DataError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: c.to_string(),
                })
            })
            .collect::<Result<_, DataError>>()?,
    };
    Ok(Some(Array1::from(labels)))
}

/// Column indices to use as features, in output order.
fn feature_columns(
    frame: &RawFrame,
    target: Option<usize>,
    selection: &FeatureSelection,
) -> Result<Vec<usize>, DataError> {
    match selection {
        FeatureSelection::All => Ok((0..frame.columns.len())
            .filter(|&i| Some(i) != target)
            .collect()),
        FeatureSelection::Named(names) => names
            .iter()
            .map(|name| {
                frame
                    .columns
                    .iter()
                    .enumerate()
                    .find(|&(i, c)| c == name && Some(i) != target)
                    .map(|(i, _)| i)
                    .ok_or_else(|| DataError::MissingColumn(name.clone()))
            })
            .collect(),
    }
}

/// Load the features and, when available, the labels of `partition`.
///
/// The target column never appears among the features. Labels are empty
/// when the target column is absent or has missing cells. Missing feature
/// cells become NaN; any other non-numeric feature cell is an error.
pub fn get_data(spec: &ModelSpec, partition: Partition) -> Result<Dataset, DataError> {
    info!("Loading Data");

    let path = input_path(spec, partition);
    let frame = read_frame(&path, &spec.separator)?;

    let target = frame.columns.iter().position(|c| c == &spec.target);
    let labels = match target {
        Some(index) => {
            info!("Found target {} in data frame", spec.target);
            match extract_labels(&frame, index, &spec.target, spec.model_type)? {
                Some(labels) => {
                    info!("Labels (y) found for {}", partition);
                    labels
                }
                None => {
                    info!("Labels (y) for {} will not be used", partition);
                    Array1::zeros(0)
                }
            }
        }
        None => {
            info!("Target {} not found in {}", spec.target, partition);
            Array1::zeros(0)
        }
    };

    let columns = feature_columns(&frame, target, &spec.features)?;
    let mut values = Vec::with_capacity(frame.len() * columns.len());
    for (row, record) in frame.rows.iter().enumerate() {
        for &col in &columns {
            let cell = record[col].as_str();
            let value = if is_missing(cell) {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| DataError::NonNumeric {
                    column: frame.columns[col].clone(),
                    row,
                    value: cell.to_string(),
                })?
            };
            values.push(value);
        }
    }

    let features = Array2::from_shape_vec((frame.len(), columns.len()), values)
        .map_err(|e| DataError::Parse(e.to_string()))?;
    let names = columns.iter().map(|&i| frame.columns[i].clone()).collect();

    let dataset = Dataset::new(features, names, labels)?;
    info!(
        "{} data: {} rows, {} features",
        partition,
        dataset.n_samples(),
        dataset.n_features()
    );
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn project(train: &str, test: &str) -> (TempDir, ModelSpec) {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("input")).unwrap();
        fs::write(dir.path().join("input/train.csv"), train).unwrap();
        fs::write(dir.path().join("input/test.csv"), test).unwrap();
        let spec = ModelSpec {
            directory: dir.path().to_path_buf(),
            target: "won".to_string(),
            ..ModelSpec::default()
        };
        (dir, spec)
    }

    #[test]
    fn test_input_path() {
        let spec = ModelSpec {
            directory: PathBuf::from("/proj"),
            extension: "tsv".to_string(),
            ..ModelSpec::default()
        };
        assert_eq!(
            input_path(&spec, Partition::Test),
            PathBuf::from("/proj/input/test.tsv")
        );
    }

    #[test]
    fn test_label_encoder_sorts() {
        let encoder = LabelEncoder::fit(["up", "down", "up", "flat"]);
        assert_eq!(encoder.classes(), &["down", "flat", "up"]);
        assert_eq!(encoder.transform("up"), Some(2.0));
        assert_eq!(encoder.transform("sideways"), None);

        let numeric = LabelEncoder::fit(["10", "2", "1"]);
        assert_eq!(numeric.classes(), &["1", "2", "10"]);
    }

    #[test]
    fn test_label_encoder_merges_numeric_spellings() {
        let encoder = LabelEncoder::fit(["1", "0", "1.0", "1"]);
        assert_eq!(encoder.classes(), &["0", "1"]);
        assert_eq!(encoder.transform("1.0"), Some(1.0));
        assert_eq!(encoder.transform("1"), Some(1.0));
        assert_eq!(encoder.transform("0.00"), Some(0.0));
        assert_eq!(encoder.transform("2"), None);
    }

    #[test]
    fn test_mixed_numeric_spellings_stay_binary() {
        let (_dir, spec) = project("x1,won\n1,0\n2,1\n3,1.0\n4,0.0\n", "x1\n1\n");

        let train = get_data(&spec, Partition::Train).unwrap();
        assert_eq!(train.labels().to_vec(), vec![0.0, 1.0, 1.0, 0.0]);
        assert_eq!(train.class_counts(), vec![(0.0, 2), (1.0, 2)]);
    }

    #[test]
    fn test_train_with_labels() {
        let (_dir, spec) = project("x1,won,x2\n1.5,yes,2\n2.5,no,3\n3.5,yes,4\n", "x1,x2\n1,2\n");

        let train = get_data(&spec, Partition::Train).unwrap();
        assert_eq!(train.feature_names(), &["x1", "x2"]);
        assert_eq!(train.labels().to_vec(), vec![1.0, 0.0, 1.0]);
        assert_relative_eq!(train.features()[[1, 0]], 2.5);
        assert_relative_eq!(train.features()[[2, 1]], 4.0);
    }

    #[test]
    fn test_test_without_target() {
        let (_dir, spec) = project("x1,won\n1,a\n", "x1,x2\n1,2\n3,4\n");

        let test = get_data(&spec, Partition::Test).unwrap();
        assert!(!test.has_labels());
        assert_eq!(test.n_samples(), 2);
        assert_eq!(test.n_features(), 2);
    }

    #[test]
    fn test_missing_target_drops_labels() {
        let (_dir, spec) = project("x1,won\n1,1\n2,\n3,NaN\n", "x1\n1\n");

        let train = get_data(&spec, Partition::Train).unwrap();
        assert!(!train.has_labels());
        assert_eq!(train.feature_names(), &["x1"]);
    }

    #[test]
    fn test_named_features_in_listed_order() {
        let (_dir, mut spec) = project("a,b,c,won\n1,2,3,0\n4,5,6,1\n", "a\n1\n");
        spec.features = FeatureSelection::Named(vec!["c".to_string(), "a".to_string()]);

        let train = get_data(&spec, Partition::Train).unwrap();
        assert_eq!(train.feature_names(), &["c", "a"]);
        assert_eq!(train.row(1).to_vec(), vec![6.0, 4.0]);
    }

    #[test]
    fn test_unknown_or_target_feature_rejected() {
        let (_dir, mut spec) = project("a,won\n1,0\n", "a\n1\n");
        spec.features = FeatureSelection::Named(vec!["won".to_string()]);

        assert!(matches!(
            get_data(&spec, Partition::Train),
            Err(DataError::MissingColumn(name)) if name == "won"
        ));
    }

    #[test]
    fn test_regression_labels() {
        let (_dir, mut spec) = project("a,won\n1,0.25\n2,1.5\n", "a\n1\n");
        spec.model_type = ModelType::Regression;

        let train = get_data(&spec, Partition::Train).unwrap();
        assert_eq!(train.labels().to_vec(), vec![0.25, 1.5]);
    }

    #[test]
    fn test_non_numeric_feature() {
        let (_dir, spec) = project("a,won\n1,0\nabc,1\n", "a\n1\n");

        match get_data(&spec, Partition::Train) {
            Err(DataError::NonNumeric { column, row, value }) => {
                assert_eq!(column, "a");
                assert_eq!(row, 1);
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
