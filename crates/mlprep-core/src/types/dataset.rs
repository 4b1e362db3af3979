//! Labeled feature matrices.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::DataError;

/// Which input file a dataset was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Test,
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Train => write!(f, "train"),
            Partition::Test => write!(f, "test"),
        }
    }
}

/// Feature matrix X paired with label vector y.
///
/// `y` is either empty (unlabeled partition) or has one entry per row of `X`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    features: Array2<f64>,
    feature_names: Vec<String>,
    labels: Array1<f64>,
}

impl Dataset {
    /// Create a labeled dataset.
    pub fn new(
        features: Array2<f64>,
        feature_names: Vec<String>,
        labels: Array1<f64>,
    ) -> Result<Self, DataError> {
        if !labels.is_empty() && labels.len() != features.nrows() {
            return Err(DataError::ShapeMismatch {
                rows: features.nrows(),
                labels: labels.len(),
            });
        }
        if feature_names.len() != features.ncols() {
            return Err(DataError::Parse(format!(
                "{} feature names for {} columns",
                feature_names.len(),
                features.ncols()
            )));
        }
        Ok(Self {
            features,
            feature_names,
            labels,
        })
    }

    /// Create a dataset without labels.
    pub fn unlabeled(features: Array2<f64>, feature_names: Vec<String>) -> Result<Self, DataError> {
        Self::new(features, feature_names, Array1::zeros(0))
    }

    /// Number of observations.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Check if labels are present.
    #[inline]
    pub fn has_labels(&self) -> bool {
        !self.labels.is_empty()
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn labels(&self) -> &Array1<f64> {
        &self.labels
    }

    /// Feature row at `index`.
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.features.row(index)
    }

    pub fn into_parts(self) -> (Array2<f64>, Vec<String>, Array1<f64>) {
        (self.features, self.feature_names, self.labels)
    }

    /// Distinct label values in ascending order, with their counts.
    pub fn class_counts(&self) -> Vec<(f64, usize)> {
        let mut sorted: Vec<f64> = self.labels.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut counts: Vec<(f64, usize)> = Vec::new();
        for value in sorted {
            match counts.last_mut() {
                Some((last, count)) if last.total_cmp(&value) == Ordering::Equal => *count += 1,
                _ => counts.push((value, 1)),
            }
        }
        counts
    }

    /// Row indices whose label equals `class`.
    pub fn class_indices(&self, class: f64) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|(_, y)| y.total_cmp(&class) == Ordering::Equal)
            .map(|(i, _)| i)
            .collect()
    }

    /// Build a new dataset from the given rows, in the given order.
    ///
    /// Indices may repeat. Every index must be below `n_samples`.
    pub fn select(&self, indices: &[usize]) -> Dataset {
        let features = self.features.select(Axis(0), indices);
        let labels = if self.has_labels() {
            self.labels.select(Axis(0), indices)
        } else {
            Array1::zeros(0)
        };
        Dataset {
            features,
            feature_names: self.feature_names.clone(),
            labels,
        }
    }

    /// Append rows with their labels to a labeled dataset.
    ///
    /// Each row must have `n_features` values.
    pub fn append(&self, rows: &[Vec<f64>], labels: &[f64]) -> Dataset {
        let n = self.n_samples();
        let total = n + rows.len();
        let features = Array2::from_shape_fn((total, self.n_features()), |(i, j)| {
            if i < n {
                self.features[[i, j]]
            } else {
                rows[i - n][j]
            }
        });
        let labels = Array1::from_shape_fn(total, |i| {
            if i < n {
                self.labels[i]
            } else {
                labels[i - n]
            }
        });
        Dataset {
            features,
            feature_names: self.feature_names.clone(),
            labels,
        }
    }

    /// Stack datasets with identical columns on top of each other.
    pub fn concat(parts: &[Dataset]) -> Option<Dataset> {
        let (first, rest) = parts.split_first()?;
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for part in rest {
            for i in 0..part.n_samples() {
                rows.push(part.row(i).to_vec());
                labels.push(part.labels[i]);
            }
        }
        Some(first.append(&rows, &labels))
    }
}
