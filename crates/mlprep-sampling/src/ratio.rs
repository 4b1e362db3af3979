//! Sampling ratio estimation.

use mlprep_core::error::SamplingError;
use ndarray::Array1;
use std::cmp::Ordering;

/// Ratio by which the target class must grow to match the other class.
///
/// Returns `other_count / target_count - 1.0`, so `0.0` means the classes
/// are already balanced. Only defined for binary labels.
pub fn estimate_ratio(labels: &Array1<f64>, target_value: f64) -> Result<f64, SamplingError> {
    let mut values: Vec<f64> = labels.to_vec();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b) == Ordering::Equal);

    if values.len() > 2 {
        return Err(SamplingError::NonBinaryLabels {
            classes: values.len(),
        });
    }

    let count = |value: f64| {
        labels
            .iter()
            .filter(|y| y.total_cmp(&value) == Ordering::Equal)
            .count()
    };

    let target_count = count(target_value);
    if target_count == 0 {
        return Err(SamplingError::DegenerateRatio {
            target: target_value,
        });
    }

    let other = values
        .iter()
        .copied()
        .find(|v| v.total_cmp(&target_value) != Ordering::Equal)
        .ok_or(SamplingError::MissingComparisonClass {
            target: target_value,
        })?;

    Ok(count(other) as f64 / target_count as f64 - 1.0)
}
