//! smartcore models used to choose rows: SVM support vectors, k-means
//! clusters and k-NN predictions.

use mlprep_core::error::SamplingError;
use mlprep_core::types::Dataset;
use ndarray::Array2;
use smartcore::cluster::kmeans::{KMeans, KMeansParameters};
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};
use smartcore::svm::svc::{SVCParameters, SVC};
use smartcore::svm::Kernels;

use crate::neighbors::same_class;

fn model_error(e: impl std::fmt::Display) -> SamplingError {
    SamplingError::Model(e.to_string())
}

/// Copy `rows` of `features` into a smartcore matrix.
fn matrix(features: &Array2<f64>, rows: &[usize]) -> Result<DenseMatrix<f64>, SamplingError> {
    let values: Vec<Vec<f64>> = rows.iter().map(|&i| features.row(i).to_vec()).collect();
    DenseMatrix::from_2d_vec(&values).map_err(model_error)
}

/// Decision values of a linear SVM separating the `positive` rows from the
/// rest. Positive values lie on the positive side; support vectors have an
/// absolute value of at most one.
pub(crate) fn svm_decision(
    features: &Array2<f64>,
    positive: &[bool],
    seed: u64,
) -> Result<Vec<f64>, SamplingError> {
    let all: Vec<usize> = (0..features.nrows()).collect();
    let x = matrix(features, &all)?;
    let y: Vec<i32> = positive.iter().map(|&p| if p { 1 } else { -1 }).collect();

    let params: SVCParameters<f64, i32, DenseMatrix<f64>, Vec<i32>> = SVCParameters::default()
        .with_kernel(Kernels::linear())
        .with_seed(Some(seed));
    let svc = SVC::fit(&x, &y, &params).map_err(model_error)?;
    svc.decision_function(&x).map_err(model_error)
}

/// Cluster of every row of `points` under k-means with `k` clusters.
pub(crate) fn kmeans_clusters(
    points: &Array2<f64>,
    k: usize,
    max_iter: usize,
    seed: u64,
) -> Result<Vec<usize>, SamplingError> {
    // smartcore needs at least two clusters
    if k < 2 || points.nrows() < 2 {
        return Ok(vec![0; points.nrows()]);
    }
    let all: Vec<usize> = (0..points.nrows()).collect();
    let x = matrix(points, &all)?;

    let mut params = KMeansParameters::default().with_k(k).with_max_iter(max_iter);
    params.seed = Some(seed);
    let model: KMeans<f64, i32, DenseMatrix<f64>, Vec<i32>> =
        KMeans::fit(&x, params).map_err(model_error)?;
    let clusters: Vec<i32> = model.predict(&x).map_err(model_error)?;
    Ok(clusters.into_iter().map(|c| c.max(0) as usize).collect())
}

/// Labels predicted for the `query` rows of `data` by a k-NN classifier
/// fitted on its `train` rows.
pub(crate) fn knn_classify(
    data: &Dataset,
    train: &[usize],
    query: &[usize],
    k: usize,
) -> Result<Vec<f64>, SamplingError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    if train.is_empty() {
        return Err(SamplingError::Model("k-NN fitted on no rows".to_string()));
    }
    let labels = data.labels();

    // smartcore wants integer classes; the code of a label is its position.
    let mut classes: Vec<f64> = train.iter().map(|&i| labels[i]).collect();
    classes.sort_by(f64::total_cmp);
    classes.dedup_by(|a, b| same_class(*a, *b));
    let code = |label: f64| {
        classes
            .iter()
            .position(|&c| same_class(c, label))
            .unwrap_or(0) as i32
    };

    let x = matrix(data.features(), train)?;
    let y: Vec<i32> = train.iter().map(|&i| code(labels[i])).collect();
    let params = KNNClassifierParameters::default().with_k(k.clamp(1, train.len()));
    let model = KNNClassifier::fit(&x, &y, params).map_err(model_error)?;

    let predicted: Vec<i32> = model
        .predict(&matrix(data.features(), query)?)
        .map_err(model_error)?;
    Ok(predicted
        .into_iter()
        .map(|c| classes.get(c.max(0) as usize).copied().unwrap_or(f64::NAN))
        .collect())
}
