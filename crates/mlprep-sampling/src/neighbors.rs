//! Brute-force nearest neighbour search.

use mlprep_core::types::Dataset;
use ndarray::{Array2, ArrayView1};
use std::cmp::Ordering;

#[inline]
pub(crate) fn squared_distance(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Indices of the `k` candidates closest to `query`, nearest first.
///
/// `exclude` drops one candidate (usually the query row itself). Ties are
/// broken by index so results are deterministic.
pub(crate) fn nearest(
    features: &Array2<f64>,
    query: ArrayView1<'_, f64>,
    candidates: &[usize],
    k: usize,
    exclude: Option<usize>,
) -> Vec<usize> {
    let mut scored: Vec<(f64, usize)> = candidates
        .iter()
        .copied()
        .filter(|&i| Some(i) != exclude)
        .map(|i| (squared_distance(features.row(i), query), i))
        .collect();

    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    scored.truncate(k);
    scored.into_iter().map(|(_, i)| i).collect()
}

/// Most common label; ties go to the lower label.
pub(crate) fn vote<I>(labels: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut sorted: Vec<f64> = labels.into_iter().collect();
    sorted.sort_by(f64::total_cmp);

    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j].total_cmp(&sorted[i]) == Ordering::Equal {
            j += 1;
        }
        if best.map(|(_, n)| j - i > n).unwrap_or(true) {
            best = Some((sorted[i], j - i));
        }
        i = j;
    }
    best.map(|(label, _)| label)
}

/// Label predicted for `row` by a k-NN vote over `candidates`.
pub(crate) fn knn_predict(
    data: &Dataset,
    query: ArrayView1<'_, f64>,
    candidates: &[usize],
    k: usize,
    exclude: Option<usize>,
) -> Option<f64> {
    let labels = data.labels();
    let neighbours = nearest(data.features(), query, candidates, k, exclude);
    vote(neighbours.iter().map(|&i| labels[i]))
}

#[inline]
pub(crate) fn same_class(a: f64, b: f64) -> bool {
    a.total_cmp(&b) == Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_nearest_orders_by_distance() {
        let x = array![[0.0, 0.0], [3.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let all = [0, 1, 2, 3];

        assert_eq!(nearest(&x, x.row(0), &all, 2, Some(0)), vec![2, 3]);
        assert_eq!(nearest(&x, x.row(0), &all, 10, None), vec![0, 2, 3, 1]);
    }

    #[test]
    fn test_vote() {
        assert_eq!(vote([1.0, 0.0, 1.0]), Some(1.0));
        assert_eq!(vote([1.0, 0.0]), Some(0.0));
        assert_eq!(vote(Vec::<f64>::new()), None);
    }
}
