//! Seeded row shuffling.

use mlprep_core::types::Dataset;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Permute the rows of `data`, keeping features and labels in lockstep.
///
/// The permutation depends only on `seed` and the row count. When `shuffle`
/// is false the dataset is returned untouched.
pub fn shuffle_data(data: Dataset, seed: u64, shuffle: bool) -> Dataset {
    if !shuffle {
        info!("Skipping Shuffling");
        return data;
    }

    info!("Shuffling Training Data");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..data.n_samples()).collect();
    order.shuffle(&mut rng);
    data.select(&order)
}
