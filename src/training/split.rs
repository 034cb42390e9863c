//! Seeded hold-out split

use crate::error::{RealtyError, Result};
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Row indices of the two partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n_rows` with a ChaCha8 generator seeded by `seed` and hold out
/// the first `ceil(test_size * n_rows)` indices. The partition depends only on
/// `n_rows`, `test_size` and `seed`.
pub fn train_test_split(n_rows: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(RealtyError::InvalidInput(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    if n_rows < 2 {
        return Err(RealtyError::DataError(format!(
            "need at least 2 rows to hold out a test set, got {}",
            n_rows
        )));
    }

    let n_test = ((test_size * n_rows as f64).ceil() as usize).clamp(1, n_rows - 1);

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_test);
    Ok(TrainTestSplit { train, test: indices })
}

/// Gather rows of `df` in the given order
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx = IdxCa::from_vec(
        "idx".into(),
        rows.iter().map(|&i| i as IdxSize).collect(),
    );
    Ok(df.take(&idx)?)
}
