//! Reproducible train/test splitting

use log::debug;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::{DataError, Result};

/// A partition of `0..n` into training and test row positions.
///
/// Both vectors are sorted ascending, so rows keep their original relative
/// order on either side of the split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl Split {
    /// Total number of rows covered
    pub fn len(&self) -> usize {
        self.train.len() + self.test.len()
    }

    /// Check if the split covers no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split `n` row positions into training and test sets.
///
/// The positions `0..n` are shuffled with a `StdRng` seeded from `seed`; the
/// first `floor(train_fraction * n)` shuffled positions form the training
/// set and the rest the test set. The same `(n, seed, train_fraction)`
/// always produces the same split.
///
/// Either side may come out empty for very small `n`; fitting on an empty
/// side fails later with an insufficient-data error.
pub fn train_test_split(n: usize, seed: u64, train_fraction: f64) -> Result<Split> {
    if !(train_fraction > 0.0 && train_fraction < 1.0) {
        return Err(DataError::InvalidParameter(format!(
            "train_fraction must lie in (0, 1), got {}",
            train_fraction
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut positions: Vec<usize> = (0..n).collect();
    positions.shuffle(&mut rng);

    let n_train = (train_fraction * n as f64).floor() as usize;

    let mut mask = vec![false; n];
    for &idx in &positions[..n_train] {
        mask[idx] = true;
    }

    let (train, test): (Vec<usize>, Vec<usize>) = (0..n).partition(|&i| mask[i]);

    debug!(
        "split {} rows into {} train / {} test (seed {})",
        n,
        train.len(),
        test.len(),
        seed
    );

    Ok(Split { train, test })
}
