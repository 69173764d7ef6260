//! Seeded train/test partitioning.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::{PipelineError, PipelineResult};
use crate::types::DataSet;

/// Row-index partition of a dataset into train and test subsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    /// Training row indices, in shuffled order.
    pub train: Vec<usize>,
    /// Test row indices, in original order.
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Partition `0..n` with a shuffle seeded by `seed`.
    ///
    /// The first `round(n * (1 - test_ratio))` shuffled indices form the training set; every
    /// other index goes to the test set, kept in ascending order. Halves round to even, so
    /// `n = 5` at ratio 0.5 trains on 2 rows.
    pub fn indices(n: usize, test_ratio: f64, seed: u64) -> PipelineResult<Self> {
        if !(0.0..=1.0).contains(&test_ratio) {
            return Err(PipelineError::InvalidConfig {
                message: format!("test_ratio must be within [0, 1], got {test_ratio}"),
            });
        }

        let n_train = ((n as f64) * (1.0 - test_ratio)).round_ties_even() as usize;
        let n_train = n_train.min(n);

        let mut order: Vec<usize> = (0..n).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);

        let train = order[..n_train].to_vec();
        let mut in_train = vec![false; n];
        for &i in &train {
            in_train[i] = true;
        }
        let test = (0..n).filter(|&i| !in_train[i]).collect();

        Ok(Self { train, test })
    }
}

/// Split a dataset into `(train, test)` using [`TrainTestSplit::indices`].
pub fn train_test_split(
    dataset: &DataSet,
    test_ratio: f64,
    seed: u64,
) -> PipelineResult<(DataSet, DataSet)> {
    let split = TrainTestSplit::indices(dataset.row_count(), test_ratio, seed)?;
    Ok((dataset.take_rows(&split.train), dataset.take_rows(&split.test)))
}
