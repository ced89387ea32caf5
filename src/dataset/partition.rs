//! Stratified train / test shard partitioning.
//!
//! The table is cut in four seeded, label-stratified steps:
//! train vs. pool, then shard 1 off the pool, shard 2 off the remainder, and
//! the last remainder halved into shards 3 and 4. Each step's fraction is
//! derived from `train_fraction` and `shard_fraction` so every shard ends up
//! at `shard_fraction` of the full table.

use super::DatasetTable;
use crate::config::SplitConfig;
use crate::error::{PartitionError, TableError};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::path::Path;
use tracing::info;

/// Absorbs float error in `fraction * rows` before rounding up.
const SIZE_EPSILON: f64 = 1e-9;

pub const SHARD_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Partition {
    pub train: DatasetTable,
    pub tests: [DatasetTable; SHARD_COUNT],
}

impl Partition {
    /// Writes `train_data.csv` and `test_data_part{1..4}.csv` under `dir`.
    pub fn write(&self, dir: &Path) -> Result<(), TableError> {
        self.train.write_csv(&dir.join("train_data.csv"))?;
        info!(rows = self.train.len(), "train data");
        for (i, shard) in self.tests.iter().enumerate() {
            shard.write_csv(&dir.join(format!("test_data_part{}.csv", i + 1)))?;
            info!(part = i + 1, rows = shard.len(), "test data");
        }
        Ok(())
    }
}

pub struct DatasetPartitioner {
    train_fraction: f64,
    shard_fraction: f64,
    seed: u64,
}

impl DatasetPartitioner {
    pub fn new(config: &SplitConfig) -> Self {
        Self {
            train_fraction: config.train_fraction,
            shard_fraction: config.shard_fraction,
            seed: config.seed,
        }
    }

    pub fn partition(&self, table: &DatasetTable) -> Result<Partition, PartitionError> {
        let pool_fraction = 1.0 - self.train_fraction;
        let split_size = self.shard_fraction / pool_fraction;
        let (train, pool) = stratified_split(table, pool_fraction, self.seed)?;
        let (test_1, rest) = stratified_split(&pool, 1.0 - split_size, self.seed)?;
        let (test_2, rest) =
            stratified_split(&rest, 1.0 - split_size / (1.0 - split_size), self.seed)?;
        let (test_3, test_4) = stratified_split(&rest, 0.5, self.seed)?;
        Ok(Partition {
            train,
            tests: [test_1, test_2, test_3, test_4],
        })
    }
}

/// Split `table` into `(kept, split_off)`, where `split_off` holds
/// `ceil(test_fraction * rows)` rows and both sides keep the label ratio.
pub fn stratified_split(
    table: &DatasetTable,
    test_fraction: f64,
    seed: u64,
) -> Result<(DatasetTable, DatasetTable), PartitionError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PartitionError::InvalidFraction(test_fraction));
    }
    let labels = table.binary_labels()?;
    let n = labels.len();

    let mut by_class: Vec<(u8, Vec<usize>)> = Vec::new();
    for class in [0u8, 1u8] {
        let idx: Vec<usize> = (0..n).filter(|&i| labels[i] == class).collect();
        if !idx.is_empty() {
            by_class.push((class, idx));
        }
    }
    if let Some((label, idx)) = by_class.iter().find(|(_, idx)| idx.len() < 2) {
        return Err(PartitionError::SparseClass {
            label: *label,
            count: idx.len(),
        });
    }

    let n_test = ((test_fraction * n as f64) - SIZE_EPSILON).ceil().max(0.0) as usize;
    let n_train = n.saturating_sub(n_test);
    if n_train < by_class.len() || n_test < by_class.len() {
        return Err(PartitionError::TooFewRows {
            rows: n,
            fraction: test_fraction,
            classes: by_class.len(),
        });
    }

    let counts: Vec<usize> = by_class.iter().map(|(_, idx)| idx.len()).collect();
    let train_per_class = approximate_mode(&counts, n_train);

    let mut rng = StdRng::seed_from_u64(seed);
    let mut train_idx = Vec::with_capacity(n_train);
    let mut test_idx = Vec::with_capacity(n_test);
    for ((_, mut idx), take) in by_class.into_iter().zip(train_per_class) {
        idx.shuffle(&mut rng);
        let (kept, split_off) = idx.split_at(take);
        train_idx.extend_from_slice(kept);
        test_idx.extend_from_slice(split_off);
    }
    train_idx.shuffle(&mut rng);
    test_idx.shuffle(&mut rng);

    Ok((table.select_rows(&train_idx), table.select_rows(&test_idx)))
}

/// Spread `draws` over classes in proportion to `counts`: floor shares first,
/// leftovers to the largest remainders (earlier class on ties).
fn approximate_mode(counts: &[usize], draws: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }
    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| draws as f64 * c as f64 / total as f64)
        .collect();
    let mut alloc: Vec<usize> = exact
        .iter()
        .zip(counts)
        .map(|(e, &c)| ((e + SIZE_EPSILON).floor() as usize).min(c))
        .collect();
    let mut remaining = draws.saturating_sub(alloc.iter().sum());
    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let ra = exact[a] - alloc[a] as f64;
        let rb = exact[b] - alloc[b] as f64;
        rb.partial_cmp(&ra).unwrap_or(std::cmp::Ordering::Equal)
    });
    while remaining > 0 {
        let before = remaining;
        for &i in &order {
            if remaining == 0 {
                break;
            }
            if alloc[i] < counts[i] {
                alloc[i] += 1;
                remaining -= 1;
            }
        }
        if remaining == before {
            break;
        }
    }
    alloc
}
