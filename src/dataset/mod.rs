//! Tabular datasets: extraction batches, merging and partitioning.

mod builder;
pub mod partition;
mod table;

pub use builder::{BuildSummary, DatasetBuilder};
pub use partition::{stratified_split, DatasetPartitioner, Partition};
pub use table::{Cell, DatasetTable};

use crate::error::TableError;

/// Merge the legitimate and fraudulent tables and shuffle with `seed`.
pub fn combine_shuffled(
    legit: &DatasetTable,
    fraud: &DatasetTable,
    seed: u64,
) -> Result<DatasetTable, TableError> {
    Ok(legit.concat(fraud)?.shuffled(seed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_keeps_every_row() {
        let cols = vec!["x".to_string(), "label".to_string()];
        let legit = DatasetTable::with_rows(cols.clone(), vec![vec![Some(1.0), Some(1.0)]; 5]).unwrap();
        let fraud = DatasetTable::with_rows(cols, vec![vec![Some(2.0), Some(0.0)]; 3]).unwrap();
        let merged = combine_shuffled(&legit, &fraud, 42).unwrap();
        assert_eq!(merged.len(), 8);
        let labels = merged.binary_labels().unwrap();
        assert_eq!(labels.iter().filter(|&&l| l == 0).count(), 3);
    }
}
