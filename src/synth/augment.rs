//! Class-specific synthetic rows: R noisy variants per source row.

use super::gaussian::gaussian;
use crate::config::AugmentConfig;
use crate::dataset::DatasetTable;
use crate::error::TableError;
use crate::features::columns;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnRule {
    Label,
    Copy,
    /// Relative noise fraction; result floored at 0
    Perturb(f64),
}

pub struct SyntheticAugmenter {
    samples_per_row: usize,
    class_label: u8,
    deviations: BTreeMap<String, f64>,
}

impl SyntheticAugmenter {
    pub fn new(config: &AugmentConfig) -> Self {
        Self {
            samples_per_row: config.samples_per_row,
            class_label: config.class_label,
            deviations: config.deviations.clone(),
        }
    }

    pub fn augment(&self, table: &DatasetTable) -> Result<DatasetTable, TableError> {
        self.augment_with_rng(table, &mut rand::thread_rng())
    }

    pub fn augment_with_rng<R: Rng + ?Sized>(
        &self,
        table: &DatasetTable,
        rng: &mut R,
    ) -> Result<DatasetTable, TableError> {
        let rules = self.plan(table)?;
        let label = Some(self.class_label as f64);
        let mut out = DatasetTable::new(table.columns().to_vec());
        for row in table.rows() {
            for _ in 0..self.samples_per_row {
                let variant = row
                    .iter()
                    .zip(&rules)
                    .map(|(cell, rule)| match rule {
                        ColumnRule::Label => label,
                        ColumnRule::Copy => *cell,
                        ColumnRule::Perturb(fraction) => cell.map(|base| {
                            let noise = gaussian(&mut *rng, base.abs() * fraction);
                            (base + noise).max(0.0)
                        }),
                    })
                    .collect();
                out.push_row(variant)?;
            }
        }
        debug!(source_rows = table.len(), rows = out.len(), "augmented");
        Ok(out)
    }

    fn plan(&self, table: &DatasetTable) -> Result<Vec<ColumnRule>, TableError> {
        table.column_index(columns::LABEL)?;
        table.require_columns(&columns::FLAG_COLUMNS)?;
        for name in self.deviations.keys() {
            if !table.has_column(name) {
                warn!(column = %name, "deviation column not in table");
            }
        }
        Ok(table
            .columns()
            .iter()
            .map(|c| {
                if c == columns::LABEL {
                    ColumnRule::Label
                } else if columns::FLAG_COLUMNS.contains(&c.as_str()) {
                    ColumnRule::Copy
                } else if let Some(&d) = self.deviations.get(c) {
                    ColumnRule::Perturb(d)
                } else {
                    ColumnRule::Copy
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TABLE_COLUMNS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn source() -> DatasetTable {
        let mut t = DatasetTable::feature_schema();
        let mut a: Vec<_> = (0..20).map(|i| Some(1.0 + i as f64)).collect();
        a[14] = Some(1.0);
        a[15] = Some(0.0);
        a[19] = Some(0.0);
        let mut b: Vec<_> = (0..20).map(|_| Some(0.05)).collect();
        b[4] = None;
        b[14] = Some(0.0);
        b[15] = Some(1.0);
        b[19] = Some(0.0);
        t.push_row(a).unwrap();
        t.push_row(b).unwrap();
        t
    }

    fn augmenter(samples: usize) -> SyntheticAugmenter {
        SyntheticAugmenter::new(&AugmentConfig {
            samples_per_row: samples,
            ..AugmentConfig::default()
        })
    }

    #[test]
    fn row_count_is_replication_times_source() {
        let out = augmenter(7).augment(&source()).unwrap();
        assert_eq!(out.len(), 14);
        assert_eq!(out.columns(), source().columns());
    }

    #[test]
    fn flags_unchanged_and_covered_columns_non_negative() {
        let src = source();
        let mut rng = StdRng::seed_from_u64(3);
        let out = augmenter(200).augment_with_rng(&src, &mut rng).unwrap();
        for (i, row) in out.rows().iter().enumerate() {
            let base = &src.rows()[i / 200];
            assert_eq!(row[14], base[14]);
            assert_eq!(row[15], base[15]);
            assert_eq!(row[19], Some(1.0));
            for (c, cell) in row.iter().enumerate().take(19) {
                if let Some(v) = cell {
                    assert!(*v >= 0.0, "{} negative: {}", TABLE_COLUMNS[c], v);
                }
            }
        }
    }

    #[test]
    fn undefined_cells_stay_undefined() {
        let out = augmenter(5).augment(&source()).unwrap();
        for row in &out.rows()[5..] {
            assert_eq!(row[4], None);
        }
    }

    #[test]
    fn noise_scales_with_deviation() {
        let mut t = DatasetTable::feature_schema();
        t.push_row(vec![Some(100.0); 20]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let out = augmenter(5000).augment_with_rng(&t, &mut rng).unwrap();
        let durations: Vec<f64> = out.column_values(columns::SESSION_DURATION).unwrap().into_iter().flatten().collect();
        let std = crate::features::stats::sample_std(&durations).unwrap();
        // 0.2 × 100
        assert!((std - 20.0).abs() < 1.5, "std {}", std);
    }

    #[test]
    fn unknown_columns_are_copied() {
        let mut cols: Vec<String> = TABLE_COLUMNS.iter().map(|c| c.to_string()).collect();
        cols.push("device_score".into());
        let t = DatasetTable::with_rows(cols, vec![vec![Some(2.0); 21]]).unwrap();
        let out = augmenter(3).augment(&t).unwrap();
        assert!(out.rows().iter().all(|r| r[20] == Some(2.0)));
    }

    #[test]
    fn missing_label_is_fatal() {
        let t = DatasetTable::with_rows(vec![columns::FD_BROKEN.into()], vec![]).unwrap();
        assert!(matches!(
            augmenter(2).augment(&t),
            Err(TableError::MissingColumn(c)) if c == columns::LABEL
        ));
    }
}
