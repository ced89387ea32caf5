//! Evaluation-time measurement noise: one noisy copy of each held-out row.

use super::gaussian::gaussian;
use crate::config::NoiseConfig;
use crate::dataset::DatasetTable;
use crate::error::TableError;
use crate::features::columns;
use crate::features::stats::sample_std;
use rand::Rng;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

const OUTPUT_PREFIX: &str = "noisy_";

pub struct NoiseInjector {
    noise_fraction: f64,
    columns: Vec<String>,
    clamp_columns: Vec<String>,
    decimals: u32,
}

impl NoiseInjector {
    /// Label and flag columns are dropped from the noise list.
    pub fn new(config: &NoiseConfig) -> Self {
        let columns = config
            .columns
            .iter()
            .filter(|c| {
                let protected = c.as_str() == columns::LABEL
                    || columns::FLAG_COLUMNS.contains(&c.as_str());
                if protected {
                    warn!(column = %c, "protected column removed from noise list");
                }
                !protected
            })
            .cloned()
            .collect();
        Self {
            noise_fraction: config.noise_fraction,
            columns,
            clamp_columns: config.clamp_columns.clone(),
            decimals: config.decimals,
        }
    }

    pub fn inject(&self, table: &DatasetTable) -> Result<DatasetTable, TableError> {
        self.inject_with_rng(table, &mut rand::thread_rng())
    }

    pub fn inject_with_rng<R: Rng + ?Sized>(
        &self,
        table: &DatasetTable,
        rng: &mut R,
    ) -> Result<DatasetTable, TableError> {
        let scale = 10f64.powi(self.decimals as i32);
        let mut rows: Vec<Vec<_>> = table.rows().to_vec();
        for name in &self.columns {
            let Ok(idx) = table.column_index(name) else {
                debug!(column = %name, "noise column absent");
                continue;
            };
            let defined: Vec<f64> = rows.iter().filter_map(|r| r[idx]).collect();
            let std = sample_std(&defined).unwrap_or(0.0) * self.noise_fraction;
            let clamp = self.clamp_columns.iter().any(|c| c == name);
            for row in rows.iter_mut() {
                if let Some(v) = row[idx] {
                    let mut noisy = v + gaussian(&mut *rng, std);
                    if clamp {
                        noisy = noisy.max(0.0);
                    }
                    row[idx] = Some((noisy * scale).round() / scale);
                }
            }
        }
        DatasetTable::with_rows(table.columns().to_vec(), rows)
    }

    /// Every `*.csv` in `input_dir` not already prefixed `noisy_` → `output_dir/noisy_<name>`.
    pub fn inject_dir(&self, input_dir: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, TableError> {
        if !input_dir.is_dir() {
            return Err(TableError::Io {
                path: input_dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "test data directory not found"),
            });
        }
        let mut inputs: Vec<PathBuf> = WalkDir::new(input_dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| {
                p.is_file()
                    && p.extension().is_some_and(|ext| ext == "csv")
                    && !p
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.starts_with(OUTPUT_PREFIX))
            })
            .collect();
        inputs.sort();

        let mut written = Vec::with_capacity(inputs.len());
        for path in inputs {
            let table = DatasetTable::read_csv(&path)?;
            let noisy = self.inject(&table)?;
            let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            let out = output_dir.join(format!("{}{}", OUTPUT_PREFIX, name));
            noisy.write_csv(&out)?;
            info!(input = %path.display(), output = %out.display(), rows = noisy.len(), "noisy file created");
            written.push(out);
        }
        Ok(written)
    }
}
