//! Pipeline configuration. Built once at the process boundary and passed into each stage.

use crate::error::ConfigError;
use crate::features::columns;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Session JSON → feature CSV
    pub extract: ExtractConfig,
    /// Synthetic row generation
    pub augment: AugmentConfig,
    /// Legit + fraud merge
    pub combine: CombineConfig,
    /// Train / test shard partitioning
    pub split: SplitConfig,
    /// Evaluation-time noise
    pub noise: NoiseConfig,
    /// Feature scaling fit
    pub scaler: ScalerConfig,
    /// Evaluation
    pub score: ScoreConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory of `*.json` session files
    pub input_dir: PathBuf,
    pub output_csv: PathBuf,
    /// Label written on every extracted row. Sessions carry no class of their own.
    pub label: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentConfig {
    pub input_csv: PathBuf,
    pub output_csv: PathBuf,
    /// Variants generated per source row
    pub samples_per_row: usize,
    /// Label forced onto every variant
    pub class_label: u8,
    /// Relative noise fraction per column (0 disables)
    pub deviations: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombineConfig {
    pub legit_csv: PathBuf,
    pub fraud_csv: PathBuf,
    pub output_csv: PathBuf,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub input_csv: PathBuf,
    pub output_dir: PathBuf,
    /// Share of rows kept for training
    pub train_fraction: f64,
    /// Share of rows in each of the four test shards
    pub shard_fraction: f64,
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/noisy`
    pub output_dir: Option<PathBuf>,
    /// Noise std as a fraction of each column's std across the set
    pub noise_fraction: f64,
    pub columns: Vec<String>,
    /// Columns floored at zero after injection
    pub clamp_columns: Vec<String>,
    pub decimals: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    pub train_csv: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    pub test_csv: PathBuf,
    pub scaler_path: PathBuf,
    pub model_path: PathBuf,
    /// Probability strictly above this is class 1 (0.0–1.0)
    pub threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("base_jsons"),
            output_csv: PathBuf::from("extracted_features.csv"),
            label: 1,
        }
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("extracted_features.csv"),
            output_csv: PathBuf::from("synthetic_data.csv"),
            samples_per_row: 50,
            class_label: 1,
            deviations: default_deviations(),
        }
    }
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            legit_csv: PathBuf::from("synthetic_legit_data.csv"),
            fraud_csv: PathBuf::from("synthetic_fraud_data.csv"),
            output_csv: PathBuf::from("combined_shuffled_data.csv"),
            seed: 42,
        }
    }
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_csv: PathBuf::from("combined_shuffled_data.csv"),
            output_dir: PathBuf::from("splits"),
            train_fraction: 0.8,
            shard_fraction: 0.05,
            seed: 42,
        }
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("test_data"),
            output_dir: None,
            noise_fraction: 0.12,
            columns: columns::NOISE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            clamp_columns: vec![
                columns::SESSION_DURATION.to_string(),
                columns::MEAN_TAP_DURATION.to_string(),
                columns::TAP_FREQUENCY.to_string(),
            ],
            decimals: 2,
        }
    }
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            train_csv: PathBuf::from("splits/train_data.csv"),
            output_path: PathBuf::from("scaler.json"),
        }
    }
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            test_csv: PathBuf::from("test_data/noisy/noisy_test_data_part2.csv"),
            scaler_path: PathBuf::from("scaler.json"),
            model_path: PathBuf::from("model.onnx"),
            threshold: 0.45,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
        }
    }
}

/// Hand-authored deviation table for legitimate-session synthesis.
pub fn default_deviations() -> BTreeMap<String, f64> {
    [
        (columns::SESSION_DURATION, 0.2),
        (columns::MEAN_TAP_DURATION, 0.3),
        (columns::STD_TAP_DURATION, 0.4),
        (columns::TAP_FREQUENCY, 0.2),
        (columns::MEAN_SWIPE_SPEED, 0.3),
        (columns::STD_SWIPE_SPEED, 0.3),
        (columns::MEAN_SWIPE_DISTANCE, 0.25),
        (columns::STD_SWIPE_DISTANCE, 0.3),
        (columns::TAP_ZONE_X, 0.1),
        (columns::TAP_ZONE_Y, 0.1),
        (columns::SWIPE_ZONE_X, 0.1),
        (columns::SWIPE_ZONE_Y, 0.1),
        (columns::MEAN_SCREEN_DURATION, 0.25),
        (columns::STD_SCREEN_DURATION, 0.3),
        (columns::FD_BROKEN, 0.0),
        (columns::LOAN_TAKEN, 0.0),
        (columns::TIME_TO_FD, 0.3),
        (columns::TIME_TO_LOAN, 0.3),
        (columns::TIME_TO_TRANSACTION, 0.3),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

impl NoiseConfig {
    pub fn resolved_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.input_dir.join("noisy"))
    }
}

impl PipelineConfig {
    /// Load from JSON file if present; otherwise return default
    pub fn load(path: &std::path::Path) -> Self {
        match Self::read(path) {
            Ok(c) => c.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "using default config");
                Self::default()
            }
        }
    }

    /// `Ok(None)` when no file exists at `path`.
    pub fn read(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.score.threshold;
        if !(0.0..=1.0).contains(&t) {
            return Err(ConfigError::Invalid {
                field: "score.threshold",
                reason: format!("{} outside [0, 1]", t),
            });
        }
        for (field, f) in [
            ("split.train_fraction", self.split.train_fraction),
            ("split.shard_fraction", self.split.shard_fraction),
        ] {
            if !(f > 0.0 && f < 1.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} outside (0, 1)", f),
                });
            }
        }
        let total = self.split.train_fraction + 4.0 * self.split.shard_fraction;
        if (total - 1.0).abs() > 1e-9 {
            return Err(ConfigError::Invalid {
                field: "split",
                reason: format!("train + 4 shards sum to {}, expected 1", total),
            });
        }
        for (field, label) in [
            ("extract.label", self.extract.label),
            ("augment.class_label", self.augment.class_label),
        ] {
            if label > 1 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{} is not a binary class", label),
                });
            }
        }
        if self.augment.samples_per_row == 0 {
            return Err(ConfigError::Invalid {
                field: "augment.samples_per_row",
                reason: "must be at least 1".to_string(),
            });
        }
        if let Some((col, d)) = self.augment.deviations.iter().find(|(_, d)| **d < 0.0) {
            return Err(ConfigError::Invalid {
                field: "augment.deviations",
                reason: format!("{} has negative fraction {}", col, d),
            });
        }
        if self.noise.noise_fraction < 0.0 {
            return Err(ConfigError::Invalid {
                field: "noise.noise_fraction",
                reason: format!("{} is negative", self.noise.noise_fraction),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        PipelineConfig::default().validate().unwrap();
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let mut c = PipelineConfig::default();
        c.score.threshold = 1.5;
        assert!(c.validate().is_err());
    }

    #[test]
    fn split_fractions_must_sum_to_one() {
        let mut c = PipelineConfig::default();
        c.split.shard_fraction = 0.1;
        assert!(c.validate().is_err());
    }

    #[test]
    fn non_binary_label_rejected() {
        let mut c = PipelineConfig::default();
        c.augment.class_label = 2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn absent_file_reads_as_none() {
        assert!(PipelineConfig::read(std::path::Path::new("nonexistent.json")).unwrap().is_none());
    }

    #[test]
    fn unparsable_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"score": {"threshold": 0.5,}}"#).unwrap();
        assert!(matches!(PipelineConfig::read(&path), Err(ConfigError::Parse { .. })));
        assert_eq!(PipelineConfig::load(&path).score.threshold, 0.45);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c: PipelineConfig = serde_json::from_str(r#"{"score": {"threshold": 0.5}}"#).unwrap();
        assert_eq!(c.score.threshold, 0.5);
        assert_eq!(c.augment.samples_per_row, 50);
        assert_eq!(c.augment.deviations.len(), 19);
        assert_eq!(c.noise.resolved_output_dir(), PathBuf::from("test_data/noisy"));
    }
}
