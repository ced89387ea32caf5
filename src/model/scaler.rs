//! Standardization parameters fit on the training table and reused unchanged at evaluation.

use crate::dataset::DatasetTable;
use crate::error::{ModelError, TableError};
use crate::features::stats::mean_std;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit per-column mean and population std. Undefined cells count as 0;
    /// zero-variance columns keep scale 1.
    pub fn fit<S: AsRef<str>>(table: &DatasetTable, features: &[S]) -> Result<Self, TableError> {
        let indices = table.require_columns(features)?;
        let mut mean = Vec::with_capacity(indices.len());
        let mut scale = Vec::with_capacity(indices.len());
        for &idx in &indices {
            let values: Vec<f64> = table.rows().iter().map(|r| r[idx].unwrap_or(0.0)).collect();
            let (m, s) = mean_std(&values);
            mean.push(m.unwrap_or(0.0));
            scale.push(match s {
                Some(s) if s > 0.0 => s,
                _ => 1.0,
            });
        }
        Ok(Self {
            feature_names: features.iter().map(|f| f.as_ref().to_string()).collect(),
            mean,
            scale,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let scaler: Self = serde_json::from_str(&data)?;
        let n = scaler.feature_names.len();
        for len in [scaler.mean.len(), scaler.scale.len()] {
            if len != n {
                return Err(ModelError::FeatureMismatch { expected: n, found: len });
            }
        }
        Ok(scaler)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let io_err = |source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?).map_err(io_err)
    }

    pub fn dim(&self) -> usize {
        self.feature_names.len()
    }

    /// `[rows, features]` matrix of standardized values, undefined cells as 0 before scaling.
    pub fn transform(&self, table: &DatasetTable) -> Result<Array2<f32>, ModelError> {
        let indices = table.require_columns(&self.feature_names)?;
        let mut values = Vec::with_capacity(table.len() * indices.len());
        for row in table.rows() {
            for (j, &idx) in indices.iter().enumerate() {
                let raw = row[idx].unwrap_or(0.0);
                values.push(((raw - self.mean[j]) / self.scale[j]) as f32);
            }
        }
        Ok(Array2::from_shape_vec((table.len(), indices.len()), values)?)
    }
}
