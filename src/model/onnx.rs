//! ONNX Runtime classifier. Input: [rows, feature_dim] f32, output: one probability per row.
//! A missing or unloadable model is an error; there is no fallback scorer.

use super::Classifier;
use crate::error::ModelError;
use ndarray::Array2;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

fn onnx_err(e: impl std::fmt::Display) -> ModelError {
    ModelError::Onnx(e.to_string())
}

pub struct OnnxClassifier {
    session: Mutex<Session>,
    output_name: String,
    feature_dim: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path, feature_dim: usize) -> Result<Self, ModelError> {
        if !path.exists() {
            return Err(ModelError::NotFound(path.to_path_buf()));
        }
        let session = Session::builder()
            .map_err(onnx_err)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(onnx_err)?
            .commit_from_file(path)
            .map_err(onnx_err)?;
        let output_name = session
            .outputs
            .first()
            .map(|o| o.name.clone())
            .unwrap_or_else(|| "output_0".to_string());
        info!(path = %path.display(), feature_dim, "ONNX model loaded");
        Ok(Self {
            session: Mutex::new(session),
            output_name,
            feature_dim,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError> {
        let (rows, cols) = features.dim();
        if cols != self.feature_dim {
            return Err(ModelError::FeatureMismatch {
                expected: self.feature_dim,
                found: cols,
            });
        }
        let input = Value::from_array(features.clone()).map_err(onnx_err)?;
        let mut session = self.session.lock().unwrap_or_else(|p| p.into_inner());
        let outputs = session.run(ort::inputs![input]).map_err(onnx_err)?;
        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| ModelError::OutputLength { expected: rows, found: 0 })?;
        let (_, data) = output.try_extract_tensor::<f32>().map_err(onnx_err)?;
        if data.len() != rows {
            return Err(ModelError::OutputLength {
                expected: rows,
                found: data.len(),
            });
        }
        Ok(data.to_vec())
    }
}
