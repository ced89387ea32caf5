//! Persisted training artifacts consumed at evaluation: feature scaler and classifier.

mod onnx;
mod scaler;

pub use onnx::OnnxClassifier;
pub use scaler::StandardScaler;

use crate::error::ModelError;
use ndarray::Array2;

/// A trained binary classifier over scaled features.
pub trait Classifier {
    /// One probability of class 1 per input row.
    fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError>;
}
