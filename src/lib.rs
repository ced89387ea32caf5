//! BBA pipeline: behavioral biometrics features for session fraud scoring.
//!
//! Modular structure:
//! - [`session`]: Raw session telemetry records and loading
//! - [`features`]: Zone mapping, statistics and the 19-feature vector
//! - [`dataset`]: Feature tables, batch building, merging and stratified shards
//! - [`synth`]: Synthetic augmentation and evaluation-time noise
//! - [`model`]: Feature scaler and ONNX classifier artifacts
//! - [`scoring`]: Decision threshold and evaluation metrics
//! - [`logging`]: Structured JSON logging

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod logging;
pub mod model;
pub mod scoring;
pub mod session;
pub mod synth;

pub use config::PipelineConfig;
pub use dataset::{DatasetBuilder, DatasetPartitioner, DatasetTable, Partition};
pub use features::{FeatureExtractor, FeatureVector, FEATURE_COLUMNS, TABLE_COLUMNS};
pub use logging::StructuredLogger;
pub use model::{Classifier, OnnxClassifier, StandardScaler};
pub use scoring::{EvaluationReport, Scorer};
pub use session::SessionRecord;
pub use synth::{NoiseInjector, SyntheticAugmenter};
