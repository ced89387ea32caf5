//! Threshold decisions and evaluation metrics.

mod engine;
pub mod metrics;

pub use engine::{EvaluationReport, Scorer};
