mod format;

pub use format::{StageSummary, StructuredLogger};
