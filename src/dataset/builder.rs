//! Batch extraction: many session records → one feature table.

use super::DatasetTable;
use crate::error::ExtractError;
use crate::features::{FeatureExtractor, FeatureVector};
use crate::session::{session_files, SessionSource};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub written: usize,
    pub skipped: usize,
    /// `(source name, error)` per skipped record, in processing order
    pub failures: Vec<(String, String)>,
}

pub struct DatasetBuilder {
    extractor: FeatureExtractor,
}

impl DatasetBuilder {
    pub fn new(extractor: FeatureExtractor) -> Self {
        Self { extractor }
    }

    /// Extract every source; failing records are logged and skipped.
    pub fn build<I>(&self, sources: I) -> (DatasetTable, BuildSummary)
    where
        I: IntoIterator<Item = Result<SessionSource, (String, ExtractError)>>,
    {
        let mut vectors: Vec<FeatureVector> = Vec::new();
        let mut summary = BuildSummary::default();
        for source in sources {
            let result = source.and_then(|s| {
                self.extractor
                    .extract_json(&s.json)
                    .map_err(|e| (s.name, e))
            });
            match result {
                Ok(fv) => vectors.push(fv),
                Err((name, e)) => {
                    warn!(file = %name, error = %e, "skipping session");
                    summary.skipped += 1;
                    summary.failures.push((name, e.to_string()));
                }
            }
        }
        summary.written = vectors.len();
        (DatasetTable::from_vectors(&vectors), summary)
    }

    /// Extract every `*.json` in `dir`.
    pub fn build_from_dir(&self, dir: &Path) -> Result<(DatasetTable, BuildSummary), std::io::Error> {
        let files = session_files(dir)?;
        info!(dir = %dir.display(), files = files.len(), "extracting sessions");
        let sources = files.into_iter().map(|path| {
            SessionSource::read(&path).map_err(|e| (path.display().to_string(), e))
        });
        Ok(self.build(sources))
    }

    /// Extract `dir` and persist the table to `output`.
    pub fn run(&self, dir: &Path, output: &Path) -> Result<BuildSummary, Box<dyn std::error::Error + Send + Sync>> {
        let (table, summary) = self.build_from_dir(dir)?;
        table.write_csv(output)?;
        info!(
            output = %output.display(),
            label = self.extractor.label(),
            rows = summary.written,
            skipped = summary.skipped,
            "features saved"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TABLE_COLUMNS;

    const GOOD: &str = r#"{"session": {"duration_seconds": 5}, "tap_events": [{"zone": "middle_center"}]}"#;

    #[test]
    fn malformed_records_are_skipped() {
        let sources = vec![
            Ok(SessionSource::new("a", GOOD)),
            Ok(SessionSource::new("b", r#"{"session": {"duration"#)),
            Ok(SessionSource::new("c", GOOD)),
            Ok(SessionSource::new("d", r#"{"tap_events": 3}"#)),
            Ok(SessionSource::new("e", "{}")),
        ];
        let (table, summary) = DatasetBuilder::new(FeatureExtractor::new(1)).build(sources);
        assert_eq!(table.len(), 3);
        assert_eq!(summary.written, 3);
        assert_eq!(summary.skipped, 2);
        let names: Vec<_> = summary.failures.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "d"]);
        assert_eq!(table.columns(), &TABLE_COLUMNS.map(String::from)[..]);
    }

    #[test]
    fn builder_stamps_extractor_label() {
        let builder = DatasetBuilder::new(FeatureExtractor::new(0));
        assert_eq!(builder.extractor.label(), 0);
        let (table, _) = builder.build(vec![Ok(SessionSource::new("a", GOOD))]);
        assert_eq!(table.binary_labels().unwrap(), vec![0]);
    }

    #[test]
    fn empty_batch_still_has_schema() {
        let (table, summary) = DatasetBuilder::new(FeatureExtractor::new(1)).build(Vec::new());
        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 20);
        assert_eq!(summary.written, 0);
    }
}
