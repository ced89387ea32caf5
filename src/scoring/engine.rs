//! Applies the decision threshold to classifier probabilities and evaluates the result.

use super::metrics::{
    auc, precision_recall_curve, roc_curve, ClassMetrics, ConfusionMatrix, PrecisionRecallCurve,
    ProbabilitySummary, RocCurve,
};
use crate::dataset::DatasetTable;
use crate::error::ScoreError;
use crate::model::{Classifier, StandardScaler};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Evaluation of one table at one threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub threshold: f64,
    pub rows: usize,
    pub confusion: ConfusionMatrix,
    /// Class 0
    pub negative: ClassMetrics,
    /// Class 1 (the class the probability refers to)
    pub positive: ClassMetrics,
    pub accuracy: Option<f64>,
    pub roc_auc: Option<f64>,
    pub roc: Option<RocCurve>,
    pub precision_recall: Option<PrecisionRecallCurve>,
    pub probabilities: ProbabilitySummary,
    pub generated_at: DateTime<Utc>,
}

pub struct Scorer {
    threshold: f64,
}

impl Scorer {
    pub fn new(threshold: f64) -> Result<Self, ScoreError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ScoreError::InvalidThreshold(threshold));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Class 1 only when the probability is strictly above the threshold,
    /// compared at the classifier's f32 precision.
    pub fn decide(&self, probability: f32) -> u8 {
        u8::from(probability > self.threshold as f32)
    }

    pub fn decide_all(&self, probabilities: &[f32]) -> Vec<u8> {
        probabilities.iter().map(|&p| self.decide(p)).collect()
    }

    pub fn evaluate(&self, labels: &[u8], probabilities: &[f32]) -> Result<EvaluationReport, ScoreError> {
        if labels.len() != probabilities.len() {
            return Err(ScoreError::LengthMismatch {
                labels: labels.len(),
                probabilities: probabilities.len(),
            });
        }
        let summary = ProbabilitySummary::from_probabilities(probabilities).ok_or(ScoreError::Empty)?;
        let predicted = self.decide_all(probabilities);
        let confusion = ConfusionMatrix::from_predictions(labels, &predicted);
        let roc = roc_curve(labels, probabilities);
        Ok(EvaluationReport {
            threshold: self.threshold,
            rows: labels.len(),
            confusion,
            negative: confusion.class_metrics(0),
            positive: confusion.class_metrics(1),
            accuracy: confusion.accuracy(),
            roc_auc: roc.as_ref().map(|r| auc(&r.fpr, &r.tpr)),
            roc,
            precision_recall: precision_recall_curve(labels, probabilities),
            probabilities: summary,
            generated_at: Utc::now(),
        })
    }

    /// Scale with the stored transform, predict, threshold, and evaluate `table`.
    pub fn evaluate_table(
        &self,
        table: &DatasetTable,
        scaler: &StandardScaler,
        classifier: &dyn Classifier,
    ) -> Result<EvaluationReport, ScoreError> {
        if table.is_empty() {
            return Err(ScoreError::Empty);
        }
        let labels = table.binary_labels()?;
        let features = scaler.transform(table)?;
        let probabilities = classifier.predict(&features)?;
        let report = self.evaluate(&labels, &probabilities)?;
        info!(
            threshold = report.threshold,
            rows = report.rows,
            accuracy = ?report.accuracy,
            recall_positive = ?report.positive.recall,
            recall_negative = ?report.negative.recall,
            roc_auc = ?report.roc_auc,
            "evaluation complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ModelError;
    use crate::error::TableError;
    use ndarray::Array2;

    /// Returns the first scaled feature, squashed into [0, 1].
    struct FirstFeature;

    impl Classifier for FirstFeature {
        fn predict(&self, features: &Array2<f32>) -> Result<Vec<f32>, ModelError> {
            Ok(features.column(0).iter().map(|v| 1.0 / (1.0 + (-v).exp())).collect())
        }
    }

    #[test]
    fn threshold_is_exclusive() {
        let s = Scorer::new(0.5).unwrap();
        assert_eq!(s.decide_all(&[0.1, 0.5, 0.51, 0.9]), vec![0, 0, 1, 1]);
    }

    #[test]
    fn probability_equal_to_threshold_is_negative() {
        for t in [0.1, 0.3, 0.45, 0.7] {
            let s = Scorer::new(t).unwrap();
            assert_eq!(s.decide(t as f32), 0, "threshold {}", t);
            assert_eq!(s.decide(f32::from_bits((t as f32).to_bits() + 1)), 1);
        }
    }

    #[test]
    fn threshold_bounds() {
        assert!(Scorer::new(0.0).is_ok());
        assert!(Scorer::new(1.0).is_ok());
        assert!(matches!(Scorer::new(-0.1), Err(ScoreError::InvalidThreshold(_))));
        assert!(matches!(Scorer::new(1.01), Err(ScoreError::InvalidThreshold(_))));
    }

    #[test]
    fn report_metrics() {
        let s = Scorer::new(0.45).unwrap();
        let r = s.evaluate(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert_eq!(r.confusion.as_matrix(), [[2, 0], [1, 1]]);
        assert_eq!(r.accuracy, Some(0.75));
        assert_eq!(r.positive.recall, Some(0.5));
        assert_eq!(r.negative.recall, Some(1.0));
        assert!((r.roc_auc.unwrap() - 0.75).abs() < 1e-12);
        assert!((r.probabilities.mean - 0.4125).abs() < 1e-6);
    }

    #[test]
    fn length_mismatch_is_fatal() {
        let s = Scorer::new(0.5).unwrap();
        assert!(matches!(
            s.evaluate(&[0, 1], &[0.3]),
            Err(ScoreError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn table_evaluation_with_stub_classifier() {
        let table = DatasetTable::with_rows(
            vec!["x".into(), "label".into()],
            vec![
                vec![Some(-3.0), Some(0.0)],
                vec![Some(-1.0), Some(0.0)],
                vec![Some(1.0), Some(1.0)],
                vec![Some(3.0), Some(1.0)],
            ],
        )
        .unwrap();
        let scaler = StandardScaler::fit(&table, &["x"]).unwrap();
        let r = Scorer::new(0.5)
            .unwrap()
            .evaluate_table(&table, &scaler, &FirstFeature)
            .unwrap();
        assert_eq!(r.accuracy, Some(1.0));
        assert_eq!(r.roc_auc, Some(1.0));
    }

    #[test]
    fn missing_feature_column_is_fatal() {
        let table = DatasetTable::with_rows(vec!["label".into()], vec![vec![Some(1.0)]]).unwrap();
        let scaler = StandardScaler {
            feature_names: vec!["x".into()],
            mean: vec![0.0],
            scale: vec![1.0],
        };
        let err = Scorer::new(0.5)
            .unwrap()
            .evaluate_table(&table, &scaler, &FirstFeature)
            .unwrap_err();
        assert!(matches!(
            err,
            ScoreError::Model(ModelError::Table(TableError::MissingColumn(c))) if c == "x"
        ));
    }
}
