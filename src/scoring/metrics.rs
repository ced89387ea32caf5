//! Binary classification metrics over 0/1 labels and class-1 probabilities.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn from_predictions(labels: &[u8], predicted: &[u8]) -> Self {
        let mut m = Self::default();
        for (&y, &p) in labels.iter().zip(predicted) {
            match (y, p) {
                (0, 0) => m.true_negative += 1,
                (0, _) => m.false_positive += 1,
                (_, 0) => m.false_negative += 1,
                _ => m.true_positive += 1,
            }
        }
        m
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// `[[tn, fp], [fn, tp]]`
    pub fn as_matrix(&self) -> [[usize; 2]; 2] {
        [
            [self.true_negative, self.false_positive],
            [self.false_negative, self.true_positive],
        ]
    }

    pub fn accuracy(&self) -> Option<f64> {
        ratio(self.true_negative + self.true_positive, self.total())
    }

    /// Precision / recall / F1 with `class` treated as positive.
    pub fn class_metrics(&self, class: u8) -> ClassMetrics {
        let (tp, fp, fn_) = if class == 1 {
            (self.true_positive, self.false_positive, self.false_negative)
        } else {
            (self.true_negative, self.false_negative, self.false_positive)
        };
        let precision = ratio(tp, tp + fp);
        let recall = ratio(tp, tp + fn_);
        let f1 = match (precision, recall) {
            (Some(p), Some(r)) if p + r > 0.0 => Some(2.0 * p * r / (p + r)),
            (Some(_), Some(_)) => Some(0.0),
            _ => None,
        };
        ClassMetrics {
            precision,
            recall,
            f1,
            support: tp + fn_,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub precision: Option<f64>,
    pub recall: Option<f64>,
    pub f1: Option<f64>,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocCurve {
    pub fpr: Vec<f64>,
    pub tpr: Vec<f64>,
    /// Descending; the first entry is +∞ (nothing predicted positive)
    pub thresholds: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecisionRecallCurve {
    pub precision: Vec<f64>,
    /// Descending, ending at 0
    pub recall: Vec<f64>,
    /// Ascending; one fewer than `precision`
    pub thresholds: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilitySummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl ProbabilitySummary {
    pub fn from_probabilities(probabilities: &[f32]) -> Option<Self> {
        if probabilities.is_empty() {
            return None;
        }
        let values = probabilities.iter().map(|&p| p as f64);
        let min = values.clone().fold(f64::INFINITY, f64::min);
        let max = values.clone().fold(f64::NEG_INFINITY, f64::max);
        let mean = values.sum::<f64>() / probabilities.len() as f64;
        Some(Self { min, max, mean })
    }
}

fn ratio(num: usize, den: usize) -> Option<f64> {
    if den == 0 {
        None
    } else {
        Some(num as f64 / den as f64)
    }
}

/// Cumulative (false positives, true positives, threshold) at each distinct score, descending.
fn binary_clf_curve(labels: &[u8], scores: &[f32]) -> Vec<(usize, usize, f64)> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[b]
            .partial_cmp(&scores[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let mut points = Vec::new();
    let (mut fps, mut tps) = (0usize, 0usize);
    for (k, &i) in order.iter().enumerate() {
        if labels[i] == 1 {
            tps += 1;
        } else {
            fps += 1;
        }
        let last_of_score = order.get(k + 1).map_or(true, |&j| scores[j] != scores[i]);
        if last_of_score {
            points.push((fps, tps, scores[i] as f64));
        }
    }
    points
}

/// ROC curve; `None` unless both classes are present.
pub fn roc_curve(labels: &[u8], scores: &[f32]) -> Option<RocCurve> {
    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }
    let points = binary_clf_curve(labels, scores);
    let mut curve = RocCurve {
        fpr: vec![0.0],
        tpr: vec![0.0],
        thresholds: vec![f64::INFINITY],
    };
    for (fps, tps, t) in points {
        curve.fpr.push(fps as f64 / negatives as f64);
        curve.tpr.push(tps as f64 / positives as f64);
        curve.thresholds.push(t);
    }
    Some(curve)
}

/// Trapezoidal area under `(x, y)`; `x` must be monotonic.
pub fn auc(x: &[f64], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] - xs[0]) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// Precision-recall pairs per distinct threshold, ending at (precision 1, recall 0).
/// `None` if there are no positive labels.
pub fn precision_recall_curve(labels: &[u8], scores: &[f32]) -> Option<PrecisionRecallCurve> {
    let points = binary_clf_curve(labels, scores);
    let total_positives = points.last().map(|&(_, tps, _)| tps)?;
    if total_positives == 0 {
        return None;
    }
    let mut curve = PrecisionRecallCurve {
        precision: Vec::with_capacity(points.len() + 1),
        recall: Vec::with_capacity(points.len() + 1),
        thresholds: Vec::with_capacity(points.len()),
    };
    for &(fps, tps, t) in points.iter().rev() {
        let predicted = fps + tps;
        curve.precision.push(if predicted == 0 { 0.0 } else { tps as f64 / predicted as f64 });
        curve.recall.push(tps as f64 / total_positives as f64);
        curve.thresholds.push(t);
    }
    curve.precision.push(1.0);
    curve.recall.push(0.0);
    Some(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confusion_and_per_class() {
        let labels = [0, 0, 1, 1, 1];
        let pred = [0, 1, 1, 1, 0];
        let m = ConfusionMatrix::from_predictions(&labels, &pred);
        assert_eq!(m.as_matrix(), [[1, 1], [1, 2]]);
        assert_eq!(m.accuracy(), Some(0.6));
        let pos = m.class_metrics(1);
        assert_eq!(pos.support, 3);
        assert!((pos.recall.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        assert!((pos.precision.unwrap() - 2.0 / 3.0).abs() < 1e-12);
        let neg = m.class_metrics(0);
        assert_eq!(neg.support, 2);
        assert_eq!(neg.recall, Some(0.5));
    }

    #[test]
    fn perfect_ranking_has_unit_auc() {
        let labels = [0, 0, 1, 1];
        let scores = [0.1, 0.2, 0.8, 0.9];
        let roc = roc_curve(&labels, &scores).unwrap();
        assert_eq!(auc(&roc.fpr, &roc.tpr), 1.0);
    }

    #[test]
    fn known_auc() {
        // one of four positive/negative pairs is misordered
        let roc = roc_curve(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert!((auc(&roc.fpr, &roc.tpr) - 0.75).abs() < 1e-12);
        assert_eq!(roc.fpr, vec![0.0, 0.0, 0.5, 0.5, 1.0]);
        assert_eq!(roc.tpr, vec![0.0, 0.5, 0.5, 1.0, 1.0]);
    }

    #[test]
    fn tied_scores_form_one_point() {
        let roc = roc_curve(&[0, 1, 0, 1], &[0.5, 0.5, 0.5, 0.5]).unwrap();
        assert_eq!(roc.fpr, vec![0.0, 1.0]);
        assert_eq!(auc(&roc.fpr, &roc.tpr), 0.5);
    }

    #[test]
    fn single_class_has_no_roc() {
        assert!(roc_curve(&[1, 1], &[0.2, 0.9]).is_none());
    }

    #[test]
    fn precision_recall_shape() {
        let pr = precision_recall_curve(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        assert_eq!(pr.recall, vec![1.0, 1.0, 0.5, 0.5, 0.0]);
        assert_eq!(pr.precision[0], 0.5);
        assert_eq!(*pr.precision.last().unwrap(), 1.0);
        assert_eq!(pr.thresholds.len(), pr.precision.len() - 1);
        assert!(precision_recall_curve(&[0, 0], &[0.1, 0.2]).is_none());
    }

    #[test]
    fn probability_summary() {
        let s = ProbabilitySummary::from_probabilities(&[0.25, 0.75, 0.5]).unwrap();
        assert_eq!(s.min, 0.25);
        assert_eq!(s.max, 0.75);
        assert_eq!(s.mean, 0.5);
        assert!(ProbabilitySummary::from_probabilities(&[]).is_none());
    }
}
