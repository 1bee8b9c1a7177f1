use serde::{Deserialize, Serialize};

/// Confusion-matrix counts for binary labels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}

impl ConfusionCounts {
    /// Count outcomes of predicting `score >= threshold` against labels
    ///
    /// Slices are walked in lockstep; callers are expected to pass
    /// equal-length slices.
    pub fn at_threshold(labels: &[bool], scores: &[f64], threshold: f64) -> Self {
        let mut counts = Self::default();
        for (&label, &score) in labels.iter().zip(scores) {
            let predicted = score >= threshold;
            match (label, predicted) {
                (true, true) => counts.true_positives += 1,
                (false, false) => counts.true_negatives += 1,
                (false, true) => counts.false_positives += 1,
                (true, false) => counts.false_negatives += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.true_negatives + self.false_positives + self.false_negatives
    }
}

/// Accuracy, precision, recall and F1 over one confusion matrix
///
/// Denominators are floored at 1, so empty batches and all-negative
/// predictions yield 0 instead of NaN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BinaryMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub confusion: ConfusionCounts,
}

impl BinaryMetrics {
    pub fn from_counts(counts: ConfusionCounts) -> Self {
        let tp = counts.true_positives as f64;

        let accuracy =
            (counts.true_positives + counts.true_negatives) as f64 / counts.total().max(1) as f64;
        let precision = tp / (counts.true_positives + counts.false_positives).max(1) as f64;
        let recall = tp / (counts.true_positives + counts.false_negatives).max(1) as f64;
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Self {
            accuracy,
            precision,
            recall,
            f1,
            confusion: counts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn test_counts_at_threshold() {
        let labels = [true, true, false, false];
        let scores = [0.9, 0.4, 0.8, 0.1];

        let counts = ConfusionCounts::at_threshold(&labels, &scores, 0.5);
        assert_eq!(counts.true_positives, 1);
        assert_eq!(counts.false_negatives, 1);
        assert_eq!(counts.false_positives, 1);
        assert_eq!(counts.true_negatives, 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let labels = [true];
        let scores = [0.5];

        let counts = ConfusionCounts::at_threshold(&labels, &scores, 0.5);
        assert_eq!(counts.true_positives, 1);
    }

    #[test]
    fn test_perfect_separation() {
        let labels = [true, true, false, false];
        let scores = [0.9, 0.8, 0.2, 0.1];

        let metrics = BinaryMetrics::from_counts(ConfusionCounts::at_threshold(&labels, &scores, 0.5));
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1, 1.0);
    }

    #[test]
    fn test_mixed_metrics() {
        // 2 TP, 1 FP, 1 FN, 1 TN
        let counts = ConfusionCounts {
            true_positives: 2,
            true_negatives: 1,
            false_positives: 1,
            false_negatives: 1,
        };
        let metrics = BinaryMetrics::from_counts(counts);

        assert!(approx_eq!(f64, metrics.accuracy, 0.6, epsilon = 1e-12));
        assert!(approx_eq!(f64, metrics.precision, 2.0 / 3.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, metrics.recall, 2.0 / 3.0, epsilon = 1e-12));
        assert!(approx_eq!(f64, metrics.f1, 2.0 / 3.0, epsilon = 1e-12));
    }

    #[test]
    fn test_empty_batch_yields_zero_not_nan() {
        let metrics = BinaryMetrics::from_counts(ConfusionCounts::default());
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_no_predicted_positives() {
        let labels = [true, false];
        let scores = [0.2, 0.1];

        let metrics = BinaryMetrics::from_counts(ConfusionCounts::at_threshold(&labels, &scores, 0.9));
        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
        assert_eq!(metrics.accuracy, 0.5);
    }
}
