use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::metrics::{BinaryMetrics, ConfusionCounts};

/// Number of steps in the threshold grid (0.000 to 1.000 inclusive)
const THRESHOLD_STEPS: usize = 1000;

/// Metric floors a calibrated threshold has to clear
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CalibrationTargets {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
}

impl Default for CalibrationTargets {
    fn default() -> Self {
        Self {
            accuracy: 0.90,
            precision: 0.90,
            recall: 0.90,
        }
    }
}

/// One evaluated point on the threshold grid
#[derive(Debug, Clone, Copy)]
pub struct CalibrationPoint {
    pub threshold: f64,
    pub metrics: BinaryMetrics,
}

/// Outcome of a threshold sweep
#[derive(Debug, Clone, Copy)]
pub enum CalibrationOutcome {
    /// Smallest grid threshold meeting every target
    GoalMet(CalibrationPoint),
    /// No threshold met the targets; this one maximizes
    /// min(accuracy, precision, recall), smallest threshold on ties
    BestEffort(CalibrationPoint),
}

impl CalibrationOutcome {
    pub fn point(&self) -> &CalibrationPoint {
        match self {
            Self::GoalMet(point) | Self::BestEffort(point) => point,
        }
    }

    pub fn goal_met(&self) -> bool {
        matches!(self, Self::GoalMet(_))
    }
}

#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("No evaluation samples to calibrate against")]
    EmptyBatch,

    #[error("Labels and scores differ in length: {labels} vs {scores}")]
    LengthMismatch { labels: usize, scores: usize },
}

/// Rescale scores into [0, 1] in place
///
/// A degenerate batch where every score is (nearly) equal collapses to
/// 0.5 so downstream thresholding stays meaningful.
pub fn min_max_normalize(scores: &mut [f64]) {
    if scores.is_empty() {
        return;
    }

    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &score in scores.iter() {
        lo = lo.min(score);
        hi = hi.max(score);
    }

    if (hi - lo).abs() < 1e-9 {
        for score in scores.iter_mut() {
            *score = 0.5;
        }
        return;
    }

    let span = hi - lo;
    for score in scores.iter_mut() {
        *score = (*score - lo) / span;
    }
}

/// Sweep the threshold grid and pick a threshold goal-first
///
/// The grid runs 0.000, 0.001, ..., 1.000. The sweep stops at the first
/// threshold whose accuracy, precision and recall all clear their
/// targets; if none does, the best-effort point maximizing the smallest
/// of the three metrics is returned instead.
pub fn calibrate(
    labels: &[bool],
    scores: &[f64],
    targets: &CalibrationTargets,
) -> Result<CalibrationOutcome, CalibrationError> {
    if labels.len() != scores.len() {
        return Err(CalibrationError::LengthMismatch {
            labels: labels.len(),
            scores: scores.len(),
        });
    }
    if labels.is_empty() {
        return Err(CalibrationError::EmptyBatch);
    }

    let mut best: Option<(f64, CalibrationPoint)> = None;
    for step in 0..=THRESHOLD_STEPS {
        let threshold = step as f64 / THRESHOLD_STEPS as f64;
        let metrics = BinaryMetrics::from_counts(ConfusionCounts::at_threshold(
            labels, scores, threshold,
        ));
        let point = CalibrationPoint { threshold, metrics };

        if metrics.accuracy >= targets.accuracy
            && metrics.precision >= targets.precision
            && metrics.recall >= targets.recall
        {
            return Ok(CalibrationOutcome::GoalMet(point));
        }

        let floor = metrics.accuracy.min(metrics.precision).min(metrics.recall);
        if best.as_ref().map_or(true, |(best_floor, _)| floor > *best_floor) {
            best = Some((floor, point));
        }
    }

    // labels is non-empty, so the sweep recorded at least one point
    let (_, point) = best.ok_or(CalibrationError::EmptyBatch)?;
    Ok(CalibrationOutcome::BestEffort(point))
}
