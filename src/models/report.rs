use serde::{Deserialize, Serialize};

use crate::models::CalibrationRequest;

/// JSON report written after a calibration run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub run_id: String,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Pool size and metric floors the run was asked to meet
    pub request: CalibrationRequest,
    /// Pooled samples across all labeled queries
    pub samples: usize,
    /// Queries that produced at least one candidate
    pub queries: usize,
    pub positive_rate: f64,
    pub goal_met: bool,
    pub threshold: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub true_positives: usize,
    pub true_negatives: usize,
    pub false_positives: usize,
    pub false_negatives: usize,
}
