use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::MatchWeights;

/// Parameters for one matching run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    /// Recommendations kept per seller and per buyer
    #[validate(range(min = 1))]
    #[serde(default = "default_topk")]
    pub topk: usize,
    #[serde(default)]
    pub weights: MatchWeights,
    /// Restrict the cross join to same-major-category buckets once the
    /// candidate pair count exceeds this; `None` stays exhaustive
    #[serde(default)]
    pub bucket_threshold: Option<usize>,
}

impl Default for MatchRequest {
    fn default() -> Self {
        Self {
            topk: default_topk(),
            weights: MatchWeights::default(),
            bucket_threshold: None,
        }
    }
}

fn default_topk() -> usize {
    5
}

/// Parameters for a threshold calibration run
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CalibrationRequest {
    /// Candidate pool size scored per labeled query
    #[validate(range(min = 1))]
    #[serde(default = "default_pool")]
    pub pool: usize,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_target")]
    pub accuracy: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_target")]
    pub precision: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default = "default_target")]
    pub recall: f64,
}

impl Default for CalibrationRequest {
    fn default() -> Self {
        Self {
            pool: default_pool(),
            accuracy: default_target(),
            precision: default_target(),
            recall: default_target(),
        }
    }
}

fn default_pool() -> usize {
    50
}

fn default_target() -> f64 {
    0.90
}
