// Evaluation exports
pub mod calibrate;
pub mod dataset;
pub mod metrics;

pub use calibrate::{
    calibrate, min_max_normalize, CalibrationError, CalibrationOutcome, CalibrationPoint,
    CalibrationTargets,
};
pub use dataset::{load_examples, EvalProfile, LabeledExample};
pub use metrics::{BinaryMetrics, ConfusionCounts};
