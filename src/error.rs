//! Error types for the feature-extraction pipeline.
//!
//! Configuration and domain errors abort the current call. Per-window issues
//! (an unresolvable boundary timestamp) are recovered locally by dropping the
//! window and are never surfaced through this type.

use std::fmt;

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised by the feature-extraction pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// Invalid parameter combination, e.g. a lookback shorter than the window
    /// spacing or no usable waveform channel.
    Configuration(String),

    /// Physiologically invalid input, e.g. non-positive waveform samples that
    /// would break the reciprocal-based diastolic search.
    Domain(String),

    /// Systolic and diastolic peak sequences of incomparable lengths.
    ShapeMismatch { sys_len: usize, dias_len: usize },

    /// An aggregation run produced no valid windows at all. Distinct from a
    /// table legitimately emptied by downstream filtering.
    EmptyResult,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Configuration(reason) => {
                write!(f, "configuration error: {reason}")
            }
            PipelineError::Domain(reason) => write!(f, "domain error: {reason}"),
            PipelineError::ShapeMismatch { sys_len, dias_len } => {
                write!(
                    f,
                    "shape mismatch: {sys_len} systolic vs {dias_len} diastolic peaks"
                )
            }
            PipelineError::EmptyResult => {
                write!(f, "aggregation produced no valid windows")
            }
        }
    }
}

impl std::error::Error for PipelineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PipelineError::ShapeMismatch {
            sys_len: 12,
            dias_len: 11,
        };
        let display = format!("{err}");
        assert!(display.contains("12"));
        assert!(display.contains("11"));
        assert!(display.contains("shape mismatch"));
    }

    #[test]
    fn test_error_equality() {
        let a = PipelineError::Configuration("bad channel".to_string());
        let b = PipelineError::Configuration("bad channel".to_string());
        assert_eq!(a, b);
        assert_ne!(a, PipelineError::EmptyResult);
    }
}
