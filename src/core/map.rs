//! Mean arterial pressure from paired systolic/diastolic peak sequences.

use crate::core::peaks::PeakCandidate;
use crate::error::{PipelineError, PipelineResult};

/// One beat-level MAP value at its representative sample position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapPoint {
    /// Arithmetic mean of the paired systolic and diastolic positions
    pub position: f64,
    /// Mean arterial pressure in mmHg
    pub value: f64,
}

/// Compute beat-level MAP from aligned systolic and diastolic peaks.
///
/// Sequences are aligned by index position, not by timestamp matching; the
/// caller is responsible for supplying comparable lengths. Uses the standard
/// clinical approximation `(sbp + 2*dbp) / 3`, diastole weighted double.
pub fn mean_arterial_pressure(
    sys: &[PeakCandidate],
    dias: &[PeakCandidate],
) -> PipelineResult<Vec<MapPoint>> {
    if sys.len() != dias.len() {
        return Err(PipelineError::ShapeMismatch {
            sys_len: sys.len(),
            dias_len: dias.len(),
        });
    }

    Ok(sys
        .iter()
        .zip(dias.iter())
        .map(|(s, d)| MapPoint {
            position: (s.position as f64 + d.position as f64) / 2.0,
            value: (s.magnitude + 2.0 * d.magnitude) / 3.0,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peak(position: i64, magnitude: f64) -> PeakCandidate {
        PeakCandidate {
            position,
            magnitude,
        }
    }

    #[test]
    fn test_textbook_map() {
        let sys = [peak(100, 120.0), peak(225, 120.0)];
        let dias = [peak(150, 80.0), peak(275, 80.0)];
        let points = mean_arterial_pressure(&sys, &dias).unwrap();

        assert_eq!(points.len(), 2);
        for point in &points {
            assert!((point.value - 93.333333).abs() < 1e-4);
        }
        assert!((points[0].position - 125.0).abs() < f64::EPSILON);
        assert!((points[1].position - 250.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let sys = [peak(0, 120.0), peak(125, 118.0)];
        let dias = [peak(60, 80.0)];
        assert_eq!(
            mean_arterial_pressure(&sys, &dias),
            Err(PipelineError::ShapeMismatch {
                sys_len: 2,
                dias_len: 1
            })
        );
    }

    #[test]
    fn test_empty_sequences_yield_empty() {
        assert!(mean_arterial_pressure(&[], &[]).unwrap().is_empty());
    }
}
