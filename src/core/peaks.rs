//! Peak detection and pairing for arterial pressure waveforms.
//!
//! Systolic candidates are strict local maxima of the pressure series;
//! diastolic candidates are local maxima of the element-wise reciprocal, so
//! the series must be strictly positive. Raw candidates are then collapsed to
//! one confirmed extremum per cardiac cycle by keeping the larger of each
//! consecutive pair.

use crate::error::{PipelineError, PipelineResult};

/// One candidate extremum: original sample index plus original magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakCandidate {
    /// Sample index in the source series (not renumbered)
    pub position: i64,
    /// Sample value in mmHg (never the reciprocal)
    pub magnitude: f64,
}

/// Positions of strict local maxima within a slice.
///
/// A sample qualifies only if it is strictly greater than both immediate
/// neighbors; plateaus and edge samples are excluded.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    for i in 1..values.len().saturating_sub(1) {
        if values[i] > values[i - 1] && values[i] > values[i + 1] {
            peaks.push(i);
        }
    }
    peaks
}

/// Find systolic peak candidates in a windowed sub-series.
///
/// `indices` and `values` are parallel slices of the same sub-series.
pub fn systolic_candidates(indices: &[i64], values: &[f64]) -> Vec<PeakCandidate> {
    debug_assert_eq!(indices.len(), values.len());
    local_maxima(values)
        .into_iter()
        .map(|i| PeakCandidate {
            position: indices[i],
            magnitude: values[i],
        })
        .collect()
}

/// Find diastolic peak candidates via maxima of the reciprocal series.
///
/// Non-positive or non-finite samples make the reciprocal search undefined
/// and raise a domain error rather than silently producing `inf`.
pub fn diastolic_candidates(indices: &[i64], values: &[f64]) -> PipelineResult<Vec<PeakCandidate>> {
    debug_assert_eq!(indices.len(), values.len());
    if let Some(bad) = values.iter().find(|v| !v.is_finite() || **v <= 0.0) {
        return Err(PipelineError::Domain(format!(
            "waveform sample {bad} is not strictly positive; reciprocal minima search undefined"
        )));
    }

    let reciprocal: Vec<f64> = values.iter().map(|v| 1.0 / v).collect();
    Ok(local_maxima(&reciprocal)
        .into_iter()
        .map(|i| PeakCandidate {
            position: indices[i],
            magnitude: values[i],
        })
        .collect())
}

/// Collapse raw candidates to one confirmed extremum per cardiac cycle.
///
/// Candidates are consumed two at a time in order and the larger magnitude of
/// each pair survives, ties going to the later candidate. This is a half-rate
/// heuristic: it assumes candidates roughly alternate between a true cycle
/// extremum and a smaller spurious one. An odd trailing candidate is dropped;
/// fewer than two candidates yield an empty result.
pub fn confirm_cycles(candidates: &[PeakCandidate]) -> Vec<PeakCandidate> {
    let mut confirmed = Vec::with_capacity(candidates.len() / 2);
    let mut i = 0;
    while i + 1 < candidates.len() {
        let (a, b) = (candidates[i], candidates[i + 1]);
        confirmed.push(if a.magnitude > b.magnitude { a } else { b });
        i += 2;
    }
    confirmed
}
