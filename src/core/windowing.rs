//! Sliding-window aggregation of waveform series into summary rows.
//!
//! A fixed-duration window slides across the frame in fixed steps. Each
//! window runs systolic and diastolic extraction + pairing on its sub-series
//! and is summarized into one [`WindowSummaryRow`]. After all windows are
//! built, rows are sorted by start position and the hypotension flag and its
//! forward-shifted label are derived.

use crate::config::{HYPOTENSION_THRESHOLD_MMHG, LABEL_HORIZON_WINDOWS, PipelineConfig};
use crate::core::peaks::{confirm_cycles, diastolic_candidates, systolic_candidates, PeakCandidate};
use crate::error::{PipelineError, PipelineResult};
use crate::waveform::types::WaveformFrame;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::{debug, info};

/// One aggregation window's summary.
///
/// Average pressures are `None` when the window produced no confirmed peaks
/// (flat or degenerate sub-series); such rows never pass the plausibility
/// floors downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummaryRow {
    /// Waveform identifier
    pub wave_id: String,
    /// Sample index of the window start
    pub start_window: i64,
    /// Sample index of the window end
    pub end_window: i64,
    /// Wall-clock time of the window start
    pub start_time: DateTime<Utc>,
    /// Wall-clock time of the window end
    pub end_time: DateTime<Utc>,
    /// Mean of confirmed systolic peak magnitudes (mmHg)
    pub avg_sys: Option<f64>,
    /// Mean of confirmed diastolic peak magnitudes (mmHg)
    pub avg_dias: Option<f64>,
    /// `(avg_sys + 2*avg_dias) / 3`, derived strictly from the two averages
    pub avg_map: Option<f64>,
    /// Raw sub-series snapshot for auditability
    pub all_values: Vec<f64>,
    /// 1 when `avg_map <= 65` mmHg
    pub current_hypotensive: u8,
    /// `current_hypotensive` of the row 15 windows ahead; `None` once the
    /// table runs out, never a stale value
    pub hypotensive_in_15: Option<u8>,
    /// Lagged MAP appended by the lookback stage
    pub lookback_map: Option<f64>,
    /// 1 when the row passes the plausibility floors and has a label
    pub include_in_model: u8,
}

/// Ordered per-window summary table for one waveform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTable {
    pub wave_id: String,
    /// Rows sorted by `start_window`, contiguously indexed by position
    pub rows: Vec<WindowSummaryRow>,
    /// Lookback horizon in minutes, recorded once the column is populated
    pub lookback_minutes: Option<f64>,
}

impl SummaryTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows flagged usable for modeling.
    pub fn usable_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.include_in_model == 1).count()
    }
}

/// Slide a window across the frame and summarize each position.
///
/// Window durations are converted to sample counts with the frame's sample
/// interval. A window whose boundary sample is missing from the series is
/// skipped, not failed; a run with no valid windows at all is
/// [`PipelineError::EmptyResult`].
pub fn aggregate(frame: &WaveformFrame, config: &PipelineConfig) -> PipelineResult<SummaryTable> {
    config.validate()?;

    let (Some(first), Some(last)) = (frame.first_index(), frame.last_index()) else {
        return Err(PipelineError::EmptyResult);
    };

    let chunk_samples = (config.chunk_duration_secs as i64 * 1000) / frame.sample_interval_ms;
    let step_samples = (config.step_duration_secs as i64 * 1000) / frame.sample_interval_ms;
    if chunk_samples == 0 || step_samples == 0 {
        return Err(PipelineError::Configuration(format!(
            "window durations shorter than one {} ms sample",
            frame.sample_interval_ms
        )));
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    let mut cur_window = first + chunk_samples;
    while cur_window < last {
        match build_row(frame, cur_window - chunk_samples, cur_window)? {
            Some(row) => rows.push(row),
            None => skipped += 1,
        }
        cur_window += step_samples;
    }

    if rows.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    rows.sort_by_key(|row| row.start_window);
    apply_labels(&mut rows);

    info!(
        wave_id = %frame.wave_id,
        windows = rows.len(),
        skipped,
        "aggregated waveform into summary windows"
    );

    Ok(SummaryTable {
        wave_id: frame.wave_id.clone(),
        rows,
        lookback_minutes: None,
    })
}

/// Summarize the window `[start_index, end_index]` (inclusive).
///
/// Returns `Ok(None)` when a boundary sample is absent from the frame, so the
/// caller drops the window and continues. Domain errors abort the run.
fn build_row(
    frame: &WaveformFrame,
    start_index: i64,
    end_index: i64,
) -> PipelineResult<Option<WindowSummaryRow>> {
    let (Some(start_pos), Some(end_pos)) =
        (frame.position_of(start_index), frame.position_of(end_index))
    else {
        debug!(
            wave_id = %frame.wave_id,
            start_index,
            end_index,
            "window boundary missing from series; dropping window"
        );
        return Ok(None);
    };

    let indices = &frame.indices[start_pos..=end_pos];
    let values = &frame.values[start_pos..=end_pos];

    let sys = confirm_cycles(&systolic_candidates(indices, values));
    let dias = confirm_cycles(&diastolic_candidates(indices, values)?);

    let avg_sys = mean_magnitude(&sys);
    let avg_dias = mean_magnitude(&dias);
    let avg_map = match (avg_sys, avg_dias) {
        (Some(s), Some(d)) => Some((s + 2.0 * d) / 3.0),
        _ => None,
    };

    Ok(Some(WindowSummaryRow {
        wave_id: frame.wave_id.clone(),
        start_window: start_index,
        end_window: end_index,
        start_time: frame.timestamps[start_pos],
        end_time: frame.timestamps[end_pos],
        avg_sys,
        avg_dias,
        avg_map,
        all_values: values.to_vec(),
        current_hypotensive: 0,
        hypotensive_in_15: None,
        lookback_map: None,
        include_in_model: 0,
    }))
}

fn mean_magnitude(peaks: &[PeakCandidate]) -> Option<f64> {
    if peaks.is_empty() {
        None
    } else {
        Some(peaks.iter().map(|p| p.magnitude).mean())
    }
}

/// Derive the hypotension flag and its forward-shifted label.
///
/// Rows must already be sorted by `start_window`. Row `i` is labeled with the
/// flag of row `i + 15`; the final 15 rows stay unlabeled.
fn apply_labels(rows: &mut [WindowSummaryRow]) {
    for row in rows.iter_mut() {
        row.current_hypotensive = match row.avg_map {
            Some(map) if map <= HYPOTENSION_THRESHOLD_MMHG => 1,
            _ => 0,
        };
    }

    let flags: Vec<u8> = rows.iter().map(|r| r.current_hypotensive).collect();
    for (i, row) in rows.iter_mut().enumerate() {
        row.hypotensive_in_15 = flags.get(i + LABEL_HORIZON_WINDOWS).copied();
    }
}

/// Hand-built summary row for downstream-stage tests.
#[cfg(test)]
pub(crate) fn synthetic_row(index: usize, spacing_mins: i64, avg_map: Option<f64>) -> WindowSummaryRow {
    let base: DateTime<Utc> = "2026-01-01T00:00:00Z".parse().unwrap();
    let start_time = base + chrono::Duration::minutes(index as i64 * spacing_mins);
    WindowSummaryRow {
        wave_id: "w001".to_string(),
        start_window: index as i64 * 1000,
        end_window: index as i64 * 1000 + 500,
        start_time,
        end_time: start_time + chrono::Duration::seconds(30),
        avg_sys: avg_map.map(|m| m + 40.0),
        avg_dias: avg_map.map(|m| m - 20.0),
        avg_map,
        all_values: Vec::new(),
        current_hypotensive: 0,
        hypotensive_in_15: None,
        lookback_map: None,
        include_in_model: 0,
    }
}
