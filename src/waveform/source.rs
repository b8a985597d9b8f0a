//! Waveform source collaborators.
//!
//! The pipeline never fetches data itself; a [`WaveformSource`] hands it a
//! complete [`WaveformRecord`] for a waveform id. Two sources ship with the
//! crate: a JSON file source for locally staged records and a synthetic
//! generator used by the end-to-end tests and the `synth` CLI command.

use crate::config::SAMPLE_INTERVAL_MS;
use crate::waveform::types::{WaveformChannel, WaveformRecord};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Supplies complete waveform records by id.
pub trait WaveformSource {
    fn fetch(&self, wave_id: &str) -> Result<WaveformRecord, SourceError>;
}

/// Waveform acquisition errors.
#[derive(Debug)]
pub enum SourceError {
    NotFound(String),
    IoError(String),
    ParseError(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::NotFound(id) => write!(f, "no record for waveform id {id}"),
            SourceError::IoError(e) => write!(f, "IO error: {e}"),
            SourceError::ParseError(e) => write!(f, "Parse error: {e}"),
        }
    }
}

impl std::error::Error for SourceError {}

/// Reads records staged as `<root>/<wave_id>.json`.
pub struct JsonFileSource {
    root: PathBuf,
}

impl JsonFileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl WaveformSource for JsonFileSource {
    fn fetch(&self, wave_id: &str) -> Result<WaveformRecord, SourceError> {
        let path = self.root.join(format!("{wave_id}.json"));
        if !path.exists() {
            return Err(SourceError::NotFound(wave_id.to_string()));
        }
        let content =
            std::fs::read_to_string(&path).map_err(|e| SourceError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| SourceError::ParseError(e.to_string()))
    }
}

/// Generates a repeating sinusoidal pressure waveform.
///
/// One sine period per `period_secs` models one cardiac cycle, scaled so the
/// trough sits at `low_mmhg` (diastolic) and the crest at `high_mmhg`
/// (systolic). Deterministic for a fixed `base_time`.
#[derive(Debug, Clone)]
pub struct SyntheticWaveform {
    pub duration_secs: u64,
    pub period_secs: f64,
    pub low_mmhg: f64,
    pub high_mmhg: f64,
    pub base_time: DateTime<Utc>,
    pub sample_interval_ms: i64,
}

impl Default for SyntheticWaveform {
    fn default() -> Self {
        Self {
            duration_secs: 120,
            period_secs: 1.0,
            low_mmhg: 60.0,
            high_mmhg: 140.0,
            base_time: Utc::now(),
            sample_interval_ms: SAMPLE_INTERVAL_MS,
        }
    }
}

impl SyntheticWaveform {
    /// Render the waveform into a single-channel "ABP" record.
    pub fn record(&self, wave_id: &str) -> WaveformRecord {
        let n_samples = (self.duration_secs as i64 * 1000) / self.sample_interval_ms;
        let mid = (self.high_mmhg + self.low_mmhg) / 2.0;
        let amplitude = (self.high_mmhg - self.low_mmhg) / 2.0;

        let values = (0..n_samples)
            .map(|i| {
                let t_secs = (i * self.sample_interval_ms) as f64 / 1000.0;
                mid + amplitude * (2.0 * std::f64::consts::PI * t_secs / self.period_secs).sin()
            })
            .collect();

        WaveformRecord {
            wave_id: wave_id.to_string(),
            base_time: self.base_time,
            sample_interval_ms: self.sample_interval_ms,
            sample_indices: None,
            channels: vec![WaveformChannel {
                name: "ABP".to_string(),
                values,
            }],
            metadata: None,
        }
    }
}

impl WaveformSource for SyntheticWaveform {
    fn fetch(&self, wave_id: &str) -> Result<WaveformRecord, SourceError> {
        Ok(self.record(wave_id))
    }
}
