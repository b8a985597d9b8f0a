//! Waveform record types supplied by the acquisition collaborators.
//!
//! A [`WaveformRecord`] is the raw deliverable of the waveform source: one or
//! more named channels of samples plus the base acquisition timestamp and the
//! per-sample interval. A [`WaveformFrame`] is the working copy the pipeline
//! actually runs on: one selected channel with parallel sample indices and
//! wall-clock timestamps. The record itself is never mutated.

use crate::config::SAMPLE_INTERVAL_MS;
use crate::error::{PipelineError, PipelineResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// One named channel of waveform samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformChannel {
    /// Channel name as reported by the acquisition system, e.g. "ABP"
    pub name: String,
    /// Sample values in acquisition order (mmHg for pressure channels)
    pub values: Vec<f64>,
}

/// Clinical metadata joined onto a waveform record.
///
/// Owned by the record/metadata collaborator; the pipeline only reads it and
/// carries it through to the exported table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMetadata {
    /// Clinical entity identifier
    pub clinical_id: String,
    /// Patient age in years, when known
    pub age: Option<f64>,
    /// Patient sex, when known
    pub sex: Option<String>,
}

/// A complete, already-sampled waveform segment for one waveform id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveformRecord {
    /// Waveform identifier
    pub wave_id: String,
    /// Wall-clock time of the first sample
    pub base_time: DateTime<Utc>,
    /// Per-sample interval in milliseconds
    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: i64,
    /// Explicit sample indices; contiguous from 0 when absent. Gaps are
    /// allowed and cause the windows touching them to be skipped.
    #[serde(default)]
    pub sample_indices: Option<Vec<i64>>,
    /// Recorded channels
    pub channels: Vec<WaveformChannel>,
    /// Joined clinical metadata, when available
    #[serde(default)]
    pub metadata: Option<RecordMetadata>,
}

fn default_sample_interval() -> i64 {
    SAMPLE_INTERVAL_MS
}

impl WaveformRecord {
    /// Find a non-empty channel by name.
    pub fn channel(&self, name: &str) -> Option<&WaveformChannel> {
        self.channels
            .iter()
            .find(|c| c.name == name && !c.values.is_empty())
    }
}

/// The single-channel working series the pipeline operates on.
///
/// Parallel vectors: `indices[i]`, `values[i]` and `timestamps[i]` describe
/// the same sample. Indices are strictly increasing but not necessarily
/// contiguous.
#[derive(Debug, Clone)]
pub struct WaveformFrame {
    pub wave_id: String,
    pub metadata: Option<RecordMetadata>,
    pub sample_interval_ms: i64,
    pub indices: Vec<i64>,
    pub values: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
}

impl WaveformFrame {
    /// Build a working frame from a record, selecting the analysis channel.
    ///
    /// The channel named `channel_name` is preferred; if the record does not
    /// carry it, the first channel is used, then the second. A record with no
    /// usable channel is a configuration error.
    pub fn from_record(record: &WaveformRecord, channel_name: &str) -> PipelineResult<Self> {
        if record.sample_interval_ms <= 0 {
            return Err(PipelineError::Configuration(format!(
                "sample interval must be positive, got {} ms",
                record.sample_interval_ms
            )));
        }

        let channel = record
            .channel(channel_name)
            .or_else(|| record.channels.first().filter(|c| !c.values.is_empty()))
            .or_else(|| record.channels.get(1).filter(|c| !c.values.is_empty()))
            .ok_or_else(|| {
                PipelineError::Configuration(format!(
                    "record {:?} has no usable waveform channel (wanted {channel_name:?})",
                    record.wave_id
                ))
            })?;

        let indices: Vec<i64> = match &record.sample_indices {
            Some(explicit) => {
                if explicit.len() != channel.values.len() {
                    return Err(PipelineError::Configuration(format!(
                        "sample index column has {} entries for {} samples",
                        explicit.len(),
                        channel.values.len()
                    )));
                }
                if explicit.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(PipelineError::Configuration(
                        "sample indices must be strictly increasing".to_string(),
                    ));
                }
                explicit.clone()
            }
            None => (0..channel.values.len() as i64).collect(),
        };

        let timestamps = indices
            .iter()
            .map(|&idx| record.base_time + Duration::milliseconds(idx * record.sample_interval_ms))
            .collect();

        Ok(Self {
            wave_id: record.wave_id.clone(),
            metadata: record.metadata.clone(),
            sample_interval_ms: record.sample_interval_ms,
            indices,
            values: channel.values.clone(),
            timestamps,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sample index of the first sample.
    pub fn first_index(&self) -> Option<i64> {
        self.indices.first().copied()
    }

    /// Sample index of the last sample.
    pub fn last_index(&self) -> Option<i64> {
        self.indices.last().copied()
    }

    /// Position of a sample index within the frame, if that sample exists.
    pub fn position_of(&self, sample_index: i64) -> Option<usize> {
        self.indices.binary_search(&sample_index).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_channels(channels: Vec<WaveformChannel>) -> WaveformRecord {
        WaveformRecord {
            wave_id: "w001".to_string(),
            base_time: "2026-01-01T00:00:00Z".parse().unwrap(),
            sample_interval_ms: 8,
            sample_indices: None,
            channels,
            metadata: None,
        }
    }

    #[test]
    fn test_named_channel_preferred() {
        let record = record_with_channels(vec![
            WaveformChannel {
                name: "PLETH".to_string(),
                values: vec![1.0, 2.0],
            },
            WaveformChannel {
                name: "ABP".to_string(),
                values: vec![80.0, 81.0],
            },
        ]);
        let frame = WaveformFrame::from_record(&record, "ABP").unwrap();
        assert_eq!(frame.values, vec![80.0, 81.0]);
    }

    #[test]
    fn test_falls_back_to_first_then_second_channel() {
        let record = record_with_channels(vec![
            WaveformChannel {
                name: "PLETH".to_string(),
                values: vec![1.0, 2.0],
            },
            WaveformChannel {
                name: "II".to_string(),
                values: vec![0.5],
            },
        ]);
        let frame = WaveformFrame::from_record(&record, "ABP").unwrap();
        assert_eq!(frame.values, vec![1.0, 2.0]);

        let record = record_with_channels(vec![
            WaveformChannel {
                name: "PLETH".to_string(),
                values: vec![],
            },
            WaveformChannel {
                name: "II".to_string(),
                values: vec![0.5],
            },
        ]);
        let frame = WaveformFrame::from_record(&record, "ABP").unwrap();
        assert_eq!(frame.values, vec![0.5]);
    }

    #[test]
    fn test_no_usable_channel_is_configuration_error() {
        let record = record_with_channels(vec![WaveformChannel {
            name: "ABP".to_string(),
            values: vec![],
        }]);
        let err = WaveformFrame::from_record(&record, "ABP").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_timestamps_follow_sample_interval() {
        let record = record_with_channels(vec![WaveformChannel {
            name: "ABP".to_string(),
            values: vec![80.0, 81.0, 82.0],
        }]);
        let frame = WaveformFrame::from_record(&record, "ABP").unwrap();
        let delta = frame.timestamps[2] - frame.timestamps[0];
        assert_eq!(delta.num_milliseconds(), 16);
    }

    #[test]
    fn test_explicit_indices_validated() {
        let mut record = record_with_channels(vec![WaveformChannel {
            name: "ABP".to_string(),
            values: vec![80.0, 81.0, 82.0],
        }]);
        record.sample_indices = Some(vec![0, 2]);
        assert!(WaveformFrame::from_record(&record, "ABP").is_err());

        record.sample_indices = Some(vec![5, 3, 7]);
        assert!(WaveformFrame::from_record(&record, "ABP").is_err());

        record.sample_indices = Some(vec![0, 4, 9]);
        let frame = WaveformFrame::from_record(&record, "ABP").unwrap();
        assert_eq!(frame.position_of(4), Some(1));
        assert_eq!(frame.position_of(5), None);
        assert_eq!(frame.first_index(), Some(0));
        assert_eq!(frame.last_index(), Some(9));
    }
}
