//! Model-ready table export.
//!
//! The cleaned summary table is handed to the model-training consumer as a
//! JSON snapshot carrying the producer identity, the run configuration and
//! the joined clinical metadata alongside the rows.

use crate::config::PipelineConfig;
use crate::core::windowing::{SummaryTable, WindowSummaryRow};
use crate::waveform::types::RecordMetadata;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The name of this producer.
pub const PRODUCER_NAME: &str = "abp-features";

/// Identity of the software that produced a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    /// Unique id of the run that produced this snapshot
    pub run_id: String,
}

/// One exported model-ready table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSnapshot {
    pub producer: SnapshotProducer,
    /// When this snapshot was computed (RFC3339)
    pub computed_at_utc: String,
    pub wave_id: String,
    /// Configuration the table was built with
    pub chunk_duration_secs: u64,
    pub step_duration_secs: u64,
    pub lookback_minutes: Option<f64>,
    /// Joined clinical metadata, when the record carried any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clinical: Option<RecordMetadata>,
    pub row_count: usize,
    pub usable_row_count: usize,
    pub rows: Vec<WindowSummaryRow>,
}

/// Builds table snapshots with a stable per-run id.
pub struct SnapshotBuilder {
    run_id: Uuid,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Assemble a snapshot from a cleaned table.
    pub fn build(
        &self,
        table: &SummaryTable,
        config: &PipelineConfig,
        clinical: Option<&RecordMetadata>,
    ) -> TableSnapshot {
        TableSnapshot {
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                run_id: self.run_id.to_string(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            wave_id: table.wave_id.clone(),
            chunk_duration_secs: config.chunk_duration_secs,
            step_duration_secs: config.step_duration_secs,
            lookback_minutes: table.lookback_minutes,
            clinical: clinical.cloned(),
            row_count: table.len(),
            usable_row_count: table.usable_rows(),
            rows: table.rows.clone(),
        }
    }

    /// Build and serialize a snapshot to pretty JSON.
    pub fn build_json(
        &self,
        table: &SummaryTable,
        config: &PipelineConfig,
        clinical: Option<&RecordMetadata>,
    ) -> String {
        let snapshot = self.build(table, config, clinical);
        serde_json::to_string_pretty(&snapshot).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::windowing::synthetic_row;

    fn sample_table() -> SummaryTable {
        SummaryTable {
            wave_id: "w001".to_string(),
            rows: (0..3).map(|i| synthetic_row(i, 1, Some(85.0))).collect(),
            lookback_minutes: Some(1.0),
        }
    }

    #[test]
    fn test_run_ids_are_unique() {
        assert_ne!(SnapshotBuilder::new().run_id(), SnapshotBuilder::new().run_id());
    }

    #[test]
    fn test_snapshot_contents() {
        let builder = SnapshotBuilder::new();
        let config = PipelineConfig::default();
        let clinical = RecordMetadata {
            clinical_id: "c123".to_string(),
            age: Some(67.0),
            sex: Some("F".to_string()),
        };

        let snapshot = builder.build(&sample_table(), &config, Some(&clinical));

        assert_eq!(snapshot.producer.name, PRODUCER_NAME);
        assert_eq!(snapshot.wave_id, "w001");
        assert_eq!(snapshot.row_count, 3);
        assert_eq!(snapshot.lookback_minutes, Some(1.0));
        assert_eq!(snapshot.clinical.unwrap().clinical_id, "c123");
        assert!(!snapshot.computed_at_utc.is_empty());
    }

    #[test]
    fn test_snapshot_json_serialization() {
        let builder = SnapshotBuilder::new();
        let json = builder.build_json(&sample_table(), &PipelineConfig::default(), None);

        assert!(json.contains("producer"));
        assert!(json.contains("run_id"));
        assert!(json.contains("wave_id"));
        assert!(json.contains("avg_map"));
        assert!(json.contains("hypotensive_in_15"));
        assert!(!json.contains("clinical"));
    }
}
