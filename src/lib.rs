//! ABP Features - windowed blood-pressure feature extraction.
//!
//! This library turns continuous arterial blood-pressure (ABP) waveform
//! recordings into fixed-length window summaries usable as model inputs,
//! including a lagged MAP feature and a forward-looking hypotension label.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                         ABP Features                          │
//! ├───────────────────────────────────────────────────────────────┤
//! │  ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────────┐  │
//! │  │ Waveform │──▶│ Windowing │──▶│ Lookback │──▶│ Cleaning │  │
//! │  │  source  │   │ (peaks +  │   │ (lagged  │   │ (floors, │  │
//! │  │ (record) │   │ MAP avgs) │   │  MAP)    │   │  labels) │  │
//! │  └──────────┘   └───────────┘   └──────────┘   └─────┬────┘  │
//! │                                                      ▼       │
//! │                                               ┌────────────┐ │
//! │                                               │   Export   │ │
//! │                                               │ (snapshot) │ │
//! │                                               └────────────┘ │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use abp_features::{
//!     config::PipelineConfig,
//!     core::{add_lookback, aggregate, flag_usable},
//!     waveform::{SyntheticWaveform, WaveformFrame},
//! };
//!
//! let record = SyntheticWaveform::default().record("w001");
//! let config = PipelineConfig::default();
//!
//! let frame = WaveformFrame::from_record(&record, &config.channel_name).unwrap();
//! let table = aggregate(&frame, &config).unwrap();
//! let table = add_lookback(table, config.lookback_minutes).unwrap();
//! let table = flag_usable(table);
//!
//! println!("{} usable windows of {}", table.usable_rows(), table.len());
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod waveform;

// Re-export key types at crate root for convenience
pub use config::{
    PipelineConfig, HYPOTENSION_THRESHOLD_MMHG, LABEL_HORIZON_WINDOWS, MIN_PLAUSIBLE_DIAS_MMHG,
    MIN_PLAUSIBLE_SYS_MMHG, SAMPLE_INTERVAL_MS,
};
pub use core::{
    add_lookback, aggregate, flag_usable, mean_arterial_pressure, MapPoint, PeakCandidate,
    SummaryTable, WindowSummaryRow,
};
pub use error::{PipelineError, PipelineResult};
pub use export::{SnapshotBuilder, TableSnapshot};
pub use waveform::{
    JsonFileSource, RecordMetadata, SourceError, SyntheticWaveform, WaveformChannel,
    WaveformFrame, WaveformRecord, WaveformSource,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
