//! Waveform records and the collaborators that supply them.
//!
//! Acquisition is strictly a collaborator responsibility: the pipeline core
//! consumes a complete [`WaveformRecord`] and never performs I/O itself.

pub mod source;
pub mod types;

// Re-export commonly used types
pub use source::{JsonFileSource, SourceError, SyntheticWaveform, WaveformSource};
pub use types::{RecordMetadata, WaveformChannel, WaveformFrame, WaveformRecord};
