//! Core feature-extraction pipeline.
//!
//! This module contains:
//! - Peak detection and per-cycle pairing
//! - Mean arterial pressure computation
//! - Sliding-window aggregation into summary rows
//! - Lookback feature and plausibility flagging

pub mod cleaning;
pub mod lookback;
pub mod map;
pub mod peaks;
pub mod windowing;

// Re-export commonly used types
pub use cleaning::flag_usable;
pub use lookback::add_lookback;
pub use map::{mean_arterial_pressure, MapPoint};
pub use peaks::{confirm_cycles, diastolic_candidates, systolic_candidates, PeakCandidate};
pub use windowing::{aggregate, SummaryTable, WindowSummaryRow};
