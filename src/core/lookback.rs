//! Lagged MAP feature looking back a configurable number of minutes.

use crate::core::windowing::SummaryTable;
use crate::error::{PipelineError, PipelineResult};
use tracing::debug;

/// Append the lagged MAP column to a summary table.
///
/// The per-row window spacing is inferred from the first two rows' start
/// times and the lookback is converted to a whole-row offset by truncating
/// the ratio itself, so a fractional ratio rounds the offset down (a 1.5x
/// lookback skips back one row, never two). A lookback shorter than one
/// window's spacing is meaningless and raises a configuration error. Rows
/// whose offset precedes the table start get a missing value.
pub fn add_lookback(mut table: SummaryTable, lookback_minutes: f64) -> PipelineResult<SummaryTable> {
    if !lookback_minutes.is_finite() || lookback_minutes <= 0.0 {
        return Err(PipelineError::Configuration(
            "lookback_minutes must be positive and finite".to_string(),
        ));
    }
    if table.rows.len() < 2 {
        return Err(PipelineError::Configuration(
            "at least two windows are required to infer the window spacing".to_string(),
        ));
    }

    let spacing_ms = (table.rows[1].start_time - table.rows[0].start_time).num_milliseconds();
    if spacing_ms <= 0 {
        return Err(PipelineError::Configuration(
            "window start times are not strictly increasing".to_string(),
        ));
    }
    let spacing_minutes = spacing_ms as f64 / 60_000.0;

    if lookback_minutes < spacing_minutes {
        return Err(PipelineError::Configuration(format!(
            "lookback of {lookback_minutes} min is shorter than the {spacing_minutes} min window spacing"
        )));
    }

    // Example: a 10 minute lookback over 5 minute windows skips back 2 rows
    let n_skips = (lookback_minutes / spacing_minutes) as usize;
    debug!(lookback_minutes, spacing_minutes, n_skips, "computing lookback column");

    let maps: Vec<Option<f64>> = table.rows.iter().map(|r| r.avg_map).collect();
    for (i, row) in table.rows.iter_mut().enumerate() {
        row.lookback_map = if i >= n_skips { maps[i - n_skips] } else { None };
    }
    table.lookback_minutes = Some(lookback_minutes);

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::windowing::synthetic_row;

    fn five_minute_table(n: usize) -> SummaryTable {
        SummaryTable {
            wave_id: "w001".to_string(),
            rows: (0..n)
                .map(|i| synthetic_row(i, 5, Some(70.0 + i as f64)))
                .collect(),
            lookback_minutes: None,
        }
    }

    #[test]
    fn test_ten_minute_lookback_skips_two_rows() {
        let table = add_lookback(five_minute_table(6), 10.0).unwrap();
        assert_eq!(table.lookback_minutes, Some(10.0));

        assert_eq!(table.rows[0].lookback_map, None);
        assert_eq!(table.rows[1].lookback_map, None);
        for i in 2..table.rows.len() {
            assert_eq!(table.rows[i].lookback_map, table.rows[i - 2].avg_map);
        }
    }

    #[test]
    fn test_fractional_ratio_truncates_offset_down() {
        // 7.5 minute lookback over 5 minute spacing: ratio 1.5 skips one
        // row, not two
        let table = add_lookback(five_minute_table(4), 7.5).unwrap();

        assert_eq!(table.rows[0].lookback_map, None);
        for i in 1..table.rows.len() {
            assert_eq!(table.rows[i].lookback_map, table.rows[i - 1].avg_map);
        }
    }

    #[test]
    fn test_lookback_shorter_than_spacing_rejected() {
        let err = add_lookback(five_minute_table(6), 3.0).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_lookback_carries_missing_map_values() {
        let mut table = five_minute_table(4);
        table.rows[0].avg_map = None;
        let table = add_lookback(table, 5.0).unwrap();

        // One-row skip: row 1 looks back at the row with no MAP
        assert_eq!(table.rows[1].lookback_map, None);
        assert_eq!(table.rows[2].lookback_map, table.rows[1].avg_map);
    }

    #[test]
    fn test_single_row_table_rejected() {
        let err = add_lookback(five_minute_table(1), 10.0).unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_invalid_lookback_rejected() {
        assert!(add_lookback(five_minute_table(4), 0.0).is_err());
        assert!(add_lookback(five_minute_table(4), f64::NAN).is_err());
    }
}
