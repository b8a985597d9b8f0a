//! Plausibility flagging of summary rows for model consumption.

use crate::config::{MIN_PLAUSIBLE_DIAS_MMHG, MIN_PLAUSIBLE_SYS_MMHG};
use crate::core::windowing::SummaryTable;
use tracing::info;

/// Flag which rows are usable for modeling.
///
/// A row is included only when its average pressures clear the plausibility
/// floors (anything below is sensor dropout or artifact) and its forward
/// label exists. Missing averages fail the floors.
pub fn flag_usable(mut table: SummaryTable) -> SummaryTable {
    for row in &mut table.rows {
        let good_sys = row.avg_sys.is_some_and(|s| s >= MIN_PLAUSIBLE_SYS_MMHG);
        let good_dias = row.avg_dias.is_some_and(|d| d >= MIN_PLAUSIBLE_DIAS_MMHG);
        let has_outcome = row.hypotensive_in_15.is_some();

        row.include_in_model = u8::from(good_sys && good_dias && has_outcome);
    }

    info!(
        wave_id = %table.wave_id,
        usable = table.usable_rows(),
        total = table.len(),
        "flagged summary rows for modeling"
    );

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::windowing::{synthetic_row, WindowSummaryRow};

    fn table_of(rows: Vec<WindowSummaryRow>) -> SummaryTable {
        SummaryTable {
            wave_id: "w001".to_string(),
            rows,
            lookback_minutes: None,
        }
    }

    fn row(avg_sys: Option<f64>, avg_dias: Option<f64>, label: Option<u8>) -> WindowSummaryRow {
        let mut row = synthetic_row(0, 1, Some(80.0));
        row.avg_sys = avg_sys;
        row.avg_dias = avg_dias;
        row.hypotensive_in_15 = label;
        row
    }

    #[test]
    fn test_implausible_systolic_excluded() {
        let table = flag_usable(table_of(vec![row(Some(29.9), Some(60.0), Some(1))]));
        assert_eq!(table.rows[0].include_in_model, 0);
    }

    #[test]
    fn test_floors_are_inclusive() {
        let table = flag_usable(table_of(vec![row(Some(30.0), Some(10.0), Some(1))]));
        assert_eq!(table.rows[0].include_in_model, 1);
    }

    #[test]
    fn test_missing_label_excluded() {
        let table = flag_usable(table_of(vec![row(Some(120.0), Some(80.0), None)]));
        assert_eq!(table.rows[0].include_in_model, 0);
    }

    #[test]
    fn test_missing_averages_excluded() {
        let table = flag_usable(table_of(vec![
            row(None, Some(80.0), Some(0)),
            row(Some(120.0), None, Some(0)),
        ]));
        assert!(table.rows.iter().all(|r| r.include_in_model == 0));
        assert_eq!(table.usable_rows(), 0);
    }

    #[test]
    fn test_usable_row_count() {
        let table = flag_usable(table_of(vec![
            row(Some(120.0), Some(80.0), Some(0)),
            row(Some(25.0), Some(80.0), Some(0)),
            row(Some(120.0), Some(80.0), Some(1)),
        ]));
        assert_eq!(table.usable_rows(), 2);
    }
}
