//! Date-range filtering over raw store rows.

use chrono::NaiveDate;

use crate::record::{ExpenseRecord, RawRow};

/// Select the records whose date falls inside the requested range.
///
/// With `end = None` only records dated exactly `start` match (single-day
/// mode); with `end = Some(e)` the closed interval `[start, e]` matches.
/// Rows that fail to parse are skipped, never an error: the store may hold
/// malformed or legacy rows.
pub fn filter_expenses(
    rows: &[RawRow],
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Vec<ExpenseRecord> {
    rows.iter()
        .filter_map(ExpenseRecord::from_row)
        .filter(|rec| match end {
            Some(end) => start <= rec.date() && rec.date() <= end,
            None => rec.date() == start,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(date: &str, amount: &str) -> RawRow {
        let mut r = RawRow::new();
        r.insert("Date".to_string(), date.to_string());
        r.insert("Amount".to_string(), amount.to_string());
        r.insert("Item".to_string(), "item".to_string());
        r.insert("Category".to_string(), "misc".to_string());
        r
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_single_day_mode() {
        let rows = vec![
            row("2024-03-01", "10"),
            row("2024-03-02", "20"),
            row("2024-02-29", "30"),
        ];
        let got = filter_expenses(&rows, ymd(2024, 3, 1), None);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, 10.0);
    }

    #[test]
    fn test_closed_interval_includes_both_bounds() {
        let rows = vec![
            row("2024-02-28", "1"),
            row("2024-02-29", "2"),
            row("2024-03-01", "3"),
            row("2024-03-04", "4"),
            row("2024-03-07", "5"),
            row("2024-03-08", "6"),
            row("2024-03-10", "7"),
        ];
        let got = filter_expenses(&rows, ymd(2024, 3, 1), Some(ymd(2024, 3, 7)));
        let amounts: Vec<f64> = got.iter().map(|r| r.amount).collect();
        assert_eq!(amounts, vec![3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_one_day_outside_either_bound_excluded() {
        let rows = vec![row("2024-02-29", "1"), row("2024-03-08", "2")];
        let got = filter_expenses(&rows, ymd(2024, 3, 1), Some(ymd(2024, 3, 7)));
        assert!(got.is_empty());
    }

    #[test]
    fn test_malformed_rows_are_skipped_not_fatal() {
        let rows = vec![
            row("not-a-date", "10"),
            row("2024-03-01", "ten rupees"),
            row("2024-03-01", "10"),
        ];
        let got = filter_expenses(&rows, ymd(2024, 3, 1), None);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, 10.0);
    }

    #[test]
    fn test_timestamp_rows_filter_on_date_portion() {
        let rows = vec![row("2024-03-01 23:59:59", "10"), row("2024-03-02 00:00:01", "20")];
        let got = filter_expenses(&rows, ymd(2024, 3, 1), None);
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].amount, 10.0);
    }
}
