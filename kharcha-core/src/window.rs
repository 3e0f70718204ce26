//! Date windows: today / this-week / this-month.
//!
//! Constructors are pure functions of an anchor date; the caller supplies
//! "today" from its clock in the configured local timezone.

use chrono::{Datelike, Duration, NaiveDate};

/// The supported aggregation periods. No arbitrary ranges exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    ThisWeek,
    ThisMonth,
}

/// A closed date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    /// Single-day window.
    pub fn day(anchor: NaiveDate) -> Self {
        Self {
            start: anchor,
            end: anchor,
        }
    }

    /// Monday-anchored ISO week containing `anchor`.
    pub fn week_of(anchor: NaiveDate) -> Self {
        let start = anchor - Duration::days(anchor.weekday().num_days_from_monday() as i64);
        Self {
            start,
            end: start + Duration::days(6),
        }
    }

    /// Calendar month containing `anchor`. The end is computed by stepping to
    /// the first day of the next month and going back one day, which handles
    /// 28/29/30/31-day months uniformly.
    pub fn month_of(anchor: NaiveDate) -> Self {
        let start = anchor.with_day(1).unwrap_or(anchor);
        let next_month = if start.month() == 12 {
            NaiveDate::from_ymd_opt(start.year() + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(start.year(), start.month() + 1, 1)
        };
        let end = next_month.and_then(|d| d.pred_opt()).unwrap_or(anchor);
        Self { start, end }
    }

    /// Window for `period` anchored on the given date.
    pub fn anchored(period: Period, anchor: NaiveDate) -> Self {
        match period {
            Period::Today => Self::day(anchor),
            Period::ThisWeek => Self::week_of(anchor),
            Period::ThisMonth => Self::month_of(anchor),
        }
    }

    /// Human heading for the summary card.
    pub fn title(&self, period: Period) -> String {
        match period {
            Period::Today => format!("Today's Expense Summary ({})", self.start.format("%b %d, %Y")),
            Period::ThisWeek => format!(
                "Weekly Expense Summary ({} - {})",
                self.start.format("%b %d"),
                self.end.format("%b %d, %Y")
            ),
            Period::ThisMonth => {
                format!("Monthly Expense Summary ({})", self.start.format("%B %Y"))
            }
        }
    }
}
