//! Expense record types and the sheet row schema.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Column names of the backing sheet, in order.
pub const EXPECTED_HEADERS: [&str; 4] = ["Date", "Amount", "Item", "Category"];

/// Bucket label used when a record carries no category.
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// One store row as returned by `read_all_rows`: field name -> cell value.
pub type RawRow = HashMap<String, String>;

/// A single logged expense.
///
/// The stored `Date` cell holds a full timestamp, but only the date portion
/// participates in filtering and aggregation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    /// When the expense was logged.
    pub timestamp: NaiveDateTime,
    /// Non-negative monetary amount.
    pub amount: f64,
    /// What the money was spent on.
    pub item: String,
    /// Optional category label; absent buckets render as `DEFAULT_CATEGORY`.
    pub category: Option<String>,
}

impl ExpenseRecord {
    /// Create a new ExpenseRecord
    pub fn new(
        timestamp: NaiveDateTime,
        amount: f64,
        item: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            amount,
            item: item.into(),
            category,
        }
    }

    /// The calendar date this record falls on.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Category label, with empty/missing coerced to the default bucket.
    pub fn category_label(&self) -> &str {
        match self.category.as_deref() {
            Some(c) if !c.trim().is_empty() => c,
            _ => DEFAULT_CATEGORY,
        }
    }

    /// Parse a record out of a raw store row.
    ///
    /// Lenient by policy: rows whose `Date` cell is not a timestamp or
    /// calendar date, or whose `Amount` cell is not a finite non-negative
    /// number, yield `None` and are skipped during aggregation. Malformed
    /// legacy rows must never abort a summary.
    pub fn from_row(row: &RawRow) -> Option<Self> {
        let timestamp = parse_timestamp(row.get("Date")?.trim())?;
        let amount: f64 = row.get("Amount")?.trim().parse().ok()?;
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let item = row
            .get("Item")
            .map(|s| s.trim().to_string())
            .unwrap_or_default();
        let category = row
            .get("Category")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from);
        Some(Self {
            timestamp,
            amount,
            item,
            category,
        })
    }

    /// Ordered field list matching `EXPECTED_HEADERS`, for `append_row`.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.amount.to_string(),
            self.item.clone(),
            self.category.clone().unwrap_or_default(),
        ]
    }
}

/// Accept both schema variants: full timestamp or date-only cells.
fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
