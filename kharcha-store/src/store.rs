//! The record-store boundary: append-only tabular storage with a header row.

use anyhow::Result;
use kharcha_core::RawRow;

/// An externally-owned tabular store. Rows are records, columns are fields,
/// row 1 is the header. Records are never updated or deleted.
///
/// Implementations are injected into the handlers so tests can run against
/// an in-memory fake instead of a live spreadsheet.
pub trait ExpenseStore {
    /// Append one ordered field list as a new row.
    fn append_row(&self, row: &[String]) -> Result<()>;

    /// Read every data row as a field-name -> value mapping, using row 1
    /// as the header.
    fn read_all_rows(&self) -> Result<Vec<RawRow>>;

    /// Insert the expected header at position 1 if row 1 is missing or
    /// mismatched.
    fn ensure_header(&self) -> Result<()>;
}

impl<T: ExpenseStore + ?Sized> ExpenseStore for Box<T> {
    fn append_row(&self, row: &[String]) -> Result<()> {
        (**self).append_row(row)
    }

    fn read_all_rows(&self) -> Result<Vec<RawRow>> {
        (**self).read_all_rows()
    }

    fn ensure_header(&self) -> Result<()> {
        (**self).ensure_header()
    }
}

/// Interpret the first row as the header and map every later row to
/// field-name -> value. Short rows pad missing cells with empty strings.
pub fn rows_to_maps(rows: Vec<Vec<String>>) -> Vec<RawRow> {
    let mut iter = rows.into_iter();
    let Some(header) = iter.next() else {
        return Vec::new();
    };
    iter.map(|row| {
        header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), row.get(i).cloned().unwrap_or_default()))
            .collect()
    })
    .collect()
}
