//! In-memory store fake for tests and offline use.

use anyhow::{anyhow, Result};
use kharcha_core::{RawRow, EXPECTED_HEADERS};
use std::sync::Mutex;

use crate::store::{rows_to_maps, ExpenseStore};

/// A `Vec`-backed store with the same header-row semantics as the sheet.
pub struct MemoryStore {
    rows: Mutex<Vec<Vec<String>>>,
}

impl MemoryStore {
    /// Empty store seeded with the expected header.
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(vec![expected_header()]),
        }
    }

    /// Store with preloaded raw rows (header included, or not, as the test
    /// requires).
    pub fn with_rows(rows: Vec<Vec<String>>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    /// Number of data rows, excluding any header.
    pub fn data_row_count(&self) -> usize {
        self.rows
            .lock()
            .map(|rows| rows.len().saturating_sub(1))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Vec<String>>>> {
        self.rows.lock().map_err(|_| anyhow!("store mutex poisoned"))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpenseStore for MemoryStore {
    fn append_row(&self, row: &[String]) -> Result<()> {
        self.lock()?.push(row.to_vec());
        Ok(())
    }

    fn read_all_rows(&self) -> Result<Vec<RawRow>> {
        Ok(rows_to_maps(self.lock()?.clone()))
    }

    fn ensure_header(&self) -> Result<()> {
        let mut rows = self.lock()?;
        if rows.first().map(|r| r.as_slice()) != Some(expected_header().as_slice()) {
            rows.insert(0, expected_header());
        }
        Ok(())
    }
}

fn expected_header() -> Vec<String> {
    EXPECTED_HEADERS.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_then_read() {
        let store = MemoryStore::new();
        store
            .append_row(&[
                "2024-03-01".to_string(),
                "100".to_string(),
                "coffee".to_string(),
                "food".to_string(),
            ])
            .unwrap();

        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Amount"], "100");
        assert_eq!(store.data_row_count(), 1);
    }

    #[test]
    fn test_ensure_header_repairs_headerless_store() {
        let store = MemoryStore::with_rows(vec![vec![
            "2024-03-01".to_string(),
            "100".to_string(),
            "coffee".to_string(),
            "food".to_string(),
        ]]);

        store.ensure_header().unwrap();
        let rows = store.read_all_rows().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Item"], "coffee");
    }

    #[test]
    fn test_ensure_header_is_idempotent() {
        let store = MemoryStore::new();
        store.ensure_header().unwrap();
        store.ensure_header().unwrap();
        assert_eq!(store.data_row_count(), 0);
    }
}
