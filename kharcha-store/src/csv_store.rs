//! Local CSV file adapter, for running without a spreadsheet backend.

use anyhow::{Context, Result};
use kharcha_core::{RawRow, EXPECTED_HEADERS};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::store::ExpenseStore;

/// Stores rows in a CSV file whose first line is the header.
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(String::from).collect());
        }
        Ok(rows)
    }

    fn write_all(&self, rows: &[Vec<String>]) -> Result<()> {
        let mut w = csv::Writer::from_path(&self.path)
            .with_context(|| format!("writing {}", self.path.display()))?;
        for row in rows {
            w.write_record(row)?;
        }
        w.flush()?;
        Ok(())
    }
}

impl ExpenseStore for CsvStore {
    fn append_row(&self, row: &[String]) -> Result<()> {
        if !self.path.exists() {
            self.ensure_header()?;
        }
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;
        let mut w = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        w.write_record(row)?;
        w.flush()?;
        Ok(())
    }

    fn read_all_rows(&self) -> Result<Vec<RawRow>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .with_context(|| format!("opening {}", self.path.display()))?;

        let headers = rdr.headers()?.clone();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let mut row = RawRow::new();
            for (i, name) in headers.iter().enumerate() {
                row.insert(name.to_string(), record.get(i).unwrap_or("").to_string());
            }
            rows.push(row);
        }
        Ok(rows)
    }

    fn ensure_header(&self) -> Result<()> {
        let header = expected_header();
        if !self.path.exists() {
            return self.write_all(&[header]);
        }

        let rows = self.read_raw()?;
        if rows.first().map(|r| r.as_slice()) == Some(header.as_slice()) {
            return Ok(());
        }

        let mut repaired = Vec::with_capacity(rows.len() + 1);
        repaired.push(header);
        repaired.extend(rows);
        self.write_all(&repaired)
    }
}

fn expected_header() -> Vec<String> {
    EXPECTED_HEADERS.iter().map(|s| s.to_string()).collect()
}
