use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// IANA timezone the date windows anchor to.
    pub timezone: String,
    /// Currency symbol prefixed to amounts in replies.
    pub currency: String,
    pub store: StoreSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    /// "memory", "csv" or "sheets".
    pub backend: String,
    /// CSV file path for backend = "csv" (default: ~/.kharcha/expenses.csv).
    pub csv_path: Option<String>,
    /// Spreadsheet id for backend = "sheets"; KHARCHA_SHEET_ID overrides.
    pub sheet_id: Option<String>,
    /// Tab name for backend = "sheets".
    pub range: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: "Asia/Kolkata".to_string(),
            currency: "₹".to_string(),
            store: StoreSection {
                backend: "csv".to_string(),
                csv_path: None,
                sheet_id: None,
                range: "Sheet1".to_string(),
            },
        }
    }
}

impl Config {
    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| anyhow!("invalid timezone: {}", self.timezone))
    }

    pub fn csv_path(&self) -> Result<PathBuf> {
        match &self.store.csv_path {
            Some(p) => Ok(PathBuf::from(p)),
            None => Ok(ensure_kharcha_home()?.join("expenses.csv")),
        }
    }

    pub fn sheet_id(&self) -> Result<String> {
        std::env::var("KHARCHA_SHEET_ID")
            .ok()
            .or_else(|| self.store.sheet_id.clone())
            .context("no spreadsheet id: set KHARCHA_SHEET_ID or store.sheet_id in config.toml")
    }
}

/// Bearer token for the Sheets API, supplied out-of-band.
pub fn sheets_token() -> Result<String> {
    std::env::var("KHARCHA_SHEETS_TOKEN").context("KHARCHA_SHEETS_TOKEN is not set")
}

pub fn kharcha_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".kharcha"))
}

pub fn ensure_kharcha_home() -> Result<PathBuf> {
    let dir = kharcha_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_kharcha_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(toml::from_str(&s).context("parse config.toml")?)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let cfg = Config::default();
    save_config(&cfg)?;
    println!("Wrote {}", p.display());
    Ok(())
}
