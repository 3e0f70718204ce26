//! Free-text input mode: one line of `"<amount> <description>"`.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// User-facing hint attached to rejection replies.
pub const USAGE_HINT: &str = "Usage: <amount> <description> (e.g. \"12.50 lunch\")";

/// Why a free-text line was rejected. Nothing is appended on rejection.
#[derive(Debug, Error, PartialEq)]
pub enum FreeTextError {
    #[error("expected an amount followed by a description")]
    Shape,
    #[error("'{0}' is not a valid amount")]
    BadAmount(String),
}

/// A successfully parsed free-text line.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeTextExpense {
    pub amount: f64,
    pub description: String,
}

/// Parse `"<amount> <description>"`. The first token must be an integer or a
/// decimal with a single decimal point; the remaining tokens join as the
/// description.
pub fn parse_free_text(line: &str) -> Result<FreeTextExpense, FreeTextError> {
    let mut tokens = line.split_whitespace();
    let first = tokens.next().ok_or(FreeTextError::Shape)?;
    let description = tokens.collect::<Vec<_>>().join(" ");
    if description.is_empty() {
        return Err(FreeTextError::Shape);
    }

    if !is_amount_token(first) {
        return Err(FreeTextError::BadAmount(first.to_string()));
    }
    let amount: f64 = first
        .parse()
        .map_err(|_| FreeTextError::BadAmount(first.to_string()))?;

    Ok(FreeTextExpense {
        amount,
        description,
    })
}

fn is_amount_token(s: &str) -> bool {
    static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();
    AMOUNT_RE
        .get_or_init(|| Regex::new(r"^\d+(\.\d+)?$").expect("amount pattern compiles"))
        .is_match(s)
}
