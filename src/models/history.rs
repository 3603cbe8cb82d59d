use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_MILEAGE: i64 = 2_000_000;
pub const MAX_COST: i64 = 2_000_000;
pub const MAX_DESCRIPTION_CHARS: usize = 500;
pub const MAX_SERVICE_CHARS: usize = 100;

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").expect("valid regex"));

/// One manually entered service log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub date: String,
    pub mileage: i64,
    pub service: String,
    #[serde(default)]
    pub description: String,
    pub cost: i64,
}

/// Raw form submission from `POST /history/add`.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryForm {
    pub date: String,
    pub mileage: i64,
    pub service: String,
    #[serde(default)]
    pub description: String,
    pub cost: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("date must look like dd.mm.yyyy")]
    Date,
    #[error("mileage must be within 0..=2000000")]
    Mileage,
    #[error("cost must be within 0..=2000000")]
    Cost,
}

impl TryFrom<HistoryForm> for HistoryEntry {
    type Error = ValidationError;

    /// Range-checks numbers and the date; overlong text is truncated.
    fn try_from(form: HistoryForm) -> Result<Self, Self::Error> {
        if !DATE_RE.is_match(&form.date) {
            return Err(ValidationError::Date);
        }
        if !(0..=MAX_MILEAGE).contains(&form.mileage) {
            return Err(ValidationError::Mileage);
        }
        if !(0..=MAX_COST).contains(&form.cost) {
            return Err(ValidationError::Cost);
        }

        Ok(HistoryEntry {
            date: form.date,
            mileage: form.mileage,
            service: truncate_chars(form.service, MAX_SERVICE_CHARS),
            description: truncate_chars(form.description, MAX_DESCRIPTION_CHARS),
            cost: form.cost,
        })
    }
}

fn truncate_chars(mut s: String, max: usize) -> String {
    if let Some((idx, _)) = s.char_indices().nth(max) {
        s.truncate(idx);
    }
    s
}
