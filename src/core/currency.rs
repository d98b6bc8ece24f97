//! Currency records and the source abstraction they are fetched through

use crate::core::config::BaseCurrencyConfig;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Ratio of the home currency against itself.
pub const BASE_RATIO: &str = "1.0";

/// One entry of the rates feed. `ratio` is the amount of this currency per
/// unit of the home currency, kept as text until it is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyRecord {
    pub name: String,
    #[serde(rename = "charCode")]
    pub char_code: String,
    pub ratio: String,
}

impl CurrencyRecord {
    pub fn new(name: &str, char_code: &str, ratio: &str) -> Self {
        Self {
            name: name.to_string(),
            char_code: char_code.to_string(),
            ratio: ratio.to_string(),
        }
    }

    /// Synthetic record for the home currency.
    pub fn base(config: &BaseCurrencyConfig) -> Self {
        Self::new(&config.name, &config.char_code, BASE_RATIO)
    }

    /// Parses `ratio` into a finite, positive float.
    pub fn ratio_value(&self) -> Result<f64> {
        let value: f64 = self
            .ratio
            .trim()
            .parse()
            .with_context(|| format!("Invalid ratio '{}' for {}", self.ratio, self.char_code))?;
        if !value.is_finite() {
            bail!("Invalid ratio '{}' for {}", self.ratio, self.char_code);
        }
        if value <= 0.0 {
            bail!("Ratio for {} must be positive, got '{}'", self.char_code, self.ratio);
        }
        Ok(value)
    }

    /// Label shown on buttons and list items.
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.char_code)
    }
}

impl Display for CurrencyRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// Returns a new list with the home currency at index 0.
pub fn with_base_currency(
    base: &BaseCurrencyConfig,
    records: Vec<CurrencyRecord>,
) -> Vec<CurrencyRecord> {
    let mut list = Vec::with_capacity(records.len() + 1);
    list.push(CurrencyRecord::base(base));
    list.extend(records);
    list
}

/// Finds a record by its char code, ignoring case.
pub fn find_by_code<'a>(records: &'a [CurrencyRecord], code: &str) -> Option<&'a CurrencyRecord> {
    records
        .iter()
        .find(|record| record.char_code.eq_ignore_ascii_case(code))
}

#[async_trait]
pub trait CurrencySource: Send + Sync {
    /// Fetches the full list of currency records, without the home currency.
    async fn fetch_currencies(&self) -> Result<Vec<CurrencyRecord>>;
}
