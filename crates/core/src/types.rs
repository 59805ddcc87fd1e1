use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A rejected instrument code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid stock code: {code:?}")]
pub struct InvalidStockCode {
    /// The input that failed validation.
    pub code: String,
}

/// A J-Quants instrument code, e.g. `"7203"` or `"130A"`.
///
/// Codes are 4 or 5 ASCII alphanumeric characters. Newer local codes
/// carry a letter suffix and are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StockCode(String);

impl StockCode {
    /// Validates and wraps an instrument code.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStockCode`] when the input is not 4 or 5 ASCII
    /// alphanumeric characters.
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidStockCode> {
        let code = code.into();
        let valid = matches!(code.len(), 4 | 5) && code.chars().all(|c| c.is_ascii_alphanumeric());
        if valid {
            Ok(Self(code))
        } else {
            Err(InvalidStockCode { code })
        }
    }

    /// Returns the bare code string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StockCode {
    type Err = InvalidStockCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// One day's aggregated OHLCV for an instrument.
///
/// Prices are yen as decimals. The adjustment factor accounts for
/// splits and reverse splits; the `adjusted_*` accessors apply it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: u64,
    /// Total traded value for the day, when the source reports it.
    pub turnover_value: Option<Decimal>,
    /// Cumulative split adjustment factor, 1 when no action applies.
    pub adjustment_factor: Decimal,
}

impl PriceBar {
    /// Creates a bar with no turnover data and a neutral adjustment factor.
    #[must_use]
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            turnover_value: None,
            adjustment_factor: Decimal::ONE,
        }
    }

    #[must_use]
    pub fn adjusted_open(&self) -> Decimal {
        self.open * self.adjustment_factor
    }

    #[must_use]
    pub fn adjusted_high(&self) -> Decimal {
        self.high * self.adjustment_factor
    }

    #[must_use]
    pub fn adjusted_low(&self) -> Decimal {
        self.low * self.adjustment_factor
    }

    #[must_use]
    pub fn adjusted_close(&self) -> Decimal {
        self.close * self.adjustment_factor
    }

    /// Volume restated in adjusted shares. Falls back to the raw volume
    /// when the factor does not divide cleanly into an integer count.
    #[must_use]
    pub fn adjusted_volume(&self) -> u64 {
        if self.adjustment_factor == Decimal::ONE {
            return self.volume;
        }
        (Decimal::from(self.volume) / self.adjustment_factor)
            .trunc()
            .to_u64()
            .unwrap_or(self.volume)
    }
}
