use anyhow::{Context, Result};
use chrono::NaiveDate;
use jq_trade_core::{MarketDataError, PriceBar, PriceSource, StockCode};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// In-memory store of daily bars keyed by instrument and date.
///
/// Lookups distinguish three outcomes: an unknown instrument and a date
/// before the instrument's first bar are errors, while a gap inside the
/// history (holiday, halt) is simply an absent bar.
#[derive(Debug, Default)]
pub struct HistoricalPrices {
    bars: HashMap<StockCode, BTreeMap<NaiveDate, PriceBar>>,
}

impl HistoricalPrices {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a bar for an instrument, replacing any bar already stored
    /// for the same date.
    pub fn insert(&mut self, code: StockCode, bar: PriceBar) {
        self.bars.entry(code).or_default().insert(bar.date, bar);
    }

    /// Loads bar history from a CSV file.
    ///
    /// Expected format, with header: `date,code,open,high,low,close,volume`.
    /// Rows may appear in any order; the store keeps each instrument's
    /// history sorted by date.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a row has an
    /// invalid format, or a field fails to parse.
    pub fn from_csv(path: &str) -> Result<Self> {
        let mut reader =
            csv::Reader::from_path(path).with_context(|| format!("failed to open CSV: {path}"))?;
        let mut store = Self::new();
        let mut rows = 0usize;

        for result in reader.records() {
            let record = result?;
            let date: NaiveDate = record[0]
                .parse()
                .with_context(|| format!("invalid date: {}", &record[0]))?;
            let code = StockCode::new(&record[1])?;
            let open = Decimal::from_str(&record[2])?;
            let high = Decimal::from_str(&record[3])?;
            let low = Decimal::from_str(&record[4])?;
            let close = Decimal::from_str(&record[5])?;
            let volume: u64 = record[6]
                .parse()
                .with_context(|| format!("invalid volume: {}", &record[6]))?;

            store.insert(code, PriceBar::new(date, open, high, low, close, volume));
            rows += 1;
        }

        tracing::debug!("loaded {} bars from {}", rows, path);
        Ok(store)
    }

    /// Instruments with at least one stored bar.
    pub fn codes(&self) -> impl Iterator<Item = &StockCode> {
        self.bars.keys()
    }

    /// Full date-ordered history for one instrument.
    #[must_use]
    pub fn history(&self, code: &StockCode) -> Option<&BTreeMap<NaiveDate, PriceBar>> {
        self.bars.get(code)
    }
}

impl PriceSource for HistoricalPrices {
    fn price_bar(
        &self,
        code: &StockCode,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError> {
        let history = self
            .bars
            .get(code)
            .ok_or_else(|| MarketDataError::UnknownInstrument {
                code: code.to_string(),
            })?;

        match history.keys().next() {
            Some(first) if date < *first => Err(MarketDataError::BeforeHistory {
                code: code.to_string(),
                date,
            }),
            _ => Ok(history.get(&date).cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn bar(d: u32, close: Decimal) -> PriceBar {
        PriceBar::new(day(d), close, close, close, close, 10_000)
    }

    fn toyota() -> StockCode {
        StockCode::new("7203").unwrap()
    }

    #[test]
    fn insert_then_lookup_returns_bar() {
        let mut store = HistoricalPrices::new();
        store.insert(toyota(), bar(3, dec!(2500)));

        let found = store.price_bar(&toyota(), day(3)).unwrap().unwrap();
        assert_eq!(found.close, dec!(2500));
    }

    #[test]
    fn unknown_instrument_is_an_error() {
        let store = HistoricalPrices::new();
        let err = store.price_bar(&toyota(), day(3)).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::UnknownInstrument {
                code: "7203".to_string()
            }
        );
    }

    #[test]
    fn date_before_first_bar_is_an_error() {
        let mut store = HistoricalPrices::new();
        store.insert(toyota(), bar(3, dec!(2500)));

        let err = store.price_bar(&toyota(), day(1)).unwrap_err();
        assert_eq!(
            err,
            MarketDataError::BeforeHistory {
                code: "7203".to_string(),
                date: day(1),
            }
        );
    }

    #[test]
    fn gap_inside_history_is_absent_not_error() {
        let mut store = HistoricalPrices::new();
        store.insert(toyota(), bar(3, dec!(2500)));
        store.insert(toyota(), bar(5, dec!(2520)));

        assert_eq!(store.price_bar(&toyota(), day(4)).unwrap(), None);
    }

    #[test]
    fn from_csv_loads_sorted_history() {
        let dir = std::env::temp_dir().join("jq-trade-data-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bars.csv");
        std::fs::write(
            &path,
            "date,code,open,high,low,close,volume\n\
             2024-06-04,7203,2510,2540,2500,2520,900000\n\
             2024-06-03,7203,2500,2550,2480,2530,1200000\n\
             2024-06-03,9984,9000,9100,8900,9050,400000\n",
        )
        .unwrap();

        let store = HistoricalPrices::from_csv(path.to_str().unwrap()).unwrap();
        assert_eq!(store.codes().count(), 2);

        let history = store.history(&toyota()).unwrap();
        let dates: Vec<_> = history.keys().copied().collect();
        assert_eq!(dates, vec![day(3), day(4)]);
        assert_eq!(history[&day(3)].open, dec!(2500));
        assert_eq!(history[&day(3)].volume, 1_200_000);
    }
}
