use crate::historical::HistoricalPrices;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::ops::Bound::{Excluded, Unbounded};

/// An ordered set of known trading days.
///
/// Drives date-stepped simulation loops: callers iterate
/// `trading_days` over a range, or walk with `next_trading_day`.
#[derive(Debug, Clone, Default)]
pub struct TradingCalendar {
    days: BTreeSet<NaiveDate>,
}

impl TradingCalendar {
    /// Builds a calendar from an explicit set of trading days.
    #[must_use]
    pub fn from_days(days: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            days: days.into_iter().collect(),
        }
    }

    /// Builds a calendar from every date that has a bar in the store,
    /// across all instruments.
    #[must_use]
    pub fn from_history(prices: &HistoricalPrices) -> Self {
        let days = prices
            .codes()
            .filter_map(|code| prices.history(code))
            .flat_map(|history| history.keys().copied())
            .collect();
        Self { days }
    }

    #[must_use]
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        self.days.contains(&date)
    }

    /// Trading days in `[start, end]`, ascending.
    #[must_use]
    pub fn trading_days(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.days.range(start..=end).copied().collect()
    }

    /// The first trading day strictly after `date`.
    #[must_use]
    pub fn next_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.days.range((Excluded(date), Unbounded)).next().copied()
    }

    /// The last trading day strictly before `date`.
    #[must_use]
    pub fn prev_trading_day(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.days.range(..date).next_back().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jq_trade_core::{PriceBar, StockCode};
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    fn sample_calendar() -> TradingCalendar {
        // Mon 23, Tue 24, Thu 26: the 25th is a holiday.
        TradingCalendar::from_days([day(23), day(24), day(26)])
    }

    #[test]
    fn holiday_is_not_a_trading_day() {
        let calendar = sample_calendar();
        assert!(calendar.is_trading_day(day(24)));
        assert!(!calendar.is_trading_day(day(25)));
    }

    #[test]
    fn trading_days_is_inclusive_and_ascending() {
        let calendar = sample_calendar();
        assert_eq!(
            calendar.trading_days(day(23), day(26)),
            vec![day(23), day(24), day(26)]
        );
        assert_eq!(calendar.trading_days(day(25), day(25)), Vec::new());
    }

    #[test]
    fn next_trading_day_skips_holidays() {
        let calendar = sample_calendar();
        assert_eq!(calendar.next_trading_day(day(24)), Some(day(26)));
        assert_eq!(calendar.next_trading_day(day(26)), None);
    }

    #[test]
    fn prev_trading_day_skips_holidays() {
        let calendar = sample_calendar();
        assert_eq!(calendar.prev_trading_day(day(26)), Some(day(24)));
        assert_eq!(calendar.prev_trading_day(day(23)), None);
    }

    #[test]
    fn from_history_unions_bar_dates() {
        let mut store = HistoricalPrices::new();
        let close = dec!(100);
        store.insert(
            StockCode::new("7203").unwrap(),
            PriceBar::new(day(23), close, close, close, close, 100),
        );
        store.insert(
            StockCode::new("9984").unwrap(),
            PriceBar::new(day(24), close, close, close, close, 100),
        );

        let calendar = TradingCalendar::from_history(&store);
        assert_eq!(calendar.trading_days(day(1), day(31)), vec![day(23), day(24)]);
    }
}
