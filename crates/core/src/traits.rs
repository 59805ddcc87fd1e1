use crate::error::MarketDataError;
use crate::types::{PriceBar, StockCode};
use chrono::NaiveDate;

/// Supplies daily price bars to the simulation engine.
///
/// The boundary is synchronous and pull-based: implementations hand
/// back already-resolved local data. `Ok(None)` uniformly means "no
/// bar for that date"; a non-trading day, a gap in the data, and an
/// access-restricted response all look the same to the engine. An
/// `Err` is reserved for lookups the source cannot answer at all.
pub trait PriceSource {
    /// Returns the bar for `code` on `date`, or `None` when the date
    /// has no trading data.
    ///
    /// # Errors
    ///
    /// Returns [`MarketDataError`] for an unknown instrument or a date
    /// before the instrument's available history.
    fn price_bar(
        &self,
        code: &StockCode,
        date: NaiveDate,
    ) -> Result<Option<PriceBar>, MarketDataError>;
}
