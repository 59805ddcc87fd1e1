//! Error types for the market-data boundary.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised when a price source cannot answer a lookup at all.
///
/// A date with no trading is not an error; sources report it as an
/// absent bar and pending orders simply wait for the next date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketDataError {
    /// The instrument is not known to the source.
    #[error("unknown instrument: {code}")]
    UnknownInstrument {
        /// The unrecognized instrument code.
        code: String,
    },

    /// The requested date predates the instrument's available history.
    #[error("date {date} predates available history for {code}")]
    BeforeHistory {
        /// The instrument code.
        code: String,
        /// The out-of-range date.
        date: NaiveDate,
    },
}
