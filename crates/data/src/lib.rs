//! Historical bar storage and trading-calendar helpers.
//!
//! This crate provides:
//! - `HistoricalPrices`, an in-memory `PriceSource` loadable from CSV
//! - `TradingCalendar`, the date-stepping helper for simulation loops

pub mod calendar;
pub mod historical;

pub use calendar::TradingCalendar;
pub use historical::HistoricalPrices;
