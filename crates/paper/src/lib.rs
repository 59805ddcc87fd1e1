//! Paper-trading simulation engine.
//!
//! Orders, executions, positions, and portfolio accounting driven by
//! historical price bars. The engine holds no network, cache, or auth
//! state: bars arrive through the `PriceSource` trait and the caller
//! advances simulated time one date at a time.
//!
//! # Example
//!
//! ```rust,no_run
//! use jq_trade_core::StockCode;
//! use jq_trade_data::HistoricalPrices;
//! use jq_trade_paper::{OrderKind, Trader};
//! use rust_decimal_macros::dec;
//!
//! # fn main() -> anyhow::Result<()> {
//! let prices = HistoricalPrices::from_csv("bars.csv")?;
//! let mut trader = Trader::new(prices, dec!(1_000_000));
//!
//! let toyota = StockCode::new("7203")?;
//! trader.buy(toyota, 100, OrderKind::Market, None)?;
//! let fills = trader.simulate_fills("2024-06-03".parse()?)?;
//! println!("filled: {fills:?}, cash: {}", trader.cash());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod order;
pub mod portfolio;
pub mod trader;

pub use error::{OrderError, ValuationError};
pub use order::{Execution, Order, OrderKind, OrderStatus, RejectReason, Side};
pub use portfolio::{Portfolio, Position};
pub use trader::Trader;
