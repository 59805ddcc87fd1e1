use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Reference price used to fill MARKET orders against a daily bar.
///
/// Defaults to the session's opening price. This is a simulation
/// convention, not any broker's real execution behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketFillPrice {
    /// Fill at the bar's open.
    Open,
    /// Fill at the bar's close.
    Close,
}

impl Default for MarketFillPrice {
    fn default() -> Self {
        Self::Open
    }
}

/// Simulation parameters for a paper-trading session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Starting cash balance in yen.
    pub initial_cash: Decimal,
    /// Reference price for MARKET fills.
    #[serde(default)]
    pub market_fill: MarketFillPrice,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_cash: dec!(1_000_000),
            market_fill: MarketFillPrice::default(),
        }
    }
}
