//! Positions and portfolio accounting.

use crate::error::ValuationError;
use jq_trade_core::StockCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A per-instrument holding derived from the sequence of fills.
///
/// The average cost basis is the quantity-weighted mean of all buy
/// fills not yet offset by a sell. Sells never move the average cost;
/// they realize P&L and reduce quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    code: StockCode,
    quantity: u64,
    average_cost: Decimal,
    realized_pnl: Decimal,
}

impl Position {
    pub(crate) fn open(code: StockCode, quantity: u64, price: Decimal) -> Self {
        Self {
            code,
            quantity,
            average_cost: price,
            realized_pnl: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn code(&self) -> &StockCode {
        &self.code
    }

    /// Shares held; always positive while the position exists.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Quantity-weighted average purchase price.
    #[must_use]
    pub fn average_cost(&self) -> Decimal {
        self.average_cost
    }

    /// P&L locked in by sells against this position.
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// Value of the holding at `price`.
    #[must_use]
    pub fn market_value(&self, price: Decimal) -> Decimal {
        price * Decimal::from(self.quantity)
    }

    /// P&L implied by `price` on the open quantity.
    #[must_use]
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        (price - self.average_cost) * Decimal::from(self.quantity)
    }

    /// Folds a buy fill into the weighted average cost.
    pub(crate) fn apply_buy(&mut self, quantity: u64, price: Decimal) {
        let old_value = self.average_cost * Decimal::from(self.quantity);
        let new_value = price * Decimal::from(quantity);
        self.quantity += quantity;
        self.average_cost = (old_value + new_value) / Decimal::from(self.quantity);
    }

    /// Applies a sell fill and returns the realized P&L delta.
    ///
    /// The caller has already verified `quantity <= self.quantity`.
    pub(crate) fn apply_sell(&mut self, quantity: u64, price: Decimal) -> Decimal {
        let realized = (price - self.average_cost) * Decimal::from(quantity);
        self.quantity -= quantity;
        self.realized_pnl += realized;
        realized
    }
}

/// Cash plus the set of open positions.
///
/// Every cash movement is explained by a fill: buys debit
/// `quantity × price`, sells credit it. Realized P&L from positions
/// that have closed out is retained here so it survives the pruning
/// of the zero-quantity position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Portfolio {
    cash: Decimal,
    positions: HashMap<StockCode, Position>,
    realized_closed: Decimal,
}

impl Portfolio {
    #[must_use]
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            cash: initial_cash,
            positions: HashMap::new(),
            realized_closed: Decimal::ZERO,
        }
    }

    #[must_use]
    pub fn cash(&self) -> Decimal {
        self.cash
    }

    #[must_use]
    pub fn positions(&self) -> &HashMap<StockCode, Position> {
        &self.positions
    }

    #[must_use]
    pub fn position(&self, code: &StockCode) -> Option<&Position> {
        self.positions.get(code)
    }

    /// Total realized P&L, open positions plus closed-out history.
    #[must_use]
    pub fn realized_pnl(&self) -> Decimal {
        self.realized_closed
            + self
                .positions
                .values()
                .map(Position::realized_pnl)
                .sum::<Decimal>()
    }

    /// Debits cash and folds the fill into the instrument's position,
    /// creating it on the first buy.
    pub(crate) fn apply_buy(&mut self, code: StockCode, quantity: u64, price: Decimal) {
        self.cash -= price * Decimal::from(quantity);
        match self.positions.entry(code) {
            Entry::Occupied(mut entry) => entry.get_mut().apply_buy(quantity, price),
            Entry::Vacant(entry) => {
                let code = entry.key().clone();
                entry.insert(Position::open(code, quantity, price));
            }
        }
    }

    /// Credits cash, realizes P&L, and prunes the position when its
    /// quantity returns to zero.
    ///
    /// The caller has already verified the position exists and holds
    /// at least `quantity` shares.
    pub(crate) fn apply_sell(&mut self, code: &StockCode, quantity: u64, price: Decimal) {
        self.cash += price * Decimal::from(quantity);
        if let Some(position) = self.positions.get_mut(code) {
            position.apply_sell(quantity, price);
            if position.quantity() == 0 {
                self.realized_closed += position.realized_pnl();
                self.positions.remove(code);
            }
        }
    }

    /// Cash plus the market value of all open positions at the
    /// supplied prices.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingPrice`] when a held instrument
    /// has no entry in `prices`.
    pub fn total_value(
        &self,
        prices: &HashMap<StockCode, Decimal>,
    ) -> Result<Decimal, ValuationError> {
        let mut total = self.cash;
        for (code, position) in &self.positions {
            let price = Self::price_for(prices, code)?;
            total += position.market_value(price);
        }
        Ok(total)
    }

    /// Sum of `(price − average cost) × quantity` over open positions.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingPrice`] when a held instrument
    /// has no entry in `prices`.
    pub fn unrealized_pnl(
        &self,
        prices: &HashMap<StockCode, Decimal>,
    ) -> Result<Decimal, ValuationError> {
        let mut total = Decimal::ZERO;
        for (code, position) in &self.positions {
            let price = Self::price_for(prices, code)?;
            total += position.unrealized_pnl(price);
        }
        Ok(total)
    }

    /// Each position's share of total portfolio value.
    ///
    /// An empty portfolio yields an empty map, never an error.
    ///
    /// # Errors
    ///
    /// Returns [`ValuationError::MissingPrice`] when a held instrument
    /// has no entry in `prices`.
    pub fn weights(
        &self,
        prices: &HashMap<StockCode, Decimal>,
    ) -> Result<HashMap<StockCode, Decimal>, ValuationError> {
        let total = self.total_value(prices)?;
        if self.positions.is_empty() || total.is_zero() {
            return Ok(HashMap::new());
        }

        let mut weights = HashMap::with_capacity(self.positions.len());
        for (code, position) in &self.positions {
            let price = Self::price_for(prices, code)?;
            weights.insert(code.clone(), position.market_value(price) / total);
        }
        Ok(weights)
    }

    fn price_for(
        prices: &HashMap<StockCode, Decimal>,
        code: &StockCode,
    ) -> Result<Decimal, ValuationError> {
        prices
            .get(code)
            .copied()
            .ok_or_else(|| ValuationError::MissingPrice {
                code: code.to_string(),
            })
    }
}
