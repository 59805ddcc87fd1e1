//! Order placement and the date-stepped fill simulation.

use crate::error::OrderError;
use crate::order::{Execution, Order, OrderKind, RejectReason, Side};
use crate::portfolio::{Portfolio, Position};
use chrono::NaiveDate;
use jq_trade_core::{MarketDataError, MarketFillPrice, PriceBar, PriceSource, SimConfig, StockCode};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Orchestrates one paper-trading session against a price source.
///
/// The trader owns its portfolio and order history exclusively; one
/// simulation timeline per instance, serialized by the caller. State
/// lives in memory for the session only.
pub struct Trader<P: PriceSource> {
    source: P,
    portfolio: Portfolio,
    orders: Vec<Order>,
    last_simulated: Option<NaiveDate>,
    market_fill: MarketFillPrice,
}

impl<P: PriceSource> Trader<P> {
    /// Creates a trader with the default fill policy.
    pub fn new(source: P, initial_cash: Decimal) -> Self {
        Self {
            source,
            portfolio: Portfolio::new(initial_cash),
            orders: Vec::new(),
            last_simulated: None,
            market_fill: MarketFillPrice::default(),
        }
    }

    /// Creates a trader from a [`SimConfig`].
    pub fn with_config(source: P, config: &SimConfig) -> Self {
        Self {
            source,
            portfolio: Portfolio::new(config.initial_cash),
            orders: Vec::new(),
            last_simulated: None,
            market_fill: config.market_fill,
        }
    }

    /// Places a buy order. No cash is reserved until fill time.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] for a zero quantity or an inconsistent
    /// kind/limit-price combination; no order is created.
    pub fn buy(
        &mut self,
        code: StockCode,
        quantity: u64,
        kind: OrderKind,
        limit_price: Option<Decimal>,
    ) -> Result<&Order, OrderError> {
        self.place(code, Side::Buy, kind, quantity, limit_price)
    }

    /// Places a sell order. Holdings are only checked at fill time.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] for a zero quantity or an inconsistent
    /// kind/limit-price combination; no order is created.
    pub fn sell(
        &mut self,
        code: StockCode,
        quantity: u64,
        kind: OrderKind,
        limit_price: Option<Decimal>,
    ) -> Result<&Order, OrderError> {
        self.place(code, Side::Sell, kind, quantity, limit_price)
    }

    fn place(
        &mut self,
        code: StockCode,
        side: Side,
        kind: OrderKind,
        quantity: u64,
        limit_price: Option<Decimal>,
    ) -> Result<&Order, OrderError> {
        let order = Order::new(code, side, kind, quantity, limit_price)?;
        tracing::debug!(
            "placed {} {:?} order {} for {} x {}",
            order.side().as_str(),
            order.kind(),
            order.id(),
            order.code(),
            order.quantity()
        );
        self.orders.push(order);
        Ok(&self.orders[self.orders.len() - 1])
    }

    /// Cancels an open order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::UnknownOrder`] for an id that was never
    /// placed, or [`OrderError::AlreadyClosed`] when the order is in a
    /// terminal state.
    pub fn cancel(&mut self, id: Uuid) -> Result<(), OrderError> {
        let order = self
            .orders
            .iter_mut()
            .find(|order| order.id() == id)
            .ok_or(OrderError::UnknownOrder { id })?;
        order.cancel()?;
        tracing::debug!("cancelled order {}", id);
        Ok(())
    }

    /// Processes every open order once against `date`'s bars and
    /// returns the executions produced.
    ///
    /// Orders are visited in placement order. An order whose bar is
    /// absent stays pending and is retried on the next date. A date
    /// equal to the last simulated one short-circuits to an empty
    /// list, so settled dates are never re-applied.
    ///
    /// # Errors
    ///
    /// Forwards [`MarketDataError`] from the price source (unknown
    /// instrument, date before history). Rejections never raise; the
    /// order carries its [`RejectReason`].
    pub fn simulate_fills(&mut self, date: NaiveDate) -> Result<Vec<Execution>, MarketDataError> {
        if self.last_simulated == Some(date) {
            tracing::debug!("{} already settled, nothing to do", date);
            return Ok(Vec::new());
        }

        let mut executions = Vec::new();
        for order in &mut self.orders {
            if !order.is_open() {
                continue;
            }

            let Some(bar) = self.source.price_bar(order.code(), date)? else {
                tracing::debug!("no bar for {} on {}, order {} waits", order.code(), date, order.id());
                continue;
            };

            let Some(fill_price) = candidate_fill_price(order, &bar, self.market_fill) else {
                tracing::debug!(
                    "limit {:?} not touched for order {} (low {}, high {})",
                    order.limit_price(),
                    order.id(),
                    bar.low,
                    bar.high
                );
                continue;
            };

            let quantity = order.remaining_quantity();
            match order.side() {
                Side::Buy => {
                    let required = fill_price * Decimal::from(quantity);
                    let available = self.portfolio.cash();
                    if required > available {
                        tracing::warn!(
                            "rejecting buy {}: needs {} but only {} cash",
                            order.id(),
                            required,
                            available
                        );
                        order.reject(RejectReason::InsufficientCash {
                            required,
                            available,
                        });
                        continue;
                    }
                }
                Side::Sell => {
                    let held = self
                        .portfolio
                        .position(order.code())
                        .map_or(0, Position::quantity);
                    if held < quantity {
                        tracing::warn!(
                            "rejecting sell {}: asks {} but holds {}",
                            order.id(),
                            quantity,
                            held
                        );
                        order.reject(RejectReason::InsufficientPosition {
                            requested: quantity,
                            held,
                        });
                        continue;
                    }
                }
            }

            order.record_fill(quantity, fill_price);
            match order.side() {
                Side::Buy => self.portfolio.apply_buy(order.code().clone(), quantity, fill_price),
                Side::Sell => self.portfolio.apply_sell(order.code(), quantity, fill_price),
            }

            let execution = Execution {
                order_id: order.id(),
                code: order.code().clone(),
                side: order.side(),
                quantity,
                price: fill_price,
                date,
            };
            tracing::info!(
                "filled {} {} x {} @ {} on {}",
                execution.side.as_str(),
                execution.code,
                execution.quantity,
                execution.price,
                date
            );
            executions.push(execution);
        }

        self.last_simulated = Some(date);
        Ok(executions)
    }

    /// Current cash balance.
    #[must_use]
    pub fn cash(&self) -> Decimal {
        self.portfolio.cash()
    }

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// Open position for an instrument, if any.
    #[must_use]
    pub fn position(&self, code: &StockCode) -> Option<&Position> {
        self.portfolio.position(code)
    }

    /// Every order ever placed, in placement order.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn order(&self, id: Uuid) -> Option<&Order> {
        self.orders.iter().find(|order| order.id() == id)
    }

    /// The most recently settled date, if any.
    #[must_use]
    pub fn last_simulated(&self) -> Option<NaiveDate> {
        self.last_simulated
    }
}

/// The price an order would fill at against `bar`, or `None` when the
/// order does not match.
///
/// Market orders take the configured reference price. Limit orders
/// fill strictly at the resting limit price once the bar touches it,
/// never at a better price.
fn candidate_fill_price(order: &Order, bar: &PriceBar, market_fill: MarketFillPrice) -> Option<Decimal> {
    match order.kind() {
        OrderKind::Market => Some(match market_fill {
            MarketFillPrice::Open => bar.open,
            MarketFillPrice::Close => bar.close,
        }),
        OrderKind::Limit => {
            let limit = order.limit_price()?;
            match order.side() {
                Side::Buy if bar.low <= limit => Some(limit),
                Side::Sell if bar.high >= limit => Some(limit),
                _ => None,
            }
        }
    }
}
