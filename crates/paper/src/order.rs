//! Order intent, fill state, and execution records.

use crate::error::OrderError;
use chrono::{DateTime, NaiveDate, Utc};
use jq_trade_core::StockCode;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

/// How the order prices itself against the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    /// Fill at the session's reference price, whatever it is.
    Market,
    /// Fill only when the bar touches the resting limit price.
    Limit,
}

/// Lifecycle state of an order.
///
/// `Filled`, `Cancelled`, and `Rejected` are terminal and never
/// transition further.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    PartiallyFilled,
    Filled,
    Cancelled,
    Rejected,
}

impl OrderStatus {
    /// Returns true for states that never transition further.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Filled | Self::Cancelled | Self::Rejected)
    }
}

/// Why the fill engine rejected an order.
///
/// Recorded on the order rather than raised: rejections are expected
/// strategy outcomes, not programmer errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// The buy's full cost exceeded available cash.
    InsufficientCash {
        required: Decimal,
        available: Decimal,
    },
    /// The sell asked for more shares than the position holds.
    InsufficientPosition { requested: u64, held: u64 },
}

/// A buy or sell instruction with its accumulated fill state.
///
/// Orders are created by [`Trader::buy`](crate::Trader::buy) and
/// [`Trader::sell`](crate::Trader::sell), mutated only by the fill
/// engine or explicit cancellation, and retained forever as history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    id: Uuid,
    code: StockCode,
    side: Side,
    kind: OrderKind,
    quantity: u64,
    limit_price: Option<Decimal>,
    status: OrderStatus,
    filled_quantity: u64,
    average_fill_price: Option<Decimal>,
    reject_reason: Option<RejectReason>,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Validates and creates a new pending order.
    ///
    /// No cash is reserved at placement; capital is committed at fill
    /// time only.
    pub(crate) fn new(
        code: StockCode,
        side: Side,
        kind: OrderKind,
        quantity: u64,
        limit_price: Option<Decimal>,
    ) -> Result<Self, OrderError> {
        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }
        match (kind, limit_price) {
            (OrderKind::Limit, None) => return Err(OrderError::MissingLimitPrice),
            (OrderKind::Limit, Some(price)) if price <= Decimal::ZERO => {
                return Err(OrderError::InvalidLimitPrice { price });
            }
            (OrderKind::Market, Some(_)) => return Err(OrderError::UnexpectedLimitPrice),
            _ => {}
        }

        Ok(Self {
            id: Uuid::new_v4(),
            code,
            side,
            kind,
            quantity,
            limit_price,
            status: OrderStatus::Pending,
            filled_quantity: 0,
            average_fill_price: None,
            reject_reason: None,
            created_at: Utc::now(),
        })
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn code(&self) -> &StockCode {
        &self.code
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    /// Requested quantity in shares.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Resting limit price; present iff the order kind is `Limit`.
    #[must_use]
    pub fn limit_price(&self) -> Option<Decimal> {
        self.limit_price
    }

    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Shares filled so far, `0 ..= quantity`.
    #[must_use]
    pub fn filled_quantity(&self) -> u64 {
        self.filled_quantity
    }

    /// Volume-weighted average fill price; defined once any quantity
    /// has filled.
    #[must_use]
    pub fn average_fill_price(&self) -> Option<Decimal> {
        self.average_fill_price
    }

    /// Why the fill engine rejected this order, if it did.
    #[must_use]
    pub fn reject_reason(&self) -> Option<RejectReason> {
        self.reject_reason
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True while the order can still fill or be cancelled.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    #[must_use]
    pub fn remaining_quantity(&self) -> u64 {
        self.quantity - self.filled_quantity
    }

    /// Accumulates a fill into quantity and VWAP, moving the status to
    /// `PartiallyFilled` or `Filled`.
    pub(crate) fn record_fill(&mut self, quantity: u64, price: Decimal) {
        let filled_value = self.average_fill_price.unwrap_or(Decimal::ZERO)
            * Decimal::from(self.filled_quantity)
            + price * Decimal::from(quantity);
        self.filled_quantity += quantity;
        self.average_fill_price = Some(filled_value / Decimal::from(self.filled_quantity));
        self.status = if self.filled_quantity == self.quantity {
            OrderStatus::Filled
        } else {
            OrderStatus::PartiallyFilled
        };
    }

    /// Moves the order to the terminal `Rejected` state.
    pub(crate) fn reject(&mut self, reason: RejectReason) {
        self.status = OrderStatus::Rejected;
        self.reject_reason = Some(reason);
    }

    /// Cancels the order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AlreadyClosed`] when the order is already
    /// in a terminal state.
    pub(crate) fn cancel(&mut self) -> Result<(), OrderError> {
        if self.status.is_terminal() {
            return Err(OrderError::AlreadyClosed {
                id: self.id,
                status: self.status,
            });
        }
        self.status = OrderStatus::Cancelled;
        Ok(())
    }
}

/// An immutable record of one fill against an order.
///
/// One order may produce several executions; their quantities always
/// sum to the order's filled quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    /// The originating order.
    pub order_id: Uuid,
    pub code: StockCode,
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
    pub date: NaiveDate,
}
