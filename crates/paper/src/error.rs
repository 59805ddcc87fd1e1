//! Error types for order placement, cancellation, and valuation.
//!
//! Fill-time failures (insufficient cash, insufficient position) are
//! not errors: they transition the order to Rejected and the caller
//! reads the outcome from the order itself.

use crate::order::OrderStatus;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised immediately at placement or cancellation time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Order quantity was zero.
    #[error("order quantity must be positive")]
    InvalidQuantity,

    /// A limit order was placed without a limit price.
    #[error("limit order requires a limit price")]
    MissingLimitPrice,

    /// The supplied limit price was not positive.
    #[error("limit price must be positive, got {price}")]
    InvalidLimitPrice {
        /// The rejected price.
        price: Decimal,
    },

    /// A market order was placed with a limit price.
    #[error("market order does not take a limit price")]
    UnexpectedLimitPrice,

    /// No order with this id was ever placed.
    #[error("unknown order id: {id}")]
    UnknownOrder {
        /// The unrecognized order id.
        id: Uuid,
    },

    /// The order is already in a terminal state.
    #[error("order {id} is already {status:?} and cannot be cancelled")]
    AlreadyClosed {
        /// The order id.
        id: Uuid,
        /// The terminal status the order is in.
        status: OrderStatus,
    },
}

/// Errors raised when valuing a portfolio against supplied prices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// A held instrument has no entry in the supplied price map.
    #[error("no current price supplied for held instrument {code}")]
    MissingPrice {
        /// The instrument code without a price.
        code: String,
    },
}
