//! Error types for Cartwright.
//!
//! Failures fall into two kinds, and callers are expected to branch on them:
//!
//! - **`InvariantViolation`**: the operation would leave an aggregate or value
//!   object in an inconsistent state (currency mixing, arithmetic overflow,
//!   a stored total that does not match the items).
//! - **`IllegalState`**: the aggregate is in a status that does not permit the
//!   operation (modifying an ordered cart, shipping an unpaid order).
//!
//! Both kinds convert into the top-level [`DomainError`] via `From`, so
//! mutators that can fail either way return [`DomainResult`]. Errors are
//! raised synchronously and the aggregate is left untouched; there is no
//! retry or recovery machinery in this layer.

use crate::cart::CartStatus;
use crate::money::{CurrencyCode, CurrencyCodeError, Money};
use crate::order::OrderStatus;
use crate::types::{PaymentIntentId, PaymentIntentIdError, ProductId, Quantity};
use thiserror::Error;

/// An operation would violate a structural invariant.
///
/// These errors surface both from value-object arithmetic (`Money`,
/// `Quantity`) and from aggregate rehydration, where a snapshot that fails
/// re-validation is rejected rather than materialized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// A raw currency code failed validation.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// A raw payment intent id failed validation.
    #[error("Invalid payment intent id: {0}")]
    InvalidPaymentIntent(String),

    /// A quantity was zero or exceeded the per-line maximum.
    #[error("Quantity must be between 1 and {} (was {value})", Quantity::MAX)]
    QuantityOutOfRange {
        /// The rejected raw value
        value: u32,
    },

    /// A monetary multiplication used a factor of zero.
    #[error("Multiplication factor must be positive")]
    ZeroFactor,

    /// A monetary amount overflowed the representable range.
    #[error("Monetary amount overflowed")]
    AmountOverflow,

    /// Two monetary values in different currencies were combined.
    #[error("Currency mismatch: expected {expected}, got {actual}")]
    CurrencyMismatch {
        /// The currency the aggregate or left operand carries
        expected: CurrencyCode,
        /// The currency that was offered
        actual: CurrencyCode,
    },

    /// A collection of line items spans more than one currency.
    #[error("Line items mix multiple currencies")]
    MixedCurrencies,

    /// A stored total does not match the total derived from the items.
    #[error("Stored total {actual} does not match the derived total {expected}")]
    TotalMismatch {
        /// The total derived from the line items
        expected: Money,
        /// The total the snapshot claims
        actual: Money,
    },

    /// A snapshot records a cart currency although the cart has no items.
    #[error("A currency is recorded for a cart with no items")]
    CurrencyOnEmptyCart,

    /// A snapshot records items but no cart currency.
    #[error("No currency is recorded for a cart with items")]
    MissingCartCurrency,

    /// A snapshot claims a paid order with no items.
    #[error("A paid order must have at least one item")]
    PaidOrderEmpty,

    /// A snapshot claims a paid order without a payment intent.
    #[error("A paid order must record its settling payment intent")]
    PaidOrderWithoutIntent,
}

/// The aggregate's current status does not permit the operation.
///
/// Status guards run before any state is touched, so a rejected operation
/// leaves the aggregate exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalState {
    /// The cart has left the `Active` status and is immutable.
    #[error("Cart is {status} and cannot be modified")]
    CartNotActive {
        /// The cart's current status
        status: CartStatus,
    },

    /// The operation requires at least one line item in the cart.
    #[error("Cart has no items")]
    EmptyCart,

    /// The cart has a staged payment intent and refuses destructive changes.
    #[error("A checkout is in progress")]
    CheckoutInProgress,

    /// The operation requires a staged payment intent and none exists.
    #[error("No payment intent has been staged")]
    CheckoutNotStarted,

    /// Order creation from a cart requires the cart to be `Ordered`.
    #[error("Cart is {status}, not Ordered")]
    CartNotOrdered {
        /// The cart's current status
        status: CartStatus,
    },

    /// The order has left the `Pending` status and its contents are frozen.
    #[error("Order is {status} and can no longer be modified")]
    OrderNotPending {
        /// The order's current status
        status: OrderStatus,
    },

    /// The operation requires at least one line item in the order.
    #[error("Order has no items")]
    EmptyOrder,

    /// Payment was already confirmed under a different payment intent.
    #[error("Order is already paid with a different payment intent")]
    AlreadyPaid,

    /// A different payment intent is already staged.
    #[error("Payment intent '{existing}' is already staged")]
    PaymentIntentMismatch {
        /// The intent that is currently staged
        existing: PaymentIntentId,
    },

    /// No line item exists for the given product.
    #[error("No line item for product {product_id}")]
    ItemNotFound {
        /// The product that was looked up
        product_id: ProductId,
    },

    /// The requested status transition is not part of the order lifecycle.
    #[error("Invalid order transition from {from} to {to}")]
    InvalidOrderTransition {
        /// The order's current status
        from: OrderStatus,
        /// The status that was requested
        to: OrderStatus,
    },
}

/// Top-level error for all fallible domain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A structural invariant would be violated.
    #[error("Invariant violation: {0}")]
    InvariantViolation(#[from] InvariantViolation),

    /// The current status does not permit the operation.
    #[error("Illegal state: {0}")]
    IllegalState(#[from] IllegalState),
}

/// Type alias for results of aggregate operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Type alias for results of value-object operations.
pub type InvariantResult<T> = Result<T, InvariantViolation>;

impl From<CurrencyCodeError> for InvariantViolation {
    fn from(err: CurrencyCodeError) -> Self {
        Self::InvalidCurrency(err.to_string())
    }
}

impl From<PaymentIntentIdError> for InvariantViolation {
    fn from(err: PaymentIntentIdError) -> Self {
        Self::InvalidPaymentIntent(err.to_string())
    }
}

impl From<CurrencyCodeError> for DomainError {
    fn from(err: CurrencyCodeError) -> Self {
        Self::InvariantViolation(err.into())
    }
}

impl From<PaymentIntentIdError> for DomainError {
    fn from(err: PaymentIntentIdError) -> Self {
        Self::InvariantViolation(err.into())
    }
}
