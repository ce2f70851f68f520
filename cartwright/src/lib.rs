//! `Cartwright` - Invariant-enforcing cart and order aggregates
//!
//! This library models the domain layer of an e-commerce checkout flow: a
//! [`Cart`] accumulates [`LineItem`]s while a shopper browses, and checkout
//! hands its contents to an [`Order`] that tracks payment and fulfillment.
//! The interesting part is what the types refuse to do:
//!
//! - [`Money`] is integer minor units in a validated currency; negative
//!   amounts are unrepresentable, and currency mixing or overflow is a
//!   checked error, never a coercion.
//! - Aggregate totals are always derived from the line items; there is no
//!   setter through which they could drift out of sync.
//! - Status guards make the mutation window explicit: an `Ordered` cart and
//!   a `Paid` order never change again.
//! - Payment confirmation is idempotent, keyed on the payment intent, so a
//!   gateway webhook can be replayed safely.
//! - Serde round-trips go through validating snapshots, so a tampered or
//!   hand-written document cannot materialize an invalid aggregate.
//!
//! # Example
//!
//! ```
//! use cartwright::{
//!     Cart, DomainError, LineItem, Money, Order, OrderId, PaymentIntentId, ProductId,
//!     Quantity, UserId,
//! };
//!
//! fn main() -> Result<(), DomainError> {
//!     let mut cart = Cart::new(UserId::new());
//!     cart.add_item(LineItem::new(
//!         ProductId::new(),
//!         Quantity::new(2)?,
//!         Money::from_minor(1_999, "USD")?,
//!     ))?;
//!
//!     let intent = PaymentIntentId::try_new("pi_demo_001")?;
//!     cart.begin_checkout(intent.clone())?;
//!     cart.mark_ordered()?;
//!
//!     let mut order = Order::from_cart(OrderId::new(), &cart)?;
//!     order.mark_paid(intent)?;
//!     assert_eq!(order.total(), cart.total());
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cart;
pub mod config;
pub mod errors;
pub mod line_item;
pub mod money;
pub mod order;
pub mod types;

#[cfg(feature = "testing")]
pub mod testing;

pub use cart::{Cart, CartSnapshot, CartStatus};
pub use errors::{DomainError, DomainResult, IllegalState, InvariantResult, InvariantViolation};
pub use line_item::LineItem;
pub use money::{CurrencyCode, Money};
pub use order::{Order, OrderSnapshot, OrderStatus};
pub use types::{
    AggregateVersion, OrderId, PaymentIntentId, ProductId, Quantity, Timestamp, UserId,
};
