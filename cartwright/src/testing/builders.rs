//! Fluent builders for test aggregates.
//!
//! Builders assemble aggregates through the public mutators, so anything
//! they hand back satisfies exactly the invariants production code would
//! enforce. `build()` panics on an invalid recipe; `try_build()` surfaces
//! the first rejected mutation for tests that target the failure itself.

use crate::cart::Cart;
use crate::errors::DomainResult;
use crate::line_item::LineItem;
use crate::order::Order;
use crate::types::{OrderId, PaymentIntentId, UserId};

/// Builds a [`Cart`] in a known state.
#[derive(Debug, Default)]
pub struct CartBuilder {
    user_id: Option<UserId>,
    items: Vec<LineItem>,
    staged_intent: Option<PaymentIntentId>,
}

impl CartBuilder {
    /// Creates a builder for an empty active cart owned by a fresh shopper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owning shopper.
    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Adds one line item.
    #[must_use]
    pub fn item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Adds a batch of line items.
    #[must_use]
    pub fn items<I: IntoIterator<Item = LineItem>>(mut self, items: I) -> Self {
        self.items.extend(items);
        self
    }

    /// Stages a payment intent once the items are in.
    #[must_use]
    pub fn staged_intent(mut self, intent: PaymentIntentId) -> Self {
        self.staged_intent = Some(intent);
        self
    }

    /// Builds the cart.
    ///
    /// # Panics
    /// Panics when the accumulated recipe violates a cart invariant.
    pub fn build(self) -> Cart {
        self.try_build()
            .expect("CartBuilder recipe violated a cart invariant")
    }

    /// Builds the cart, surfacing the first rejected mutation instead of
    /// panicking.
    pub fn try_build(self) -> DomainResult<Cart> {
        let mut cart = Cart::new(self.user_id.unwrap_or_else(UserId::new));
        for item in self.items {
            cart.add_item(item)?;
        }
        if let Some(intent) = self.staged_intent {
            cart.begin_checkout(intent)?;
        }
        Ok(cart)
    }
}

/// Builds an [`Order`] in a known state.
#[derive(Debug, Default)]
pub struct OrderBuilder {
    id: Option<OrderId>,
    user_id: Option<UserId>,
    items: Vec<LineItem>,
    staged_intent: Option<PaymentIntentId>,
    settled_intent: Option<PaymentIntentId>,
}

impl OrderBuilder {
    /// Creates a builder for an empty pending order with fresh identities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order id.
    #[must_use]
    pub fn id(mut self, id: OrderId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the shopper placing the order.
    #[must_use]
    pub fn user_id(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Adds one line item.
    #[must_use]
    pub fn item(mut self, item: LineItem) -> Self {
        self.items.push(item);
        self
    }

    /// Adds a batch of line items.
    #[must_use]
    pub fn items<I: IntoIterator<Item = LineItem>>(mut self, items: I) -> Self {
        self.items.extend(items);
        self
    }

    /// Stages a payment intent without confirming it.
    #[must_use]
    pub fn staged_intent(mut self, intent: PaymentIntentId) -> Self {
        self.staged_intent = Some(intent);
        self
    }

    /// Confirms payment under the given intent, freezing the order.
    #[must_use]
    pub fn paid_with(mut self, intent: PaymentIntentId) -> Self {
        self.settled_intent = Some(intent);
        self
    }

    /// Builds the order.
    ///
    /// # Panics
    /// Panics when the accumulated recipe violates an order invariant, for
    /// example `paid_with` on a builder with no items.
    pub fn build(self) -> Order {
        self.try_build()
            .expect("OrderBuilder recipe violated an order invariant")
    }

    /// Builds the order, surfacing the first rejected mutation instead of
    /// panicking.
    pub fn try_build(self) -> DomainResult<Order> {
        let mut order = Order::new(
            self.id.unwrap_or_else(OrderId::new),
            self.user_id.unwrap_or_else(UserId::new),
        );
        for item in self.items {
            order.add_item(item)?;
        }
        if let Some(intent) = self.staged_intent {
            order.mark_payment_pending(intent)?;
        }
        if let Some(intent) = self.settled_intent {
            order.mark_paid(intent)?;
        }
        Ok(order)
    }
}
