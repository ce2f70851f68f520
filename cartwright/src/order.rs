//! The order aggregate.
//!
//! An [`Order`] is born `Pending`, either directly or from an `Ordered`
//! [`Cart`]. While `Pending` its contents may still be adjusted; payment
//! confirmation moves it to `Paid` and freezes the items and total for good.
//! Fulfillment then walks `Paid → Shipped → Delivered`. Cancellation is
//! possible from `Pending` or `Paid`, never once the goods have shipped.
//!
//! Payment confirmation is idempotent and keyed on the payment intent:
//! replaying the same confirmation is a no-op, while a second, different
//! intent is always an error.

use crate::cart::{Cart, CartStatus};
use crate::config;
use crate::errors::{DomainError, DomainResult, IllegalState, InvariantViolation};
use crate::line_item::{sum_subtotals, LineItem};
use crate::money::Money;
use crate::types::{
    AggregateVersion, OrderId, PaymentIntentId, ProductId, Quantity, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle status of an [`Order`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// The draft phase: contents may still change.
    Pending,
    /// Payment confirmed; contents are frozen.
    Paid,
    /// Handed to the carrier.
    Shipped,
    /// Received by the shopper.
    Delivered,
    /// Called off before shipping.
    Cancelled,
}

impl OrderStatus {
    /// Whether the order contents may still be modified.
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Paid => write!(f, "Paid"),
            Self::Shipped => write!(f, "Shipped"),
            Self::Delivered => write!(f, "Delivered"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// A purchase moving through payment and fulfillment.
///
/// Fields are private; state changes go through the mutators, which keep the
/// total equal to the sum of line subtotals in the items' single shared
/// currency. An emptied order keeps its previous currency for the zero
/// total, so a shopper who removes everything and starts over sees
/// consistent amounts.
///
/// Serde routes through [`OrderSnapshot`], so deserializing an order re-runs
/// full invariant validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OrderSnapshot", into = "OrderSnapshot")]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    items: Vec<LineItem>,
    total: Money,
    created_at: Timestamp,
    version: AggregateVersion,
    payment_intent_id: Option<PaymentIntentId>,
}

impl Order {
    /// Creates an empty `Pending` order.
    pub fn new(id: OrderId, user_id: UserId) -> Self {
        Self {
            id,
            user_id,
            status: OrderStatus::Pending,
            items: Vec::new(),
            total: Money::zero(config::default_currency()),
            created_at: Timestamp::now(),
            version: AggregateVersion::initial(),
            payment_intent_id: None,
        }
    }

    /// Creates a `Pending` order from a cart that completed checkout.
    ///
    /// The cart must be `Ordered` and non-empty; its items, total, and
    /// staged payment intent carry over unchanged. The cart itself is not
    /// modified.
    pub fn from_cart(id: OrderId, cart: &Cart) -> DomainResult<Self> {
        if cart.status() != CartStatus::Ordered {
            return Err(IllegalState::CartNotOrdered {
                status: cart.status(),
            }
            .into());
        }
        if cart.is_empty() {
            return Err(IllegalState::EmptyCart.into());
        }
        let Some(intent) = cart.payment_intent_id() else {
            return Err(IllegalState::CheckoutNotStarted.into());
        };

        let order = Self {
            id,
            user_id: cart.user_id(),
            status: OrderStatus::Pending,
            items: cart.items().to_vec(),
            total: cart.total().clone(),
            created_at: Timestamp::now(),
            version: AggregateVersion::initial(),
            payment_intent_id: Some(intent.clone()),
        };
        debug!(
            order_id = %order.id,
            user_id = %order.user_id,
            total = %order.total,
            "order created from cart"
        );
        Ok(order)
    }

    /// The order's identity.
    pub const fn id(&self) -> OrderId {
        self.id
    }

    /// The shopper who placed the order.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> OrderStatus {
        self.status
    }

    /// The line items, in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The derived total of all line subtotals.
    pub const fn total(&self) -> &Money {
        &self.total
    }

    /// When the order was created.
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Mutation counter for optimistic locking.
    pub const fn version(&self) -> AggregateVersion {
        self.version
    }

    /// The payment intent staged or settled for this order.
    pub const fn payment_intent_id(&self) -> Option<&PaymentIntentId> {
        self.payment_intent_id.as_ref()
    }

    /// Whether the order holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item, merging with an existing line for the same product at
    /// the same unit price.
    ///
    /// Rejected unless the order is `Pending`. A non-empty order only
    /// accepts items in its existing currency; an empty one adopts the
    /// currency of the first item.
    pub fn add_item(&mut self, item: LineItem) -> DomainResult<()> {
        self.ensure_pending()?;
        if !self.items.is_empty() && item.currency() != self.total.currency() {
            return Err(InvariantViolation::CurrencyMismatch {
                expected: self.total.currency().clone(),
                actual: item.currency().clone(),
            }
            .into());
        }

        let mut items = self.items.clone();
        let merge_at = items.iter().position(|line| {
            line.product_id == item.product_id && line.unit_price == item.unit_price
        });
        match merge_at {
            Some(index) => {
                let merged = items[index].quantity.checked_add(item.quantity)?;
                items[index] = items[index].with_quantity(merged);
            }
            None => items.push(item),
        }
        self.commit_items(items)?;

        debug!(
            order_id = %self.id,
            lines = self.items.len(),
            total = %self.total,
            "order item added"
        );
        Ok(())
    }

    /// Sets the quantity of the first line for the given product.
    ///
    /// Rejected unless the order is `Pending`; fails with
    /// [`IllegalState::ItemNotFound`] when no line matches.
    pub fn set_item_quantity(
        &mut self,
        product_id: ProductId,
        quantity: Quantity,
    ) -> DomainResult<()> {
        self.ensure_pending()?;
        let mut items = self.items.clone();
        let index = items
            .iter()
            .position(|line| line.product_id == product_id)
            .ok_or(IllegalState::ItemNotFound { product_id })?;
        items[index] = items[index].with_quantity(quantity);
        self.commit_items(items)?;

        debug!(
            order_id = %self.id,
            product_id = %product_id,
            quantity = %quantity,
            "order item quantity set"
        );
        Ok(())
    }

    /// Removes every line for the given product.
    ///
    /// Rejected unless the order is `Pending`; fails with
    /// [`IllegalState::ItemNotFound`] when no line matches. An emptied order
    /// keeps its previous currency for the zero total.
    pub fn remove_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        self.ensure_pending()?;
        if !self.items.iter().any(|line| line.product_id == product_id) {
            return Err(IllegalState::ItemNotFound { product_id }.into());
        }

        let items: Vec<LineItem> = self
            .items
            .iter()
            .filter(|line| line.product_id != product_id)
            .cloned()
            .collect();
        self.commit_items(items)?;

        debug!(
            order_id = %self.id,
            product_id = %product_id,
            lines = self.items.len(),
            "order item removed"
        );
        Ok(())
    }

    /// Stages a payment intent ahead of confirmation.
    ///
    /// Idempotent for the intent already staged (or already settled on a
    /// `Paid` order). A different intent fails: with
    /// [`IllegalState::PaymentIntentMismatch`] while one is staged, or
    /// [`IllegalState::AlreadyPaid`] once payment has settled.
    pub fn mark_payment_pending(&mut self, intent: PaymentIntentId) -> DomainResult<()> {
        match self.status {
            OrderStatus::Pending => {}
            OrderStatus::Paid => {
                return if self.payment_intent_id.as_ref() == Some(&intent) {
                    Ok(())
                } else {
                    Err(IllegalState::AlreadyPaid.into())
                };
            }
            status => return Err(IllegalState::OrderNotPending { status }.into()),
        }
        match &self.payment_intent_id {
            Some(existing) if *existing == intent => return Ok(()),
            Some(existing) => {
                return Err(IllegalState::PaymentIntentMismatch {
                    existing: existing.clone(),
                }
                .into());
            }
            None => {}
        }

        debug!(order_id = %self.id, intent = %intent, "payment intent staged");
        self.payment_intent_id = Some(intent);
        self.version = self.version.next();
        Ok(())
    }

    /// Confirms payment, freezing the order.
    ///
    /// Requires a non-empty `Pending` order whose staged intent (if any)
    /// matches. Confirming again with the same intent is a no-op; any other
    /// replay fails. Orders past `Paid` never re-enter it.
    pub fn mark_paid(&mut self, intent: PaymentIntentId) -> DomainResult<()> {
        match self.status {
            OrderStatus::Pending => {}
            OrderStatus::Paid => {
                return if self.payment_intent_id.as_ref() == Some(&intent) {
                    Ok(())
                } else {
                    Err(IllegalState::AlreadyPaid.into())
                };
            }
            status => {
                return Err(IllegalState::InvalidOrderTransition {
                    from: status,
                    to: OrderStatus::Paid,
                }
                .into());
            }
        }
        if self.items.is_empty() {
            return Err(IllegalState::EmptyOrder.into());
        }
        if let Some(existing) = &self.payment_intent_id {
            if *existing != intent {
                return Err(IllegalState::PaymentIntentMismatch {
                    existing: existing.clone(),
                }
                .into());
            }
        }

        self.status = OrderStatus::Paid;
        self.payment_intent_id = Some(intent);
        self.version = self.version.next();
        debug!(order_id = %self.id, total = %self.total, "order paid");
        Ok(())
    }

    /// Read-only guard for callers about to create a payment intent.
    ///
    /// Succeeds only for a non-empty order still in its draft (`Pending`)
    /// phase.
    pub fn ensure_can_checkout(&self) -> DomainResult<()> {
        self.ensure_pending()?;
        if self.items.is_empty() {
            return Err(IllegalState::EmptyOrder.into());
        }
        Ok(())
    }

    /// Calls the order off.
    ///
    /// Allowed from `Pending` or `Paid`; once goods have shipped the order
    /// can only complete.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.transition_to(OrderStatus::Cancelled)
    }

    /// Records carrier handoff: `Paid → Shipped`.
    pub fn mark_shipped(&mut self) -> DomainResult<()> {
        self.transition_to(OrderStatus::Shipped)
    }

    /// Records delivery: `Shipped → Delivered`.
    pub fn mark_delivered(&mut self) -> DomainResult<()> {
        self.transition_to(OrderStatus::Delivered)
    }

    /// Captures a plain-data image of the order for storage.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot::from(self.clone())
    }

    /// Rebuilds an order from a stored snapshot, re-validating every
    /// invariant.
    ///
    /// Rejects snapshots whose stored total does not match the derived
    /// total (or is non-zero for an empty order), whose items mix
    /// currencies, or that claim payment has settled without the items and
    /// intent to show for it.
    pub fn from_snapshot(snapshot: OrderSnapshot) -> DomainResult<Self> {
        if let Some((derived, _)) = sum_subtotals(&snapshot.items)? {
            if snapshot.total != derived {
                return Err(InvariantViolation::TotalMismatch {
                    expected: derived,
                    actual: snapshot.total,
                }
                .into());
            }
        } else if !snapshot.total.is_zero() {
            return Err(InvariantViolation::TotalMismatch {
                expected: Money::zero(snapshot.total.currency().clone()),
                actual: snapshot.total,
            }
            .into());
        }

        let paid_or_later = matches!(
            snapshot.status,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
        );
        if paid_or_later {
            if snapshot.items.is_empty() {
                return Err(InvariantViolation::PaidOrderEmpty.into());
            }
            if snapshot.payment_intent_id.is_none() {
                return Err(InvariantViolation::PaidOrderWithoutIntent.into());
            }
        }

        Ok(Self {
            id: snapshot.id,
            user_id: snapshot.user_id,
            status: snapshot.status,
            items: snapshot.items,
            total: snapshot.total,
            created_at: snapshot.created_at,
            version: snapshot.version,
            payment_intent_id: snapshot.payment_intent_id,
        })
    }

    fn ensure_pending(&self) -> Result<(), IllegalState> {
        if self.status.is_pending() {
            Ok(())
        } else {
            Err(IllegalState::OrderNotPending {
                status: self.status,
            })
        }
    }

    /// Derives the total for the scratch items, then commits them and bumps
    /// the version. An empty batch keeps the previous currency.
    fn commit_items(&mut self, items: Vec<LineItem>) -> Result<(), InvariantViolation> {
        let total = sum_subtotals(&items)?.map_or_else(
            || Money::zero(self.total.currency().clone()),
            |(total, _)| total,
        );
        self.total = total;
        self.items = items;
        self.version = self.version.next();
        Ok(())
    }

    /// The fulfillment and cancellation transition table.
    fn transition_to(&mut self, to: OrderStatus) -> DomainResult<()> {
        let permitted = matches!(
            (self.status, to),
            (OrderStatus::Pending | OrderStatus::Paid, OrderStatus::Cancelled)
                | (OrderStatus::Paid, OrderStatus::Shipped)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        );
        if !permitted {
            return Err(IllegalState::InvalidOrderTransition {
                from: self.status,
                to,
            }
            .into());
        }
        self.status = to;
        self.version = self.version.next();
        debug!(order_id = %self.id, status = %self.status, "order status changed");
        Ok(())
    }
}

/// A plain-data image of an [`Order`].
///
/// Nothing about a snapshot is trusted; turning one back into an [`Order`]
/// goes through [`Order::from_snapshot`], which re-validates every
/// invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    /// The order's identity.
    pub id: OrderId,
    /// The shopper who placed the order.
    pub user_id: UserId,
    /// Lifecycle status.
    pub status: OrderStatus,
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Stored total; must match the total derived from `items`.
    pub total: Money,
    /// When the order was created.
    pub created_at: Timestamp,
    /// Mutation counter.
    pub version: AggregateVersion,
    /// Staged or settled payment intent.
    pub payment_intent_id: Option<PaymentIntentId>,
}

impl From<Order> for OrderSnapshot {
    fn from(order: Order) -> Self {
        Self {
            id: order.id,
            user_id: order.user_id,
            status: order.status,
            items: order.items,
            total: order.total,
            created_at: order.created_at,
            version: order.version,
            payment_intent_id: order.payment_intent_id,
        }
    }
}

impl TryFrom<OrderSnapshot> for Order {
    type Error = DomainError;

    fn try_from(snapshot: OrderSnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}
