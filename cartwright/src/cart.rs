//! The shopping cart aggregate.
//!
//! A [`Cart`] accumulates line items while it is `Active`, then leaves that
//! status exactly once: to `Ordered` at checkout, or to `Canceled`/`Expired`
//! when abandoned. After leaving `Active` the cart is immutable.
//!
//! Every mutator validates against a scratch copy of the items first and
//! only then commits, so a rejected operation leaves the cart exactly as it
//! was. The total and the cart currency are always derived from the items
//! and have no setters.

use crate::config;
use crate::errors::{DomainError, DomainResult, IllegalState, InvariantViolation};
use crate::line_item::{sum_subtotals, LineItem};
use crate::money::{CurrencyCode, Money};
use crate::types::{AggregateVersion, PaymentIntentId, ProductId, Timestamp, UserId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Lifecycle status of a [`Cart`].
///
/// `Active` is the only status that permits mutation; the other three are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CartStatus {
    /// The shopper is still filling the cart.
    Active,
    /// Checkout completed; an order now owns the items.
    Ordered,
    /// The shopper abandoned the cart.
    Canceled,
    /// The cart outlived its session and was reaped.
    Expired,
}

impl CartStatus {
    /// Whether the cart may still be modified.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for CartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Ordered => write!(f, "Ordered"),
            Self::Canceled => write!(f, "Canceled"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

/// A shopper's cart.
///
/// Fields are private; state changes go through the mutators, which maintain
/// these invariants:
///
/// - `total` equals the sum of line subtotals at all times.
/// - All items share one currency, recorded in `cart_currency`; the field is
///   `None` exactly while the cart is empty, and an empty cart's total is
///   zero in [`config::DEFAULT_CURRENCY`].
/// - A cart that has left [`CartStatus::Active`] never changes again.
///
/// Serde routes through [`CartSnapshot`], so deserializing a cart re-runs
/// the same validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartSnapshot", into = "CartSnapshot")]
pub struct Cart {
    user_id: UserId,
    status: CartStatus,
    items: Vec<LineItem>,
    total: Money,
    cart_currency: Option<CurrencyCode>,
    created_at: Timestamp,
    version: AggregateVersion,
    payment_intent_id: Option<PaymentIntentId>,
}

impl Cart {
    /// Creates an empty `Active` cart for the given shopper.
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            status: CartStatus::Active,
            items: Vec::new(),
            total: Money::zero(config::default_currency()),
            cart_currency: None,
            created_at: Timestamp::now(),
            version: AggregateVersion::initial(),
            payment_intent_id: None,
        }
    }

    /// The shopper who owns this cart.
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Current lifecycle status.
    pub const fn status(&self) -> CartStatus {
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

    /// The shared currency of the items; `None` while the cart is empty.
    pub const fn cart_currency(&self) -> Option<&CurrencyCode> {
        self.cart_currency.as_ref()
    }

    /// When the cart was created.
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Mutation counter for optimistic locking.
    pub const fn version(&self) -> AggregateVersion {
        self.version
    }

    /// The staged payment intent, if a checkout is in progress.
    pub const fn payment_intent_id(&self) -> Option<&PaymentIntentId> {
        self.payment_intent_id.as_ref()
    }

    /// Whether the cart holds no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds an item, merging with an existing line for the same product at
    /// the same unit price.
    ///
    /// Fails if the cart is not `Active`, if the item's currency differs
    /// from the cart currency, or if merging would push the line past
    /// [`crate::types::Quantity::MAX`].
    pub fn add_item(&mut self, item: LineItem) -> DomainResult<()> {
        self.ensure_active()?;
        if let Some(currency) = &self.cart_currency {
            if item.currency() != currency {
                return Err(InvariantViolation::CurrencyMismatch {
                    expected: currency.clone(),
                    actual: item.currency().clone(),
                }
                .into());
            }
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
            user_id = %self.user_id,
            lines = self.items.len(),
            total = %self.total,
            "cart item added"
        );
        Ok(())
    }

    /// Removes every line for the given product.
    ///
    /// Fails with [`IllegalState::ItemNotFound`] when no line matches.
    /// Removing the last line returns the cart to the empty state: currency
    /// `None`, zero total in the default currency.
    pub fn remove_item(&mut self, product_id: ProductId) -> DomainResult<()> {
        self.ensure_active()?;
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
            user_id = %self.user_id,
            product_id = %product_id,
            lines = self.items.len(),
            "cart item removed"
        );
        Ok(())
    }

    /// Empties the cart.
    ///
    /// Refused while a payment intent is staged; cancel the checkout first.
    pub fn clear(&mut self) -> DomainResult<()> {
        self.ensure_active()?;
        if self.payment_intent_id.is_some() {
            return Err(IllegalState::CheckoutInProgress.into());
        }
        self.commit_items(Vec::new())?;
        debug!(user_id = %self.user_id, "cart cleared");
        Ok(())
    }

    /// Stages a payment intent, opening the checkout window.
    ///
    /// Requires an `Active`, non-empty cart. Re-staging the same intent is
    /// an idempotent no-op; staging a different one while the first is still
    /// pending fails with [`IllegalState::PaymentIntentMismatch`].
    pub fn begin_checkout(&mut self, intent: PaymentIntentId) -> DomainResult<()> {
        self.ensure_active()?;
        if self.items.is_empty() {
            return Err(IllegalState::EmptyCart.into());
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

        debug!(user_id = %self.user_id, intent = %intent, "payment intent staged on cart");
        self.payment_intent_id = Some(intent);
        self.version = self.version.next();
        Ok(())
    }

    /// Discards a staged payment intent, reopening the cart for changes.
    ///
    /// A no-op (without a version bump) when nothing is staged.
    pub fn cancel_checkout(&mut self) -> DomainResult<()> {
        self.ensure_active()?;
        if self.payment_intent_id.take().is_some() {
            self.version = self.version.next();
            debug!(user_id = %self.user_id, "staged payment intent discarded");
        }
        Ok(())
    }

    /// Completes checkout: transitions the cart to `Ordered`.
    ///
    /// Requires a non-empty cart with a staged payment intent. One-way; the
    /// cart is immutable afterwards.
    pub fn mark_ordered(&mut self) -> DomainResult<()> {
        self.ensure_active()?;
        if self.items.is_empty() {
            return Err(IllegalState::EmptyCart.into());
        }
        if self.payment_intent_id.is_none() {
            return Err(IllegalState::CheckoutNotStarted.into());
        }
        self.status = CartStatus::Ordered;
        self.version = self.version.next();
        debug!(user_id = %self.user_id, total = %self.total, "cart ordered");
        Ok(())
    }

    /// Closes the cart as abandoned by the shopper.
    pub fn cancel(&mut self) -> DomainResult<()> {
        self.close(CartStatus::Canceled)
    }

    /// Closes the cart as expired by a session reaper.
    pub fn expire(&mut self) -> DomainResult<()> {
        self.close(CartStatus::Expired)
    }

    /// Captures a plain-data image of the cart for storage.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::from(self.clone())
    }

    /// Rebuilds a cart from a stored snapshot, re-validating every invariant.
    ///
    /// Rejects snapshots whose stored total does not match the total derived
    /// from the items, whose currency field is inconsistent with the items,
    /// or whose items mix currencies.
    pub fn from_snapshot(snapshot: CartSnapshot) -> DomainResult<Self> {
        match (sum_subtotals(&snapshot.items)?, &snapshot.cart_currency) {
            (Some((derived, currency)), Some(stored)) => {
                if stored != &currency {
                    return Err(InvariantViolation::CurrencyMismatch {
                        expected: currency,
                        actual: stored.clone(),
                    }
                    .into());
                }
                if snapshot.total != derived {
                    return Err(InvariantViolation::TotalMismatch {
                        expected: derived,
                        actual: snapshot.total,
                    }
                    .into());
                }
            }
            (Some(_), None) => return Err(InvariantViolation::MissingCartCurrency.into()),
            (None, Some(_)) => return Err(InvariantViolation::CurrencyOnEmptyCart.into()),
            (None, None) => {
                let expected = Money::zero(config::default_currency());
                if snapshot.total != expected {
                    return Err(InvariantViolation::TotalMismatch {
                        expected,
                        actual: snapshot.total,
                    }
                    .into());
                }
            }
        }

        Ok(Self {
            user_id: snapshot.user_id,
            status: snapshot.status,
            items: snapshot.items,
            total: snapshot.total,
            cart_currency: snapshot.cart_currency,
            created_at: snapshot.created_at,
            version: snapshot.version,
            payment_intent_id: snapshot.payment_intent_id,
        })
    }

    fn ensure_active(&self) -> Result<(), IllegalState> {
        if self.status.is_active() {
            Ok(())
        } else {
            Err(IllegalState::CartNotActive {
                status: self.status,
            })
        }
    }

    /// Derives total and currency for the scratch items, then commits them
    /// and bumps the version. The cart is untouched when derivation fails.
    fn commit_items(&mut self, items: Vec<LineItem>) -> Result<(), InvariantViolation> {
        let (total, currency) = sum_subtotals(&items)?.map_or_else(
            || (Money::zero(config::default_currency()), None),
            |(total, currency)| (total, Some(currency)),
        );
        self.total = total;
        self.cart_currency = currency;
        self.items = items;
        self.version = self.version.next();
        Ok(())
    }

    fn close(&mut self, to: CartStatus) -> DomainResult<()> {
        self.ensure_active()?;
        self.status = to;
        self.version = self.version.next();
        debug!(user_id = %self.user_id, status = %self.status, "cart closed");
        Ok(())
    }
}

/// A plain-data image of a [`Cart`].
///
/// All fields are public so a persistence layer can map them freely; nothing
/// about a snapshot is trusted. Turning a snapshot back into a [`Cart`] goes
/// through [`Cart::from_snapshot`], which re-validates every invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// The shopper who owns the cart.
    pub user_id: UserId,
    /// Lifecycle status.
    pub status: CartStatus,
    /// Line items in insertion order.
    pub items: Vec<LineItem>,
    /// Stored total; must equal the total derived from `items`.
    pub total: Money,
    /// Stored currency; must be `None` exactly when `items` is empty.
    pub cart_currency: Option<CurrencyCode>,
    /// When the cart was created.
    pub created_at: Timestamp,
    /// Mutation counter.
    pub version: AggregateVersion,
    /// Staged payment intent, if a checkout was in progress.
    pub payment_intent_id: Option<PaymentIntentId>,
}

impl From<Cart> for CartSnapshot {
    fn from(cart: Cart) -> Self {
        Self {
            user_id: cart.user_id,
            status: cart.status,
            items: cart.items,
            total: cart.total,
            cart_currency: cart.cart_currency,
            created_at: cart.created_at,
            version: cart.version,
            payment_intent_id: cart.payment_intent_id,
        }
    }
}

impl TryFrom<CartSnapshot> for Cart {
    type Error = DomainError;

    fn try_from(snapshot: CartSnapshot) -> Result<Self, Self::Error> {
        Self::from_snapshot(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Quantity;
    use proptest::prelude::*;

    fn usd(amount: u64) -> Money {
        Money::from_minor(amount, "USD").unwrap()
    }

    fn eur(amount: u64) -> Money {
        Money::from_minor(amount, "EUR").unwrap()
    }

    fn qty(value: u32) -> Quantity {
        Quantity::new(value).unwrap()
    }

    fn line(product_id: ProductId, amount: u64, quantity: u32) -> LineItem {
        LineItem::new(product_id, qty(quantity), usd(amount))
    }

    fn intent(raw: &str) -> PaymentIntentId {
        PaymentIntentId::try_new(raw).unwrap()
    }

    fn version_of(cart: &Cart) -> u64 {
        cart.version().into()
    }

    fn cart_with_one_item() -> (Cart, ProductId) {
        let mut cart = Cart::new(UserId::new());
        let product = ProductId::new();
        cart.add_item(line(product, 1_000, 2)).unwrap();
        (cart, product)
    }

    #[test]
    fn new_cart_is_empty_active_and_at_version_zero() {
        let cart = Cart::new(UserId::new());
        assert_eq!(cart.status(), CartStatus::Active);
        assert!(cart.is_empty());
        assert_eq!(cart.cart_currency(), None);
        assert_eq!(cart.total(), &usd(0));
        assert_eq!(version_of(&cart), 0);
        assert_eq!(cart.payment_intent_id(), None);
    }

    #[test]
    fn first_item_sets_currency_and_total() {
        let (cart, _) = cart_with_one_item();
        assert_eq!(cart.total(), &usd(2_000));
        assert_eq!(cart.cart_currency().unwrap().as_ref(), "USD");
        assert_eq!(cart.items().len(), 1);
        assert_eq!(version_of(&cart), 1);
    }

    #[test]
    fn adding_the_same_product_at_the_same_price_merges_lines() {
        let (mut cart, product) = cart_with_one_item();
        cart.add_item(line(product, 1_000, 3)).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, qty(5));
        assert_eq!(cart.total(), &usd(5_000));
        assert_eq!(version_of(&cart), 2);
    }

    #[test]
    fn adding_the_same_product_at_a_different_price_keeps_separate_lines() {
        let (mut cart, product) = cart_with_one_item();
        cart.add_item(line(product, 900, 1)).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.total(), &usd(2_000 + 900));
    }

    #[test]
    fn adding_a_different_currency_fails_and_leaves_the_cart_unchanged() {
        let (mut cart, _) = cart_with_one_item();
        let before = cart.snapshot();

        let foreign = LineItem::new(ProductId::new(), qty(1), eur(500));
        let err = cart.add_item(foreign).unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvariantViolation(InvariantViolation::CurrencyMismatch { .. })
        ));
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn merging_past_the_quantity_bound_fails_and_leaves_the_cart_unchanged() {
        let mut cart = Cart::new(UserId::new());
        let product = ProductId::new();
        cart.add_item(line(product, 100, 60)).unwrap();
        let before = cart.snapshot();

        let err = cart.add_item(line(product, 100, 50)).unwrap_err();

        assert!(matches!(
            err,
            DomainError::InvariantViolation(InvariantViolation::QuantityOutOfRange { value: 110 })
        ));
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn remove_item_drops_every_line_for_the_product() {
        let (mut cart, product) = cart_with_one_item();
        // Same product at a second price point: two lines, one product
        cart.add_item(line(product, 900, 1)).unwrap();
        let other = ProductId::new();
        cart.add_item(line(other, 50, 4)).unwrap();

        cart.remove_item(product).unwrap();

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].product_id, other);
        assert_eq!(cart.total(), &usd(200));
    }

    #[test]
    fn removing_the_last_item_returns_the_cart_to_the_empty_state() {
        let (mut cart, product) = cart_with_one_item();
        cart.remove_item(product).unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.cart_currency(), None);
        assert_eq!(cart.total(), &usd(0));
    }

    #[test]
    fn remove_item_fails_for_an_unknown_product() {
        let (mut cart, _) = cart_with_one_item();
        let unknown = ProductId::new();
        let err = cart.remove_item(unknown).unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalState(IllegalState::ItemNotFound {
                product_id: unknown
            })
        );
    }

    #[test]
    fn clear_resets_total_and_currency() {
        let (mut cart, _) = cart_with_one_item();
        let version_before = version_of(&cart);

        cart.clear().unwrap();

        assert!(cart.is_empty());
        assert_eq!(cart.cart_currency(), None);
        assert_eq!(cart.total(), &usd(0));
        assert_eq!(version_of(&cart), version_before + 1);
    }

    #[test]
    fn clear_is_refused_while_a_checkout_is_in_progress() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();

        let err = cart.clear().unwrap_err();
        assert_eq!(err, DomainError::IllegalState(IllegalState::CheckoutInProgress));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn begin_checkout_requires_items() {
        let mut cart = Cart::new(UserId::new());
        let err = cart.begin_checkout(intent("pi_1")).unwrap_err();
        assert_eq!(err, DomainError::IllegalState(IllegalState::EmptyCart));
    }

    #[test]
    fn begin_checkout_is_idempotent_for_the_same_intent() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();
        let version_before = version_of(&cart);

        cart.begin_checkout(intent("pi_1")).unwrap();

        assert_eq!(version_of(&cart), version_before);
        assert_eq!(cart.payment_intent_id(), Some(&intent("pi_1")));
    }

    #[test]
    fn begin_checkout_rejects_a_second_intent() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();

        let err = cart.begin_checkout(intent("pi_2")).unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalState(IllegalState::PaymentIntentMismatch {
                existing: intent("pi_1")
            })
        );
    }

    #[test]
    fn cancel_checkout_discards_the_staged_intent() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();

        cart.cancel_checkout().unwrap();
        assert_eq!(cart.payment_intent_id(), None);
        // Cart is editable again
        cart.clear().unwrap();
    }

    #[test]
    fn cancel_checkout_without_a_staged_intent_is_a_no_op() {
        let (mut cart, _) = cart_with_one_item();
        let version_before = version_of(&cart);
        cart.cancel_checkout().unwrap();
        assert_eq!(version_of(&cart), version_before);
    }

    #[test]
    fn mark_ordered_requires_a_staged_intent() {
        let (mut cart, _) = cart_with_one_item();
        let err = cart.mark_ordered().unwrap_err();
        assert_eq!(err, DomainError::IllegalState(IllegalState::CheckoutNotStarted));
    }

    #[test]
    fn mark_ordered_completes_the_checkout() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();
        cart.mark_ordered().unwrap();

        assert_eq!(cart.status(), CartStatus::Ordered);
        assert_eq!(cart.payment_intent_id(), Some(&intent("pi_1")));
    }

    #[test]
    fn every_mutator_is_refused_once_the_cart_is_ordered() {
        let (mut cart, product) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();
        cart.mark_ordered().unwrap();
        let before = cart.snapshot();

        let not_active = |err: DomainError| {
            assert_eq!(
                err,
                DomainError::IllegalState(IllegalState::CartNotActive {
                    status: CartStatus::Ordered
                })
            );
        };

        not_active(cart.add_item(line(product, 1_000, 1)).unwrap_err());
        not_active(cart.remove_item(product).unwrap_err());
        not_active(cart.clear().unwrap_err());
        not_active(cart.begin_checkout(intent("pi_2")).unwrap_err());
        not_active(cart.cancel_checkout().unwrap_err());
        not_active(cart.mark_ordered().unwrap_err());
        not_active(cart.cancel().unwrap_err());
        not_active(cart.expire().unwrap_err());

        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn cancel_and_expire_close_an_active_cart() {
        let (mut cart, _) = cart_with_one_item();
        cart.cancel().unwrap();
        assert_eq!(cart.status(), CartStatus::Canceled);

        let (mut cart, _) = cart_with_one_item();
        cart.expire().unwrap();
        assert_eq!(cart.status(), CartStatus::Expired);

        let err = cart.cancel().unwrap_err();
        assert_eq!(
            err,
            DomainError::IllegalState(IllegalState::CartNotActive {
                status: CartStatus::Expired
            })
        );
    }

    #[test]
    fn snapshot_roundtrip_preserves_the_cart() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();

        let restored = Cart::from_snapshot(cart.snapshot()).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn from_snapshot_rejects_a_tampered_total() {
        let (cart, _) = cart_with_one_item();
        let mut snapshot = cart.snapshot();
        snapshot.total = usd(1);

        let err = Cart::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvariantViolation(InvariantViolation::TotalMismatch { .. })
        ));
    }

    #[test]
    fn from_snapshot_rejects_an_inconsistent_currency_field() {
        let (cart, _) = cart_with_one_item();

        let mut snapshot = cart.snapshot();
        snapshot.cart_currency = None;
        let err = Cart::from_snapshot(snapshot).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvariantViolation(InvariantViolation::MissingCartCurrency)
        );

        let mut snapshot = Cart::new(UserId::new()).snapshot();
        snapshot.cart_currency = Some(CurrencyCode::try_new("USD").unwrap());
        let err = Cart::from_snapshot(snapshot).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvariantViolation(InvariantViolation::CurrencyOnEmptyCart)
        );
    }

    #[test]
    fn from_snapshot_rejects_a_nonzero_empty_cart_total() {
        let mut snapshot = Cart::new(UserId::new()).snapshot();
        snapshot.total = usd(5);
        let err = Cart::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(
            err,
            DomainError::InvariantViolation(InvariantViolation::TotalMismatch { .. })
        ));
    }

    #[test]
    fn from_snapshot_rejects_mixed_currencies() {
        let (cart, _) = cart_with_one_item();
        let mut snapshot = cart.snapshot();
        snapshot.items.push(LineItem::new(ProductId::new(), qty(1), eur(100)));

        let err = Cart::from_snapshot(snapshot).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvariantViolation(InvariantViolation::MixedCurrencies)
        );
    }

    #[test]
    fn serde_deserialization_revalidates_invariants() {
        let (mut cart, _) = cart_with_one_item();
        cart.begin_checkout(intent("pi_1")).unwrap();

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);

        // Tamper with the stored total and the load must fail
        let tampered = json.replace("\"amount\":2000", "\"amount\":9999");
        assert_ne!(tampered, json);
        assert!(serde_json::from_str::<Cart>(&tampered).is_err());
    }

    #[test]
    fn statuses_serialize_in_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&CartStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::from_str::<CartStatus>("\"CANCELED\"").unwrap(),
            CartStatus::Canceled
        );
    }

    proptest! {
        #[test]
        fn total_always_equals_the_sum_of_subtotals(
            raw in proptest::collection::vec((1u64..=100_000, 1u32..=10), 1..=8)
        ) {
            let mut cart = Cart::new(UserId::new());
            for &(amount, quantity) in &raw {
                cart.add_item(line(ProductId::new(), amount, quantity)).unwrap();
            }

            let expected: u64 = raw
                .iter()
                .map(|&(amount, quantity)| amount * u64::from(quantity))
                .sum();
            prop_assert_eq!(cart.total().amount(), expected);
            prop_assert_eq!(u64::from(cart.version()), u64::try_from(raw.len()).unwrap());
        }

        #[test]
        fn a_rejected_foreign_currency_add_never_changes_the_cart(
            amount in 1u64..=100_000,
            quantity in 1u32..=100,
        ) {
            let (mut cart, _) = cart_with_one_item();
            let before = cart.snapshot();

            let foreign = LineItem::new(ProductId::new(), qty(quantity), eur(amount));
            prop_assert!(cart.add_item(foreign).is_err());
            prop_assert_eq!(cart.snapshot(), before);
        }
    }
}
