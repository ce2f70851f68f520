//! Invariant assertions for aggregates under test.
//!
//! Each assertion recomputes the derived state through the public API and
//! panics with context when the stored state diverges. They make the
//! "total always equals the sum of subtotals" property a one-liner in any
//! test.

use crate::cart::Cart;
use crate::line_item::LineItem;
use crate::money::Money;
use crate::order::{Order, OrderStatus};

/// Asserts that a cart's stored total and currency match its items.
///
/// # Panics
/// Panics when the stored total differs from the recomputed one, or when
/// the currency field is inconsistent with the items.
pub fn assert_cart_consistent(cart: &Cart) {
    let Some(derived) = derive_total(cart.items()) else {
        assert!(
            cart.total().is_zero(),
            "an empty cart must carry a zero total, found {}",
            cart.total()
        );
        assert!(
            cart.cart_currency().is_none(),
            "an empty cart must not record a currency"
        );
        return;
    };

    assert_eq!(
        cart.total(),
        &derived,
        "cart total diverged from the sum of its line subtotals"
    );
    let currency = cart
        .cart_currency()
        .expect("a non-empty cart must record its currency");
    assert_eq!(
        currency,
        derived.currency(),
        "cart currency diverged from its items"
    );
}

/// Asserts that an order's stored total matches its items, and that a paid
/// order still has the items and intent that settled it.
///
/// # Panics
/// Panics when any of those invariants is violated.
pub fn assert_order_consistent(order: &Order) {
    if matches!(
        order.status(),
        OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
    ) {
        assert!(
            !order.items().is_empty(),
            "a paid order must have at least one item"
        );
        assert!(
            order.payment_intent_id().is_some(),
            "a paid order must record its settling payment intent"
        );
    }

    let Some(derived) = derive_total(order.items()) else {
        assert!(
            order.total().is_zero(),
            "an empty order must carry a zero total, found {}",
            order.total()
        );
        return;
    };

    assert_eq!(
        order.total(),
        &derived,
        "order total diverged from the sum of its line subtotals"
    );
}

/// Recomputes a batch total through the public arithmetic.
fn derive_total(items: &[LineItem]) -> Option<Money> {
    let first = items.first()?;
    let mut total = Money::zero(first.currency().clone());
    for item in items {
        let subtotal = item.subtotal().expect("line subtotal must be computable");
        total = total
            .checked_add(&subtotal)
            .expect("line items must share one currency");
    }
    Some(total)
}
