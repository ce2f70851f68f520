//! Property test generators for domain types.
//!
//! Each generator respects the validation rules of its corresponding type,
//! so a property test never constructs an invalid value by accident. Money
//! amounts are bounded well below `u64::MAX` so that summing a generated
//! batch cannot overflow.

use crate::line_item::LineItem;
use crate::money::{CurrencyCode, Money};
use crate::types::{PaymentIntentId, ProductId, Quantity};
use proptest::prelude::*;
use uuid::Uuid;

/// Generates valid `CurrencyCode` values.
pub fn arb_currency_code() -> impl Strategy<Value = CurrencyCode> {
    "[A-Z]{3}".prop_filter_map("Invalid CurrencyCode", |s| CurrencyCode::try_new(s).ok())
}

/// Generates `Money` values across arbitrary currencies.
pub fn arb_money() -> impl Strategy<Value = Money> {
    (0u64..=10_000_000, arb_currency_code())
        .prop_map(|(amount, currency)| Money::new(amount, currency))
}

/// Generates `Money` values in one fixed currency.
///
/// Useful for aggregate tests, where mixing currencies is the error case
/// rather than the input.
pub fn arb_money_in(currency: CurrencyCode) -> impl Strategy<Value = Money> {
    (0u64..=10_000_000).prop_map(move |amount| Money::new(amount, currency.clone()))
}

/// Generates valid `Quantity` values across the whole allowed range.
pub fn arb_quantity() -> impl Strategy<Value = Quantity> {
    (1u32..=Quantity::MAX).prop_filter_map("Invalid Quantity", |v| Quantity::new(v).ok())
}

/// Generates `ProductId` values.
///
/// Built from raw bits rather than the clock so that shrinking stays
/// deterministic.
pub fn arb_product_id() -> impl Strategy<Value = ProductId> {
    any::<u128>().prop_map(|raw| ProductId::from_uuid(Uuid::from_u128(raw)))
}

/// Generates `PaymentIntentId` values shaped like gateway references.
pub fn arb_payment_intent_id() -> impl Strategy<Value = PaymentIntentId> {
    "pi_[a-zA-Z0-9]{8,24}"
        .prop_filter_map("Invalid PaymentIntentId", |s| PaymentIntentId::try_new(s).ok())
}

/// Generates line items across arbitrary currencies.
pub fn arb_line_item() -> impl Strategy<Value = LineItem> {
    (arb_product_id(), arb_quantity(), arb_money())
        .prop_map(|(product_id, quantity, unit_price)| LineItem::new(product_id, quantity, unit_price))
}

/// Generates line items priced in one fixed currency.
pub fn arb_line_item_in(currency: CurrencyCode) -> impl Strategy<Value = LineItem> {
    (arb_product_id(), arb_quantity(), arb_money_in(currency))
        .prop_map(|(product_id, quantity, unit_price)| LineItem::new(product_id, quantity, unit_price))
}

/// Generates a batch of 1 to `max` line items sharing one currency.
pub fn arb_line_items_in(
    currency: CurrencyCode,
    max: usize,
) -> impl Strategy<Value = Vec<LineItem>> {
    proptest::collection::vec(arb_line_item_in(currency), 1..=max)
}
