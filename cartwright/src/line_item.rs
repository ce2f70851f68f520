//! Line items shared by carts and orders.

use crate::errors::{InvariantResult, InvariantViolation};
use crate::money::{CurrencyCode, Money};
use crate::types::{ProductId, Quantity};
use serde::{Deserialize, Serialize};

/// One product at one unit price, in some quantity.
///
/// The same type serves both aggregates: a cart line becomes an order line
/// unchanged at checkout. Lines for the same product at different unit
/// prices stay separate, so a price change mid-session never retroactively
/// reprices what a shopper already picked.
///
/// Every field type validates itself at construction, so any combination of
/// fields is a valid line item and they can be public.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The product this line refers to.
    pub product_id: ProductId,
    /// How many units the line carries.
    pub quantity: Quantity,
    /// The price of one unit at the time the line was created.
    pub unit_price: Money,
}

impl LineItem {
    /// Creates a line item.
    pub const fn new(product_id: ProductId, quantity: Quantity, unit_price: Money) -> Self {
        Self {
            product_id,
            quantity,
            unit_price,
        }
    }

    /// The price of the whole line: unit price times quantity.
    pub fn subtotal(&self) -> InvariantResult<Money> {
        self.unit_price.multiply_by_quantity(self.quantity)
    }

    /// The currency this line is priced in.
    pub const fn currency(&self) -> &CurrencyCode {
        self.unit_price.currency()
    }

    /// A copy of this line carrying a different quantity.
    #[must_use]
    pub fn with_quantity(&self, quantity: Quantity) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }
}

/// Derives the total and shared currency of a batch of line items.
///
/// Returns `None` for an empty slice; the caller decides which currency the
/// zero total of an empty aggregate carries. Fails on mixed currencies or
/// arithmetic overflow without partial results.
pub(crate) fn sum_subtotals(items: &[LineItem]) -> InvariantResult<Option<(Money, CurrencyCode)>> {
    let Some(first) = items.first() else {
        return Ok(None);
    };
    let currency = first.currency().clone();
    let mut total = Money::zero(currency.clone());
    for item in items {
        if item.currency() != &currency {
            return Err(InvariantViolation::MixedCurrencies);
        }
        total = total.checked_add(&item.subtotal()?)?;
    }
    Ok(Some((total, currency)))
}
