//! Application-level defaults.

use crate::money::CurrencyCode;

/// The currency an empty cart's zero total is denominated in.
///
/// A cart only derives a real currency from its line items; until the first
/// item arrives (and again after the last one is removed) its total is zero
/// in this currency.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Returns [`DEFAULT_CURRENCY`] as a validated [`CurrencyCode`].
pub fn default_currency() -> CurrencyCode {
    CurrencyCode::try_new(DEFAULT_CURRENCY).expect("DEFAULT_CURRENCY is a valid currency code")
}
