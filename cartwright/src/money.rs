//! Monetary value objects.
//!
//! Amounts are integer minor units (cents for USD) held as `u64`, so negative
//! money is unrepresentable and float drift cannot occur. All arithmetic is
//! checked: combining different currencies or overflowing the representable
//! range is an error, never a silent coercion.

use crate::errors::{InvariantResult, InvariantViolation};
use crate::types::Quantity;
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// An ISO-4217-style currency code: exactly three ASCII uppercase letters.
///
/// Leading and trailing whitespace is trimmed, but there is no case
/// coercion — `"usd"` is rejected, never fixed up.
#[nutype(
    sanitize(trim),
    validate(predicate = |code: &str| code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        AsRef,
        Deref,
        Display,
        Serialize,
        Deserialize
    )
)]
pub struct CurrencyCode(String);

/// A non-negative amount of money in a single currency.
///
/// `Money` is an immutable value object compared by value. Operations return
/// new values; the operands are never modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: u64,
    currency: CurrencyCode,
}

impl Money {
    /// Creates a monetary value from already-validated parts.
    pub const fn new(amount: u64, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }

    /// Parses a raw currency code and creates a monetary value.
    pub fn from_minor(amount: u64, code: &str) -> InvariantResult<Self> {
        Ok(Self::new(amount, CurrencyCode::try_new(code)?))
    }

    /// The zero amount in the given currency.
    pub const fn zero(currency: CurrencyCode) -> Self {
        Self::new(0, currency)
    }

    /// Returns the amount in minor units.
    pub const fn amount(&self) -> u64 {
        self.amount
    }

    /// Returns the currency.
    pub const fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Whether the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Adds two amounts of the same currency.
    pub fn checked_add(&self, other: &Self) -> InvariantResult<Self> {
        if self.currency != other.currency {
            return Err(InvariantViolation::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: other.currency.clone(),
            });
        }
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(InvariantViolation::AmountOverflow)?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Multiplies the amount by a positive factor.
    pub fn multiply(&self, factor: u32) -> InvariantResult<Self> {
        if factor == 0 {
            return Err(InvariantViolation::ZeroFactor);
        }
        let amount = self
            .amount
            .checked_mul(u64::from(factor))
            .ok_or(InvariantViolation::AmountOverflow)?;
        Ok(Self::new(amount, self.currency.clone()))
    }

    /// Multiplies the amount by a line-item quantity.
    ///
    /// Quantities are at least 1, so this can only fail on overflow.
    pub fn multiply_by_quantity(&self, quantity: Quantity) -> InvariantResult<Self> {
        self.multiply(quantity.value())
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn usd(amount: u64) -> Money {
        Money::from_minor(amount, "USD").unwrap()
    }

    // CurrencyCode property tests
    proptest! {
        #[test]
        fn currency_code_accepts_three_uppercase_ascii_letters(s in "[A-Z]{3}") {
            let result = CurrencyCode::try_new(s.clone());
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap().as_ref(), &s);
        }

        #[test]
        fn currency_code_trims_surrounding_whitespace(s in " {0,5}[A-Z]{3} {0,5}") {
            let result = CurrencyCode::try_new(s.clone());
            prop_assert!(result.is_ok());
            prop_assert_eq!(result.unwrap().as_ref(), s.trim());
        }

        #[test]
        fn currency_code_rejects_wrong_lengths(s in "[A-Z]{0,2}|[A-Z]{4,8}") {
            prop_assert!(CurrencyCode::try_new(s).is_err());
        }

        #[test]
        fn currency_code_rejects_lowercase(s in "[a-z]{3}") {
            prop_assert!(CurrencyCode::try_new(s).is_err());
        }
    }

    // Money property tests
    proptest! {
        #[test]
        fn addition_is_commutative_for_same_currency(a in 0u64..=1_000_000_000, b in 0u64..=1_000_000_000) {
            let left = usd(a).checked_add(&usd(b)).unwrap();
            let right = usd(b).checked_add(&usd(a)).unwrap();
            prop_assert_eq!(left, right);
        }

        #[test]
        fn multiplication_distributes_over_addition(
            a in 0u64..=1_000_000,
            b in 0u64..=1_000_000,
            k in 1u32..=100,
        ) {
            let summed = usd(a).checked_add(&usd(b)).unwrap().multiply(k).unwrap();
            let distributed = usd(a)
                .multiply(k)
                .unwrap()
                .checked_add(&usd(b).multiply(k).unwrap())
                .unwrap();
            prop_assert_eq!(summed, distributed);
        }

        #[test]
        fn money_roundtrip_serialization(amount in 0u64..=u64::MAX, code in "[A-Z]{3}") {
            let money = Money::from_minor(amount, &code).unwrap();
            let json = serde_json::to_string(&money).unwrap();
            let deserialized: Money = serde_json::from_str(&json).unwrap();
            prop_assert_eq!(money, deserialized);
        }
    }

    #[test]
    fn currency_code_rejects_specific_invalid_inputs() {
        assert!(CurrencyCode::try_new("usd").is_err());
        assert!(CurrencyCode::try_new("US").is_err());
        assert!(CurrencyCode::try_new("USDX").is_err());
        assert!(CurrencyCode::try_new("U1D").is_err());
        assert!(CurrencyCode::try_new("").is_err());
        // Uppercase, but not ASCII
        assert!(CurrencyCode::try_new("ÅBC").is_err());
    }

    #[test]
    fn zero_has_a_zero_amount_in_the_given_currency() {
        let currency = CurrencyCode::try_new("EUR").unwrap();
        let zero = Money::zero(currency.clone());
        assert!(zero.is_zero());
        assert_eq!(zero.amount(), 0);
        assert_eq!(zero.currency(), &currency);
        assert!(!usd(1).is_zero());
    }

    #[test]
    fn checked_add_sums_same_currency_amounts() {
        let total = usd(1_050).checked_add(&usd(2_449)).unwrap();
        assert_eq!(total, usd(3_499));
    }

    #[test]
    fn checked_add_rejects_mismatched_currencies() {
        let eur = Money::from_minor(500, "EUR").unwrap();
        let err = usd(500).checked_add(&eur).unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::CurrencyMismatch {
                expected: CurrencyCode::try_new("USD").unwrap(),
                actual: CurrencyCode::try_new("EUR").unwrap(),
            }
        );
    }

    #[test]
    fn checked_add_rejects_overflow() {
        let err = usd(u64::MAX).checked_add(&usd(1)).unwrap_err();
        assert_eq!(err, InvariantViolation::AmountOverflow);
    }

    #[test]
    fn multiply_rejects_a_zero_factor() {
        let err = usd(100).multiply(0).unwrap_err();
        assert_eq!(err, InvariantViolation::ZeroFactor);
    }

    #[test]
    fn multiply_rejects_overflow() {
        let err = usd(u64::MAX / 2).multiply(3).unwrap_err();
        assert_eq!(err, InvariantViolation::AmountOverflow);
    }

    #[test]
    fn multiply_by_quantity_matches_multiply() {
        let quantity = Quantity::new(7).unwrap();
        assert_eq!(
            usd(250).multiply_by_quantity(quantity).unwrap(),
            usd(250).multiply(7).unwrap()
        );
    }

    #[test]
    fn display_shows_minor_units_and_currency() {
        assert_eq!(usd(12_345).to_string(), "12345 USD");
    }

    #[test]
    fn money_deserialization_revalidates_the_currency() {
        let err = serde_json::from_str::<Money>(r#"{"amount":500,"currency":"usd"}"#);
        assert!(err.is_err());
    }
}
