//! Core identifier and counter types for Cartwright.
//!
//! All types use smart constructors so that validity is established at
//! construction time, following the "parse, don't validate" principle.
//! Identifiers generated by this crate are UUIDv7 for time-ordered sorting;
//! externally issued UUIDs of any version are accepted via `From<Uuid>`.

use crate::errors::{InvariantResult, InvariantViolation};
use chrono::{DateTime, Utc};
use nutype::nutype;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies a product in the catalog.
///
/// The catalog itself lives outside this crate; carts and orders only ever
/// compare product ids, so any UUID is acceptable here. `new()` is a
/// convenience for tests and demos and generates a UUIDv7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generates a fresh time-ordered product id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an externally issued UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies the shopper who owns a cart or placed an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Generates a fresh time-ordered user id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an externally issued UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for UserId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifies an order aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Generates a fresh time-ordered order id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wraps an externally issued UUID.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for OrderId {
    fn from(id: Uuid) -> Self {
        Self::from_uuid(id)
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A payment-gateway intent reference.
///
/// `PaymentIntentId` values are guaranteed to be non-empty and at most 255
/// characters after trimming. The format of the string itself belongs to the
/// gateway; this crate only compares intents for equality.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 255),
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
pub struct PaymentIntentId(String);

/// How many units of a product a single line item carries.
///
/// Bounded to `1..=`[`Quantity::MAX`]. Zero and negative quantities are
/// unrepresentable, so "remove" is always an explicit operation rather than
/// a quantity of zero. Serde routes through the same validation, so a
/// snapshot cannot smuggle an out-of-range value in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The largest quantity a single line item may carry.
    pub const MAX: u32 = 100;

    /// Creates a quantity, rejecting zero and values above [`Self::MAX`].
    pub const fn new(value: u32) -> InvariantResult<Self> {
        if value == 0 || value > Self::MAX {
            return Err(InvariantViolation::QuantityOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Returns the raw count.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Adds two quantities, re-applying the upper bound.
    ///
    /// Used when merging line items for the same product; the sum of two
    /// bounded quantities cannot overflow `u32`.
    pub const fn checked_add(self, other: Self) -> InvariantResult<Self> {
        Self::new(self.0 + other.0)
    }
}

impl TryFrom<u32> for Quantity {
    type Error = InvariantViolation;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The mutation count of an aggregate.
///
/// Versions start at 0 and increment with every successful state-changing
/// mutation. The counter is advisory optimistic-locking metadata for a
/// persistence layer; this crate never branches on it.
#[nutype(
    validate(greater_or_equal = 0),
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Display,
        Into,
        Serialize,
        Deserialize
    )
)]
pub struct AggregateVersion(u64);

impl AggregateVersion {
    /// Creates the initial version (0) for a freshly constructed aggregate.
    pub fn initial() -> Self {
        Self::try_new(0).expect("0 is always a valid version")
    }

    /// Returns the next version after this one.
    #[must_use]
    pub fn next(self) -> Self {
        let current: u64 = self.into();
        Self::try_new(current + 1).expect("next version should always be valid")
    }
}

/// When an aggregate was created.
///
/// A thin wrapper over `DateTime<Utc>` so that every timestamp in the crate
/// shares one representation and serde format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp from a UTC `DateTime`.
    pub const fn new(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Creates a timestamp representing the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Returns the underlying `DateTime`.
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Converts the timestamp into the underlying `DateTime`.
    pub const fn into_datetime(self) -> DateTime<Utc> {
        self.0
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(timestamp: Timestamp) -> Self {
        timestamp.into_datetime()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
