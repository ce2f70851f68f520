//! A tiny in-memory catalog the example binaries sell from.
//!
//! A real deployment would back this with a product service; the examples
//! only need stable ids and USD prices to drive a checkout.

use anyhow::Result;
use cartwright::{Money, ProductId};
use nutype::nutype;

/// Display name for a product in example output.
#[nutype(
    sanitize(trim),
    validate(not_empty, len_char_max = 120),
    derive(Debug, Clone, PartialEq, Eq, AsRef, Display)
)]
pub struct ProductName(String);

/// One sellable product.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Identity used on cart and order lines.
    pub product_id: ProductId,
    /// Name shown in log output.
    pub name: ProductName,
    /// Price per unit, in minor units.
    pub unit_price: Money,
}

impl CatalogEntry {
    /// Creates an entry with a fresh product id.
    pub fn new(name: &str, unit_price: Money) -> Result<Self> {
        Ok(Self {
            product_id: ProductId::new(),
            name: ProductName::try_new(name)?,
            unit_price,
        })
    }
}

/// Builds the fixed catalog used by the examples.
pub fn demo_catalog() -> Result<Vec<CatalogEntry>> {
    Ok(vec![
        CatalogEntry::new("Mechanical keyboard", Money::from_minor(8_900, "USD")?)?,
        CatalogEntry::new("USB-C dock", Money::from_minor(14_500, "USD")?)?,
        CatalogEntry::new("Desk mat", Money::from_minor(2_400, "USD")?)?,
        CatalogEntry::new("Cable organizer", Money::from_minor(900, "USD")?)?,
    ])
}
