//! Testing utilities for Cartwright.
//!
//! Enabled with the `testing` feature. The submodules cover the three things
//! a test suite keeps reinventing:
//!
//! - [`generators`]: `proptest` strategies for every domain type
//! - [`builders`]: fluent builders that assemble valid aggregates through
//!   the public mutators
//! - [`assertions`]: invariant checks that panic with context
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use cartwright::testing::prelude::*;
//! use proptest::prelude::*;
//!
//! proptest! {
//!     #[test]
//!     fn totals_stay_consistent(items in arb_line_items_in(usd(), 5)) {
//!         let cart = CartBuilder::new().items(items).build();
//!         assert_cart_consistent(&cart);
//!     }
//! }
//! ```

pub mod assertions;
pub mod builders;
pub mod generators;

/// Prelude module for convenient imports.
///
/// Import everything needed for testing with:
/// ```rust,ignore
/// use cartwright::testing::prelude::*;
/// ```
pub mod prelude {
    pub use super::assertions::*;
    pub use super::builders::*;
    pub use super::generators::*;
}
