//! Example flows built on the `cartwright` domain library.
//!
//! This crate provides small runnable programs demonstrating how carts and
//! orders move through a checkout, and a shared in-memory catalog the
//! examples sell from.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// A fixed product catalog for the example binaries.
pub mod catalog;
