//! Shared foundational types for the fen hardware-description core.
//!
//! This crate provides interned identifiers and the minimal-width
//! arithmetic helpers used throughout the IR and elaboration crates.

#![warn(missing_docs)]

pub mod bits;
pub mod ident;

pub use bits::{bits_for, bits_for_range};
pub use ident::{Ident, Interner};
