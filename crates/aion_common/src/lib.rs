//! Shared foundational types used across the resizer toolchain.
//!
//! This crate provides core types including interned identifiers and the
//! common internal result type shared by every downstream crate.

#![warn(missing_docs)]

pub mod ident;
pub mod result;

pub use ident::{Ident, Interner};
pub use result::{AionResult, InternalError};
