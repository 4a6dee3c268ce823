//! RupeeConv Common Types
//!
//! Shared types for the INR to USD converter: parsed amounts, Indian
//! numbering units, exchange rates with their quoting convention, validation
//! errors and number formatting.

pub mod monetary;
pub mod error;
pub mod format;

pub use monetary::*;
pub use error::*;
pub use format::*;
