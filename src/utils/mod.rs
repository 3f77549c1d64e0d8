//! # Utilities Module
//!
//! Wave-scaled formulas used across requirements, hooks and the money ledger.

pub mod math;

pub use math::*;
