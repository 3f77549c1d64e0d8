//! # Encounters Module
//!
//! Encounter definitions, the requirements that gate them, and the state
//! machine that runs a single encounter from its intro to battle handoff.

pub mod battle;
pub mod catalog;
pub mod controller;
pub mod definition;
pub mod requirements;
pub mod runtime;

pub use battle::*;
pub use controller::*;
pub use definition::*;
pub use requirements::*;
pub use runtime::*;
