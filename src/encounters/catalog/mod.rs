//! # Encounter Catalog
//!
//! Concrete encounters shipped with the engine. Each submodule exposes a
//! `definition()` factory returning a fresh [`EncounterDefinition`].

pub mod teleporting_hijinks;

use crate::EncounterDefinition;

/// Every encounter in the catalog.
pub fn all() -> Vec<EncounterDefinition> {
    vec![teleporting_hijinks::definition()]
}
