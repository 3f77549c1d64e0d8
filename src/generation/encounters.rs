//! # Encounter Selection
//!
//! Registry of encounter definitions and the seeded roll that picks one for
//! the current wave.

use crate::{
    EncounterDefinition, EncounterTier, GameState, TierWeights, WaveboundError, WaveboundResult,
};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Known encounters, keyed by id.
#[derive(Debug, Default)]
pub struct EncounterRegistry {
    definitions: BTreeMap<String, Arc<EncounterDefinition>>,
}

impl EncounterRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every catalog encounter.
    pub fn with_catalog() -> WaveboundResult<Self> {
        let mut registry = Self::new();
        for definition in crate::encounters::catalog::all() {
            registry.register(definition)?;
        }
        info!("Registered {} catalog encounter(s)", registry.len());
        Ok(registry)
    }

    /// Adds a definition after validating it. Ids must be unique.
    pub fn register(&mut self, definition: EncounterDefinition) -> WaveboundResult<()> {
        definition.validate()?;
        if self.definitions.contains_key(&definition.id) {
            return Err(WaveboundError::InvalidConfig(format!(
                "encounter '{}' registered twice",
                definition.id
            )));
        }
        debug!("Registered encounter '{}' ({:?})", definition.id, definition.tier);
        self.definitions
            .insert(definition.id.clone(), Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<Arc<EncounterDefinition>> {
        self.definitions.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Encounters whose wave range and scene requirements hold, in id order.
    pub fn available(&self, state: &GameState) -> Vec<Arc<EncounterDefinition>> {
        self.definitions
            .values()
            .filter(|definition| definition.is_available(state))
            .cloned()
            .collect()
    }

    /// Rolls an encounter for the current wave.
    ///
    /// A tier is rolled first by weight, among tiers that have at least one
    /// qualifying encounter; then an encounter is picked uniformly within it.
    /// Returns `None` when nothing qualifies.
    pub fn select(
        &self,
        state: &GameState,
        weights: &TierWeights,
        rng: &mut StdRng,
    ) -> Option<Arc<EncounterDefinition>> {
        let available = self.available(state);
        let tiers: Vec<(EncounterTier, u32)> = EncounterTier::all()
            .into_iter()
            .filter(|tier| available.iter().any(|def| def.tier == *tier))
            .map(|tier| (tier, weights.weight(tier)))
            .filter(|(_, weight)| *weight > 0)
            .collect();

        let total: u64 = tiers.iter().map(|(_, weight)| u64::from(*weight)).sum();
        if total == 0 {
            debug!("No encounter qualifies on wave {}", state.wave_index);
            return None;
        }

        let mut roll = rng.gen_range(0..total);
        let mut chosen = tiers[0].0;
        for (tier, weight) in &tiers {
            let weight = u64::from(*weight);
            if roll < weight {
                chosen = *tier;
                break;
            }
            roll -= weight;
        }

        let in_tier: Vec<&Arc<EncounterDefinition>> =
            available.iter().filter(|def| def.tier == chosen).collect();
        let picked = in_tier[rng.gen_range(0..in_tier.len())];
        debug!("Selected '{}' from tier {:?}", picked.id, chosen);
        Some(Arc::clone(picked))
    }
}
