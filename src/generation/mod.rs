//! # Generation Module
//!
//! Seeded content rolls: which encounter appears, which biome an encounter
//! sends the player to, which species attacks, and what rewards are offered.
//!
//! Every roll takes an explicit `StdRng` so that a run replayed from the same
//! seed reproduces the same encounters and the same enemies.

pub mod biomes;
pub mod encounters;
pub mod items;
pub mod species;

pub use biomes::*;
pub use encounters::*;
pub use items::*;
pub use species::*;

use crate::{EncounterTier, WaveboundError, WaveboundResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Relative weight of each encounter tier when rolling an encounter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierWeights {
    pub common: u32,
    pub great: u32,
    pub ultra: u32,
    pub rogue: u32,
}

impl TierWeights {
    /// Weight assigned to a tier.
    pub fn weight(&self, tier: EncounterTier) -> u32 {
        match tier {
            EncounterTier::Common => self.common,
            EncounterTier::Great => self.great,
            EncounterTier::Ultra => self.ultra,
            EncounterTier::Rogue => self.rogue,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> u64 {
        [self.common, self.great, self.ultra, self.rogue]
            .iter()
            .map(|weight| u64::from(*weight))
            .sum()
    }
}

impl Default for TierWeights {
    fn default() -> Self {
        Self {
            common: 66,
            great: 40,
            ultra: 19,
            rogue: 3,
        }
    }
}

/// Configuration for encounter generation and pacing.
///
/// Controls the seed encounters are rolled from, how likely each tier is,
/// and how long the console presentation lingers on text and animations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterConfig {
    /// Random seed for reproducible runs
    pub seed: u64,
    /// Tier weights for encounter selection
    pub tier_weights: TierWeights,
    /// Milliseconds each dialogue entry stays up
    pub text_delay_ms: u64,
    /// Milliseconds a biome slide takes
    pub animation_ms: u64,
}

impl EncounterConfig {
    /// Creates a default encounter configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use wavebound::EncounterConfig;
    ///
    /// let config = EncounterConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.tier_weights.common > config.tier_weights.rogue);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            tier_weights: TierWeights::default(),
            text_delay_ms: 400,
            animation_ms: 2000,
        }
    }

    /// Creates a configuration for testing with no pacing delays.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            seed,
            tier_weights: TierWeights::default(),
            text_delay_ms: 0,
            animation_ms: 0,
        }
    }

    /// Delay applied after each dialogue entry.
    pub fn text_delay(&self) -> Duration {
        Duration::from_millis(self.text_delay_ms)
    }

    /// Duration of a biome slide.
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_ms)
    }

    /// Checks the configuration can be used to roll encounters.
    pub fn validate(&self) -> WaveboundResult<()> {
        if self.tier_weights.total() == 0 {
            return Err(WaveboundError::InvalidConfig(
                "all encounter tier weights are zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> WaveboundResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Creates a seeded random number generator.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}
