//! # Battle Handoff
//!
//! The enemy party an encounter prepares, and the trait through which it is
//! handed to the battle system.

use crate::{
    BattleStat, BattlerTag, DialogueTokens, ElementType, SpeciesId, WaveboundError,
    WaveboundResult,
};
use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};

/// Snapshot of a generated enemy, used to recreate it exactly in battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonData {
    pub species: SpeciesId,
    pub name: String,
    pub level: u32,
    pub types: Vec<ElementType>,
}

/// Effect applied when an enemy carrying [`BattlerTag::EncounterPostSummon`] enters battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummonEffect {
    /// Queue a battle message
    QueueMessage { key: String, tokens: DialogueTokens },
    /// Raise or lower stat stages on the summoned enemy
    StatStageChange { stats: Vec<BattleStat>, stages: i8 },
}

/// One enemy in the party an encounter hands to battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPokemonConfig {
    pub level: u32,
    pub species: SpeciesId,
    pub source_data: Option<PokemonData>,
    pub is_boss: bool,
    pub tags: Vec<BattlerTag>,
    pub on_summon_effects: Vec<SummonEffect>,
}

/// Enemy party produced by an option's resolution hook.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyPartyConfig {
    pub pokemon_configs: Vec<EnemyPokemonConfig>,
    /// Whether the player may catch these enemies; set from the encounter at handoff
    #[serde(default)]
    pub catch_allowed: bool,
}

impl EnemyPartyConfig {
    /// A party with a single enemy.
    pub fn single(config: EnemyPokemonConfig) -> Self {
        Self {
            pokemon_configs: vec![config],
            catch_allowed: false,
        }
    }

    /// Checks the party can be handed to battle.
    pub fn validate(&self) -> WaveboundResult<()> {
        if self.pokemon_configs.is_empty() {
            return Err(WaveboundError::InvalidState(
                "enemy party has no members".to_string(),
            ));
        }
        if let Some(config) = self.pokemon_configs.iter().find(|c| c.level == 0) {
            return Err(WaveboundError::InvalidState(format!(
                "enemy {} has level 0",
                config.species
            )));
        }
        Ok(())
    }
}

/// The battle system, as seen from an encounter.
///
/// Receives exactly one enemy party per completed encounter.
#[async_trait]
pub trait BattleInitializer: Send + Sync {
    /// Starts a battle against `config`.
    async fn init_battle(&self, config: &EnemyPartyConfig) -> WaveboundResult<()>;
}

/// Battle initializer that only logs the party it receives.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBattleInitializer;

#[async_trait]
impl BattleInitializer for LoggingBattleInitializer {
    async fn init_battle(&self, config: &EnemyPartyConfig) -> WaveboundResult<()> {
        for enemy in &config.pokemon_configs {
            let name = enemy
                .source_data
                .as_ref()
                .map(|data| data.name.as_str())
                .unwrap_or("?");
            info!(
                "Battle starts: {} {} Lv.{}{}{}",
                name,
                enemy.species,
                enemy.level,
                if enemy.is_boss { " (boss)" } else { "" },
                if config.catch_allowed { ", catchable" } else { "" }
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(level: u32) -> EnemyPokemonConfig {
        EnemyPokemonConfig {
            level,
            species: SpeciesId(7),
            source_data: None,
            is_boss: true,
            tags: vec![],
            on_summon_effects: vec![],
        }
    }

    #[test]
    fn test_empty_party_is_invalid() {
        assert!(EnemyPartyConfig::default().validate().is_err());
    }

    #[test]
    fn test_level_zero_is_invalid() {
        assert!(EnemyPartyConfig::single(enemy(0)).validate().is_err());
        assert!(EnemyPartyConfig::single(enemy(12)).validate().is_ok());
    }

    #[test]
    fn test_logging_initializer_accepts_party() {
        let result = tokio_test::block_on(
            LoggingBattleInitializer.init_battle(&EnemyPartyConfig::single(enemy(5))),
        );
        tokio_test::assert_ok!(result);
    }
}
