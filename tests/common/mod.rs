//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use wavebound::{
    BattleInitializer, Biome, ElementType, EnemyPartyConfig, GameState, PartyMember,
    PresentationEvent, RecordingPresentation, SpeciesId, WaveboundError, WaveboundResult,
};

/// Battle initializer that remembers every party it receives, together with
/// what the presentation had finished playing at that moment.
#[derive(Clone, Default)]
pub struct RecordingBattleInitializer {
    pub parties: Arc<Mutex<Vec<EnemyPartyConfig>>>,
    pub seen_at_handoff: Arc<Mutex<Vec<PresentationEvent>>>,
    presentation: Option<RecordingPresentation>,
}

impl RecordingBattleInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots `presentation` whenever a battle starts.
    pub fn watching(presentation: &RecordingPresentation) -> Self {
        Self {
            presentation: Some(presentation.clone()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.parties.lock().unwrap().len()
    }

    pub fn parties(&self) -> Vec<EnemyPartyConfig> {
        self.parties.lock().unwrap().clone()
    }

    pub fn seen_at_handoff(&self) -> Vec<PresentationEvent> {
        self.seen_at_handoff.lock().unwrap().clone()
    }
}

#[async_trait]
impl BattleInitializer for RecordingBattleInitializer {
    async fn init_battle(&self, config: &EnemyPartyConfig) -> WaveboundResult<()> {
        if let Some(presentation) = &self.presentation {
            *self.seen_at_handoff.lock().unwrap() = presentation.events();
        }
        self.parties.lock().unwrap().push(config.clone());
        Ok(())
    }
}

/// Battle initializer that always refuses.
pub struct RefusingBattleInitializer;

#[async_trait]
impl BattleInitializer for RefusingBattleInitializer {
    async fn init_battle(&self, _config: &EnemyPartyConfig) -> WaveboundResult<()> {
        Err(WaveboundError::BattleInitFailed("arena unavailable".to_string()))
    }
}

/// Wave 42 in the plains with a Fire lead and a Steel/Electric helper.
pub fn wave_42_state(money: u64) -> GameState {
    let mut state = GameState::new(2024)
        .with_wave(42)
        .with_money(money)
        .with_biome(Biome::Plains);
    state
        .add_party_member(PartyMember::new("Ember", SpeciesId(4), 40, vec![ElementType::Fire]))
        .unwrap();
    state
        .add_party_member(PartyMember::new(
            "Coil",
            SpeciesId(81),
            38,
            vec![ElementType::Electric, ElementType::Steel],
        ))
        .unwrap();
    state
}

/// Wave 42 with a party that has no Steel or Electric member.
pub fn wave_42_state_without_helpers(money: u64) -> GameState {
    let mut state = GameState::new(2024)
        .with_wave(42)
        .with_money(money)
        .with_biome(Biome::Plains);
    state
        .add_party_member(PartyMember::new("Ember", SpeciesId(4), 40, vec![ElementType::Fire]))
        .unwrap();
    state
        .add_party_member(PartyMember::new("Drizzle", SpeciesId(7), 39, vec![ElementType::Water]))
        .unwrap();
    state
}

pub fn member_id(state: &GameState, name: &str) -> wavebound::PartyMemberId {
    state
        .party
        .iter()
        .find(|member| member.name == name)
        .map(|member| member.id)
        .unwrap()
}
