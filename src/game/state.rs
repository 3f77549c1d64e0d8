//! # Game State Module
//!
//! The run state encounters read and mutate.
//!
//! This module contains the `GameState` struct holding the player's money,
//! the current wave and biome, and the party. Requirements evaluate against
//! it, hooks mutate it, and it doubles as the money ledger encounters charge.

use crate::config::{DEFAULT_STARTING_MONEY, MAX_PARTY_LUCK, MAX_PARTY_SIZE};
use crate::{
    wave_money_amount, Biome, EncounterEvent, PartyMember, PartyMemberId, WaveboundError,
    WaveboundResult,
};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Run state shared by every encounter.
///
/// Encounters never hold on to it; each phase receives it explicitly and
/// releases it when the phase returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Money the player can spend
    pub money: u64,
    /// Current wave number (1-based)
    pub wave_index: u32,
    /// Biome the run is currently in
    pub biome: Biome,
    /// The player's party, in lead order
    pub party: Vec<PartyMember>,
    /// Enemy levels scheduled for the current wave, if any
    pub enemy_levels: Vec<u32>,
    /// Random number generator seed for the run
    pub rng_seed: u64,
    /// Encounter statistics for player progress
    pub statistics: EncounterStatistics,
}

/// Encounter statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterStatistics {
    /// Encounters that reached their intro
    pub encounters_started: u32,
    /// Encounters that handed off to a battle
    pub encounters_resolved: u32,
    /// Encounters dismissed before an option was chosen
    pub encounters_abandoned: u32,
    /// Encounters whose hooks or battle handoff failed
    pub encounters_failed: u32,
    /// Money paid into encounters
    pub money_spent: u64,
    /// Money given back after a failed resolution
    pub money_refunded: u64,
    /// Biome changes caused by encounters
    pub biome_changes: u32,
}

impl EncounterStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on an encounter event.
    pub fn update_from_event(&mut self, event: &EncounterEvent) {
        match event {
            EncounterEvent::Started { .. } => {
                self.encounters_started += 1;
            }
            EncounterEvent::MoneyCharged { amount } => {
                self.money_spent += amount;
            }
            EncounterEvent::MoneyRefunded { amount } => {
                self.money_spent = self.money_spent.saturating_sub(*amount);
                self.money_refunded += amount;
            }
            EncounterEvent::BiomeChanged { .. } => {
                self.biome_changes += 1;
            }
            EncounterEvent::HandedOff { .. } => {
                self.encounters_resolved += 1;
            }
            EncounterEvent::Abandoned { .. } => {
                self.encounters_abandoned += 1;
            }
            EncounterEvent::Failed { .. } => {
                self.encounters_failed += 1;
            }
            EncounterEvent::OptionSelected { .. } => {}
        }
    }
}

impl GameState {
    /// Creates a new run at wave 1 in town with the default starting money.
    ///
    /// # Examples
    ///
    /// ```
    /// use wavebound::{Biome, GameState};
    ///
    /// let state = GameState::new(12345);
    /// assert_eq!(state.wave_index, 1);
    /// assert_eq!(state.biome, Biome::Town);
    /// assert!(state.party.is_empty());
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            money: DEFAULT_STARTING_MONEY,
            wave_index: 1,
            biome: Biome::Town,
            party: Vec::new(),
            enemy_levels: Vec::new(),
            rng_seed: seed,
            statistics: EncounterStatistics::new(),
        }
    }

    /// Sets the player's money.
    pub fn with_money(mut self, money: u64) -> Self {
        self.money = money;
        self
    }

    /// Sets the current wave.
    pub fn with_wave(mut self, wave_index: u32) -> Self {
        self.wave_index = wave_index;
        self
    }

    /// Sets the current biome.
    pub fn with_biome(mut self, biome: Biome) -> Self {
        self.biome = biome;
        self
    }

    /// Adds a member to the party.
    ///
    /// Fails when the party is already full.
    pub fn add_party_member(&mut self, member: PartyMember) -> WaveboundResult<PartyMemberId> {
        if self.party.len() >= MAX_PARTY_SIZE {
            return Err(WaveboundError::InvalidState(format!(
                "party is full ({} members)",
                MAX_PARTY_SIZE
            )));
        }
        let id = member.id;
        self.party.push(member);
        Ok(id)
    }

    /// Gets a party member by ID.
    pub fn get_party_member(&self, id: PartyMemberId) -> Option<&PartyMember> {
        self.party.iter().find(|member| member.id == id)
    }

    /// Gets a party member mutably by ID.
    pub fn get_party_member_mut(&mut self, id: PartyMemberId) -> Option<&mut PartyMember> {
        self.party.iter_mut().find(|member| member.id == id)
    }

    /// The first party member still able to fight.
    pub fn lead_member(&self) -> Option<&PartyMember> {
        self.party.iter().find(|member| !member.is_fainted())
    }

    /// Money value of the current wave scaled by `multiplier`.
    pub fn wave_money_amount(&self, multiplier: f64) -> u64 {
        wave_money_amount(self.wave_index, multiplier)
    }

    /// Removes money from the player. Never fails; stops at zero.
    pub fn deduct_money(&mut self, amount: u64) {
        let before = self.money;
        self.money = self.money.saturating_sub(amount);
        debug!("Money {} -> {} (-{})", before, self.money, amount);
    }

    /// Gives money to the player.
    pub fn add_money(&mut self, amount: u64) {
        let before = self.money;
        self.money = self.money.saturating_add(amount);
        debug!("Money {} -> {} (+{})", before, self.money, amount);
    }

    /// Combined luck of the party, capped for species rolls.
    pub fn party_luck_value(&self) -> u32 {
        self.party
            .iter()
            .map(|member| member.luck)
            .sum::<u32>()
            .min(MAX_PARTY_LUCK)
    }

    /// Enemy level scheduled for the lead enemy of this wave.
    pub fn scheduled_enemy_level(&self) -> Option<u32> {
        self.enemy_levels.first().copied()
    }

    /// Seed for an encounter started on the current wave.
    ///
    /// Replaying a wave from the same run seed reproduces the same rolls.
    pub fn encounter_seed(&self) -> u64 {
        self.rng_seed ^ (self.wave_index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    /// Processes an encounter event, updating statistics.
    pub fn process_event(&mut self, event: &EncounterEvent) {
        self.statistics.update_from_event(event);
    }

    /// Saves game state to JSON.
    pub fn save_to_json(&self) -> WaveboundResult<String> {
        serde_json::to_string_pretty(self).map_err(WaveboundError::from)
    }

    /// Loads game state from JSON.
    pub fn load_from_json(json: &str) -> WaveboundResult<Self> {
        serde_json::from_str(json).map_err(WaveboundError::from)
    }

    /// Saves game state to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> WaveboundResult<()> {
        std::fs::write(path, self.save_to_json()?)?;
        Ok(())
    }

    /// Loads game state from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> WaveboundResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::load_from_json(&json)
    }
}
