//! # Encounter Definitions
//!
//! Immutable descriptors for encounters and their options.
//!
//! Definitions are plain data assembled by factory functions (see
//! [`crate::encounters::catalog`]) and shared behind an `Arc`. Behaviour that runs when
//! an option is picked is attached as hook objects; hooks receive everything
//! they touch through an explicit [`EncounterContext`].

use crate::config::MAX_ENCOUNTER_OPTIONS;
use crate::{
    all_satisfied, EncounterContext, EncounterRuntimeState, EnemyPartyConfig, GameState,
    PartyMemberId, Requirement, WaveboundError, WaveboundResult,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity class of an encounter; decides how often it is rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EncounterTier {
    Common,
    Great,
    Ultra,
    Rogue,
}

impl EncounterTier {
    /// All tiers from most to least common.
    pub fn all() -> [EncounterTier; 4] {
        [
            EncounterTier::Common,
            EncounterTier::Great,
            EncounterTier::Ultra,
            EncounterTier::Rogue,
        ]
    }
}

/// Inclusive range of waves an encounter may appear on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveRange {
    pub min: u32,
    pub max: u32,
}

impl WaveRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, wave: u32) -> bool {
        (self.min..=self.max).contains(&wave)
    }
}

/// A sprite shown while the encounter is introduced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteConfig {
    pub sprite_key: String,
    pub file_root: String,
    pub has_shadow: bool,
    pub x: i32,
    pub y: i32,
}

/// Intro visuals of an encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroVisuals {
    pub sprites: Vec<SpriteConfig>,
    /// Remove the sprites automatically once an option is picked
    pub auto_hide: bool,
}

/// Dialogue keys of an encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDialogue {
    pub title: String,
    pub description: String,
    pub query: String,
    /// Shown in order before the options appear
    pub intro: Vec<String>,
}

/// Dialogue keys of a single option.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDialogue {
    pub button_label: String,
    pub button_tooltip: String,
    /// Shown in order once the option has been picked
    pub selected: Vec<String>,
}

/// How an option behaves when its requirements are unmet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionMode {
    /// Hidden unless its requirements hold
    Default,
    /// Shown greyed out unless its requirements hold
    DisabledOrDefault,
}

/// Whether the player can see and pick an option right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OptionAvailability {
    Selectable,
    Disabled,
    Hidden,
}

/// Runs once when an encounter instance is created; typically computes
/// values (prices, names) and stores them as tokens or in `misc`.
pub type OnInit = fn(&GameState, &mut EncounterRuntimeState) -> WaveboundResult<()>;

/// Side effects that must land before the option's outcome is shown,
/// such as taking payment.
#[async_trait]
pub trait PrePhaseHook: fmt::Debug + Send + Sync {
    async fn run(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<()>;
}

/// The body of an option: mutates the world, assigns rewards and builds
/// the enemy party to fight.
#[async_trait]
pub trait ResolutionHook: fmt::Debug + Send + Sync {
    async fn resolve(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig>;
}

/// One selectable branch of an encounter.
#[derive(Debug)]
pub struct OptionDefinition {
    pub mode: OptionMode,
    pub requirements: Vec<Box<dyn Requirement>>,
    pub dialogue: OptionDialogue,
    pub pre_phase: Option<Box<dyn PrePhaseHook>>,
    pub resolution: Box<dyn ResolutionHook>,
}

impl OptionDefinition {
    /// An option with no requirements and no pre-phase.
    pub fn simple(dialogue: OptionDialogue, resolution: Box<dyn ResolutionHook>) -> Self {
        Self {
            mode: OptionMode::Default,
            requirements: Vec::new(),
            dialogue,
            pre_phase: None,
            resolution,
        }
    }

    /// Whether all of the option's requirements hold.
    pub fn requirements_met(&self, state: &GameState) -> bool {
        all_satisfied(&self.requirements, state)
    }

    /// How the option should be presented against `state`.
    pub fn availability(&self, state: &GameState) -> OptionAvailability {
        if self.requirements_met(state) {
            return OptionAvailability::Selectable;
        }
        match self.mode {
            OptionMode::Default => OptionAvailability::Hidden,
            OptionMode::DisabledOrDefault => OptionAvailability::Disabled,
        }
    }

    /// Members able to act for this option, or `None` if the option has no
    /// member requirement.
    ///
    /// With several member requirements, a member must satisfy all of them.
    pub fn qualifying_members(&self, state: &GameState) -> Option<Vec<PartyMemberId>> {
        let mut result: Option<Vec<PartyMemberId>> = None;
        for members in self
            .requirements
            .iter()
            .filter_map(|req| req.qualifying_members(state))
        {
            result = Some(match result {
                None => members,
                Some(previous) => previous.into_iter().filter(|id| members.contains(id)).collect(),
            });
        }
        result
    }
}

/// Immutable description of an encounter.
#[derive(Debug)]
pub struct EncounterDefinition {
    /// Stable identifier, also the dialogue namespace suffix
    pub id: String,
    pub tier: EncounterTier,
    pub wave_range: WaveRange,
    /// Scene requirements; all must hold for the encounter to be rolled
    pub requirements: Vec<Box<dyn Requirement>>,
    pub intro: IntroVisuals,
    pub dialogue: EncounterDialogue,
    /// Whether the enemy can be caught in the resulting battle
    pub catch_allowed: bool,
    pub on_init: Option<OnInit>,
    pub options: Vec<OptionDefinition>,
}

impl EncounterDefinition {
    /// Checks structural constraints on the definition.
    pub fn validate(&self) -> WaveboundResult<()> {
        if self.id.is_empty() {
            return Err(WaveboundError::InvalidConfig(
                "encounter id is empty".to_string(),
            ));
        }
        if self.options.is_empty() {
            return Err(WaveboundError::InvalidConfig(format!(
                "encounter '{}' has no options",
                self.id
            )));
        }
        if self.options.len() > MAX_ENCOUNTER_OPTIONS {
            return Err(WaveboundError::InvalidConfig(format!(
                "encounter '{}' has {} options (max {})",
                self.id,
                self.options.len(),
                MAX_ENCOUNTER_OPTIONS
            )));
        }
        if self.wave_range.min > self.wave_range.max {
            return Err(WaveboundError::InvalidConfig(format!(
                "encounter '{}' has an empty wave range {}..={}",
                self.id, self.wave_range.min, self.wave_range.max
            )));
        }
        Ok(())
    }

    /// Whether the encounter may appear against `state`.
    pub fn is_available(&self, state: &GameState) -> bool {
        self.wave_range.contains(state.wave_index) && all_satisfied(&self.requirements, state)
    }

    /// Gets an option by index.
    pub fn option(&self, index: usize) -> Option<&OptionDefinition> {
        self.options.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ElementType, MoneyRequirement, PartyMember, PartyTypeRequirement, SpeciesId,
    };

    #[derive(Debug)]
    struct NoBattle;

    #[async_trait]
    impl ResolutionHook for NoBattle {
        async fn resolve(&self, _ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig> {
            Ok(EnemyPartyConfig::default())
        }
    }

    fn option(mode: OptionMode, requirements: Vec<Box<dyn Requirement>>) -> OptionDefinition {
        OptionDefinition {
            mode,
            requirements,
            dialogue: OptionDialogue::default(),
            pre_phase: None,
            resolution: Box::new(NoBattle),
        }
    }

    fn definition(options: Vec<OptionDefinition>) -> EncounterDefinition {
        EncounterDefinition {
            id: "test".to_string(),
            tier: EncounterTier::Common,
            wave_range: WaveRange::new(10, 20),
            requirements: vec![Box::new(MoneyRequirement::fixed(100))],
            intro: IntroVisuals::default(),
            dialogue: EncounterDialogue::default(),
            catch_allowed: false,
            on_init: None,
            options,
        }
    }

    #[test]
    fn test_availability_by_mode() {
        let poor = GameState::new(1).with_money(0);
        let rich = GameState::new(1).with_money(1000);

        let hidden = option(OptionMode::Default, vec![Box::new(MoneyRequirement::fixed(500))]);
        let greyed = option(
            OptionMode::DisabledOrDefault,
            vec![Box::new(MoneyRequirement::fixed(500))],
        );

        assert_eq!(hidden.availability(&poor), OptionAvailability::Hidden);
        assert_eq!(greyed.availability(&poor), OptionAvailability::Disabled);
        assert_eq!(hidden.availability(&rich), OptionAvailability::Selectable);
        assert_eq!(greyed.availability(&rich), OptionAvailability::Selectable);
    }

    #[test]
    fn test_qualifying_members_intersect() {
        let mut state = GameState::new(1);
        let both = state
            .add_party_member(PartyMember::new(
                "both",
                SpeciesId(1),
                10,
                vec![ElementType::Steel, ElementType::Electric],
            ))
            .unwrap();
        state
            .add_party_member(PartyMember::new("steel", SpeciesId(2), 10, vec![ElementType::Steel]))
            .unwrap();

        let opt = option(
            OptionMode::Default,
            vec![
                Box::new(PartyTypeRequirement::new(vec![ElementType::Steel], true, 1)),
                Box::new(PartyTypeRequirement::new(vec![ElementType::Electric], true, 1)),
            ],
        );
        assert_eq!(opt.qualifying_members(&state), Some(vec![both]));

        let plain = option(OptionMode::Default, vec![Box::new(MoneyRequirement::fixed(0))]);
        assert_eq!(plain.qualifying_members(&state), None);
    }

    #[test]
    fn test_encounter_availability() {
        let def = definition(vec![option(OptionMode::Default, vec![])]);
        assert!(def.is_available(&GameState::new(1).with_wave(15).with_money(100)));
        assert!(!def.is_available(&GameState::new(1).with_wave(21).with_money(100)));
        assert!(!def.is_available(&GameState::new(1).with_wave(15).with_money(99)));
    }

    #[test]
    fn test_validate() {
        assert!(definition(vec![]).validate().is_err());
        assert!(definition(vec![option(OptionMode::Default, vec![])]).validate().is_ok());

        let too_many = (0..5).map(|_| option(OptionMode::Default, vec![])).collect();
        assert!(definition(too_many).validate().is_err());

        let mut inverted = definition(vec![option(OptionMode::Default, vec![])]);
        inverted.wave_range = WaveRange::new(30, 20);
        assert!(inverted.validate().is_err());
    }
}
