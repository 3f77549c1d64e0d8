//! # Encounter Runtime State
//!
//! Per-instance state created when an encounter starts and dropped when it
//! hands off to battle or is abandoned, plus the context object hooks
//! receive.

use crate::{
    create_rng, Biome, DialogueTokens, EncounterEvent, ExpAward, GameState, PartyMemberId,
    Presentation, PresentationTask, RewardOptions, SpeciesGenerator, TaskBarrier,
    WaveboundError, WaveboundResult,
};
use log::debug;
use rand::rngs::StdRng;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Transient state of one encounter instance.
#[derive(Debug)]
pub struct EncounterRuntimeState {
    seed: u64,
    rng: StdRng,
    tokens: DialogueTokens,
    misc: Map<String, Value>,
    option_primaries: BTreeMap<usize, PartyMemberId>,
    primary_member: Option<PartyMemberId>,
    rewards: Option<RewardOptions>,
    exp: Option<ExpAward>,
    money_charged: u64,
    background: TaskBarrier,
    events: Vec<EncounterEvent>,
}

impl EncounterRuntimeState {
    /// Creates empty runtime state with a generator seeded from `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: create_rng(seed),
            tokens: DialogueTokens::new(),
            misc: Map::new(),
            option_primaries: BTreeMap::new(),
            primary_member: None,
            rewards: None,
            exp: None,
            money_charged: 0,
            background: TaskBarrier::new(),
            events: Vec::new(),
        }
    }

    /// Seed the instance's generator was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The instance's random number generator.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    /// Sets a dialogue token.
    pub fn set_token(&mut self, key: impl Into<String>, value: impl ToString) {
        self.tokens.insert(key.into(), value.to_string());
    }

    /// Gets a dialogue token.
    pub fn token(&self, key: &str) -> Option<&str> {
        self.tokens.get(key).map(String::as_str)
    }

    /// All dialogue tokens.
    pub fn tokens(&self) -> &DialogueTokens {
        &self.tokens
    }

    /// Stores a value in the scratch map for later phases.
    pub fn set_misc(&mut self, key: impl Into<String>, value: impl Serialize) -> WaveboundResult<()> {
        self.misc.insert(key.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Reads a value from the scratch map.
    pub fn misc(&self, key: &str) -> Option<&Value> {
        self.misc.get(key)
    }

    /// Reads an unsigned integer from the scratch map.
    pub fn misc_u64(&self, key: &str) -> WaveboundResult<u64> {
        self.misc
            .get(key)
            .and_then(Value::as_u64)
            .ok_or_else(|| WaveboundError::InvalidState(format!("misc value '{}' is not set", key)))
    }

    /// Records the member an option would act through.
    pub(crate) fn set_option_primary(&mut self, option: usize, member: PartyMemberId) {
        self.option_primaries.insert(option, member);
    }

    /// Member picked for an option during init, if any.
    pub fn option_primary(&self, option: usize) -> Option<PartyMemberId> {
        self.option_primaries.get(&option).copied()
    }

    pub(crate) fn set_primary_member(&mut self, member: Option<PartyMemberId>) {
        self.primary_member = member;
    }

    /// Member the chosen option acts through.
    pub fn primary_member(&self) -> Option<PartyMemberId> {
        self.primary_member
    }

    /// Assigns the post-battle reward screen. May be called once.
    pub fn set_rewards(&mut self, rewards: RewardOptions) -> WaveboundResult<()> {
        if self.rewards.is_some() {
            return Err(WaveboundError::InvariantViolation(
                "rewards assigned twice in one resolution".to_string(),
            ));
        }
        debug!("Rewards set: {:?}", rewards);
        self.rewards = Some(rewards);
        Ok(())
    }

    /// Assigns experience to a party member. May be called once.
    pub fn set_exp(&mut self, member: PartyMemberId, amount: u32) -> WaveboundResult<()> {
        if self.exp.is_some() {
            return Err(WaveboundError::InvariantViolation(
                "experience assigned twice in one resolution".to_string(),
            ));
        }
        debug!("Exp set: {} -> {}", amount, member);
        self.exp = Some(ExpAward { member, amount });
        Ok(())
    }

    pub fn rewards(&self) -> Option<&RewardOptions> {
        self.rewards.as_ref()
    }

    pub fn exp(&self) -> Option<ExpAward> {
        self.exp
    }

    /// Money taken from the player by this instance so far.
    pub fn money_charged(&self) -> u64 {
        self.money_charged
    }

    /// Events recorded by this instance, in order.
    pub fn events(&self) -> &[EncounterEvent] {
        &self.events
    }

    pub(crate) fn take_events(&mut self) -> Vec<EncounterEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn take_rewards(&mut self) -> (Option<RewardOptions>, Option<ExpAward>) {
        (self.rewards.take(), self.exp.take())
    }

    pub(crate) fn background(&mut self) -> &mut TaskBarrier {
        &mut self.background
    }

    /// Applies an event to the game state and records it.
    pub(crate) fn emit(&mut self, state: &mut GameState, event: EncounterEvent) {
        match &event {
            EncounterEvent::MoneyCharged { amount } => self.money_charged += amount,
            EncounterEvent::MoneyRefunded { amount } => {
                self.money_charged = self.money_charged.saturating_sub(*amount)
            }
            _ => {}
        }
        state.process_event(&event);
        self.events.push(event);
    }
}

/// Collaborators an encounter talks to while it runs.
#[derive(Clone, Copy)]
pub struct EncounterServices<'a> {
    pub presentation: &'a dyn Presentation,
    pub species: &'a dyn SpeciesGenerator,
}

impl<'a> EncounterServices<'a> {
    pub fn new(presentation: &'a dyn Presentation, species: &'a dyn SpeciesGenerator) -> Self {
        Self {
            presentation,
            species,
        }
    }
}

/// Everything a hook may read or change, passed explicitly.
pub struct EncounterContext<'a> {
    pub state: &'a mut GameState,
    pub runtime: &'a mut EncounterRuntimeState,
    pub services: EncounterServices<'a>,
}

impl<'a> EncounterContext<'a> {
    pub fn new(
        state: &'a mut GameState,
        runtime: &'a mut EncounterRuntimeState,
        services: EncounterServices<'a>,
    ) -> Self {
        Self {
            state,
            runtime,
            services,
        }
    }

    /// Shows a dialogue entry with the instance's current tokens.
    pub fn show_text(&self, key: &str) -> PresentationTask {
        self.services
            .presentation
            .show_text(key, self.runtime.tokens())
    }

    /// Takes money from the player and remembers it for a possible refund.
    pub fn charge_money(&mut self, amount: u64) {
        self.state.deduct_money(amount);
        self.runtime
            .emit(self.state, EncounterEvent::MoneyCharged { amount });
    }

    /// Moves the run to another biome.
    pub fn change_biome(&mut self, to: Biome) {
        let from = self.state.biome;
        self.state.biome = to;
        self.runtime
            .emit(self.state, EncounterEvent::BiomeChanged { from, to });
    }

    /// Starts a presentation task the encounter will wait for before handoff.
    pub fn spawn_background(&mut self, name: impl Into<String>, task: PresentationTask) {
        self.runtime.background().spawn(name, task);
    }

    /// Member the chosen option acts through.
    pub fn primary_member(&self) -> WaveboundResult<PartyMemberId> {
        self.runtime.primary_member().ok_or_else(|| {
            WaveboundError::InvalidState("option has no primary party member".to_string())
        })
    }
}
