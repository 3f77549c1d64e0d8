//! # Encounter Controller
//!
//! The state machine that walks one encounter instance from creation to
//! battle handoff:
//!
//! ```text
//! INIT -> INTRO -> AWAITING_OPTION -> PRE_PHASE -> RESOLUTION -> HANDOFF
//! ```
//!
//! Each phase method checks that it is called in order and fails with
//! [`WaveboundError::InvariantViolation`] otherwise. Game state is borrowed
//! per call, never stored, so the session owns nothing but its own runtime
//! state. Any money taken in `PRE_PHASE` is given back if a later phase fails.

use crate::{
    create_rng, BattleInitializer, Biome, EncounterConfig, EncounterContext, EncounterDefinition,
    EncounterRegistry, EncounterRuntimeState, EncounterServices, EnemyPartyConfig, ExpAward,
    GameState, OptionAvailability, OptionDefinition, OptionSelector, PartyMemberId,
    RewardOptions, WaveboundError, WaveboundResult,
};
use log::{debug, error, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Phases of an encounter instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EncounterPhase {
    Init,
    Intro,
    AwaitingOption,
    PrePhase,
    Resolution,
    Handoff,
    Finished,
    Abandoned,
    Failed,
}

impl fmt::Display for EncounterPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EncounterPhase::Init => "INIT",
            EncounterPhase::Intro => "INTRO",
            EncounterPhase::AwaitingOption => "AWAITING_OPTION",
            EncounterPhase::PrePhase => "PRE_PHASE",
            EncounterPhase::Resolution => "RESOLUTION",
            EncounterPhase::Handoff => "HANDOFF",
            EncounterPhase::Finished => "FINISHED",
            EncounterPhase::Abandoned => "ABANDONED",
            EncounterPhase::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Something that happened during an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterEvent {
    Started {
        encounter_id: String,
    },
    OptionSelected {
        index: usize,
        primary_member: Option<PartyMemberId>,
    },
    MoneyCharged {
        amount: u64,
    },
    MoneyRefunded {
        amount: u64,
    },
    BiomeChanged {
        from: Biome,
        to: Biome,
    },
    HandedOff {
        encounter_id: String,
    },
    Abandoned {
        encounter_id: String,
    },
    Failed {
        encounter_id: String,
        phase: EncounterPhase,
    },
}

/// An option as presented to the player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub index: usize,
    pub label: String,
    pub tooltip: String,
    pub availability: OptionAvailability,
}

impl OptionView {
    pub fn is_selectable(&self) -> bool {
        self.availability == OptionAvailability::Selectable
    }

    pub fn is_visible(&self) -> bool {
        self.availability != OptionAvailability::Hidden
    }
}

/// Result of an encounter that reached battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedEncounter {
    pub encounter_id: String,
    pub option_index: usize,
    pub enemy_party: EnemyPartyConfig,
    pub rewards: Option<RewardOptions>,
    pub exp: Option<ExpAward>,
    pub money_charged: u64,
    pub events: Vec<EncounterEvent>,
}

/// How an encounter ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EncounterOutcome {
    Resolved(ResolvedEncounter),
    Abandoned { encounter_id: String },
}

/// One running encounter.
#[derive(Debug)]
pub struct EncounterSession {
    definition: Arc<EncounterDefinition>,
    phase: EncounterPhase,
    runtime: EncounterRuntimeState,
    initialized: bool,
    selected: Option<usize>,
    enemy_party: Option<EnemyPartyConfig>,
}

impl EncounterSession {
    /// Creates an instance of `definition` whose random rolls derive from `seed`.
    pub fn new(definition: Arc<EncounterDefinition>, seed: u64) -> Self {
        Self {
            definition,
            phase: EncounterPhase::Init,
            runtime: EncounterRuntimeState::new(seed),
            initialized: false,
            selected: None,
            enemy_party: None,
        }
    }

    pub fn definition(&self) -> &EncounterDefinition {
        &self.definition
    }

    pub fn phase(&self) -> EncounterPhase {
        self.phase
    }

    pub fn runtime(&self) -> &EncounterRuntimeState {
        &self.runtime
    }

    /// Index of the chosen option, once one has been chosen.
    pub fn selected_option(&self) -> Option<usize> {
        self.selected
    }

    /// INIT: runs the definition's init hook and picks each option's
    /// acting party member. Must be called exactly once.
    pub fn initialize(&mut self, state: &mut GameState) -> WaveboundResult<()> {
        if self.initialized {
            error!("Encounter '{}' initialized twice", self.definition.id);
            return Err(WaveboundError::InvariantViolation(format!(
                "INIT re-entered for encounter '{}'",
                self.definition.id
            )));
        }
        self.expect_phase(EncounterPhase::Init, "initialize")?;
        self.initialized = true;

        if let Some(on_init) = self.definition.on_init {
            if let Err(err) = on_init(state, &mut self.runtime) {
                return Err(self.fail(state, EncounterPhase::Init, err));
            }
        }
        self.assign_option_primaries(state);

        let encounter_id = self.definition.id.clone();
        info!("Encounter '{}' started on wave {}", encounter_id, state.wave_index);
        self.runtime
            .emit(state, EncounterEvent::Started { encounter_id });
        self.phase = EncounterPhase::Intro;
        Ok(())
    }

    /// INTRO: shows the intro dialogue and the query, in order.
    pub async fn present_intro(&mut self, services: EncounterServices<'_>) -> WaveboundResult<()> {
        self.expect_phase(EncounterPhase::Intro, "present_intro")?;
        let definition = Arc::clone(&self.definition);

        for line in &definition.dialogue.intro {
            services
                .presentation
                .show_text(line, self.runtime.tokens())
                .await;
        }
        if !definition.dialogue.query.is_empty() {
            services
                .presentation
                .show_text(&definition.dialogue.query, self.runtime.tokens())
                .await;
        }

        self.phase = EncounterPhase::AwaitingOption;
        Ok(())
    }

    /// Every option with its availability against `state`.
    pub fn option_views(&self, state: &GameState) -> Vec<OptionView> {
        self.definition
            .options
            .iter()
            .enumerate()
            .map(|(index, option)| OptionView {
                index,
                label: option.dialogue.button_label.clone(),
                tooltip: option.dialogue.button_tooltip.clone(),
                availability: option.availability(state),
            })
            .collect()
    }

    /// Indices of the options the player may pick right now.
    pub fn selectable_options(&self, state: &GameState) -> Vec<usize> {
        self.option_views(state)
            .into_iter()
            .filter(OptionView::is_selectable)
            .map(|view| view.index)
            .collect()
    }

    /// AWAITING_OPTION: commits to one option.
    ///
    /// Picking an option whose requirements do not hold is a programming
    /// error, not a user error, and fails without changing anything.
    pub fn select_option(&mut self, index: usize, state: &mut GameState) -> WaveboundResult<()> {
        self.expect_phase(EncounterPhase::AwaitingOption, "select_option")?;
        let definition = Arc::clone(&self.definition);
        let option = definition.option(index).ok_or_else(|| {
            WaveboundError::InvariantViolation(format!(
                "encounter '{}' has no option {}",
                definition.id,
                index + 1
            ))
        })?;

        let availability = option.availability(state);
        if availability != OptionAvailability::Selectable {
            error!(
                "Option {} of '{}' picked while {:?}",
                index + 1,
                definition.id,
                availability
            );
            return Err(WaveboundError::InvariantViolation(format!(
                "option {} of '{}' is {:?}",
                index + 1,
                definition.id,
                availability
            )));
        }

        let primary = self.choose_primary(index, option, state);
        self.runtime.set_primary_member(primary);
        self.selected = Some(index);
        info!("Encounter '{}': option {} chosen", definition.id, index + 1);
        self.runtime.emit(
            state,
            EncounterEvent::OptionSelected {
                index,
                primary_member: primary,
            },
        );
        self.phase = EncounterPhase::PrePhase;
        Ok(())
    }

    /// PRE_PHASE: runs the chosen option's pre-phase hook, if it has one.
    pub async fn run_pre_phase(
        &mut self,
        state: &mut GameState,
        services: EncounterServices<'_>,
    ) -> WaveboundResult<()> {
        self.expect_phase(EncounterPhase::PrePhase, "run_pre_phase")?;
        let definition = Arc::clone(&self.definition);
        let option = self.chosen(&definition)?;

        if let Some(hook) = &option.pre_phase {
            let result = {
                let mut ctx = EncounterContext::new(state, &mut self.runtime, services);
                hook.run(&mut ctx).await
            };
            if let Err(err) = result {
                return Err(self.fail(state, EncounterPhase::PrePhase, err));
            }
        }

        self.phase = EncounterPhase::Resolution;
        Ok(())
    }

    /// RESOLUTION: shows the option's outcome text, runs its resolution
    /// hook, and waits for every presentation task spawned along the way.
    pub async fn resolve(
        &mut self,
        state: &mut GameState,
        services: EncounterServices<'_>,
    ) -> WaveboundResult<&EnemyPartyConfig> {
        self.expect_phase(EncounterPhase::Resolution, "resolve")?;
        let definition = Arc::clone(&self.definition);
        let option = self.chosen(&definition)?;

        for line in &option.dialogue.selected {
            services
                .presentation
                .show_text(line, self.runtime.tokens())
                .await;
        }
        if definition.intro.auto_hide {
            let task = services.presentation.transition_intro_visuals(true);
            self.runtime.background().spawn("intro_visuals", task);
        }

        let resolved = {
            let mut ctx = EncounterContext::new(state, &mut self.runtime, services);
            option.resolution.resolve(&mut ctx).await
        };
        let resolved = resolved.and_then(|config| config.validate().map(|_| config));
        let settled = self.runtime.background().wait().await;

        let mut config = match (resolved, settled) {
            (Ok(config), Ok(finished)) => {
                debug!("Background tasks settled: {:?}", finished);
                config
            }
            (Err(err), _) | (Ok(_), Err(err)) => {
                return Err(self.fail(state, EncounterPhase::Resolution, err));
            }
        };

        config.catch_allowed = definition.catch_allowed;
        self.phase = EncounterPhase::Handoff;
        let config: &EnemyPartyConfig = self.enemy_party.insert(config);
        Ok(config)
    }

    /// HANDOFF: gives the enemy party to the battle system and ends the
    /// instance. The runtime state is dropped with the session.
    pub async fn hand_off(
        mut self,
        state: &mut GameState,
        initializer: &dyn BattleInitializer,
    ) -> WaveboundResult<ResolvedEncounter> {
        self.expect_phase(EncounterPhase::Handoff, "hand_off")?;
        let option_index = self.selected.ok_or_else(|| {
            WaveboundError::InvariantViolation("handoff without a chosen option".to_string())
        })?;
        let enemy_party = self.enemy_party.take().ok_or_else(|| {
            WaveboundError::InvariantViolation("handoff without an enemy party".to_string())
        })?;

        if let Err(err) = initializer.init_battle(&enemy_party).await {
            error!("Battle initialization failed for '{}': {}", self.definition.id, err);
            self.refund(state);
            self.record_failure(state, EncounterPhase::Handoff);
            return Err(match err {
                WaveboundError::BattleInitFailed(reason) => WaveboundError::BattleInitFailed(reason),
                other => WaveboundError::BattleInitFailed(other.to_string()),
            });
        }

        let encounter_id = self.definition.id.clone();
        self.runtime.emit(
            state,
            EncounterEvent::HandedOff {
                encounter_id: encounter_id.clone(),
            },
        );
        self.phase = EncounterPhase::Finished;
        info!("Encounter '{}' handed off to battle", encounter_id);

        let (rewards, exp) = self.runtime.take_rewards();
        Ok(ResolvedEncounter {
            encounter_id,
            option_index,
            enemy_party,
            rewards,
            exp,
            money_charged: self.runtime.money_charged(),
            events: self.runtime.take_events(),
        })
    }

    /// Dismisses the encounter, dropping its runtime state.
    ///
    /// Nothing before PRE_PHASE touches game state, so abandoning while
    /// awaiting an option leaves the run exactly as it was. Money already
    /// charged is given back.
    pub fn abandon(mut self, state: &mut GameState) -> EncounterOutcome {
        let encounter_id = self.definition.id.clone();
        if self.phase != EncounterPhase::Failed {
            warn!("Encounter '{}' abandoned during {}", encounter_id, self.phase);
            self.refund(state);
            self.runtime.emit(
                state,
                EncounterEvent::Abandoned {
                    encounter_id: encounter_id.clone(),
                },
            );
            self.phase = EncounterPhase::Abandoned;
        }
        EncounterOutcome::Abandoned { encounter_id }
    }

    /// Drives the instance through every phase.
    ///
    /// Suspends on `selector` while awaiting an option; a selector that
    /// yields nothing abandons the encounter.
    pub async fn run(
        mut self,
        state: &mut GameState,
        services: EncounterServices<'_>,
        selector: &mut dyn OptionSelector,
        initializer: &dyn BattleInitializer,
    ) -> WaveboundResult<EncounterOutcome> {
        self.initialize(state)?;
        self.present_intro(services).await?;

        let views = self.option_views(state);
        let Some(index) = selector.choose(&views).await else {
            return Ok(self.abandon(state));
        };

        self.select_option(index, state)?;
        self.run_pre_phase(state, services).await?;
        self.resolve(state, services).await?;
        let resolved = self.hand_off(state, initializer).await?;
        Ok(EncounterOutcome::Resolved(resolved))
    }

    fn expect_phase(&self, expected: EncounterPhase, action: &str) -> WaveboundResult<()> {
        if self.phase == expected {
            return Ok(());
        }
        error!(
            "Encounter '{}': {} called during {}",
            self.definition.id, action, self.phase
        );
        Err(WaveboundError::InvariantViolation(format!(
            "{} called during {} (expected {})",
            action, self.phase, expected
        )))
    }

    fn chosen<'d>(&self, definition: &'d EncounterDefinition) -> WaveboundResult<&'d OptionDefinition> {
        self.selected
            .and_then(|index| definition.option(index))
            .ok_or_else(|| WaveboundError::InvariantViolation("no option chosen".to_string()))
    }

    fn assign_option_primaries(&mut self, state: &GameState) {
        let definition = Arc::clone(&self.definition);
        for (index, option) in definition.options.iter().enumerate() {
            let Some(members) = option.qualifying_members(state) else {
                continue;
            };
            if members.is_empty() {
                continue;
            }
            let member = members[self.runtime.rng().gen_range(0..members.len())];
            self.runtime.set_option_primary(index, member);
            if let Some(found) = state.get_party_member(member) {
                self.runtime
                    .set_token(format!("option{}PrimaryName", index + 1), &found.name);
            }
        }
    }

    fn choose_primary(
        &mut self,
        index: usize,
        option: &OptionDefinition,
        state: &GameState,
    ) -> Option<PartyMemberId> {
        match option.qualifying_members(state) {
            Some(members) if !members.is_empty() => {
                match self.runtime.option_primary(index) {
                    Some(picked) if members.contains(&picked) => Some(picked),
                    _ => Some(members[self.runtime.rng().gen_range(0..members.len())]),
                }
            }
            _ => state.lead_member().map(|member| member.id),
        }
    }

    fn refund(&mut self, state: &mut GameState) {
        let amount = self.runtime.money_charged();
        if amount > 0 {
            warn!(
                "Refunding {} to the player after '{}' did not complete",
                amount, self.definition.id
            );
            state.add_money(amount);
            self.runtime
                .emit(state, EncounterEvent::MoneyRefunded { amount });
        }
    }

    fn record_failure(&mut self, state: &mut GameState, phase: EncounterPhase) {
        self.runtime.emit(
            state,
            EncounterEvent::Failed {
                encounter_id: self.definition.id.clone(),
                phase,
            },
        );
        self.phase = EncounterPhase::Failed;
    }

    fn fail(
        &mut self,
        state: &mut GameState,
        phase: EncounterPhase,
        source: WaveboundError,
    ) -> WaveboundError {
        error!(
            "Encounter '{}' failed during {}: {}",
            self.definition.id, phase, source
        );
        self.refund(state);
        self.record_failure(state, phase);
        WaveboundError::HookFailed {
            phase,
            source: Box::new(source),
        }
    }
}

/// Picks encounters for waves and starts sessions for them.
#[derive(Debug)]
pub struct EncounterController {
    registry: EncounterRegistry,
    config: EncounterConfig,
}

impl EncounterController {
    /// Creates a controller over `registry`.
    pub fn new(registry: EncounterRegistry, config: EncounterConfig) -> WaveboundResult<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    pub fn registry(&self) -> &EncounterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    /// Rolls a qualifying encounter for the current wave, if any qualifies.
    pub fn roll_encounter(&self, state: &GameState) -> Option<EncounterSession> {
        let mut rng = create_rng(self.config.seed ^ state.encounter_seed());
        let definition = self
            .registry
            .select(state, &self.config.tier_weights, &mut rng)?;
        debug!("Rolled encounter '{}' for wave {}", definition.id, state.wave_index);
        Some(EncounterSession::new(definition, state.encounter_seed()))
    }

    /// Starts a specific encounter, which must qualify for the current state.
    pub fn start_encounter(&self, id: &str, state: &GameState) -> WaveboundResult<EncounterSession> {
        let definition = self
            .registry
            .get(id)
            .ok_or_else(|| WaveboundError::InvalidState(format!("unknown encounter '{}'", id)))?;
        if !definition.is_available(state) {
            return Err(WaveboundError::InvariantViolation(format!(
                "encounter '{}' does not qualify on wave {}",
                id, state.wave_index
            )));
        }
        Ok(EncounterSession::new(definition, state.encounter_seed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        EncounterDialogue, EncounterTier, EnemyPokemonConfig, IntroVisuals, MoneyRequirement,
        OptionDialogue, OptionMode, PrePhaseHook, RecordingPresentation, ResolutionHook,
        ScriptedSelector, SpeciesId, SpeciesPool, WaveRange,
    };
    use async_trait::async_trait;

    #[derive(Debug)]
    struct Charge(u64);

    #[async_trait]
    impl PrePhaseHook for Charge {
        async fn run(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<()> {
            ctx.charge_money(self.0);
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Fight;

    #[async_trait]
    impl ResolutionHook for Fight {
        async fn resolve(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig> {
            Ok(EnemyPartyConfig::single(EnemyPokemonConfig {
                level: ctx.state.wave_index,
                species: SpeciesId(1),
                source_data: None,
                is_boss: false,
                tags: vec![],
                on_summon_effects: vec![],
            }))
        }
    }

    #[derive(Debug)]
    struct Broken;

    #[async_trait]
    impl ResolutionHook for Broken {
        async fn resolve(&self, _ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig> {
            Err(WaveboundError::GenerationFailed("no enemy".to_string()))
        }
    }

    fn count_init(_state: &GameState, runtime: &mut EncounterRuntimeState) -> WaveboundResult<()> {
        let runs = runtime.misc("init_runs").and_then(|v| v.as_u64()).unwrap_or(0);
        runtime.set_misc("init_runs", runs + 1)
    }

    fn definition(auto_hide: bool, resolution: Box<dyn ResolutionHook>) -> Arc<EncounterDefinition> {
        Arc::new(EncounterDefinition {
            id: "unit".to_string(),
            tier: EncounterTier::Common,
            wave_range: WaveRange::new(1, 100),
            requirements: vec![],
            intro: IntroVisuals {
                sprites: vec![],
                auto_hide,
            },
            dialogue: EncounterDialogue {
                intro: vec!["unit.intro".to_string()],
                query: "unit.query".to_string(),
                ..Default::default()
            },
            catch_allowed: false,
            on_init: Some(count_init),
            options: vec![
                OptionDefinition {
                    mode: OptionMode::DisabledOrDefault,
                    requirements: vec![Box::new(MoneyRequirement::fixed(300))],
                    dialogue: OptionDialogue {
                        selected: vec!["unit.paid".to_string()],
                        ..Default::default()
                    },
                    pre_phase: Some(Box::new(Charge(300))),
                    resolution,
                },
                OptionDefinition::simple(OptionDialogue::default(), Box::new(Fight)),
                OptionDefinition {
                    mode: OptionMode::Default,
                    requirements: vec![Box::new(MoneyRequirement::fixed(1_000_000))],
                    dialogue: OptionDialogue::default(),
                    pre_phase: None,
                    resolution: Box::new(Fight),
                },
            ],
        })
    }

    struct Accepting;

    #[async_trait]
    impl BattleInitializer for Accepting {
        async fn init_battle(&self, _config: &EnemyPartyConfig) -> WaveboundResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_initialize_only_once() {
        let mut state = GameState::new(1).with_money(500);
        let mut session = EncounterSession::new(definition(false, Box::new(Fight)), 1);
        session.initialize(&mut state).unwrap();
        assert_eq!(session.runtime().misc_u64("init_runs").unwrap(), 1);

        assert!(matches!(
            session.initialize(&mut state),
            Err(WaveboundError::InvariantViolation(_))
        ));
        assert_eq!(session.runtime().misc_u64("init_runs").unwrap(), 1);
        assert_eq!(state.statistics.encounters_started, 1);
    }

    #[test]
    fn test_select_before_intro_is_rejected() {
        let mut state = GameState::new(1).with_money(500);
        let mut session = EncounterSession::new(definition(false, Box::new(Fight)), 1);
        session.initialize(&mut state).unwrap();
        assert!(matches!(
            session.select_option(1, &mut state),
            Err(WaveboundError::InvariantViolation(_))
        ));
        assert_eq!(session.phase(), EncounterPhase::Intro);
    }

    #[tokio::test]
    async fn test_option_views_follow_modes() {
        let presentation = RecordingPresentation::new();
        let species = SpeciesPool::standard();
        let services = EncounterServices::new(&presentation, &species);

        let mut state = GameState::new(1).with_money(100);
        let mut session = EncounterSession::new(definition(false, Box::new(Fight)), 1);
        session.initialize(&mut state).unwrap();
        session.present_intro(services).await.unwrap();

        let views = session.option_views(&state);
        assert_eq!(views[0].availability, OptionAvailability::Disabled);
        assert_eq!(views[1].availability, OptionAvailability::Selectable);
        assert_eq!(views[2].availability, OptionAvailability::Hidden);
        assert_eq!(session.selectable_options(&state), vec![1]);
        assert_eq!(presentation.text_keys(), vec!["unit.intro", "unit.query"]);

        assert!(session.select_option(0, &mut state).is_err());
        assert!(session.select_option(2, &mut state).is_err());
        assert!(session.select_option(7, &mut state).is_err());
        assert_eq!(session.phase(), EncounterPhase::AwaitingOption);
        session.select_option(1, &mut state).unwrap();
        assert_eq!(session.phase(), EncounterPhase::PrePhase);
    }

    #[tokio::test]
    async fn test_failed_resolution_refunds_payment() {
        let presentation = RecordingPresentation::new();
        let species = SpeciesPool::standard();
        let services = EncounterServices::new(&presentation, &species);

        let mut state = GameState::new(1).with_money(500);
        let session = EncounterSession::new(definition(false, Box::new(Broken)), 1);
        let mut selector = ScriptedSelector::new(vec![0]);

        let result = session
            .run(&mut state, services, &mut selector, &Accepting)
            .await;

        match result {
            Err(WaveboundError::HookFailed { phase, .. }) => {
                assert_eq!(phase, EncounterPhase::Resolution)
            }
            other => panic!("expected hook failure, got {:?}", other),
        }
        assert_eq!(state.money, 500);
        assert_eq!(state.statistics.money_refunded, 300);
        assert_eq!(state.statistics.money_spent, 0);
        assert_eq!(state.statistics.encounters_resolved, 0);
    }

    #[tokio::test]
    async fn test_abandon_leaves_money_untouched() {
        let presentation = RecordingPresentation::new();
        let species = SpeciesPool::standard();
        let services = EncounterServices::new(&presentation, &species);

        let mut state = GameState::new(1).with_money(500);
        let session = EncounterSession::new(definition(false, Box::new(Fight)), 1);
        let mut selector = ScriptedSelector::new(vec![]);

        let outcome = session
            .run(&mut state, services, &mut selector, &Accepting)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            EncounterOutcome::Abandoned {
                encounter_id: "unit".to_string()
            }
        );
        assert_eq!(state.money, 500);
        assert_eq!(state.statistics.encounters_abandoned, 1);
    }

    #[tokio::test]
    async fn test_auto_hide_settles_before_handoff() {
        let presentation = RecordingPresentation::new();
        let species = SpeciesPool::standard();
        let services = EncounterServices::new(&presentation, &species);

        let mut state = GameState::new(1).with_money(500);
        let mut session = EncounterSession::new(definition(true, Box::new(Fight)), 1);
        session.initialize(&mut state).unwrap();
        session.present_intro(services).await.unwrap();
        session.select_option(0, &mut state).unwrap();
        session.run_pre_phase(&mut state, services).await.unwrap();
        assert_eq!(state.money, 200);

        session.resolve(&mut state, services).await.unwrap();
        assert!(presentation
            .events()
            .contains(&crate::PresentationEvent::IntroTransitioned { hide: true }));

        let resolved = session.hand_off(&mut state, &Accepting).await.unwrap();
        assert_eq!(resolved.money_charged, 300);
        assert_eq!(resolved.option_index, 0);
        assert!(!resolved.enemy_party.catch_allowed);
        assert_eq!(state.statistics.encounters_resolved, 1);
        assert_eq!(state.statistics.money_spent, 300);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(EncounterPhase::AwaitingOption.to_string(), "AWAITING_OPTION");
        assert_eq!(EncounterPhase::PrePhase.to_string(), "PRE_PHASE");
    }
}
