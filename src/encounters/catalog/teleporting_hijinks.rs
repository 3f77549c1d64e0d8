//! A whirring teleporter machine shortly after a boss wave.
//!
//! 1. Pay a wave-scaled price and get teleported to another biome, where an
//!    enraged wild boss attacks.
//! 2. Have a Steel or Electric party member overload the machine. Same
//!    teleport and boss, and the helper gains experience.
//! 3. Inspect the machine and get ambushed by a regular wild boss in place.
//!    Guaranteed Steel and Electric attack boosters afterwards.

use crate::{
    encounter_enemy_level, pick_new_biome, BattleStat, BattlerTag, Biome, ElementType,
    EncounterContext, EncounterDefinition, EncounterDialogue, EncounterRuntimeState,
    EncounterTier, EnemyPartyConfig, EnemyPokemonConfig, GameState, IntroVisuals,
    MoneyRequirement, OptionDefinition, OptionDialogue, OptionMode, PartyTypeRequirement,
    PokemonData, PrePhaseHook, ResolutionHook, RewardItem, RewardOptions, SpriteConfig,
    SummonEffect, TaskBarrier, WaveModulusRequirement, WaveRange, WaveboundResult,
};
use async_trait::async_trait;
use log::debug;

pub const ENCOUNTER_ID: &str = "teleporting_hijinks";

/// Dialogue namespace of the encounter.
pub const NAMESPACE: &str = "mysteryEncounter:teleportingHijinks";

/// Price is this many times the wave's money value.
pub const MONEY_COST_MULTIPLIER: f64 = 2.5;

/// Biomes the machine can send the player to.
pub const BIOME_CANDIDATES: [Biome; 4] = [Biome::Space, Biome::FairyCave, Biome::Laboratory, Biome::Island];

pub const HELPER_EXP: u32 = 100;

fn key(suffix: &str) -> String {
    format!("{}.{}", NAMESPACE, suffix)
}

fn option_dialogue(number: usize) -> OptionDialogue {
    OptionDialogue {
        button_label: key(&format!("option.{}.label", number)),
        button_tooltip: key(&format!("option.{}.tooltip", number)),
        selected: vec![key(&format!("option.{}.selected", number))],
    }
}

/// Builds the encounter.
pub fn definition() -> EncounterDefinition {
    EncounterDefinition {
        id: ENCOUNTER_ID.to_string(),
        tier: EncounterTier::Common,
        wave_range: WaveRange::new(10, 180),
        requirements: vec![
            // first three waves after a boss wave
            Box::new(WaveModulusRequirement::new(vec![1, 2, 3], 10)),
            Box::new(MoneyRequirement::wave_scaled(MONEY_COST_MULTIPLIER)),
        ],
        intro: IntroVisuals {
            sprites: vec![SpriteConfig {
                sprite_key: "teleporter".to_string(),
                file_root: "mystery-encounters".to_string(),
                has_shadow: true,
                x: 0,
                y: 4,
            }],
            auto_hide: false,
        },
        dialogue: EncounterDialogue {
            title: key("title"),
            description: key("description"),
            query: key("query"),
            intro: vec![key("intro")],
        },
        catch_allowed: true,
        on_init: Some(init_price),
        options: vec![
            OptionDefinition {
                mode: OptionMode::DisabledOrDefault,
                requirements: vec![Box::new(MoneyRequirement::wave_scaled(MONEY_COST_MULTIPLIER))],
                dialogue: option_dialogue(1),
                pre_phase: Some(Box::new(PayPrice)),
                resolution: Box::new(Teleport {
                    award_helper_exp: false,
                }),
            },
            OptionDefinition {
                mode: OptionMode::DisabledOrDefault,
                requirements: vec![Box::new(PartyTypeRequirement::new(
                    vec![ElementType::Electric, ElementType::Steel],
                    true,
                    1,
                ))],
                dialogue: option_dialogue(2),
                pre_phase: None,
                resolution: Box::new(Teleport {
                    award_helper_exp: true,
                }),
            },
            OptionDefinition::simple(option_dialogue(3), Box::new(InspectMachine)),
        ],
    }
}

/// Fixes the price for the whole instance, so the amount shown in the
/// tooltip is the amount charged.
fn init_price(state: &GameState, runtime: &mut EncounterRuntimeState) -> WaveboundResult<()> {
    let price = state.wave_money_amount(MONEY_COST_MULTIPLIER);
    runtime.set_token("price", price);
    runtime.set_misc("price", price)
}

#[derive(Debug)]
struct PayPrice;

#[async_trait]
impl PrePhaseHook for PayPrice {
    async fn run(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<()> {
        let price = ctx.runtime.misc_u64("price")?;
        ctx.charge_money(price);
        Ok(())
    }
}

#[derive(Debug)]
struct Teleport {
    award_helper_exp: bool,
}

#[async_trait]
impl ResolutionHook for Teleport {
    async fn resolve(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig> {
        let from = ctx.state.biome;
        let to = pick_new_biome(&BIOME_CANDIDATES, from, ctx.runtime.rng())?;
        debug!("Teleporting from {} to {}", from, to);

        let transport = ctx.show_text(&key("transport"));
        transport.await;

        let presentation = ctx.services.presentation;
        let mut barrier = TaskBarrier::new();
        barrier.spawn("biome_change", presentation.animate_biome_change(from, to));
        barrier.spawn("intro_visuals", presentation.transition_intro_visuals(false));
        barrier.wait().await?;

        ctx.change_biome(to);
        presentation.play_bgm(to).await;
        let attacked = ctx.show_text(&key("attacked"));
        attacked.await;

        let mut boss = wild_boss(ctx)?;
        boss.tags.push(BattlerTag::EncounterPostSummon);
        boss.on_summon_effects = vec![
            SummonEffect::QueueMessage {
                key: key("boss_enraged"),
                tokens: ctx.runtime.tokens().clone(),
            },
            SummonEffect::StatStageChange {
                stats: vec![
                    BattleStat::Attack,
                    BattleStat::Defense,
                    BattleStat::SpecialAttack,
                    BattleStat::SpecialDefense,
                    BattleStat::Speed,
                ],
                stages: 1,
            },
        ];

        ctx.runtime.set_rewards(RewardOptions::fill_remaining())?;
        if self.award_helper_exp {
            let helper = ctx.primary_member()?;
            ctx.runtime.set_exp(helper, HELPER_EXP)?;
        }
        Ok(EnemyPartyConfig::single(boss))
    }
}

#[derive(Debug)]
struct InspectMachine;

#[async_trait]
impl ResolutionHook for InspectMachine {
    async fn resolve(&self, ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPartyConfig> {
        let boss = wild_boss(ctx)?;

        ctx.runtime.set_rewards(RewardOptions::guaranteed(vec![
            RewardItem::AttackTypeBooster(ElementType::Steel),
            RewardItem::AttackTypeBooster(ElementType::Electric),
        ]))?;
        let member = ctx.primary_member()?;
        ctx.runtime.set_exp(member, HELPER_EXP)?;

        // fades out while the battle is prepared
        let fade = ctx.services.presentation.transition_intro_visuals(true);
        ctx.spawn_background("intro_visuals", fade);

        Ok(EnemyPartyConfig::single(boss))
    }
}

/// Rolls the wild boss for the current biome and wave and names it in the
/// `enemyPokemon` token.
fn wild_boss(ctx: &mut EncounterContext<'_>) -> WaveboundResult<EnemyPokemonConfig> {
    let wave = ctx.state.wave_index;
    let biome = ctx.state.biome;
    let level = encounter_enemy_level(wave, ctx.state.scheduled_enemy_level());
    let luck = ctx.state.party_luck_value();

    let generator = ctx.services.species;
    let species = generator.random_species(biome, wave, level, luck, true, ctx.runtime.rng())?;
    let (name, types) = match generator.species_info(species) {
        Some(info) => (info.name.clone(), info.types.clone()),
        None => (species.to_string(), Vec::new()),
    };
    ctx.runtime.set_token("enemyPokemon", &name);

    Ok(EnemyPokemonConfig {
        level,
        species,
        source_data: Some(PokemonData {
            species,
            name,
            level,
            types,
        }),
        is_boss: true,
        tags: Vec::new(),
        on_summon_effects: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionAvailability, PartyMember, Requirement, SpeciesId};

    fn wave_42(money: u64) -> GameState {
        GameState::new(3).with_wave(42).with_money(money)
    }

    #[test]
    fn test_definition_is_valid() {
        let def = definition();
        def.validate().unwrap();
        assert_eq!(def.options.len(), 3);
        assert!(def.catch_allowed);
        assert!(!def.intro.auto_hide);
    }

    #[test]
    fn test_scene_requirements() {
        let def = definition();
        let price = wave_42(0).wave_money_amount(MONEY_COST_MULTIPLIER);

        assert!(def.is_available(&wave_42(price)));
        assert!(!def.is_available(&wave_42(price - 1)));
        assert!(!def.is_available(&GameState::new(3).with_wave(44).with_money(price * 2)));
        // wave 1 % 10 == 1 but the wave range starts at 10
        assert!(!def.is_available(&GameState::new(3).with_wave(1).with_money(u64::MAX)));
    }

    #[test]
    fn test_init_fixes_price() {
        let state = wave_42(100_000);
        let mut runtime = EncounterRuntimeState::new(1);
        init_price(&state, &mut runtime).unwrap();

        let price = state.wave_money_amount(MONEY_COST_MULTIPLIER);
        assert_eq!(runtime.misc_u64("price").unwrap(), price);
        assert_eq!(runtime.token("price"), Some(price.to_string().as_str()));
    }

    #[test]
    fn test_helper_option_needs_steel_or_electric() {
        let def = definition();
        let mut state = wave_42(100_000);
        state
            .add_party_member(PartyMember::new("Ember", SpeciesId(4), 40, vec![ElementType::Fire]))
            .unwrap();
        assert_eq!(def.options[1].availability(&state), OptionAvailability::Disabled);

        state
            .add_party_member(PartyMember::new("Coil", SpeciesId(81), 40, vec![ElementType::Electric, ElementType::Steel]))
            .unwrap();
        assert_eq!(def.options[1].availability(&state), OptionAvailability::Selectable);
    }

    #[test]
    fn test_dialogue_keys_are_namespaced() {
        let def = definition();
        assert_eq!(def.dialogue.query, "mysteryEncounter:teleportingHijinks.query");
        assert_eq!(
            def.options[2].dialogue.selected,
            vec!["mysteryEncounter:teleportingHijinks.option.3.selected".to_string()]
        );
        assert!(def.requirements.iter().all(|req| !req.describe().is_empty()));
    }
}
