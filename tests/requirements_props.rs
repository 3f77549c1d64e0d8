//! Property tests for requirement gating and seeded rolls.

use proptest::prelude::*;
use wavebound::encounters::catalog::teleporting_hijinks;
use wavebound::{
    create_rng, pick_new_biome, Biome, ElementType, EncounterRegistry, EncounterSession,
    GameState, OptionAvailability, OptionMode, PartyMember, SpeciesId, TierWeights,
};
use std::sync::Arc;

fn arb_party() -> impl Strategy<Value = Vec<(Vec<ElementType>, bool, u32)>> {
    prop::collection::vec(
        (
            prop::collection::vec(prop::sample::select(ElementType::all()), 1..=2),
            any::<bool>(),
            0u32..6,
        ),
        0..=6,
    )
}

fn build_state(wave: u32, money: u64, party: &[(Vec<ElementType>, bool, u32)]) -> GameState {
    let mut state = GameState::new(99).with_wave(wave).with_money(money);
    for (index, (types, fainted, luck)) in party.iter().enumerate() {
        let mut member = PartyMember::new(format!("m{}", index), SpeciesId(1), 20, types.clone())
            .with_luck(*luck);
        if *fainted {
            member.faint();
        }
        state.add_party_member(member).unwrap();
    }
    state
}

proptest! {
    #[test]
    fn selectable_options_are_exactly_those_with_met_requirements(
        wave in 1u32..200,
        money in 0u64..20_000,
        party in arb_party(),
    ) {
        let state = build_state(wave, money, &party);
        let session = EncounterSession::new(Arc::new(teleporting_hijinks::definition()), 5);
        let definition = session.definition();

        let expected: Vec<usize> = definition
            .options
            .iter()
            .enumerate()
            .filter(|(_, option)| option.requirements_met(&state))
            .map(|(index, _)| index)
            .collect();
        prop_assert_eq!(session.selectable_options(&state), expected);

        for (view, option) in session.option_views(&state).iter().zip(&definition.options) {
            if option.mode == OptionMode::DisabledOrDefault {
                prop_assert_ne!(view.availability, OptionAvailability::Hidden);
            }
        }
    }

    #[test]
    fn new_biome_is_never_the_current_one(
        seed in any::<u64>(),
        current in prop::sample::select(Biome::all()),
    ) {
        let candidates = teleporting_hijinks::BIOME_CANDIDATES;
        let mut rng = create_rng(seed);
        let next = pick_new_biome(&candidates, current, &mut rng).unwrap();
        prop_assert_ne!(next, current);
        prop_assert!(candidates.contains(&next));
    }

    #[test]
    fn registry_never_selects_a_non_qualifying_encounter(
        seed in any::<u64>(),
        wave in 1u32..200,
        money in 0u64..20_000,
    ) {
        let registry = EncounterRegistry::with_catalog().unwrap();
        let state = GameState::new(seed).with_wave(wave).with_money(money);
        let mut rng = create_rng(seed);

        match registry.select(&state, &TierWeights::default(), &mut rng) {
            Some(definition) => prop_assert!(definition.is_available(&state)),
            None => prop_assert!(registry.available(&state).is_empty()),
        }
    }

    #[test]
    fn party_luck_is_capped(party in arb_party()) {
        let state = build_state(1, 0, &party);
        prop_assert!(state.party_luck_value() <= 14);
    }

    #[test]
    fn wave_money_is_a_multiple_of_ten(wave in 1u32..500, multiplier in 0.5f64..5.0) {
        let state = GameState::new(1).with_wave(wave);
        prop_assert_eq!(state.wave_money_amount(multiplier) % 10, 0);
    }
}
