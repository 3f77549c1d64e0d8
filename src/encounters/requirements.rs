//! # Requirements
//!
//! Pure predicates over [`GameState`] that gate whether an encounter can
//! appear and whether an option can be picked.
//!
//! Requirements are evaluated every time options are drawn, so they must be
//! cheap and must never fail. An unmet requirement is not an error; it only
//! changes what the player is offered.

use crate::{ElementType, GameState, PartyMemberId};
use std::fmt;

/// A gate on encounter or option availability.
pub trait Requirement: fmt::Debug + Send + Sync {
    /// Whether the requirement holds against the current state.
    fn is_satisfied(&self, state: &GameState) -> bool;

    /// Party members that satisfy the requirement individually.
    ///
    /// Only requirements about party members return `Some`; the option uses
    /// the list to pick the member it acts through.
    fn qualifying_members(&self, _state: &GameState) -> Option<Vec<PartyMemberId>> {
        None
    }

    /// Short human-readable form for logs.
    fn describe(&self) -> String;
}

/// Player must be able to afford a cost.
///
/// With a positive `scaling_multiplier` the cost is the current wave's money
/// value times the multiplier; otherwise it is `required_money`.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyRequirement {
    pub required_money: u64,
    pub scaling_multiplier: f64,
}

impl MoneyRequirement {
    /// A flat cost.
    pub fn fixed(required_money: u64) -> Self {
        Self {
            required_money,
            scaling_multiplier: 0.0,
        }
    }

    /// A cost that scales with the wave.
    pub fn wave_scaled(multiplier: f64) -> Self {
        Self {
            required_money: 0,
            scaling_multiplier: multiplier,
        }
    }

    /// The cost at the current wave.
    pub fn required_amount(&self, state: &GameState) -> u64 {
        if self.scaling_multiplier > 0.0 {
            state.wave_money_amount(self.scaling_multiplier)
        } else {
            self.required_money
        }
    }
}

impl Requirement for MoneyRequirement {
    fn is_satisfied(&self, state: &GameState) -> bool {
        state.money >= self.required_amount(state)
    }

    fn describe(&self) -> String {
        if self.scaling_multiplier > 0.0 {
            format!("money >= wave value x{}", self.scaling_multiplier)
        } else {
            format!("money >= {}", self.required_money)
        }
    }
}

/// Wave number modulo `modulus` must be one of `remainders`.
///
/// `WaveModulusRequirement::new(vec![1, 2, 3], 10)` holds on the first three
/// waves after each boss wave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaveModulusRequirement {
    pub remainders: Vec<u32>,
    pub modulus: u32,
}

impl WaveModulusRequirement {
    pub fn new(remainders: Vec<u32>, modulus: u32) -> Self {
        Self { remainders, modulus }
    }
}

impl Requirement for WaveModulusRequirement {
    fn is_satisfied(&self, state: &GameState) -> bool {
        if self.modulus == 0 {
            return false;
        }
        self.remainders.contains(&(state.wave_index % self.modulus))
    }

    fn describe(&self) -> String {
        format!("wave % {} in {:?}", self.modulus, self.remainders)
    }
}

/// Wave number must lie in `min..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveRangeRequirement {
    pub min: u32,
    pub max: u32,
}

impl WaveRangeRequirement {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

impl Requirement for WaveRangeRequirement {
    fn is_satisfied(&self, state: &GameState) -> bool {
        (self.min..=self.max).contains(&state.wave_index)
    }

    fn describe(&self) -> String {
        format!("wave in {}..={}", self.min, self.max)
    }
}

/// At least `min_count` party members must have one of `types`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyTypeRequirement {
    pub types: Vec<ElementType>,
    /// Fainted members do not count
    pub exclude_fainted: bool,
    pub min_count: usize,
}

impl PartyTypeRequirement {
    pub fn new(types: Vec<ElementType>, exclude_fainted: bool, min_count: usize) -> Self {
        Self {
            types,
            exclude_fainted,
            min_count,
        }
    }

    fn matching<'s>(&'s self, state: &'s GameState) -> impl Iterator<Item = PartyMemberId> + 's {
        state
            .party
            .iter()
            .filter(move |member| !(self.exclude_fainted && member.is_fainted()))
            .filter(move |member| self.types.iter().any(|t| member.has_type(*t)))
            .map(|member| member.id)
    }
}

impl Requirement for PartyTypeRequirement {
    fn is_satisfied(&self, state: &GameState) -> bool {
        if self.min_count == 0 {
            return true;
        }
        // nth() stops at the min_count-th match
        self.matching(state).nth(self.min_count - 1).is_some()
    }

    fn qualifying_members(&self, state: &GameState) -> Option<Vec<PartyMemberId>> {
        Some(self.matching(state).collect())
    }

    fn describe(&self) -> String {
        format!("{} party member(s) of {:?}", self.min_count, self.types)
    }
}

/// Whether every requirement in the list holds.
pub fn all_satisfied(requirements: &[Box<dyn Requirement>], state: &GameState) -> bool {
    requirements.iter().all(|req| req.is_satisfied(state))
}
