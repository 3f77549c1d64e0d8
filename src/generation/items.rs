//! # Reward Items
//!
//! Rewards an encounter promises for winning the battle it starts.

use crate::{ElementType, PartyMemberId};
use serde::{Deserialize, Serialize};

/// A held item offered after the encounter's battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RewardItem {
    /// Boosts the power of moves of one type
    AttackTypeBooster(ElementType),
}

/// Reward screen shown after the encounter's battle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardOptions {
    /// Items always offered, in display order
    pub guaranteed_items: Vec<RewardItem>,
    /// Whether the remaining slots are filled with regular random rewards
    pub fill_remaining: bool,
}

impl RewardOptions {
    /// Only regular random rewards.
    pub fn fill_remaining() -> Self {
        Self {
            guaranteed_items: Vec::new(),
            fill_remaining: true,
        }
    }

    /// Guaranteed items, with the rest filled randomly.
    pub fn guaranteed(items: Vec<RewardItem>) -> Self {
        Self {
            guaranteed_items: items,
            fill_remaining: true,
        }
    }
}

/// Experience granted to one party member once the battle is won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpAward {
    pub member: PartyMemberId,
    pub amount: u32,
}
