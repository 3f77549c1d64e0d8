//! # Game Module
//!
//! The slice of game state that encounters read and mutate.
//!
//! This module contains the fundamental building blocks encounters work with:
//! - Run state (money, wave, biome, party) and its persistence
//! - Party members and their typing
//! - Shared vocabulary: elemental types, biomes, battle stats and tags

pub mod party;
pub mod state;

pub use party::*;
pub use state::*;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Elemental typing of a monster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ElementType {
    Normal,
    Fighting,
    Flying,
    Poison,
    Ground,
    Rock,
    Bug,
    Ghost,
    Steel,
    Fire,
    Water,
    Grass,
    Electric,
    Psychic,
    Ice,
    Dragon,
    Dark,
    Fairy,
}

impl ElementType {
    /// Returns all 18 types.
    pub fn all() -> &'static [ElementType] {
        use ElementType::*;
        &[
            Normal, Fighting, Flying, Poison, Ground, Rock, Bug, Ghost, Steel, Fire, Water,
            Grass, Electric, Psychic, Ice, Dragon, Dark, Fairy,
        ]
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElementType::all()
            .iter()
            .copied()
            .find(|t| format!("{:?}", t).eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown type '{}'", s))
    }
}

/// Environments a run can travel through.
///
/// The biome decides which species appear and which backdrop is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Biome {
    Town,
    Plains,
    Grass,
    Forest,
    Sea,
    Beach,
    Island,
    Mountain,
    Cave,
    Desert,
    Volcano,
    PowerPlant,
    Factory,
    Laboratory,
    FairyCave,
    Space,
    End,
}

impl Biome {
    /// Returns every biome.
    pub fn all() -> &'static [Biome] {
        use Biome::*;
        &[
            Town, Plains, Grass, Forest, Sea, Beach, Island, Mountain, Cave, Desert, Volcano,
            PowerPlant, Factory, Laboratory, FairyCave, Space, End,
        ]
    }

    /// Asset key for the biome's backdrop.
    pub fn key(self) -> String {
        let name = format!("{:?}", self);
        let mut key = String::with_capacity(name.len() + 4);
        for (i, ch) in name.chars().enumerate() {
            if ch.is_ascii_uppercase() && i > 0 {
                key.push('_');
            }
            key.push(ch.to_ascii_lowercase());
        }
        key
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for Biome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Biome::all()
            .iter()
            .copied()
            .find(|b| b.key() == wanted)
            .ok_or_else(|| format!("unknown biome '{}'", s))
    }
}

/// Opaque species identifier; species data is supplied by a [`crate::SpeciesGenerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpeciesId(pub u32);

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Battle stats that can be raised or lowered by stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStat {
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
    Accuracy,
    Evasion,
}

/// Tags attached to a battler when it is summoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlerTag {
    /// Triggers the config's on-summon effects once the battler enters the field
    EncounterPostSummon,
}

/// Unique identifier for party members.
pub type PartyMemberId = Uuid;

/// Creates a new unique party member ID.
pub fn new_party_member_id() -> PartyMemberId {
    Uuid::new_v4()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_biome_keys() {
        assert_eq!(Biome::Space.key(), "space");
        assert_eq!(Biome::FairyCave.key(), "fairy_cave");
        assert_eq!(Biome::PowerPlant.to_string(), "power_plant");
    }

    #[test]
    fn test_biome_parse() {
        assert_eq!("fairy_cave".parse::<Biome>(), Ok(Biome::FairyCave));
        assert_eq!("Fairy-Cave".parse::<Biome>(), Ok(Biome::FairyCave));
        assert!("moon".parse::<Biome>().is_err());
    }

    #[test]
    fn test_element_type_parse() {
        assert_eq!("steel".parse::<ElementType>(), Ok(ElementType::Steel));
        assert_eq!(" Electric ".parse::<ElementType>(), Ok(ElementType::Electric));
        assert!("sound".parse::<ElementType>().is_err());
        assert_eq!(ElementType::all().len(), 18);
    }

    #[test]
    fn test_party_member_id_uniqueness() {
        let id1 = new_party_member_id();
        let id2 = new_party_member_id();
        assert_ne!(id1, id2);
    }
}
