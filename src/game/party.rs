//! # Party Members
//!
//! The player's monsters as seen by encounters: identity, typing, health and luck.

use crate::{new_party_member_id, ElementType, PartyMemberId, SpeciesId};
use serde::{Deserialize, Serialize};

/// A monster in the player's party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyMember {
    /// Unique identifier for this member
    pub id: PartyMemberId,
    /// Display name (nickname or species name)
    pub name: String,
    /// Species of this member
    pub species: SpeciesId,
    /// Current level
    pub level: u32,
    /// One or two elemental types
    pub types: Vec<ElementType>,
    /// Current hit points
    pub hp: u32,
    /// Maximum hit points
    pub max_hp: u32,
    /// Luck contributed to species rolls (shiny variants carry more)
    pub luck: u32,
    /// Experience accumulated
    pub exp: u64,
}

impl PartyMember {
    /// Creates a healthy party member with no luck.
    ///
    /// # Examples
    ///
    /// ```
    /// use wavebound::{ElementType, PartyMember, SpeciesId};
    ///
    /// let member = PartyMember::new("Sparky", SpeciesId(25), 30, vec![ElementType::Electric]);
    /// assert_eq!(member.level, 30);
    /// assert!(!member.is_fainted());
    /// ```
    pub fn new(name: impl Into<String>, species: SpeciesId, level: u32, types: Vec<ElementType>) -> Self {
        let max_hp = 10 + level * 3;
        Self {
            id: new_party_member_id(),
            name: name.into(),
            species,
            level,
            types,
            hp: max_hp,
            max_hp,
            luck: 0,
            exp: 0,
        }
    }

    /// Sets the member's luck value.
    pub fn with_luck(mut self, luck: u32) -> Self {
        self.luck = luck;
        self
    }

    /// Whether the member has no hit points left.
    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    /// Whether the member has the given type.
    pub fn has_type(&self, element: ElementType) -> bool {
        self.types.contains(&element)
    }

    /// Knocks the member out.
    pub fn faint(&mut self) {
        self.hp = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_typing() {
        let member = PartyMember::new(
            "Coil",
            SpeciesId(81),
            20,
            vec![ElementType::Electric, ElementType::Steel],
        );
        assert!(member.has_type(ElementType::Steel));
        assert!(member.has_type(ElementType::Electric));
        assert!(!member.has_type(ElementType::Fire));
    }

    #[test]
    fn test_member_faint() {
        let mut member = PartyMember::new("Ember", SpeciesId(4), 5, vec![ElementType::Fire]);
        assert!(!member.is_fainted());
        member.faint();
        assert!(member.is_fainted());
        assert_eq!(member.hp, 0);
    }
}
