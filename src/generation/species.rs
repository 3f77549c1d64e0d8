//! # Species Generation
//!
//! Rolls which wild species an encounter spawns.

use crate::{Biome, ElementType, SpeciesId, WaveboundError, WaveboundResult};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Source of wild species for encounters.
pub trait SpeciesGenerator: Send + Sync {
    /// Rolls a species for the given biome, wave and level.
    ///
    /// `luck` is the party luck value; higher luck tilts the roll toward rarer species.
    fn random_species(
        &self,
        biome: Biome,
        wave: u32,
        level: u32,
        luck: u32,
        is_boss: bool,
        rng: &mut StdRng,
    ) -> WaveboundResult<SpeciesId>;

    /// Looks up static data for a species.
    fn species_info(&self, id: SpeciesId) -> Option<&SpeciesInfo>;
}

/// How often a species shows up in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeciesRarity {
    Common,
    Uncommon,
    Rare,
    SuperRare,
    Ultra,
}

impl SpeciesRarity {
    /// Earliest wave at which the rarity can be rolled at all.
    pub fn min_wave(self) -> u32 {
        match self {
            SpeciesRarity::Ultra => 50,
            _ => 1,
        }
    }

    /// Roll weight for the rarity.
    ///
    /// Each point of luck adds to the weight of the rarer tiers; bosses
    /// double the weight of rare-and-above.
    pub fn weight(self, luck: u32, is_boss: bool) -> u32 {
        let (base, luck_step) = match self {
            SpeciesRarity::Common => (64, 0),
            SpeciesRarity::Uncommon => (32, 1),
            SpeciesRarity::Rare => (12, 2),
            SpeciesRarity::SuperRare => (4, 1),
            SpeciesRarity::Ultra => (1, 1),
        };
        let weight = base + luck * luck_step;
        if is_boss && !matches!(self, SpeciesRarity::Common | SpeciesRarity::Uncommon) {
            weight * 2
        } else {
            weight
        }
    }
}

/// Static data for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesInfo {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<ElementType>,
    /// Lowest level the species appears at in the wild
    pub min_level: u32,
    pub rarity: SpeciesRarity,
    /// Biomes the species lives in; empty means everywhere
    pub biomes: Vec<Biome>,
}

impl SpeciesInfo {
    /// Whether the species can appear in `biome`.
    pub fn lives_in(&self, biome: Biome) -> bool {
        self.biomes.is_empty() || self.biomes.contains(&biome)
    }
}

/// Table-driven [`SpeciesGenerator`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesPool {
    entries: Vec<SpeciesInfo>,
}

impl SpeciesPool {
    /// Creates a pool from species data.
    pub fn new(entries: Vec<SpeciesInfo>) -> Self {
        Self { entries }
    }

    /// All species in the pool.
    pub fn entries(&self) -> &[SpeciesInfo] {
        &self.entries
    }

    /// Loads a pool from a JSON array of species.
    pub fn from_json(json: &str) -> WaveboundResult<Self> {
        let entries: Vec<SpeciesInfo> = serde_json::from_str(json)?;
        Ok(Self::new(entries))
    }

    /// Small built-in pool covering every biome.
    pub fn standard() -> Self {
        use Biome::*;
        use ElementType::*;
        use SpeciesRarity::*;

        let rows: [(u32, &str, &[ElementType], u32, SpeciesRarity, &[Biome]); 16] = [
            (1, "Pebblit", &[Rock], 1, Common, &[]),
            (2, "Fluffin", &[Normal, Fairy], 1, Common, &[Town, Plains, FairyCave]),
            (3, "Sparkmite", &[Electric], 5, Common, &[PowerPlant, Laboratory, Factory]),
            (4, "Boltwing", &[Electric, Flying], 25, Uncommon, &[PowerPlant, Island]),
            (5, "Cogling", &[Steel], 10, Uncommon, &[Factory, Laboratory]),
            (6, "Gearhulk", &[Steel, Ground], 35, Rare, &[Factory, Mountain]),
            (7, "Glimmoth", &[Bug, Fairy], 8, Common, &[Forest, FairyCave]),
            (8, "Pixiedew", &[Fairy], 30, Rare, &[FairyCave]),
            (9, "Starlet", &[Psychic], 20, Uncommon, &[Space]),
            (10, "Cometusk", &[Rock, Psychic], 40, SuperRare, &[Space]),
            (11, "Shellwick", &[Water], 5, Common, &[Sea, Beach, Island]),
            (12, "Palmurk", &[ElementType::Grass, Water], 18, Uncommon, &[Island, Beach]),
            (13, "Vialix", &[Poison, Psychic], 22, Rare, &[Laboratory]),
            (14, "Cindrake", &[Fire, Dragon], 45, SuperRare, &[Volcano, Mountain]),
            (15, "Voidwyrm", &[Dragon, Dark], 60, Ultra, &[Space, End]),
            (16, "Tunnelmole", &[Ground], 1, Common, &[Cave, Desert, Mountain]),
        ];

        Self::new(
            rows.iter()
                .map(|(id, name, types, min_level, rarity, biomes)| SpeciesInfo {
                    id: SpeciesId(*id),
                    name: name.to_string(),
                    types: types.to_vec(),
                    min_level: *min_level,
                    rarity: *rarity,
                    biomes: biomes.to_vec(),
                })
                .collect(),
        )
    }

    fn candidates(&self, biome: Biome, wave: u32, level: u32) -> Vec<&SpeciesInfo> {
        let rollable = |info: &&SpeciesInfo| wave >= info.rarity.min_wave();

        let native: Vec<&SpeciesInfo> = self
            .entries
            .iter()
            .filter(|info| info.lives_in(biome))
            .filter(rollable)
            .collect();
        let leveled: Vec<&SpeciesInfo> = native
            .iter()
            .copied()
            .filter(|info| info.min_level <= level)
            .collect();

        if !leveled.is_empty() {
            return leveled;
        }
        if !native.is_empty() {
            return native;
        }
        self.entries
            .iter()
            .filter(rollable)
            .filter(|info| info.min_level <= level)
            .collect()
    }
}

impl SpeciesGenerator for SpeciesPool {
    fn random_species(
        &self,
        biome: Biome,
        wave: u32,
        level: u32,
        luck: u32,
        is_boss: bool,
        rng: &mut StdRng,
    ) -> WaveboundResult<SpeciesId> {
        let candidates = self.candidates(biome, wave, level);
        if candidates.is_empty() {
            return Err(WaveboundError::GenerationFailed(format!(
                "no species for {} at level {}",
                biome, level
            )));
        }

        let weights: Vec<u32> = candidates
            .iter()
            .map(|info| info.rarity.weight(luck, is_boss))
            .collect();
        let index = WeightedIndex::new(&weights)
            .map_err(|e| WaveboundError::GenerationFailed(e.to_string()))?;
        let chosen = candidates[index.sample(rng)];

        debug!(
            "Rolled {} ({:?}) in {} at level {} (luck {}, boss {})",
            chosen.name, chosen.rarity, biome, level, luck, is_boss
        );
        Ok(chosen.id)
    }

    fn species_info(&self, id: SpeciesId) -> Option<&SpeciesInfo> {
        self.entries.iter().find(|info| info.id == id)
    }
}
