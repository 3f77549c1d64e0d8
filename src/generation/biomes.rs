//! # Biome Selection
//!
//! Picks where a teleport lands.

use crate::{Biome, WaveboundError, WaveboundResult};
use rand::rngs::StdRng;
use rand::Rng;

/// Picks a destination biome from `candidates`, never the `current` one.
///
/// The current biome is removed before sampling, so the roll is uniform over
/// the remaining candidates.
///
/// # Examples
///
/// ```
/// use wavebound::{create_rng, pick_new_biome, Biome};
///
/// let mut rng = create_rng(1);
/// let next = pick_new_biome(&[Biome::Space, Biome::Island], Biome::Space, &mut rng).unwrap();
/// assert_eq!(next, Biome::Island);
/// ```
pub fn pick_new_biome(
    candidates: &[Biome],
    current: Biome,
    rng: &mut StdRng,
) -> WaveboundResult<Biome> {
    let filtered: Vec<Biome> = candidates
        .iter()
        .copied()
        .filter(|biome| *biome != current)
        .collect();

    if filtered.is_empty() {
        return Err(WaveboundError::GenerationFailed(format!(
            "no destination biome besides {}",
            current
        )));
    }

    Ok(filtered[rng.gen_range(0..filtered.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_rng;

    #[test]
    fn test_only_current_is_an_error() {
        let mut rng = create_rng(5);
        assert!(pick_new_biome(&[Biome::Space], Biome::Space, &mut rng).is_err());
        assert!(pick_new_biome(&[], Biome::Town, &mut rng).is_err());
    }

    #[test]
    fn test_every_other_candidate_is_reachable() {
        let candidates = [Biome::Space, Biome::FairyCave, Biome::Laboratory, Biome::Island];
        let mut rng = create_rng(11);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..200 {
            seen.insert(pick_new_biome(&candidates, Biome::Laboratory, &mut rng).unwrap());
        }
        assert_eq!(
            seen.into_iter().collect::<Vec<_>>(),
            vec![Biome::Island, Biome::FairyCave, Biome::Space]
        );
    }
}
