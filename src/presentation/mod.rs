//! # Presentation Module
//!
//! The dialogue and animation layer encounters talk to.
//!
//! Every call returns a [`PresentationTask`] instead of blocking: the caller
//! either awaits it directly, which keeps text in the order hooks issue it,
//! or hands several to a [`TaskBarrier`] to run them side by side and wait
//! for all of them.

pub mod barrier;
pub mod console;

pub use barrier::*;
pub use console::*;

use crate::Biome;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

/// A unit of presentation work that settles once it has finished playing.
pub type PresentationTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Token substitutions available to dialogue keys, e.g. `price` -> `1690`.
pub type DialogueTokens = BTreeMap<String, String>;

/// A task that has already finished.
pub fn completed_task() -> PresentationTask {
    Box::pin(std::future::ready(()))
}

/// Dialogue and visuals as seen from an encounter.
pub trait Presentation: Send + Sync {
    /// Shows one dialogue entry; settles when the player has read it.
    fn show_text(&self, key: &str, tokens: &DialogueTokens) -> PresentationTask;

    /// Slides the arena from one biome's backdrop to another's.
    fn animate_biome_change(&self, from: Biome, to: Biome) -> PresentationTask;

    /// Moves the encounter's intro sprites off the field, or fades them when `hide` is set.
    fn transition_intro_visuals(&self, hide: bool) -> PresentationTask;

    /// Switches background music to the biome's track. The switch happens on
    /// issue; the task settles once the new track is playing.
    fn play_bgm(&self, biome: Biome) -> PresentationTask;
}
