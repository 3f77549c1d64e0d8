//! # Wavebound
//!
//! Scripted encounter engine for a wave-based monster-battling roguelite.
//!
//! ## Architecture Overview
//!
//! An encounter is a narrative branch point between battles. The player is
//! shown a handful of options, picks one, and the option's hooks mutate the
//! world and hand a prepared enemy party over to the battle system.
//!
//! - **Game State**: money, wave, biome and party the encounter reads and mutates
//! - **Requirements**: pure predicates gating encounters and their options
//! - **Definitions**: immutable encounter/option descriptors built from plain structs
//! - **Controller**: the `INIT -> INTRO -> AWAITING_OPTION -> PRE_PHASE ->
//!   RESOLUTION -> HANDOFF` state machine
//! - **Generation**: encounter selection, species rolls and biome picks, all seeded
//! - **Presentation**: text and animation tasks, joined through an explicit barrier
//!
//! Battle resolution itself lives outside this crate; it is reached through
//! the [`BattleInitializer`] trait.

pub mod encounters;
pub mod game;
pub mod generation;
pub mod input;
pub mod presentation;
pub mod utils;

// Core module re-exports
pub use encounters::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use presentation::*;
pub use utils::*;

/// Core error type for the Wavebound encounter engine.
#[derive(thiserror::Error, Debug)]
pub enum WaveboundError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// A programming error in how an encounter was driven
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// An option or init hook returned an error
    #[error("{phase} hook failed: {source}")]
    HookFailed {
        phase: EncounterPhase,
        #[source]
        source: Box<WaveboundError>,
    },

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// A spawned presentation task panicked or was cancelled
    #[error("Presentation task failed: {0}")]
    TaskFailed(String),

    /// The battle system rejected the enemy party
    #[error("Battle initialization failed: {0}")]
    BattleInitFailed(String),

    /// Configuration could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type used throughout the Wavebound codebase.
pub type WaveboundResult<T> = Result<T, WaveboundError>;

/// Version information for the engine.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine constants.
pub mod config {
    /// Most options a single encounter may offer
    pub const MAX_ENCOUNTER_OPTIONS: usize = 4;

    /// Upper bound on the party luck value fed into species rolls
    pub const MAX_PARTY_LUCK: u32 = 14;

    /// Maximum party size
    pub const MAX_PARTY_SIZE: usize = 6;

    /// Waves per biome segment; boss waves land on multiples of this
    pub const WAVES_PER_SEGMENT: u32 = 10;

    /// Default starting money for a new run
    pub const DEFAULT_STARTING_MONEY: u64 = 1000;
}
