//! # Wavebound Main Entry Point
//!
//! Builds a run state, rolls an encounter for the current wave, plays it in
//! the console, and prints the outcome as JSON.

use async_trait::async_trait;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use wavebound::{
    parse_option_choice, parse_option_number, Biome, ConsolePresentation, ElementType,
    EncounterConfig, EncounterController, EncounterOutcome, EncounterRegistry, EncounterServices,
    GameState, LoggingBattleInitializer, OptionCommand, OptionSelector, OptionView, PartyMember,
    ScriptedSelector, SpeciesId, SpeciesPool, WaveboundError, WaveboundResult,
};

/// Command line arguments for the Wavebound encounter demo.
#[derive(Parser, Debug)]
#[command(name = "wavebound")]
#[command(about = "Plays one scripted encounter of a wave-based roguelite run")]
#[command(version)]
struct Args {
    /// Random seed for the run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Wave number to play
    #[arg(short, long, default_value_t = 42)]
    wave: u32,

    /// Money the player starts with
    #[arg(short, long, default_value_t = 10_000)]
    money: u64,

    /// Biome the run is in
    #[arg(short, long, default_value = "plains")]
    biome: Biome,

    /// Party member as NAME:TYPE[/TYPE]; repeat for more members
    #[arg(long = "member", value_parser = parse_member)]
    members: Vec<MemberArg>,

    /// Play this encounter instead of rolling one
    #[arg(short, long)]
    encounter: Option<String>,

    /// Option to pick (1-based); prompts on stdin when absent
    #[arg(short, long, value_parser = parse_option_number)]
    choice: Option<usize>,

    /// Encounter configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Load the run state from this JSON save instead of the flags above
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write the run state here after the encounter
    #[arg(long)]
    save: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> WaveboundResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level)?;

    info!("Starting Wavebound v{}", wavebound::VERSION);

    if let Err(err) = run(&args).await {
        error!("Encounter failed: {}", err);
        return Err(err);
    }
    Ok(())
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) -> WaveboundResult<()> {
    #[cfg(feature = "dev-tools")]
    {
        use tracing_subscriber::EnvFilter;

        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(log_level))
            .with_target(false)
            .try_init()
            .map_err(|e| WaveboundError::InvalidConfig(e.to_string()))?;
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .try_init()
            .map_err(|e| WaveboundError::InvalidConfig(e.to_string()))?;
    }

    Ok(())
}

async fn run(args: &Args) -> WaveboundResult<()> {
    let mut config = match &args.config {
        Some(path) => EncounterConfig::from_json_file(path)?,
        None => EncounterConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut state = match &args.load {
        Some(path) => GameState::load_from_file(path)?,
        None => build_state(args, config.seed)?,
    };
    info!(
        "Wave {} in {} with {} money and {} party member(s)",
        state.wave_index,
        state.biome,
        state.money,
        state.party.len()
    );

    let presentation = ConsolePresentation::new(config.text_delay(), config.animation_duration());
    let species = SpeciesPool::standard();
    let services = EncounterServices::new(&presentation, &species);

    let controller = EncounterController::new(EncounterRegistry::with_catalog()?, config)?;
    let session = match &args.encounter {
        Some(id) => controller.start_encounter(id, &state)?,
        None => controller.roll_encounter(&state).ok_or_else(|| {
            WaveboundError::InvalidState(format!(
                "no encounter qualifies on wave {} with {} money",
                state.wave_index, state.money
            ))
        })?,
    };

    let mut selector: Box<dyn OptionSelector> = match args.choice {
        Some(index) => Box::new(ScriptedSelector::new(vec![index])),
        None => Box::new(StdinSelector::new()),
    };

    let outcome = session
        .run(&mut state, services, selector.as_mut(), &LoggingBattleInitializer)
        .await?;

    match &outcome {
        EncounterOutcome::Resolved(resolved) => info!(
            "Encounter '{}' resolved with option {}",
            resolved.encounter_id,
            resolved.option_index + 1
        ),
        EncounterOutcome::Abandoned { encounter_id } => {
            info!("Encounter '{}' abandoned", encounter_id)
        }
    }
    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(path) = &args.save {
        state.save_to_file(path)?;
        info!("Run saved to {}", path.display());
    }
    Ok(())
}

fn build_state(args: &Args, seed: u64) -> WaveboundResult<GameState> {
    let mut state = GameState::new(seed)
        .with_wave(args.wave)
        .with_money(args.money)
        .with_biome(args.biome);

    if args.members.is_empty() {
        state.add_party_member(PartyMember::new(
            "Scout",
            SpeciesId(1),
            args.wave.max(1),
            vec![ElementType::Normal],
        ))?;
    }
    for member in &args.members {
        state.add_party_member(PartyMember::new(
            member.name.clone(),
            SpeciesId(0),
            args.wave.max(1),
            member.types.clone(),
        ))?;
    }
    Ok(state)
}

/// A party member given on the command line.
#[derive(Debug, Clone)]
struct MemberArg {
    name: String,
    types: Vec<ElementType>,
}

fn parse_member(value: &str) -> Result<MemberArg, String> {
    let (name, types) = value
        .split_once(':')
        .ok_or_else(|| format!("expected NAME:TYPE[/TYPE], got '{}'", value))?;
    let types = types
        .split('/')
        .map(str::parse::<ElementType>)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(MemberArg {
        name: name.trim().to_string(),
        types,
    })
}

/// Prompts for an option on stdin until the player picks one or quits.
struct StdinSelector {
    lines: tokio::io::Lines<BufReader<Stdin>>,
}

impl StdinSelector {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

#[async_trait]
impl OptionSelector for StdinSelector {
    async fn choose(&mut self, options: &[OptionView]) -> Option<usize> {
        for view in options.iter().filter(|view| view.is_visible()) {
            let marker = if view.is_selectable() { " " } else { "x" };
            println!("[{}] {}. {}", marker, view.index + 1, view.label);
        }

        loop {
            println!("Choose an option (q to walk away):");
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return None,
                Err(err) => {
                    error!("Could not read input: {}", err);
                    return None;
                }
            };
            match parse_option_choice(&line, options) {
                OptionCommand::Choose(index) => return Some(index),
                OptionCommand::Abandon => return None,
                OptionCommand::Invalid(reason) => println!("{}", reason),
            }
        }
    }
}
