#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays headless Bloon Defence matches.

mod save_transfer;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use bloon_defence_core::{
    Command, Difficulty, Event, Position, SimulationConfig, TowerKind, UpgradePath,
};
use bloon_defence_world::{self as world, query, World};
use clap::{Parser, Subcommand, ValueEnum};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Random positions tried per requested tower before giving up.
const PLACEMENT_ATTEMPTS: usize = 64;
/// Ticks a single round may take before the run is considered stuck.
const MAX_TICKS_PER_ROUND: u64 = 100_000;

#[derive(Debug, Parser)]
#[command(name = "bloon-defence", about = "Plays headless Bloon Defence matches")]
struct Cli {
    /// TOML file overriding simulation limits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Plays rounds against a seeded random tower layout.
    Run(RunArgs),
    /// Decodes a save string and prints it as JSON.
    Inspect {
        /// Save string produced by a previous run.
        save: String,
    },
}

#[derive(Debug, clap::Args)]
struct RunArgs {
    /// Seed for the tower layout and upgrade choices.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Rounds to play.
    #[arg(long, default_value_t = 5)]
    rounds: u32,
    /// Towers to place before the first round.
    #[arg(long, default_value_t = 6)]
    towers: usize,
    /// Difficulty of a new game.
    #[arg(long, value_enum, default_value_t = DifficultyArg::Medium)]
    difficulty: DifficultyArg,
    /// Free purchases and unlimited lives.
    #[arg(long)]
    sandbox: bool,
    /// Run two simulation steps per tick.
    #[arg(long)]
    fast_forward: bool,
    /// Resume from a save string instead of starting a new game.
    #[arg(long)]
    resume: Option<String>,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DifficultyArg {
    Easy,
    Medium,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Self::Easy,
            DifficultyArg::Medium => Self::Medium,
            DifficultyArg::Hard => Self::Hard,
        }
    }
}

#[derive(Debug, Default, Serialize)]
struct Tally {
    rounds: u32,
    pops: u64,
    leaks: u64,
    lives_lost: u64,
    deferred: u64,
    dropped: u64,
}

impl Tally {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::BloonPopped { .. } => self.pops += 1,
                Event::BloonLeaked { lives_lost, .. } => {
                    self.leaks += 1;
                    self.lives_lost += u64::from(*lives_lost);
                }
                Event::ChildDeferred { .. } => self.deferred += 1,
                Event::ChildDropped { .. } => self.dropped += 1,
                Event::RoundCompleted { .. } => self.rounds += 1,
                _ => {}
            }
        }
    }
}

/// Entry point for the Bloon Defence command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.mode {
        Mode::Run(args) => run(config, &args),
        Mode::Inspect { save } => {
            let save = save_transfer::decode(&save).context("failed to decode save string")?;
            println!("{}", serde_json::to_string_pretty(&save)?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<SimulationConfig> {
    let Some(path) = path else {
        return Ok(SimulationConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn run(config: SimulationConfig, args: &RunArgs) -> Result<()> {
    let mut world = World::with_config(config).context("invalid simulation config")?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut events = Vec::new();
    let mut tally = Tally::default();

    match &args.resume {
        Some(encoded) => {
            let save = save_transfer::decode(encoded).context("failed to decode save string")?;
            world::apply(&mut world, Command::LoadGame { save }, &mut events);
            if let Some(Event::LoadRejected { reason }) = events.first() {
                bail!("saved game rejected: {reason}");
            }
        }
        None => {
            world::apply(
                &mut world,
                Command::NewGame {
                    difficulty: args.difficulty.into(),
                    sandbox: args.sandbox,
                },
                &mut events,
            );
            let placed = place_random_towers(&mut world, &mut rng, args.towers)?;
            info!(placed, requested = args.towers, "tower layout ready");
        }
    }

    if args.fast_forward {
        world::apply(
            &mut world,
            Command::SetFastForward { enabled: true },
            &mut events,
        );
    }

    for _ in 0..args.rounds {
        if query::is_game_over(&world) {
            break;
        }
        buy_random_upgrade(&mut world, &mut rng);
        play_round(&mut world, &mut tally)?;
    }

    let save = query::saved_game(&world);
    let report = Report {
        tally,
        round: save.round,
        lives: save.lives,
        coins: save.coins,
        game_over: query::is_game_over(&world),
        towers: query::tower_view(&world)
            .iter()
            .map(|tower| TowerLine {
                kind: format!("{:?}", tower.kind),
                x: tower.position.x(),
                y: tower.position.y(),
                levels: [
                    tower.levels.get(UpgradePath::First),
                    tower.levels.get(UpgradePath::Second),
                ],
                pops: tower.pops,
            })
            .collect(),
        digest: digest(&world)?,
        save: save_transfer::encode(&save).context("failed to encode save string")?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct Report {
    #[serde(flatten)]
    tally: Tally,
    round: u32,
    lives: u32,
    coins: u32,
    game_over: bool,
    towers: Vec<TowerLine>,
    digest: String,
    save: String,
}

#[derive(Debug, Serialize)]
struct TowerLine {
    kind: String,
    x: i32,
    y: i32,
    levels: [u8; 2],
    pops: u32,
}

impl Report {
    fn print(&self) {
        let tally = &self.tally;
        println!("rounds completed: {}", tally.rounds);
        println!("bloons popped:    {}", tally.pops);
        println!(
            "bloons leaked:    {} ({} lives)",
            tally.leaks, tally.lives_lost
        );
        println!(
            "children held:    {} deferred, {} dropped",
            tally.deferred, tally.dropped
        );
        println!(
            "final state:      round {}, {} lives, {} coins{}",
            self.round,
            self.lives,
            self.coins,
            if self.game_over { ", game over" } else { "" }
        );
        for tower in &self.towers {
            println!(
                "  {} at ({}, {}) levels {}/{} pops {}",
                tower.kind, tower.x, tower.y, tower.levels[0], tower.levels[1], tower.pops
            );
        }
        println!("digest: {}", self.digest);
        println!("save:   {}", self.save);
    }
}

fn place_random_towers(world: &mut World, rng: &mut ChaCha8Rng, count: usize) -> Result<usize> {
    let config = query::config(world);
    let width = i32::try_from(config.width).context("playfield width exceeds i32")?;
    let height = i32::try_from(config.height).context("playfield height exceeds i32")?;

    let mut events = Vec::new();
    let mut placed = 0;
    for _ in 0..count.saturating_mul(PLACEMENT_ATTEMPTS) {
        if placed == count {
            break;
        }
        let kind = TowerKind::ALL[rng.gen_range(0..TowerKind::COUNT)];
        let position = Position::new(rng.gen_range(0..width), rng.gen_range(0..height));

        events.clear();
        world::apply(world, Command::PlaceTower { kind, position }, &mut events);
        if matches!(events.first(), Some(Event::TowerPlaced { .. })) {
            placed += 1;
        }
    }
    Ok(placed)
}

fn buy_random_upgrade(world: &mut World, rng: &mut ChaCha8Rng) {
    let towers = query::tower_view(world).into_vec();
    if towers.is_empty() {
        return;
    }
    let tower = towers[rng.gen_range(0..towers.len())].id;
    let path = if rng.gen_bool(0.5) {
        UpgradePath::First
    } else {
        UpgradePath::Second
    };

    let mut events = Vec::new();
    world::apply(world, Command::UpgradeTower { tower, path }, &mut events);
    debug!(?events, "upgrade attempt");
}

fn play_round(world: &mut World, tally: &mut Tally) -> Result<()> {
    let mut events = Vec::new();
    world::apply(world, Command::StartRound, &mut events);
    if let Some(Event::RoundStartRejected { reason }) = events.first() {
        bail!("round could not start: {reason}");
    }

    for _ in 0..MAX_TICKS_PER_ROUND {
        events.clear();
        world::apply(world, Command::Tick, &mut events);
        tally.record(&events);
        let finished = events
            .iter()
            .any(|event| matches!(event, Event::RoundCompleted { .. } | Event::GameOver { .. }));
        if finished {
            return Ok(());
        }
    }
    bail!(
        "round {} did not finish within {MAX_TICKS_PER_ROUND} ticks",
        query::round(world)
    )
}

fn digest(world: &World) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(&query::saved_game(world))?);
    hasher.update(query::tick(world).to_le_bytes());
    for tower in query::tower_view(world).iter() {
        hasher.update(tower.pops.to_le_bytes());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
