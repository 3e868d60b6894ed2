//! Headless Cubefall runner (default binary).
//!
//! Plays a game with the autoplay planner, one placement per step, and reports the
//! result. Optionally records the final score in a high-score file.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use cubefall::core::{GameConfig, GameState, GameSummary, HighScoreTable};
use cubefall::engine::autoplay;
use cubefall::types::GameEvent;

#[derive(Parser, Debug)]
#[command(name = "cubefall")]
#[command(about = "Play a game of 3D falling blocks with the built-in planner")]
struct Args {
    /// RNG seed
    #[arg(long, default_value_t = 1)]
    seed: u32,

    /// Stop after this many pieces (0 plays until game over)
    #[arg(long, default_value_t = 0)]
    pieces: u32,

    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// High-score file to record the result in
    #[arg(long)]
    scores: Option<PathBuf>,

    /// Name recorded with the score
    #[arg(long, default_value = "autoplay")]
    player: String,

    /// Simulated frame length between placements, in milliseconds
    #[arg(long, default_value_t = 16)]
    dt_ms: u32,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cubefall=info,cubefall_core=info,cubefall_engine=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut state = GameState::new(config, args.seed);
    let summary = run(&args, &mut state)?;

    if let Some(path) = &args.scores {
        record(path, state.config().scoreboard_capacity, &args.player, &summary)?;
    }
    Ok(())
}

fn run(args: &Args, state: &mut GameState) -> Result<GameSummary> {
    let finished: Rc<RefCell<Option<GameSummary>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&finished);
    state.register_game_over_observer(move |s: &GameSummary| *sink.borrow_mut() = Some(*s));

    state.start();
    let dt = args.dt_ms as f32 / 1000.0;

    loop {
        if args.pieces != 0 && state.pieces_placed() >= args.pieces {
            info!(pieces = state.pieces_placed(), "piece limit reached");
            break;
        }
        if autoplay::step(state)?.is_none() {
            break;
        }
        state.tick(dt, false);

        for event in state.take_events() {
            if let GameEvent::PlanesCleared { count } = event {
                debug!(count, score = state.score(), "planes cleared");
            }
        }
    }

    let finished = *finished.borrow();
    let summary = finished.unwrap_or_else(|| state.summary());

    if args.json {
        println!("{}", state.snapshot().to_json()?);
    } else {
        println!("seed:           {}", summary.seed);
        println!("score:          {}", summary.score);
        println!("difficulty:     {:.2}", summary.difficulty);
        println!("pieces placed:  {}", summary.pieces_placed);
        println!("planes cleared: {}", summary.planes_cleared);
        println!("game over:      {}", state.is_game_over());
    }
    Ok(summary)
}

fn record(path: &Path, capacity: usize, player: &str, summary: &GameSummary) -> Result<()> {
    let mut table = HighScoreTable::load(path, capacity)?;
    match table.add(player, summary.score) {
        Some(position) => {
            table.save(path)?;
            info!(position = position + 1, score = summary.score, "new high score");
        }
        None => info!(score = summary.score, "score did not make the table"),
    }
    Ok(())
}
