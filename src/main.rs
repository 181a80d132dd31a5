use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, Level};

use endless_ttt::min_max::print_3_by_3;
use endless_ttt::{Engine, EngineConfig, MoveRequest};

/// Answers one endless tic-tac-toe move request with the engine's move.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Move request JSON, read from stdin if omitted
    request: Option<PathBuf>,

    /// Difficulty tier configuration (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for the random tiers
    #[arg(long)]
    seed: Option<u64>,

    /// Print the search score of every empty cell to stderr
    #[arg(long)]
    scores: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .init();

    let config = match &args.config {
        Some(path) => EngineConfig::load(path).with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let json = read_request(args.request.as_deref())?;
    let request: MoveRequest = serde_json::from_str(&json).context("parsing move request")?;

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut engine = Engine::with_rng(config, rng);

    if args.scores {
        let position = request.to_position().context("scoring cells")?;
        let scores = engine.score_cells(&position.state, position.difficulty);
        print_3_by_3(&scores.map(|score| score.map_or_else(|| "-".to_string(), |score| score.to_string())));
    }

    let response = engine.respond(&request);
    info!(?response, "answered");
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

fn read_request(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading request {}", path.display())),
        None => {
            let mut json = String::new();
            io::stdin().read_to_string(&mut json).context("reading request from stdin")?;
            Ok(json)
        }
    }
}
