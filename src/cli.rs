//! Command-line options and process setup for the `panel-pop` binary.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::core::{presets, BoardConfig, GameBoard, SimpleRng};
use crate::types::GameMode;

/// Stage loaded when puzzle mode is picked without `--puzzle`.
pub const DEFAULT_PUZZLE: &str = "original1-1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// RNG seed token; a time-based token is used when absent.
    pub seed: Option<String>,
    pub mode: GameMode,
    pub puzzle: Option<String>,
    pub config: Option<PathBuf>,
    pub autoplay: bool,
    pub log: Option<PathBuf>,
    /// Run this many ticks without a terminal, then print the grid.
    pub headless: Option<u64>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            seed: None,
            mode: GameMode::Endless,
            puzzle: None,
            config: None,
            autoplay: false,
            log: None,
            headless: None,
        }
    }
}

/// Parse the arguments after the program name.
pub fn parse_run_args(args: &[String]) -> Result<RunOptions> {
    let mut opts = RunOptions::default();
    let mut mode_given = false;
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--seed" => {
                i += 1;
                let v = value(args, i, "--seed")?;
                opts.seed = Some(v.to_string());
            }
            "--mode" => {
                i += 1;
                let v = value(args, i, "--mode")?;
                opts.mode =
                    GameMode::from_str(v).ok_or_else(|| anyhow!("invalid --mode value: {}", v))?;
                mode_given = true;
            }
            "--puzzle" => {
                i += 1;
                let v = value(args, i, "--puzzle")?;
                opts.puzzle = Some(v.to_string());
            }
            "--config" => {
                i += 1;
                opts.config = Some(PathBuf::from(value(args, i, "--config")?));
            }
            "--log" => {
                i += 1;
                opts.log = Some(PathBuf::from(value(args, i, "--log")?));
            }
            "--autoplay" => opts.autoplay = true,
            "--headless" => {
                i += 1;
                let v = value(args, i, "--headless")?;
                let ticks = v
                    .parse::<u64>()
                    .map_err(|_| anyhow!("invalid --headless value: {}", v))?;
                opts.headless = Some(ticks);
            }
            other => return Err(anyhow!("unknown argument: {}", other)),
        }
        i += 1;
    }

    if opts.puzzle.is_some() {
        if mode_given && opts.mode == GameMode::Endless {
            return Err(anyhow!("--puzzle cannot be combined with --mode endless"));
        }
        opts.mode = GameMode::Puzzle;
    }
    Ok(opts)
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", flag))
}

/// Board described by `opts`, with its config file applied.
pub fn build_board(opts: &RunOptions) -> Result<GameBoard> {
    let config = match &opts.config {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => BoardConfig::default(),
    };
    let seed = opts.seed.clone().unwrap_or_else(time_seed);
    let rng = SimpleRng::from_token(&seed);

    let board = match opts.mode {
        GameMode::Endless => GameBoard::endless_with_config(rng, config),
        GameMode::Puzzle => {
            let name = opts.puzzle.as_deref().unwrap_or(DEFAULT_PUZZLE);
            let layout = presets::lookup(name)?;
            GameBoard::puzzle_with_config(layout, rng, config)
                .with_context(|| format!("parsing puzzle {}", name))?
        }
    };
    info!(mode = opts.mode.as_str(), seed = %seed, "board ready");
    Ok(board)
}

fn time_seed() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    format!("{millis:x}")
}

/// Install the global subscriber. `RUST_LOG` overrides the `warn` default.
///
/// Output goes to `log` when given and is discarded otherwise, so it never
/// lands on the alternate screen.
pub fn init_logging(log: Option<&PathBuf>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false);

    let installed = match log {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).try_init()
        }
        None => builder.with_writer(std::io::sink).try_init(),
    };
    installed.map_err(|e| anyhow!("installing log subscriber: {}", e))
}
