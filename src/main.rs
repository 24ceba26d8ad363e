use clap::Parser;
use colony_bot::message::*;
use colony_bot::*;
use log::*;
use std::io::{self, BufRead, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::process;

#[derive(Parser, Debug)]
#[command(author, version, about = "Reads world snapshots as JSON lines on stdin and writes one action array per line", long_about = None)]
struct Cli {
    /// JSON file overriding engine tunables; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Wall-clock budget per tick in milliseconds.
    #[arg(long)]
    budget_ms: Option<u64>,
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

fn load_config(cli: &Cli) -> Result<EngineConfig, String> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    if let Some(budget) = cli.budget_ms {
        config.timing.tick_budget_ms = budget;
    }

    Ok(config)
}

fn run_tick(engine: &mut Engine, state: &TeamGameState) -> Vec<Action> {
    match catch_unwind(AssertUnwindSafe(|| engine.tick(state))) {
        Ok(actions) => actions,
        Err(_) => {
            error!("Tick {} panicked, emitting no actions", state.tick);
            Vec::new()
        }
    }
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logging(cli.log_level);
    colony_bot::panic::setup_panic_hook();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            process::exit(2);
        }
    };

    info!("Starting with a {}ms tick budget", config.timing.tick_budget_ms);

    let mut engine = Engine::new(config);

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("Failed to read input: {}", err);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let state: TeamGameState = match serde_json::from_str(&line) {
            Ok(state) => state,
            Err(err) => {
                warn!("Skipping unparseable snapshot: {}", err);
                continue;
            }
        };

        let actions = run_tick(&mut engine, &state);

        let written = serde_json::to_string(&actions)
            .map_err(|e| e.to_string())
            .and_then(|json| writeln!(out, "{}", json).and_then(|_| out.flush()).map_err(|e| e.to_string()));

        if let Err(err) = written {
            error!("Failed to write actions for tick {}: {}", state.tick, err);
            break;
        }
    }
}
