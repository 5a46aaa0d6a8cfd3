use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};

use clap::{Args, Parser, Subcommand};
use floorplan::config::{ConfigError, EngineConfig};
use floorplan::engine::{Action, EngineCore};
use floorplan::input::{DrawingMode, InputEvent};
use floorplan::model::Entities;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("invalid engine config: {0}")]
    Config(#[from] ConfigError),
    #[error("script line {line}: {source}")]
    Script {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "floorplan-cli", about = "Replay floor-plan input scripts without a browser")]
struct Cli {
    #[arg(long, env = "FLOORPLAN_CONFIG", help = "Engine config JSON file")]
    config: Option<String>,

    #[arg(long, help = "Entities snapshot to load before replaying")]
    load: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the entities left after the script.
    Entities(ReplayArgs),
    /// Print the draw commands for the final frame.
    Scene(ReplayArgs),
    /// Print the actions returned by each script line.
    Actions(ReplayArgs),
}

#[derive(Args, Debug)]
struct ReplayArgs {
    #[arg(long, default_value = "-", help = "Script path (JSON lines), or - for stdin")]
    input: String,

    #[arg(long, default_value_t = false, help = "Place dropped catalog products on the plan")]
    place_drops: bool,
}

/// One script line. Control steps are tried first, then input events.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Step {
    Control(Control),
    Input(InputEvent),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Control {
    SetMode { mode: DrawingMode },
    CompleteWall,
    CompleteRoom,
    Cancel,
}

#[derive(Debug, Serialize)]
struct StepLog {
    line: usize,
    actions: Vec<Action>,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::from_json(&read_file(path)?)?,
        None => EngineConfig::default(),
    };
    let mut core = EngineCore::with_config(config);
    if let Some(path) = &cli.load {
        let entities: Entities = serde_json::from_str(&read_file(path)?)?;
        core.load_entities(entities);
    }

    match cli.command {
        Command::Entities(args) => {
            replay(&mut core, &args)?;
            print_json(&core.entities())
        }
        Command::Scene(args) => {
            replay(&mut core, &args)?;
            print_json(&core.scene())
        }
        Command::Actions(args) => {
            let log = replay(&mut core, &args)?;
            print_json(&log)
        }
    }
}

fn replay(core: &mut EngineCore, args: &ReplayArgs) -> Result<Vec<StepLog>, CliError> {
    let reader = open_input(&args.input)?;
    let mut log = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|source| CliError::Io { action: "read", path: args.input.clone(), source })?;
        let Some(step) = parse_step(&line, line_no)? else {
            continue;
        };

        let actions = apply(core, step);
        if args.place_drops {
            place_drops(core, &actions);
        }
        debug!(line = line_no, actions = actions.len(), "replayed step");
        log.push(StepLog { line: line_no, actions });
    }

    info!(steps = log.len(), entities = core.store.len(), "replay finished");
    Ok(log)
}

/// Blank lines and `//` comments are skipped.
fn parse_step(line: &str, line_no: usize) -> Result<Option<Step>, CliError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with("//") {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|source| CliError::Script { line: line_no, source })
}

fn apply(core: &mut EngineCore, step: Step) -> Vec<Action> {
    match step {
        Step::Control(Control::SetMode { mode }) => core.set_mode(mode),
        Step::Control(Control::CompleteWall) => core.complete_wall_polyline(),
        Step::Control(Control::CompleteRoom) => core.complete_room_polyline(),
        Step::Control(Control::Cancel) => core.cancel_drawing(),
        Step::Input(event) => core.dispatch(event),
    }
}

fn place_drops(core: &mut EngineCore, actions: &[Action]) {
    for action in actions {
        if let Action::ProductDropped(placement) = action {
            let product = core.add_product(placement.clone());
            debug!(id = %product.id, name = %product.name, "placed dropped product");
        }
    }
}

fn open_input(path: &str) -> Result<Box<dyn BufRead>, CliError> {
    if path == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).map_err(|source| CliError::Io { action: "open", path: path.to_owned(), source })?;
    Ok(Box::new(BufReader::new(file)))
}

fn read_file(path: &str) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io { action: "read", path: path.to_owned(), source })
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
