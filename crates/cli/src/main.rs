// Larder CLI - headless reconciliation over CSV storage snapshots

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use larder_engine::order::MoveDirection;
use larder_engine::EngineError;

use exit_codes::{engine_exit_code, EXIT_IO, EXIT_SUCCESS};

#[derive(Parser)]
#[command(name = "larder")]
#[command(about = "Household grocery reconciliation (merge duplicates, offset pantry stock)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile every storage: merge duplicates, then offset the shopping
    /// list against pantry stock
    #[command(after_help = "\
Examples:
  larder run household.toml
  larder run household.toml --json
  larder run household.toml --json -o plan.json")]
    Run {
        /// Household config (TOML)
        config: PathBuf,

        /// Output the full persistence plan as JSON
        #[arg(long)]
        json: bool,

        /// Write JSON to a file instead of stdout (implies --json)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Merge duplicates within a single storage, without any pantry offset
    #[command(after_help = "\
Examples:
  larder merge household.toml shoppinglist
  larder merge household.toml pantry --json")]
    Merge {
        /// Household config (TOML)
        config: PathBuf,

        /// Storage name from the config's [storages] table
        storage: String,

        /// Output the merge plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move one record a single step in display order
    #[command(after_help = "\
A move past either end of the list is a no-op and exits 0 with an empty
patch list.

Examples:
  larder move household.toml shoppinglist --index 2 --direction up
  larder move household.toml shoppinglist --index 0 --direction down --json")]
    Move {
        /// Household config (TOML)
        config: PathBuf,

        /// Storage name from the config's [storages] table
        storage: String,

        /// Display-order index of the record to move (0 = first visible)
        #[arg(long)]
        index: usize,

        /// Direction of the move
        #[arg(long)]
        direction: Direction,

        /// Output the reorder plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Renumber a storage's positions to a clean 1..=N sequence
    #[command(after_help = "\
Positions are laid over the current display order using the storage's
configured convention; only records whose position changes are patched.

Examples:
  larder sort household.toml shoppinglist
  larder sort household.toml pantry --json")]
    Sort {
        /// Household config (TOML)
        config: PathBuf,

        /// Storage name from the config's [storages] table
        storage: String,

        /// Output the reorder plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse and validate a config without touching any storage data
    #[command(after_help = "\
Exit codes:
  0  Config is valid and every storage file exists
  3  TOML parse or validation failure
  6  A storage file is missing or unreadable

Examples:
  larder validate household.toml")]
    Validate {
        /// Household config (TOML)
        config: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Direction {
    Up,
    Down,
}

impl From<Direction> for MoveDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => MoveDirection::Up,
            Direction::Down => MoveDirection::Down,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output } => commands::cmd_run(config, json, output),
        Commands::Merge { config, storage, json } => commands::cmd_merge(config, storage, json),
        Commands::Move { config, storage, index, direction, json } => {
            commands::cmd_move(config, storage, index, direction.into(), json)
        }
        Commands::Sort { config, storage, json } => commands::cmd_sort(config, storage, json),
        Commands::Validate { config } => commands::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Create error from an engine error with proper exit code.
    pub fn engine(err: EngineError) -> Self {
        let code = engine_exit_code(&err);
        let hint = match &err {
            EngineError::UnknownStorage(_) => {
                Some("storage names come from the config's [storages] table".to_string())
            }
            EngineError::QuantityParse { .. } => {
                Some("quantities must be empty, an integer, a decimal, or 'a/b'".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
