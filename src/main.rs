//! Warptag CLI - host or join a two-player chase game.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Warptag - a two-player chase across two linked maps
#[derive(Parser, Debug)]
#[command(name = "warptag")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Wait for a player and chase them (authoritative side)
    Host {
        /// TCP port to listen on
        #[arg(short, long, default_value = "9000")]
        port: u16,

        #[command(flatten)]
        game: GameArgs,
    },

    /// Connect to a host and run (mirror side)
    Join {
        /// Host address, e.g. 127.0.0.1:9000
        #[arg(required = true)]
        addr: String,

        #[command(flatten)]
        game: GameArgs,
    },

    /// Check that a map file is playable
    CheckMap {
        /// Map file to check
        #[arg(required = true)]
        map: PathBuf,
    },
}

/// Options shared by `host` and `join`.
#[derive(Args, Debug)]
struct GameArgs {
    /// Main map file
    #[arg(long, default_value = "O-map.txt")]
    primary_map: PathBuf,

    /// Sub map file
    #[arg(long, default_value = "T-map.txt")]
    secondary_map: PathBuf,

    /// JSON session config (tick period, glyphs, starts, warp anchors)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tick period in milliseconds (overrides the config file)
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Seconds the end screen stays up
    #[arg(long, default_value = "3")]
    linger: u64,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log verbosity (WARPTAG_LOG overrides)
    #[arg(long, default_value = "info")]
    log_level: cli::logging::LogLevel,
}

impl GameArgs {
    fn into_options(self) -> Result<cli::play::PlayOptions, cli::CliError> {
        cli::logging::init(self.log_file.as_deref(), self.log_level)?;
        Ok(cli::play::PlayOptions {
            primary_map: self.primary_map,
            secondary_map: self.secondary_map,
            config: self.config,
            tick_ms: self.tick_ms,
            linger: Duration::from_secs(self.linger),
        })
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let result = match args.command {
        Commands::Host { port, game } => {
            game.into_options().and_then(|options| cli::play::host(port, options))
        }
        Commands::Join { addr, game } => {
            game.into_options().and_then(|options| cli::play::join(addr, options))
        }
        Commands::CheckMap { map } => cli::check_map::execute(map),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
