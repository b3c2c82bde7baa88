//! ftm - FamiTracker module inspector
//!
//! Decodes a `.ftm` module and prints summaries, frames, single cells or the
//! curve table, either colored for humans or as JSON with `--json`.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ftm_cli::commands;

/// FamiTracker module inspector
#[derive(Parser)]
#[command(name = "ftm")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Log every decoded block (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize a module: song info, engine parameters, table sizes
    Info {
        /// Path to the module file
        file: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print every row of one frame
    Frame {
        /// Path to the module file
        file: String,

        /// Frame number (0-based)
        frame: usize,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Resolve the cell played at one frame, row and channel
    Query {
        /// Path to the module file
        file: String,

        /// Frame number (0-based)
        frame: usize,

        /// Row within the frame's patterns (0-based)
        row: usize,

        /// Channel (0-based)
        channel: usize,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the assembled curve table
    Sequences {
        /// Path to the module file
        file: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Info { file, json } => commands::info::run(&file, json),
        Commands::Frame { file, frame, json } => commands::frame::run(&file, frame, json),
        Commands::Query {
            file,
            frame,
            row,
            channel,
            json,
        } => commands::query::run(&file, frame, row, channel, json),
        Commands::Sequences { file, json } => commands::sequences::run(&file, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_info() {
        let cli = Cli::try_parse_from(["ftm", "info", "song.ftm"]).unwrap();
        match cli.command {
            Commands::Info { file, json } => {
                assert_eq!(file, "song.ftm");
                assert!(!json);
            }
            _ => panic!("expected info command"),
        }
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parses_info_with_json() {
        let cli = Cli::try_parse_from(["ftm", "info", "song.ftm", "--json"]).unwrap();
        match cli.command {
            Commands::Info { json, .. } => assert!(json),
            _ => panic!("expected info command"),
        }
    }

    #[test]
    fn test_cli_parses_frame() {
        let cli = Cli::try_parse_from(["ftm", "frame", "song.ftm", "3"]).unwrap();
        match cli.command {
            Commands::Frame { file, frame, json } => {
                assert_eq!(file, "song.ftm");
                assert_eq!(frame, 3);
                assert!(!json);
            }
            _ => panic!("expected frame command"),
        }
    }

    #[test]
    fn test_cli_parses_query() {
        let cli =
            Cli::try_parse_from(["ftm", "query", "song.ftm", "1", "16", "4", "--json"]).unwrap();
        match cli.command {
            Commands::Query {
                file,
                frame,
                row,
                channel,
                json,
            } => {
                assert_eq!(file, "song.ftm");
                assert_eq!(frame, 1);
                assert_eq!(row, 16);
                assert_eq!(channel, 4);
                assert!(json);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_cli_query_requires_all_coordinates() {
        let err = Cli::try_parse_from(["ftm", "query", "song.ftm", "1", "16"])
            .err()
            .unwrap();
        assert!(err.to_string().contains("<CHANNEL>"));
    }

    #[test]
    fn test_cli_rejects_negative_frame() {
        assert!(Cli::try_parse_from(["ftm", "frame", "song.ftm", "-1"]).is_err());
    }

    #[test]
    fn test_cli_global_verbose() {
        let cli = Cli::try_parse_from(["ftm", "sequences", "song.ftm", "-v"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Sequences { .. }));
    }
}
