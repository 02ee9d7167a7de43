//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use hearth_core::StrategyKind;

/// hearth - Keep copies of a directory in sync across devices
#[derive(Parser, Debug)]
#[command(name = "hearth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Central registry file (defaults to ~/.hearth-central.toml)
    #[arg(long, global = true, env = "HEARTH_CENTRAL", value_name = "PATH")]
    pub central: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Initialize hearth on the current system
    ///
    /// Records the mounted devices in the central registry, creating it if
    /// needed. Hearths already tracked are kept.
    Init,

    /// List tracked hearths and known devices
    List {
        /// Enumerate the disks mounted right now instead
        #[arg(long)]
        devices: bool,
    },

    /// Track a new hearth in the central registry
    ///
    /// Examples:
    ///   hearth track music --primary laptop=/home/me/music --source usb=/media/usb/music
    Track {
        /// Name of the hearth
        name: String,

        /// The master source, as NAME=PATH
        #[arg(long, value_parser = parse_source, value_name = "NAME=PATH")]
        primary: (String, PathBuf),

        /// Another source, as NAME=PATH (repeatable)
        #[arg(long = "source", value_parser = parse_source, value_name = "NAME=PATH")]
        sources: Vec<(String, PathBuf)>,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Compare the contents of two directories
    Compare {
        /// First directory
        first: PathBuf,

        /// Second directory
        second: PathBuf,

        /// Logical name shared by both roots (defaults to the first's name)
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Sync the contents of two or more locations
    ///
    /// The first location is the master.
    ///
    /// Examples:
    ///   hearth sync /home/me/music /media/usb/music
    ///   hearth sync --hearth music --strategy new-files-only
    ///   hearth sync a b c --no-commit
    Sync {
        /// Master location followed by the others
        #[arg(required_unless_present = "hearth", num_args = 2..)]
        locations: Vec<PathBuf>,

        /// Sync a hearth from the central registry instead
        #[arg(long, conflicts_with = "locations")]
        hearth: Option<String>,

        /// true-master-copy, new-files-only, add-by-master-copy or trim-by-master-copy
        #[arg(short, long, default_value = "true-master-copy", value_parser = parse_strategy)]
        strategy: StrategyKind,

        /// Print the plan without applying it
        #[arg(long)]
        no_commit: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,

        /// Logical name shared by all roots (defaults to the master's name)
        #[arg(long)]
        name: Option<String>,
    },
}

fn parse_source(raw: &str) -> Result<(String, PathBuf), String> {
    match raw.split_once('=') {
        Some((name, path)) if !name.is_empty() && !path.is_empty() => {
            Ok((name.to_string(), PathBuf::from(path)))
        }
        _ => Err(format!("expected NAME=PATH, got '{raw}'")),
    }
}

fn parse_strategy(raw: &str) -> Result<StrategyKind, String> {
    raw.parse().map_err(|e: hearth_core::Error| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_sync_with_locations() {
        let cli = Cli::try_parse_from(["hearth", "sync", "/a", "/b", "--strategy", "NewFilesOnly"])
            .unwrap();
        match cli.command {
            Some(Commands::Sync {
                locations,
                strategy,
                no_commit,
                ..
            }) => {
                assert_eq!(locations, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
                assert_eq!(strategy, StrategyKind::NewFilesOnly);
                assert!(!no_commit);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sync_defaults_to_true_master_copy() {
        let cli = Cli::try_parse_from(["hearth", "sync", "--hearth", "music"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Sync {
                strategy: StrategyKind::TrueMasterCopy,
                ..
            })
        ));
    }

    #[test]
    fn sync_needs_two_locations_or_a_hearth() {
        assert!(Cli::try_parse_from(["hearth", "sync", "/only"]).is_err());
        assert!(Cli::try_parse_from(["hearth", "sync"]).is_err());
    }

    #[test]
    fn sync_rejects_unknown_strategy() {
        let err = Cli::try_parse_from(["hearth", "sync", "/a", "/b", "-s", "sideways"]).unwrap_err();
        assert!(err.to_string().contains("true-master-copy"));
    }

    #[test]
    fn track_parses_sources() {
        let cli = Cli::try_parse_from([
            "hearth",
            "track",
            "music",
            "--primary",
            "laptop=/home/me/music",
            "--source",
            "usb=/media/usb/music",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Track {
                primary, sources, ..
            }) => {
                assert_eq!(primary, ("laptop".to_string(), PathBuf::from("/home/me/music")));
                assert_eq!(sources.len(), 1);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn malformed_source_is_rejected() {
        assert!(
            Cli::try_parse_from(["hearth", "track", "m", "--primary", "no-equals-sign"]).is_err()
        );
    }
}
