//! # Command-Line Interface Module
//!
//! Clap definitions for the `musify` binary. Each subcommand maps onto one
//! engine operation.
//!
//! ## Examples
//!
//! ```bash
//! musify record "DJ Nova - Night Drive.mp3" --played 180 --total 180
//! musify record "Some - Track.mp3" --skipped
//! musify shuffle --dir ~/Music
//! musify suggest --count 3
//! ```

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments structure.
#[derive(Parser, Debug)]
#[command(name = "musify")]
#[command(about = "Musify: learns your taste from what you play, shuffles and suggests accordingly")]
#[command(version)]
pub struct Args {
    /// Preferences document to read and update
    #[arg(long, global = true, env = "MUSIFY_PREFERENCES")]
    pub preferences: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a play (or skip) of a track
    Record(RecordArgs),

    /// Show the preference score of a track
    Score {
        /// Track name, usually the file name
        name: String,
    },

    /// Print a taste-weighted shuffle order
    ///
    /// Tracks come from the given names, or from the `.mp3` files of `--dir`.
    Shuffle {
        names: Vec<String>,

        /// Directory whose `.mp3` files are shuffled
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Suggest search queries for new music
    Suggest {
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },

    /// Summarize what has been learned
    Summary,

    /// Forget all learned preferences
    Reset,

    /// Generate shell completions
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(ClapArgs, Debug)]
pub struct RecordArgs {
    /// Track name, usually the file name
    pub name: String,

    /// The track was skipped
    #[arg(long)]
    pub skipped: bool,

    /// The track was stopped before its end
    #[arg(long, conflicts_with = "skipped")]
    pub incomplete: bool,

    /// Seconds played
    #[arg(long, default_value_t = 0.0)]
    pub played: f64,

    /// Track length in seconds (0 when unknown)
    #[arg(long, default_value_t = 0.0)]
    pub total: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_record_parsing() {
        let args = Args::try_parse_from(["musify", "record", "A - B.mp3", "--played", "90", "--total", "180"]).unwrap();
        match args.command {
            Command::Record(record) => {
                assert_eq!(record.name, "A - B.mp3");
                assert!(!record.skipped);
                assert_eq!(record.played, 90.0);
                assert_eq!(record.total, 180.0);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_skip_conflicts_with_incomplete() {
        assert!(Args::try_parse_from(["musify", "record", "x", "--skipped", "--incomplete"]).is_err());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["musify", "summary", "--json", "--preferences", "p.json"]).unwrap();
        assert!(args.json);
        assert_eq!(args.preferences, Some(PathBuf::from("p.json")));
    }
}
