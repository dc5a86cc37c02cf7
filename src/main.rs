//! # Musify
//!
//! Command-line front end for the preference engine. Every invocation loads
//! the preferences document, runs one operation and, for `record`/`reset`,
//! writes the document back.
//!
//! ```bash
//! musify record "DJ Nova - Night Drive.mp3" --played 180 --total 180
//! musify score "DJ Nova - Night Drive.mp3"
//! musify shuffle --dir ~/Music
//! musify suggest
//! ```

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info, warn};
use musify::cli::{self, Command, RecordArgs};
use musify::config::RuntimeConfig;
use musify::engine::Engine;
use musify::learning::PlayEvent;
use musify::store::PreferenceStore;
use musify::completion;
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Logging is controlled via `RUST_LOG`, e.g. `RUST_LOG=musify=debug`.
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();

    let preferences = args.preferences;
    let open_engine = move || -> Result<Engine> {
        let config = RuntimeConfig::resolve(preferences)?;
        debug!("Using preferences at {}", config.preferences_path.display());
        Ok(Engine::open(PreferenceStore::new(config.preferences_path)))
    };

    match args.command {
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
        Command::Record(record) => {
            let outcome = open_engine()?.record_event(&play_event(record));
            if !outcome.persisted {
                warn!("Play was learned but could not be saved");
            }
            emit(args.json, &outcome, || {
                format!("Recorded play (reward {:.2})", outcome.reward)
            })?;
        }
        Command::Score { name } => {
            let scored = open_engine()?.score(&name);
            emit(args.json, &scored, || format!("{:.3}  {name}", scored.score))?;
        }
        Command::Shuffle { mut names, dir } => {
            if let Some(dir) = dir {
                names.extend(list_mp3s(&dir)?);
            }
            info!("Planning shuffle over {} tracks", names.len());
            let plan = open_engine()?.plan(&names);
            emit(args.json, &plan, || {
                plan.iter()
                    .map(|track| format!("{:.3}  {}", track.score, track.name))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Suggest { count } => {
            let suggestions = open_engine()?.suggest(count);
            emit(args.json, &suggestions, || {
                suggestions
                    .iter()
                    .map(|s| format!("{:.2}  {}  ({})", s.confidence, s.query, s.reason))
                    .collect::<Vec<_>>()
                    .join("\n")
            })?;
        }
        Command::Summary => {
            let summary = open_engine()?.summarize();
            emit(args.json, &summary, || {
                let names = |list: &[musify::engine::RankedName]| {
                    list.iter().map(|r| r.name.as_str()).collect::<Vec<_>>().join(", ")
                };
                format!(
                    "Plays: {}  Skips: {}  Learning: {}%\nArtists: {}\nGenres: {}\nKeywords: {}",
                    summary.total_plays,
                    summary.total_skips,
                    summary.learning_progress,
                    names(&summary.top_artists),
                    names(&summary.top_genres),
                    names(&summary.top_keywords),
                )
            })?;
        }
        Command::Reset => {
            let persisted = open_engine()?.reset();
            emit(args.json, &serde_json::json!({ "success": persisted }), || {
                if persisted {
                    "Preferences reset".to_string()
                } else {
                    "Preferences reset in memory only; saving failed".to_string()
                }
            })?;
        }
    }

    Ok(())
}

fn play_event(record: RecordArgs) -> PlayEvent {
    PlayEvent {
        name: record.name,
        completed: !record.skipped && !record.incomplete,
        duration_played: record.played,
        total_duration: record.total,
        skipped: record.skipped,
    }
}

/// Print `value` as pretty JSON, or the human rendering otherwise.
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value).context("Failed to serialize output")?);
    } else {
        println!("{}", human());
    }
    Ok(())
}

/// `.mp3` file names directly inside `dir`, sorted.
fn list_mp3s(dir: &Path) -> Result<Vec<String>> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read music directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(".mp3"))
        .collect();
    names.sort();
    Ok(names)
}
