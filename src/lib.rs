//! Taste learning for a personal music player.
//!
//! Musify infers listening preferences purely from track names and play
//! behaviour. It keeps an evolving numeric model, scores tracks against it,
//! plans taste-weighted shuffles and proposes search queries for new music.
//!
//! Core modules:
//! - [`features`] - Track name → artist, keywords, genre and mood hints
//! - [`model`] - The persisted preference model and its schema migration
//! - [`store`] - Loading and atomically saving the model
//! - [`learning`] - Turning play/skip events into weight updates
//! - [`algorithm`] - Track scoring
//! - [`queue`] - Smart shuffle planning
//! - [`suggest`] - Download suggestions
//! - [`engine`] - The shared, lock-guarded engine tying it all together
//!
//! ### Supporting Modules
//!
//! - [`config`] - Data directory and preferences path
//! - [`cli`] - Command-line interface definitions
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use musify::engine::Engine;
//! use musify::learning::PlayEvent;
//! use musify::store::PreferenceStore;
//!
//! let path = musify::config::get_preferences_path()?;
//! let engine = Engine::open(PreferenceStore::new(path));
//!
//! engine.record_event(&PlayEvent::completed("DJ Nova - Night Drive.mp3", 180.0));
//! engine.record_event(&PlayEvent::skipped("Someone - Loud Song.mp3"));
//!
//! let scored = engine.score("DJ Nova - Midnight.mp3");
//! println!("score {:.3}", scored.score);
//!
//! let names = vec!["DJ Nova - Midnight.mp3".to_string(), "Other - Tune.mp3".to_string()];
//! for track in engine.plan(&names) {
//!     println!("{:.3} {}", track.score, track.name);
//! }
//!
//! for suggestion in engine.suggest(5) {
//!     println!("{} ({})", suggestion.query, suggestion.reason);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Sharing
//!
//! [`engine::Engine`] is `Send + Sync`; wrap it in an `Arc` and call it from
//! any number of request handlers. Recording and resetting are serialized and
//! each one rewrites the whole preferences document before returning.

pub mod algorithm;
pub mod cli;
pub mod completion;
pub mod config;
pub mod engine;
pub mod features;
pub mod learning;
pub mod model;
pub mod queue;
pub mod store;
pub mod suggest;

pub use engine::{Engine, PreferenceSummary, RecordOutcome};
pub use learning::PlayEvent;
