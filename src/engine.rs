//! The shared preference engine.
//!
//! [`Engine`] owns the model behind a single `RwLock`. Reads (score, plan,
//! suggest, summarize) share the lock; record and reset take it exclusively and
//! hold it until the model has been written to disk. A failed write is logged
//! and reported, but the in-memory change stands and the next save catches up.

use crate::algorithm::{self, top_weighted, ScoringContext, TrackScore};
use crate::learning::{self, PlayEvent};
use crate::model::{PreferenceModel, WeightMap};
use crate::queue::{self, PlannedTrack, RngSource, ShuffleSource};
use crate::store::PreferenceStore;
use crate::suggest::{self, Suggestion};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of a mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecordOutcome {
    pub reward: f64,
    /// Completion ratio of the play; `None` for skips.
    pub completion: Option<f64>,
    /// Whether the model reached durable storage.
    pub persisted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedName {
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayedTrack {
    pub name: String,
    pub plays: u64,
}

/// Human-facing digest of what has been learned so far.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceSummary {
    pub total_plays: u64,
    pub total_skips: u64,
    pub top_artists: Vec<RankedName>,
    pub top_genres: Vec<RankedName>,
    pub top_keywords: Vec<RankedName>,
    pub most_played: Vec<PlayedTrack>,
    /// Rough percentage, saturating at 100 after 50 plays.
    pub learning_progress: u64,
}

/// Shared preference engine.
///
/// Reads take the read lock and never touch the disk. `record_event` and
/// `reset` hold the write lock until the whole document has been saved, so
/// concurrent writers are serialized and none of their updates is lost.
pub struct Engine {
    model: RwLock<PreferenceModel>,
    store: PreferenceStore,
    context: ScoringContext,
}

impl Engine {
    /// Load the model from `store`, falling back to an empty one.
    pub fn open(store: PreferenceStore) -> Self {
        let model = store.load();
        Self::with_model(store, model)
    }

    /// Start from an already loaded `model`, saving into `store`.
    pub fn with_model(store: PreferenceStore, model: PreferenceModel) -> Self {
        Self {
            model: RwLock::new(model),
            store,
            context: ScoringContext::default(),
        }
    }

    /// A copy of the current model.
    #[must_use]
    pub fn snapshot(&self) -> PreferenceModel {
        self.read().clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, PreferenceModel> {
        self.model.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PreferenceModel> {
        self.model.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Learn from one play event and persist the model.
    pub fn record_event(&self, event: &PlayEvent) -> RecordOutcome {
        self.record_event_at(event, Local::now().naive_local())
    }

    pub fn record_event_at(&self, event: &PlayEvent, now: NaiveDateTime) -> RecordOutcome {
        let mut model = self.write();
        let learned = learning::apply_event(&mut model, event, now);
        let persisted = self.persist(&mut model, now);
        RecordOutcome {
            reward: learned.reward,
            completion: learned.completion,
            persisted,
        }
    }

    #[must_use]
    pub fn score(&self, name: &str) -> TrackScore {
        self.score_at(name, current_hour())
    }

    #[must_use]
    pub fn score_at(&self, name: &str, hour: u8) -> TrackScore {
        algorithm::score_track(&self.read(), name, hour, &self.context)
    }

    /// Taste-weighted shuffle of `names` using thread-local randomness.
    #[must_use]
    pub fn plan(&self, names: &[String]) -> Vec<PlannedTrack> {
        self.plan_with(names, current_hour(), &mut RngSource(rand::thread_rng()))
    }

    pub fn plan_with<S: ShuffleSource>(&self, names: &[String], hour: u8, source: &mut S) -> Vec<PlannedTrack> {
        queue::plan_with(&self.read(), names, hour, &self.context, source)
    }

    #[must_use]
    pub fn suggest(&self, count: usize) -> Vec<Suggestion> {
        self.suggest_at(count, current_hour())
    }

    #[must_use]
    pub fn suggest_at(&self, count: usize, hour: u8) -> Vec<Suggestion> {
        suggest::suggest(&self.read(), count, hour)
    }

    #[must_use]
    pub fn summarize(&self) -> PreferenceSummary {
        summarize(&self.read())
    }

    /// Forget everything and persist the empty model.
    pub fn reset(&self) -> bool {
        let mut model = self.write();
        *model = PreferenceModel::default();
        log::info!("Preferences reset");
        self.persist(&mut model, Local::now().naive_local())
    }

    fn persist(&self, model: &mut PreferenceModel, now: NaiveDateTime) -> bool {
        model.last_updated = Some(now);
        match self.store.save(model) {
            Ok(()) => true,
            Err(err) => {
                log::error!("Failed to save preferences: {err:#}");
                false
            }
        }
    }
}

/// Summarize `model`: top artists/genres above 0.4, top keywords above 0.5,
/// the five most played tracks.
#[must_use]
pub fn summarize(model: &PreferenceModel) -> PreferenceSummary {
    let mut most_played: Vec<PlayedTrack> = model
        .track_stats
        .iter()
        .map(|(name, stat)| PlayedTrack {
            name: name.clone(),
            plays: stat.play_count,
        })
        .collect();
    most_played.sort_by(|a, b| b.plays.cmp(&a.plays));
    most_played.truncate(5);

    PreferenceSummary {
        total_plays: model.total_plays,
        total_skips: model.total_skips,
        top_artists: ranked_above(&model.artist_weight, 5, 0.4),
        top_genres: ranked_above(&model.genre_weight, 5, 0.4),
        top_keywords: ranked_above(&model.keyword_weight, 10, 0.5),
        most_played,
        learning_progress: model.total_plays.saturating_mul(2).min(100),
    }
}

fn ranked_above(weights: &WeightMap, limit: usize, floor: f64) -> Vec<RankedName> {
    top_weighted(weights, limit)
        .into_iter()
        .filter(|(_, weight)| *weight > floor)
        .map(|(name, weight)| RankedName {
            name: name.to_string(),
            score: round2(weight),
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn current_hour() -> u8 {
    learning::hour_of(Local::now().naive_local())
}
