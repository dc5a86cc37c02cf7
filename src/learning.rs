//! Learning from play events.
//!
//! Each event is turned into a reward, and the reward nudges the weights of
//! every keyword, the artist and every genre of the track towards or away from
//! the listener's taste.

use crate::features::{self, TrackFeatures};
use crate::model::{clamp_weight, PreferenceModel, TrackStat, WeightMap, NEUTRAL_WEIGHT};
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Reward of a skipped play.
pub const SKIP_REWARD: f64 = -0.3;

/// Baseline subtracted from the reward for keyword and genre updates.
pub const KEYWORD_BIAS: f64 = 0.5;

/// Baseline for artist updates. Lower than [`KEYWORD_BIAS`], so artists rise more easily.
pub const ARTIST_BIAS: f64 = 0.3;

/// Only this many leading keywords feed the hour-of-day counters.
pub const HOURLY_KEYWORD_LIMIT: usize = 5;

/// A single play of a track as reported by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayEvent {
    pub name: String,
    pub completed: bool,
    /// Seconds actually played.
    pub duration_played: f64,
    /// Track length in seconds; zero when unknown.
    pub total_duration: f64,
    pub skipped: bool,
}

impl PlayEvent {
    /// A fully listened play of known length.
    pub fn completed(name: impl Into<String>, total_duration: f64) -> Self {
        Self {
            name: name.into(),
            completed: true,
            duration_played: total_duration,
            total_duration,
            skipped: false,
        }
    }

    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            completed: false,
            duration_played: 0.0,
            total_duration: 0.0,
            skipped: true,
        }
    }

    /// Completion ratio in [0, 1]; `None` for skips.
    #[must_use]
    pub fn completion(&self) -> Option<f64> {
        if self.skipped {
            return None;
        }
        let measured = self.duration_played / self.total_duration;
        let ratio = if self.total_duration > 0.0 && measured.is_finite() {
            measured.clamp(0.0, 1.0)
        } else if self.completed {
            1.0
        } else {
            0.5
        };
        Some(ratio)
    }

    /// Reward in [-0.3, 1.0]. Full reward needs both `completed` and full completion.
    #[must_use]
    pub fn reward(&self) -> f64 {
        match self.completion() {
            None => SKIP_REWARD,
            Some(completion) => completion * 0.5 + if self.completed { 0.5 } else { 0.0 },
        }
    }
}

/// What a single event did to the model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Learned {
    pub reward: f64,
    pub completion: Option<f64>,
}

/// Apply `event`, observed at local wall-clock time `now`, to `model`.
pub fn apply_event(model: &mut PreferenceModel, event: &PlayEvent, now: NaiveDateTime) -> Learned {
    let features = features::extract(&event.name);

    let stat = model
        .track_stats
        .entry(event.name.clone())
        .or_insert_with(|| TrackStat::new(features.clone(), now));
    stat.play_count += 1;
    stat.last_seen = Some(now);
    model.total_plays += 1;

    let completion = event.completion();
    match completion {
        None => {
            stat.skip_count += 1;
            model.total_skips += 1;
        }
        Some(completion) => stat.cumulative_completion += completion,
    }
    let reward = event.reward();

    update_weights(model, &features, reward);
    count_hourly_keywords(model, &features, hour_of(now));

    log::debug!("Learned from `{}': reward {reward:.3}", event.name);
    Learned { reward, completion }
}

fn update_weights(model: &mut PreferenceModel, features: &TrackFeatures, reward: f64) {
    let rate = model.learning_rate;

    for keyword in &features.keywords {
        nudge(&mut model.keyword_weight, keyword, rate * (reward - KEYWORD_BIAS));
    }

    if let Some(artist) = &features.artist {
        nudge(&mut model.artist_weight, &artist.to_lowercase(), rate * (reward - ARTIST_BIAS));
    }

    for genre in &features.genres {
        nudge(&mut model.genre_weight, genre, rate * (reward - KEYWORD_BIAS));
    }
}

/// Seed `key` at the neutral weight if unseen, add `delta`, clamp.
fn nudge(weights: &mut WeightMap, key: &str, delta: f64) {
    let weight = weights.entry(key.to_string()).or_insert(NEUTRAL_WEIGHT);
    *weight = clamp_weight(*weight + delta);
    log::trace!("Weight `{key}' -> {weight:.3}");
}

fn count_hourly_keywords(model: &mut PreferenceModel, features: &TrackFeatures, hour: u8) {
    let bucket = model.hour_keyword_count.entry(hour).or_default();
    for keyword in features.keywords.iter().take(HOURLY_KEYWORD_LIMIT) {
        *bucket.entry(keyword.clone()).or_insert(0) += 1;
    }
}

/// Wall-clock hour of `time`, 0-23.
#[must_use]
pub fn hour_of(time: NaiveDateTime) -> u8 {
    // `hour()` is always below 24.
    u8::try_from(time.hour()).unwrap_or(0)
}
