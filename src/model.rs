//! The persisted preference model.
//!
//! One [`PreferenceModel`] holds everything the engine has learned. It is
//! serialized as a single JSON document; every top-level field has a default so
//! older or partial documents load, and [`PreferenceModel::migrate`] brings any
//! loaded document up to [`SCHEMA_VERSION`].

use crate::features::TrackFeatures;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current persisted schema version. Documents without a version are legacy (0).
pub const SCHEMA_VERSION: u32 = 1;

/// Weight every keyword/artist/genre starts from on first sight.
pub const NEUTRAL_WEIGHT: f64 = 0.5;

/// Learning rate of a freshly created model.
pub const DEFAULT_LEARNING_RATE: f64 = 0.1;

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: u8 = 24;

/// Learned weights keyed by keyword, artist or genre.
pub type WeightMap = BTreeMap<String, f64>;

/// Keyword → occurrence count for a single hour of the day.
pub type HourBucket = BTreeMap<String, u64>;

/// Per-track statistics, keyed by the exact track name in the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStat {
    #[serde(default)]
    pub play_count: u64,
    #[serde(default)]
    pub skip_count: u64,
    /// Sum of per-play completion ratios. Skips add nothing.
    #[serde(default, alias = "total_completion")]
    pub cumulative_completion: f64,
    /// Features computed on the first observed event.
    #[serde(default)]
    pub features: TrackFeatures,
    #[serde(alias = "first_played")]
    pub first_seen: NaiveDateTime,
    #[serde(default, alias = "last_played")]
    pub last_seen: Option<NaiveDateTime>,
}

impl TrackStat {
    pub fn new(features: TrackFeatures, now: NaiveDateTime) -> Self {
        Self {
            play_count: 0,
            skip_count: 0,
            cumulative_completion: 0.0,
            features,
            first_seen: now,
            last_seen: None,
        }
    }

    /// Average completion over all plays, skips included as zero.
    #[must_use]
    pub fn average_completion(&self) -> Option<f64> {
        match self.play_count {
            0 => None,
            #[allow(clippy::cast_precision_loss)]
            plays => Some(self.cumulative_completion / plays as f64),
        }
    }

    #[must_use]
    pub fn skip_ratio(&self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.skip_count as f64 / self.play_count.max(1) as f64;
        ratio
    }
}

/// The whole learned state of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceModel {
    pub schema_version: u32,
    #[serde(alias = "keyword_scores")]
    pub keyword_weight: WeightMap,
    #[serde(alias = "artist_scores")]
    pub artist_weight: WeightMap,
    #[serde(alias = "genre_hints")]
    pub genre_weight: WeightMap,
    #[serde(alias = "time_preferences")]
    pub hour_keyword_count: BTreeMap<u8, HourBucket>,
    #[serde(alias = "song_stats")]
    pub track_stats: BTreeMap<String, TrackStat>,
    pub total_plays: u64,
    pub total_skips: u64,
    pub learning_rate: f64,
    pub last_updated: Option<NaiveDateTime>,
}

impl Default for PreferenceModel {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            keyword_weight: WeightMap::new(),
            artist_weight: WeightMap::new(),
            genre_weight: WeightMap::new(),
            hour_keyword_count: empty_hour_buckets(),
            track_stats: BTreeMap::new(),
            total_plays: 0,
            total_skips: 0,
            learning_rate: DEFAULT_LEARNING_RATE,
            last_updated: None,
        }
    }
}

fn empty_hour_buckets() -> BTreeMap<u8, HourBucket> {
    (0..HOURS_PER_DAY).map(|hour| (hour, HourBucket::new())).collect()
}

impl PreferenceModel {
    /// Bring a freshly deserialized document up to the current schema.
    ///
    /// Fills missing hour buckets, drops out-of-range ones, re-clamps weights
    /// and resets a nonsensical learning rate.
    #[must_use]
    pub fn migrate(mut self) -> Self {
        if self.schema_version < SCHEMA_VERSION {
            log::info!(
                "Migrating preference model from schema v{} to v{SCHEMA_VERSION}",
                self.schema_version
            );
        }

        self.hour_keyword_count.retain(|hour, _| *hour < HOURS_PER_DAY);
        for hour in 0..HOURS_PER_DAY {
            self.hour_keyword_count.entry(hour).or_default();
        }

        for weights in [&mut self.keyword_weight, &mut self.artist_weight, &mut self.genre_weight] {
            for weight in weights.values_mut() {
                *weight = clamp_weight(*weight);
            }
        }

        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            log::warn!("Invalid learning rate {} in stored model, using default", self.learning_rate);
            self.learning_rate = DEFAULT_LEARNING_RATE;
        }

        self.schema_version = SCHEMA_VERSION;
        self
    }

    /// Keyword counts for one hour of the day; empty for out-of-range hours.
    #[must_use]
    pub fn hour_bucket(&self, hour: u8) -> Option<&HourBucket> {
        self.hour_keyword_count.get(&hour)
    }
}

/// Clamp a weight into [0, 1]. NaN collapses to the neutral weight.
#[must_use]
pub fn clamp_weight(weight: f64) -> f64 {
    if weight.is_nan() {
        NEUTRAL_WEIGHT
    } else {
        weight.clamp(0.0, 1.0)
    }
}
