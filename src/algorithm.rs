//! Track scoring against the learned preference model.
//!
//! A score starts at 0.5 and is nudged by the track's keywords, artist, genres,
//! the hour of day and the track's own play history, then clamped to [0, 1].

use crate::features::{self, TrackFeatures};
use crate::model::{PreferenceModel, TrackStat, WeightMap};
use serde::Serialize;

/// Scale factors for each scoring component.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringContext {
    pub base_score: f64,
    pub keyword_scale: f64,
    pub artist_scale: f64,
    pub genre_scale: f64,
    /// Hourly keyword frequencies are divided by this before capping.
    pub time_divisor: f64,
    pub time_cap: f64,
    pub familiarity_scale: f64,
    pub familiarity_cap: f64,
    pub skip_penalty: f64,
    pub completion_scale: f64,
}

impl Default for ScoringContext {
    fn default() -> Self {
        Self {
            base_score: 0.5,
            keyword_scale: 0.3,
            artist_scale: 0.25,
            genre_scale: 0.2,
            time_divisor: 100.0,
            time_cap: 0.1,
            familiarity_scale: 0.05,
            familiarity_cap: 0.15,
            skip_penalty: 0.2,
            completion_scale: 0.15,
        }
    }
}

/// Raw inputs behind a score: averages and weights, not scaled contributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreComponents {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<f64>,
    /// Sum of this hour's counters for the track's keywords.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completion: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_ratio: Option<f64>,
}

/// A track's score together with what it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackScore {
    /// Final score, clamped into [0, 1].
    pub score: f64,
    pub components: ScoreComponents,
    pub features: TrackFeatures,
}

/// Score `name` as if the current local hour were `hour`.
///
/// ```
/// use musify::algorithm::{score_track, ScoringContext};
/// use musify::model::PreferenceModel;
///
/// let model = PreferenceModel::default();
/// let scored = score_track(&model, "Unknown - Track", 12, &ScoringContext::default());
/// assert_eq!(scored.score, 0.5);
/// ```
#[must_use]
pub fn score_track(model: &PreferenceModel, name: &str, hour: u8, context: &ScoringContext) -> TrackScore {
    let features = features::extract(name);
    let mut components = ScoreComponents::default();
    let mut score = context.base_score;

    if let Some(avg) = known_average(&model.keyword_weight, &features.keywords) {
        components.keywords = Some(avg);
        score += (avg - 0.5) * context.keyword_scale;
    }

    if let Some(weight) = features
        .artist
        .as_ref()
        .and_then(|artist| model.artist_weight.get(&artist.to_lowercase()))
    {
        components.artist = Some(*weight);
        score += (weight - 0.5) * context.artist_scale;
    }

    if let Some(avg) = known_average(&model.genre_weight, &features.genres) {
        components.genre = Some(avg);
        score += (avg - 0.5) * context.genre_scale;
    }

    let frequency = hourly_frequency(model, &features.keywords, hour);
    if frequency > 0 {
        #[allow(clippy::cast_precision_loss)]
        let frequency = frequency as f64;
        components.time = Some(frequency);
        score += (frequency / context.time_divisor).min(context.time_cap);
    }

    if let Some(stat) = model.track_stats.get(name) {
        components.skip_ratio = Some(stat.skip_ratio());
        components.completion = stat.average_completion();
        score += history_factor(stat, context);
    }

    let score = score.clamp(0.0, 1.0);
    log::trace!("Scored `{name}' at {score:.3}");
    TrackScore { score, components, features }
}

/// Net contribution of a track's own history: familiarity bonus, skip penalty
/// and completion adjustment.
#[must_use]
pub fn history_factor(stat: &TrackStat, context: &ScoringContext) -> f64 {
    if stat.play_count == 0 {
        return -stat.skip_ratio() * context.skip_penalty;
    }

    #[allow(clippy::cast_precision_loss)]
    let plays = stat.play_count as f64;
    let familiarity = ((plays + 1.0).ln() * context.familiarity_scale).min(context.familiarity_cap);
    let completion = stat
        .average_completion()
        .map_or(0.0, |avg| (avg - 0.5) * context.completion_scale);

    familiarity - stat.skip_ratio() * context.skip_penalty + completion
}

/// Average of the weights of `keys` that the map knows. Unknown keys are ignored.
fn known_average(weights: &WeightMap, keys: &[String]) -> Option<f64> {
    let (sum, count) = keys
        .iter()
        .filter_map(|key| weights.get(key))
        .fold((0.0, 0_u32), |(sum, count), weight| (sum + weight, count + 1));

    (count > 0).then(|| sum / f64::from(count))
}

fn hourly_frequency(model: &PreferenceModel, keywords: &[String], hour: u8) -> u64 {
    model.hour_bucket(hour).map_or(0, |bucket| {
        keywords.iter().filter_map(|keyword| bucket.get(keyword)).sum()
    })
}

/// The `limit` highest weights, descending. Ties keep key order.
#[must_use]
pub fn top_weighted(weights: &WeightMap, limit: usize) -> Vec<(&str, f64)> {
    let mut ranked: Vec<(&str, f64)> = weights.iter().map(|(key, weight)| (key.as_str(), *weight)).collect();
    ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(limit);
    ranked
}
