//! Taste-weighted shuffle planning.
//!
//! Tracks are scored and split into a preferred (top) half and the rest. Both
//! halves are shuffled, then interleaved as runs of two or three preferred
//! tracks followed by one track from the rest, so favourites dominate without
//! starving discovery.

use crate::algorithm::{self, ScoringContext};
use crate::model::PreferenceModel;
use rand::seq::SliceRandom;
use rand::Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::VecDeque;

/// Shortest run of preferred tracks between two discovery picks.
pub const MIN_PREFERRED_RUN: usize = 2;
/// Longest run of preferred tracks between two discovery picks.
pub const MAX_PREFERRED_RUN: usize = 3;

/// One slot of a planned queue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedTrack {
    pub name: String,
    pub score: f64,
}

/// Source of the randomness used while planning.
pub trait ShuffleSource {
    /// Reorder `items` in place.
    fn shuffle<T>(&mut self, items: &mut [T]);

    /// Length of the next preferred run, in
    /// `MIN_PREFERRED_RUN..=MAX_PREFERRED_RUN`.
    fn run_length(&mut self) -> usize;
}

/// [`ShuffleSource`] backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: Rng> ShuffleSource for RngSource<R> {
    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.0);
    }

    fn run_length(&mut self) -> usize {
        self.0.gen_range(MIN_PREFERRED_RUN..=MAX_PREFERRED_RUN)
    }
}

/// Plan a play order for `names`, scoring at `hour`.
///
/// The result is always a permutation of `names`.
pub fn plan_with<S: ShuffleSource>(
    model: &PreferenceModel,
    names: &[String],
    hour: u8,
    context: &ScoringContext,
    source: &mut S,
) -> Vec<PlannedTrack> {
    let mut ranked: Vec<PlannedTrack> = names
        .par_iter()
        .map(|name| PlannedTrack {
            name: name.clone(),
            score: algorithm::score_track(model, name, hour, context).score,
        })
        .collect();
    ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));

    let split = (ranked.len() / 2).max(1).min(ranked.len());
    let mut others = ranked.split_off(split);
    let mut preferred = ranked;

    source.shuffle(&mut preferred);
    source.shuffle(&mut others);

    log::debug!(
        "Planning {} tracks: {} preferred, {} others",
        names.len(),
        preferred.len(),
        others.len()
    );
    interleave(preferred.into(), others.into(), source)
}

fn interleave<S: ShuffleSource>(
    mut preferred: VecDeque<PlannedTrack>,
    mut others: VecDeque<PlannedTrack>,
    source: &mut S,
) -> Vec<PlannedTrack> {
    let mut order = Vec::with_capacity(preferred.len() + others.len());

    while !preferred.is_empty() || !others.is_empty() {
        let run = source.run_length().min(preferred.len());
        order.extend(preferred.drain(..run));
        order.extend(others.pop_front());
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    /// Keeps input order and replays fixed run lengths.
    struct Scripted {
        runs: Vec<usize>,
        next: usize,
    }

    impl Scripted {
        fn new(runs: &[usize]) -> Self {
            Self { runs: runs.to_vec(), next: 0 }
        }
    }

    impl ShuffleSource for Scripted {
        fn shuffle<T>(&mut self, _items: &mut [T]) {}

        fn run_length(&mut self) -> usize {
            let run = self.runs[self.next % self.runs.len()];
            self.next += 1;
            run
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn model_favouring(favourites: &[&str]) -> PreferenceModel {
        let mut model = PreferenceModel::default();
        for (rank, artist) in favourites.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            model.artist_weight.insert((*artist).to_string(), 1.0 - rank as f64 * 0.05);
        }
        model
    }

    #[test]
    fn test_exact_interleaving_with_scripted_source() {
        let model = model_favouring(&["a", "b", "c", "d"]);
        let input = names(&["x - 1", "d - 1", "a - 1", "y - 1", "c - 1", "b - 1", "z - 1", "w - 1"]);

        let plan = plan_with(&model, &input, 12, &ScoringContext::default(), &mut Scripted::new(&[3, 2]));
        let order: Vec<&str> = plan.iter().map(|t| t.name.as_str()).collect();

        // Preferred: a b c d (by score). Others keep input order on equal scores.
        assert_eq!(order, vec!["a - 1", "b - 1", "c - 1", "x - 1", "d - 1", "y - 1", "z - 1", "w - 1"]);
    }

    #[test]
    fn test_single_track_is_preferred() {
        let model = PreferenceModel::default();
        let plan = plan_with(&model, &names(&["only"]), 0, &ScoringContext::default(), &mut Scripted::new(&[2]));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].name, "only");
    }

    #[test]
    fn test_empty_input_plans_nothing() {
        let model = PreferenceModel::default();
        let plan = plan_with(&model, &[], 0, &ScoringContext::default(), &mut Scripted::new(&[2]));
        assert!(plan.is_empty());
    }

    #[test]
    fn test_plan_is_permutation_with_duplicates() {
        let model = model_favouring(&["a"]);
        let input = names(&["a - 1", "a - 1", "b - 2", "c - 3", "b - 2", "d", "e", "f", "g", "h", "i"]);
        let mut source = RngSource(StdRng::seed_from_u64(7));

        for _ in 0..20 {
            let plan = plan_with(&model, &input, 4, &ScoringContext::default(), &mut source);
            assert_eq!(plan.len(), input.len());

            let mut expected: HashMap<&str, usize> = HashMap::new();
            for name in &input {
                *expected.entry(name).or_default() += 1;
            }
            let mut actual: HashMap<&str, usize> = HashMap::new();
            for track in &plan {
                *actual.entry(track.name.as_str()).or_default() += 1;
            }
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_preferred_tracks_lead_the_plan() {
        let model = model_favouring(&["a", "b", "c"]);
        let input = names(&["a - 1", "b - 1", "c - 1", "x - 1", "y - 1", "z - 1"]);
        let mut source = RngSource(StdRng::seed_from_u64(42));

        let plan = plan_with(&model, &input, 12, &ScoringContext::default(), &mut source);
        assert!(plan[0].score > 0.5);
        assert!(plan[1].score > 0.5);
    }

    #[test]
    fn test_rng_source_run_lengths_in_range() {
        let mut source = RngSource(StdRng::seed_from_u64(1));
        for _ in 0..100 {
            let run = source.run_length();
            assert!((MIN_PREFERRED_RUN..=MAX_PREFERRED_RUN).contains(&run));
        }
    }
}
