//! Search-query suggestions for new content.
//!
//! Suggestions come from the strongest artists, genres and keywords in the
//! model plus a time-of-day hint. They are plain search strings for an
//! external track resolver; nothing here touches the network.

use crate::algorithm::top_weighted;
use crate::model::PreferenceModel;
use serde::Serialize;

/// Artists and genres need a weight above this to be suggested.
pub const SUGGESTION_THRESHOLD: f64 = 0.55;
/// Keywords need a weight above this to join a keyword query.
pub const STRONG_KEYWORD_THRESHOLD: f64 = 0.6;
pub const KEYWORD_CONFIDENCE: f64 = 0.7;
pub const TIME_CONFIDENCE: f64 = 0.6;

const GENRE_QUERIES: &[(&str, &str)] = &[
    ("electronic", "best electronic dance music 2024"),
    ("hiphop", "top hip hop rap songs"),
    ("rock", "best rock songs playlist"),
    ("pop", "top pop hits 2024"),
    ("classical", "beautiful classical music pieces"),
    ("jazz", "best jazz songs relaxing"),
    ("ambient", "chill ambient music relax"),
    ("indian", "top bollywood hindi songs"),
    ("lofi", "lofi hip hop beats study"),
    ("acoustic", "acoustic covers popular songs"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Artist,
    Genre,
    Keywords,
    Time,
}

/// A search query for finding new music, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub query: String,
    pub reason: String,
    /// In [0, 1]; suggestions are ordered by it.
    pub confidence: f64,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
}

/// Up to `count` suggestions for the local hour `hour`, most confident first.
#[must_use]
pub fn suggest(model: &PreferenceModel, count: usize, hour: u8) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    for (artist, weight) in top_weighted(&model.artist_weight, 3) {
        if weight > SUGGESTION_THRESHOLD {
            suggestions.push(Suggestion {
                query: format!("{artist} popular songs"),
                reason: format!("You seem to enjoy {}", title_case(artist)),
                confidence: weight,
                kind: SuggestionKind::Artist,
            });
        }
    }

    for (genre, weight) in top_weighted(&model.genre_weight, 3) {
        if weight > SUGGESTION_THRESHOLD {
            suggestions.push(Suggestion {
                query: genre_query(genre),
                reason: format!("Based on your {genre} listening patterns"),
                confidence: weight,
                kind: SuggestionKind::Genre,
            });
        }
    }

    let strong: Vec<&str> = top_weighted(&model.keyword_weight, 10)
        .into_iter()
        .filter(|(_, weight)| *weight > STRONG_KEYWORD_THRESHOLD)
        .map(|(keyword, _)| keyword)
        .take(3)
        .collect();
    if !strong.is_empty() {
        let pair = &strong[..strong.len().min(2)];
        suggestions.push(Suggestion {
            query: format!("{} songs", pair.join(" ")),
            reason: format!("Based on your interest in {}", pair.join(", ")),
            confidence: KEYWORD_CONFIDENCE,
            kind: SuggestionKind::Keywords,
        });
    }

    suggestions.extend(time_suggestion(hour));

    suggestions.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    suggestions.truncate(count);
    suggestions
}

fn genre_query(genre: &str) -> String {
    GENRE_QUERIES
        .iter()
        .find(|(name, _)| *name == genre)
        .map_or_else(|| format!("best {genre} music"), |(_, query)| (*query).to_string())
}

fn time_suggestion(hour: u8) -> Option<Suggestion> {
    let (query, reason) = match hour {
        22..=23 | 0..=5 => ("calm relaxing night music", "Perfect for late night listening"),
        6..=9 => ("morning motivation music energetic", "Great for starting your day"),
        _ => return None,
    };
    Some(Suggestion {
        query: query.to_string(),
        reason: reason.to_string(),
        confidence: TIME_CONFIDENCE,
        kind: SuggestionKind::Time,
    })
}

/// Upper-case the first letter of every alphabetic run.
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strong_artist_leads_suggestions() {
        let mut model = PreferenceModel::default();
        model.artist_weight.insert("dj nova".into(), 0.8);
        model.artist_weight.insert("meh".into(), 0.5);
        model.keyword_weight.insert("night".into(), 0.58);

        for hour in 0..24 {
            let suggestions = suggest(&model, 5, hour);
            let artists: Vec<_> = suggestions.iter().filter(|s| s.kind == SuggestionKind::Artist).collect();

            assert_eq!(artists.len(), 1);
            assert_eq!(artists[0].query, "dj nova popular songs");
            assert_eq!(artists[0].reason, "You seem to enjoy Dj Nova");
            assert_eq!(artists[0].confidence, 0.8);
            assert_eq!(suggestions[0], *artists[0]);
        }
    }

    #[test]
    fn test_only_top_three_artists_considered() {
        let mut model = PreferenceModel::default();
        for (artist, weight) in [("a", 0.9), ("b", 0.8), ("c", 0.7), ("d", 0.65)] {
            model.artist_weight.insert(artist.into(), weight);
        }
        let suggestions = suggest(&model, 10, 12);
        let queries: Vec<_> = suggestions.iter().map(|s| s.query.as_str()).collect();
        assert_eq!(queries, vec!["a popular songs", "b popular songs", "c popular songs"]);
    }

    #[test]
    fn test_genre_queries_and_fallback() {
        let mut model = PreferenceModel::default();
        model.genre_weight.insert("lofi".into(), 0.9);
        model.genre_weight.insert("polka".into(), 0.6);
        model.genre_weight.insert("rock".into(), 0.55);

        let suggestions = suggest(&model, 10, 12);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].query, "lofi hip hop beats study");
        assert_eq!(suggestions[1].query, "best polka music");
        assert_eq!(suggestions[1].reason, "Based on your polka listening patterns");
    }

    #[test]
    fn test_keyword_combination() {
        let mut model = PreferenceModel::default();
        model.keyword_weight.insert("night".into(), 0.9);
        model.keyword_weight.insert("drive".into(), 0.8);
        model.keyword_weight.insert("neon".into(), 0.7);
        model.keyword_weight.insert("weak".into(), 0.6);

        let suggestions = suggest(&model, 10, 12);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].query, "night drive songs");
        assert_eq!(suggestions[0].reason, "Based on your interest in night, drive");
        assert_eq!(suggestions[0].confidence, KEYWORD_CONFIDENCE);
        assert_eq!(suggestions[0].kind, SuggestionKind::Keywords);
    }

    #[test]
    fn test_single_strong_keyword_still_suggested() {
        let mut model = PreferenceModel::default();
        model.keyword_weight.insert("night".into(), 0.65);

        let suggestions = suggest(&model, 10, 12);
        assert_eq!(suggestions[0].query, "night songs");
    }

    #[test]
    fn test_time_of_day_windows() {
        let model = PreferenceModel::default();
        for hour in [22, 23, 0, 3, 5] {
            let suggestions = suggest(&model, 5, hour);
            assert_eq!(suggestions.len(), 1);
            assert_eq!(suggestions[0].query, "calm relaxing night music");
            assert_eq!(suggestions[0].kind, SuggestionKind::Time);
        }
        for hour in [6, 9] {
            assert_eq!(suggest(&model, 5, hour)[0].query, "morning motivation music energetic");
        }
        for hour in [10, 15, 21] {
            assert!(suggest(&model, 5, hour).is_empty());
        }
    }

    #[test]
    fn test_sorted_and_truncated() {
        let mut model = PreferenceModel::default();
        model.artist_weight.insert("low".into(), 0.56);
        model.genre_weight.insert("jazz".into(), 0.95);
        model.keyword_weight.insert("blue".into(), 0.9);

        let suggestions = suggest(&model, 2, 23);
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].kind, SuggestionKind::Genre);
        assert_eq!(suggestions[1].kind, SuggestionKind::Keywords);
        assert!(suggest(&model, 0, 23).is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("dj nova"), "Dj Nova");
        assert_eq!(title_case("m83"), "M83");
        assert_eq!(title_case("o'neil-smith"), "O'Neil-Smith");
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let json = serde_json::to_value(&suggest(&PreferenceModel::default(), 1, 7)[0]).unwrap();
        assert_eq!(json["type"], "time");
    }
}
