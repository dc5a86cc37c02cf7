//! Feature extraction from raw track names.
//!
//! Everything the engine knows about a track comes from its name: a candidate
//! artist, keyword tokens, and genre/mood hints matched by substring against
//! fixed pattern tables. Extraction is pure and does no I/O.

use serde::{Deserialize, Serialize};

/// Minimum length (in characters) of a keyword token.
pub const MIN_KEYWORD_LEN: usize = 3;

/// Genre tag → substring patterns. Order is the tagging order.
pub const GENRE_PATTERNS: &[(&str, &[&str])] = &[
    ("electronic", &["remix", "edm", "house", "techno", "dubstep", "trance", "bass", "drop", "beat"]),
    ("hiphop", &["rap", "hip", "hop", "trap", "flow", "bars", "cypher", "freestyle"]),
    ("rock", &["rock", "metal", "guitar", "punk", "grunge", "alternative"]),
    ("pop", &["pop", "dance", "party", "club", "hit"]),
    ("classical", &["symphony", "orchestra", "classical", "piano", "violin", "opus"]),
    ("jazz", &["jazz", "blues", "swing", "soul", "funk"]),
    ("ambient", &["ambient", "chill", "relax", "calm", "peaceful", "meditation", "sleep"]),
    ("indian", &["bollywood", "hindi", "punjabi", "desi", "bhangra", "indian"]),
    ("lofi", &["lofi", "lo-fi", "study", "beats", "aesthetic"]),
    ("acoustic", &["acoustic", "unplugged", "live", "cover"]),
];

/// Mood tag → substring patterns.
pub const MOOD_PATTERNS: &[(&str, &[&str])] = &[
    ("energetic", &["energy", "hype", "fire", "lit", "party", "dance", "fast", "power"]),
    ("sad", &["sad", "cry", "tears", "alone", "lonely", "heartbreak", "broken", "miss"]),
    ("happy", &["happy", "joy", "smile", "love", "sunshine", "good", "best"]),
    ("romantic", &["love", "romance", "heart", "kiss", "forever", "baby", "darling"]),
    ("motivational", &["motivation", "inspire", "dream", "rise", "success", "champion", "win"]),
];

/// Structured view of a track name.
///
/// Also stored as the feature snapshot of a [`crate::model::TrackStat`], which
/// is why it is serializable. The aliases accept documents written by the
/// original player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackFeatures {
    /// Lower-cased candidate artist, if the name carries one.
    pub artist: Option<String>,
    /// Keyword tokens in extraction order. Duplicates are kept.
    pub keywords: Vec<String>,
    #[serde(alias = "potential_genre")]
    pub genres: Vec<String>,
    #[serde(alias = "mood_hints")]
    pub moods: Vec<String>,
}

/// Extract features from a track name.
///
/// ```
/// use musify::features::extract;
///
/// let features = extract("DJ Nova - Night Drive.mp3");
/// assert_eq!(features.artist.as_deref(), Some("dj nova"));
/// assert_eq!(features.keywords, vec!["night", "drive"]);
/// ```
#[must_use]
pub fn extract(name: &str) -> TrackFeatures {
    let stem = strip_file_suffix(name);
    let lowered = stem.to_lowercase();

    // " - " keeps the title for keywords; " by " only yields the artist and
    // drops the title side. The asymmetry is deliberate.
    let (artist, analysed) = if let Some((left, right)) = stem.split_once(" - ") {
        (non_empty(left.trim().to_lowercase()), right.to_lowercase())
    } else if let Some((_, right)) = lowered.split_once(" by ") {
        let right = right.trim().to_string();
        (non_empty(right.clone()), right)
    } else {
        (None, lowered.clone())
    };

    TrackFeatures {
        artist,
        keywords: tokenize(&analysed),
        genres: match_tags(&lowered, GENRE_PATTERNS),
        moods: match_tags(&lowered, MOOD_PATTERNS),
    }
}

/// Split on whitespace and `-_.()[],&`, keeping tokens of at least
/// [`MIN_KEYWORD_LEN`] characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(is_separator)
        .map(str::trim)
        .filter(|token| token.chars().count() >= MIN_KEYWORD_LEN)
        .map(str::to_string)
        .collect()
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | '_' | '.' | '(' | ')' | '[' | ']' | ',' | '&')
}

/// Tag names whose patterns occur in `haystack`, each at most once.
fn match_tags(haystack: &str, table: &[(&str, &[&str])]) -> Vec<String> {
    table
        .iter()
        .filter(|(_, patterns)| patterns.iter().any(|pattern| haystack.contains(pattern)))
        .map(|(tag, _)| (*tag).to_string())
        .collect()
}

/// Remove a trailing file-type suffix such as `.mp3` or `.flac`.
///
/// Only a short alphanumeric run after the last dot counts as a suffix, so
/// titles like `Mr. Brightside` are left alone.
fn strip_file_suffix(name: &str) -> &str {
    match name.rfind('.') {
        Some(dot) if dot > 0 => {
            let suffix = &name[dot + 1..];
            let looks_like_extension = (1..=5).contains(&suffix.len())
                && suffix.chars().all(|c| c.is_ascii_alphanumeric());
            if looks_like_extension {
                &name[..dot]
            } else {
                name
            }
        }
        _ => name,
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
