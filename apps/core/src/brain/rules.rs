//! Keyword rules for vibe text.
//!
//! Fast pattern-based detection of the overall mood and of activity context
//! (focus, party, romance). No model required - pure Rust regex matching.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::profile::VibeProfile;

/// Coarse mood picked by the rule-based fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Energetic,
    Calm,
    /// Default when nothing matches
    Balanced,
}

impl Mood {
    /// The fixed profile for this mood, before context words are merged in
    fn preset(&self) -> (&'static [&'static str], f32, f32, &'static [&'static str]) {
        match self {
            Mood::Energetic => (
                &["pop", "dance", "electronic"],
                0.8,
                0.7,
                &["energetic", "upbeat", "danceable"],
            ),
            Mood::Calm => (
                &["ambient", "lo-fi", "acoustic"],
                0.3,
                0.5,
                &["calm", "peaceful", "relaxed"],
            ),
            Mood::Balanced => (
                &["indie", "alternative", "pop"],
                0.5,
                0.5,
                &["balanced", "moderate"],
            ),
        }
    }
}

// Compile patterns once at startup
// NOTE: expect() is acceptable here, the patterns are literals checked by tests
// Keywords match anywhere in the text ("afterparty", "homework")
static ENERGETIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(energetic|workout|party|upbeat)").expect("Invalid regex: energetic vocabulary")
});

static CALM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(calm|relax|chill|ambient)").expect("Invalid regex: calm vocabulary")
});

/// Activity context → characteristic words
static CONTEXT_RULES: LazyLock<Vec<(Regex, &'static [&'static str])>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)(focus|study|work|coding)").expect("Invalid regex: focus context"),
            &["focus", "concentration", "minimal"],
        ),
        (
            Regex::new(r"(?i)(party|dance|workout)").expect("Invalid regex: party context"),
            &["danceable", "motivational"],
        ),
        (
            Regex::new(r"(?i)(romantic|dinner|date)").expect("Invalid regex: romance context"),
            &["romantic", "intimate", "smooth"],
        ),
    ]
});

/// Classify the mood of a vibe. Energetic words win over calm ones.
pub fn classify_mood(text: &str) -> Mood {
    if ENERGETIC_PATTERN.is_match(text) {
        Mood::Energetic
    } else if CALM_PATTERN.is_match(text) {
        Mood::Calm
    } else {
        Mood::Balanced
    }
}

/// Characteristic words triggered by activity keywords, in rule order
pub fn context_traits(text: &str) -> Vec<&'static str> {
    CONTEXT_RULES
        .iter()
        .filter(|(pattern, _)| pattern.is_match(text))
        .flat_map(|(_, traits)| traits.iter().copied())
        .collect()
}

/// Rule-based profile for a vibe. Valid for every input, including empty text.
pub fn fallback_profile(text: &str) -> VibeProfile {
    let (genres, energy, valence, base_traits) = classify_mood(text).preset();

    let characteristics = context_traits(text)
        .into_iter()
        .chain(base_traits.iter().copied());

    VibeProfile::new(genres.iter().copied(), energy, valence, characteristics)
}
