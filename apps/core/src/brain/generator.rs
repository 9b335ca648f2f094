//! Suggestion Generator - profile (+ catalog feedback) → song candidates.
//!
//! Base candidates come from the static genre → artist table. When feedback
//! from a previous catalog pass is supplied, the near-matches it names are
//! placed in front of the base candidates.

use tracing::debug;

use super::knowledge::{band_index, genre_artists, ENERGY_WORDS, VALENCE_WORDS};
use super::profile::VibeProfile;
use crate::models::{CandidateSource, Feedback, SongCandidate, DEFAULT_PLAYLIST_SIZE};

/// Genres of the profile used for base candidates
pub const GENRES_PER_PROFILE: usize = 3;
/// Artists drawn from the table per genre
pub const ARTISTS_PER_GENRE: usize = 2;

const BASE_CONFIDENCE: f32 = 0.8;
const FEEDBACK_CONFIDENCE: f32 = 0.9;
/// Genre tag carried by candidates built from catalog feedback
pub const CATALOG_SUGGESTED_GENRE: &str = "catalog_suggested";

#[derive(Debug, Clone)]
pub struct SuggestionGenerator {
    playlist_size: usize,
}

impl Default for SuggestionGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYLIST_SIZE)
    }
}

impl SuggestionGenerator {
    pub fn new(playlist_size: usize) -> Self {
        Self { playlist_size }
    }

    pub fn playlist_size(&self) -> usize {
        self.playlist_size
    }

    /// Candidates for a profile, feedback candidates first, capped to the playlist size
    pub fn generate(&self, profile: &VibeProfile, feedback: Option<&[Feedback]>) -> Vec<SongCandidate> {
        let mut candidates = match feedback {
            Some(items) if !items.is_empty() => self.from_feedback(profile, items),
            _ => Vec::new(),
        };
        candidates.extend(self.base_candidates(profile));
        candidates.truncate(self.playlist_size);

        debug!(
            count = candidates.len(),
            refined = feedback.is_some_and(|f| !f.is_empty()),
            "Candidates generated"
        );
        candidates
    }

    fn base_candidates(&self, profile: &VibeProfile) -> Vec<SongCandidate> {
        let mut candidates = Vec::new();

        for genre in profile.top_genres(GENRES_PER_PROFILE) {
            let title = song_title(genre, profile.energy, profile.valence);
            let artists: Vec<String> = match genre_artists(genre) {
                Some(known) => known
                    .iter()
                    .take(ARTISTS_PER_GENRE)
                    .map(|a| a.to_string())
                    .collect(),
                None => vec![format!("{} artist", genre)],
            };

            for artist in artists {
                candidates.push(SongCandidate {
                    artist,
                    song: title.clone(),
                    genre: genre.clone(),
                    energy: profile.energy,
                    valence: profile.valence,
                    confidence: BASE_CONFIDENCE,
                    source: CandidateSource::Base,
                });
            }
        }

        candidates
    }

    fn from_feedback(&self, profile: &VibeProfile, feedback: &[Feedback]) -> Vec<SongCandidate> {
        feedback
            .iter()
            .filter_map(|item| match item.parse() {
                Some((artist, song)) => Some(SongCandidate {
                    artist: artist.to_string(),
                    song: song.to_string(),
                    genre: CATALOG_SUGGESTED_GENRE.to_string(),
                    energy: profile.energy,
                    valence: profile.valence,
                    confidence: FEEDBACK_CONFIDENCE,
                    source: CandidateSource::CatalogFeedback,
                }),
                None => {
                    debug!(feedback = %item, "Skipping malformed feedback");
                    None
                }
            })
            .collect()
    }
}

/// `"<EnergyWord> <ValenceWord> <Genre>"`, genre title-cased
pub fn song_title(genre: &str, energy: f32, valence: f32) -> String {
    format!(
        "{} {} {}",
        ENERGY_WORDS[band_index(energy)],
        VALENCE_WORDS[band_index(valence)],
        title_case(genre)
    )
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
///
/// "lo-fi" → "Lo-Fi", "r&b" → "R&B", "hip hop" → "Hip Hop".
fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut after_letter = false;
    for c in text.chars() {
        if after_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        after_letter = c.is_alphabetic();
    }
    out
}
