use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::brain::{InterpreterKind, VibeProfile};

/// Smallest playlist a caller may request.
pub const MIN_PLAYLIST_SIZE: usize = 10;
/// Largest playlist a caller may request.
pub const MAX_PLAYLIST_SIZE: usize = 50;
/// Playlist size used when none is given.
pub const DEFAULT_PLAYLIST_SIZE: usize = 20;

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// Generated from the knowledge base.
    Base,
    /// Derived from a catalog near-match.
    CatalogFeedback,
}

/// An (artist, song) pair proposed by the generator, not yet checked against the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongCandidate {
    pub artist: String,
    pub song: String,
    /// Genre used for genre-scoped catalog fallback searches.
    pub genre: String,
    pub energy: f32,
    pub valence: f32,
    /// Generator confidence (0.0 - 1.0).
    pub confidence: f32,
    pub source: CandidateSource,
}

impl SongCandidate {
    /// Re-submit an already confirmed track for validation on a later pass.
    pub fn from_confirmed(track: &ConfirmedTrack, profile: &VibeProfile) -> Self {
        Self {
            artist: track.artist.clone(),
            song: track.name.clone(),
            genre: profile
                .primary_genres
                .first()
                .cloned()
                .unwrap_or_default(),
            energy: profile.energy,
            valence: profile.valence,
            confidence: 1.0,
            source: CandidateSource::CatalogFeedback,
        }
    }
}

/// A catalog-verified track. Only ever built from catalog responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedTrack {
    /// Catalog identifier.
    pub id: String,
    pub name: String,
    /// Primary artist name.
    pub artist: String,
    /// Canonical catalog URI (e.g. `spotify:track:...`).
    pub uri: String,
    /// Public web link to the track.
    pub external_url: String,
    /// Optional 30-second preview.
    pub preview_url: Option<String>,
    /// Catalog popularity score (0 - 100).
    pub popularity: u32,
}

/// A catalog near-match offered back to the generator, formatted `"<artist> - <song>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Feedback(String);

impl Feedback {
    /// Separator between artist and song.
    pub const SEPARATOR: &'static str = " - ";

    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Format a confirmed track as feedback.
    pub fn from_track(track: &ConfirmedTrack) -> Self {
        Self(format!("{}{}{}", track.artist, Self::SEPARATOR, track.name))
    }

    /// Split on the first separator into trimmed (artist, song).
    ///
    /// Returns `None` for malformed feedback: no separator or an empty half.
    pub fn parse(&self) -> Option<(&str, &str)> {
        let (artist, song) = self.0.split_once(Self::SEPARATOR)?;
        let (artist, song) = (artist.trim(), song.trim());
        if artist.is_empty() || song.is_empty() {
            return None;
        }
        Some((artist, song))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Feedback {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

/// Advisory state of the catalog after a reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogStatus {
    /// Every lookup completed.
    Available,
    /// Some lookups failed; results may be incomplete.
    Degraded,
    /// No lookup could reach the catalog.
    Unavailable,
}

impl CatalogStatus {
    /// Status across several passes: unchanged if they agree, otherwise degraded
    pub fn combine(self, other: CatalogStatus) -> CatalogStatus {
        if self == other {
            self
        } else {
            CatalogStatus::Degraded
        }
    }
}

/// A track as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayTrack {
    pub name: String,
    pub artist: String,
    pub external_url: Option<String>,
    pub preview_url: Option<String>,
    /// `false` when the track is an unverified suggestion.
    pub validated: bool,
}

impl From<&ConfirmedTrack> for DisplayTrack {
    fn from(track: &ConfirmedTrack) -> Self {
        Self {
            name: track.name.clone(),
            artist: track.artist.clone(),
            external_url: Some(track.external_url.clone()),
            preview_url: track.preview_url.clone(),
            validated: true,
        }
    }
}

impl From<&SongCandidate> for DisplayTrack {
    fn from(candidate: &SongCandidate) -> Self {
        Self {
            name: candidate.song.clone(),
            artist: candidate.artist.clone(),
            external_url: None,
            preview_url: None,
            validated: false,
        }
    }
}

/// A request for a playlist, as sent by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaylistRequest {
    /// Free-text vibe description.
    #[validate(length(min = 1, max = 500))]
    pub vibe: String,
    /// Number of tracks wanted.
    #[validate(range(min = 10, max = 50))]
    pub size: usize,
}

impl PlaylistRequest {
    pub fn new(vibe: impl Into<String>, size: usize) -> Self {
        Self {
            vibe: vibe.into().trim().to_string(),
            size,
        }
    }
}

/// Everything produced for one playlist request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistOutcome {
    pub profile: VibeProfile,
    pub tracks: Vec<DisplayTrack>,
    /// Near-matches harvested from the catalog, in pass order.
    pub feedback: Vec<Feedback>,
    /// Whether a feedback refinement pass ran.
    pub refined: bool,
    pub catalog_status: CatalogStatus,
    pub interpreter: InterpreterKind,
}

impl PlaylistOutcome {
    /// Whether every returned track was confirmed by the catalog
    pub fn is_validated(&self) -> bool {
        self.tracks.iter().all(|t| t.validated)
    }
}

/// One completed request, kept in the process-local history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistHistoryEntry {
    pub id: Uuid,
    pub vibe: String,
    pub profile: VibeProfile,
    pub refined: bool,
    pub track_count: usize,
    pub created_at: DateTime<Utc>,
}

impl PlaylistHistoryEntry {
    pub fn new(vibe: &str, outcome: &PlaylistOutcome) -> Self {
        Self {
            id: Uuid::new_v4(),
            vibe: vibe.to_string(),
            profile: outcome.profile.clone(),
            refined: outcome.refined,
            track_count: outcome.tracks.len(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> ConfirmedTrack {
        ConfirmedTrack {
            id: "4RvWPyQ5RL0ao9LPZeSouE".to_string(),
            name: "Aerodynamic".to_string(),
            artist: "Daft Punk".to_string(),
            uri: "spotify:track:4RvWPyQ5RL0ao9LPZeSouE".to_string(),
            external_url: "https://open.spotify.com/track/4RvWPyQ5RL0ao9LPZeSouE".to_string(),
            preview_url: None,
            popularity: 71,
        }
    }

    #[test]
    fn test_feedback_parse() {
        let feedback = Feedback::from("Daft Punk - Aerodynamic");
        assert_eq!(feedback.parse(), Some(("Daft Punk", "Aerodynamic")));
    }

    #[test]
    fn test_feedback_splits_on_first_separator() {
        let feedback = Feedback::from("Sigur Rós - Hoppípolla - Live");
        assert_eq!(feedback.parse(), Some(("Sigur Rós", "Hoppípolla - Live")));
    }

    #[test]
    fn test_malformed_feedback() {
        assert_eq!(Feedback::from("Daft Punk Aerodynamic").parse(), None);
        assert_eq!(Feedback::from("Daft Punk-Aerodynamic").parse(), None);
        assert_eq!(Feedback::from(" - Aerodynamic").parse(), None);
        assert_eq!(Feedback::from("").parse(), None);
    }

    #[test]
    fn test_feedback_from_track() {
        assert_eq!(Feedback::from_track(&track()).as_str(), "Daft Punk - Aerodynamic");
    }

    #[test]
    fn test_display_track_conversions() {
        let shown = DisplayTrack::from(&track());
        assert!(shown.validated);
        assert!(shown.external_url.is_some());

        let candidate = SongCandidate {
            artist: "Bill Evans".to_string(),
            song: "Moderate Bright Jazz".to_string(),
            genre: "jazz".to_string(),
            energy: 0.4,
            valence: 0.6,
            confidence: 0.8,
            source: CandidateSource::Base,
        };
        let shown = DisplayTrack::from(&candidate);
        assert!(!shown.validated);
        assert_eq!(shown.name, "Moderate Bright Jazz");
        assert_eq!(shown.external_url, None);
    }

    #[test]
    fn test_request_validation() {
        assert!(PlaylistRequest::new("rainy day", 20).validate().is_ok());
        assert!(PlaylistRequest::new("   ", 20).validate().is_err());
        assert!(PlaylistRequest::new("rainy day", 9).validate().is_err());
        assert!(PlaylistRequest::new("rainy day", 51).validate().is_err());
    }

    #[test]
    fn test_status_combine() {
        use CatalogStatus::*;
        assert_eq!(Available.combine(Available), Available);
        assert_eq!(Unavailable.combine(Unavailable), Unavailable);
        assert_eq!(Available.combine(Unavailable), Degraded);
        assert_eq!(Degraded.combine(Available), Degraded);
    }

    #[test]
    fn test_feedback_serializes_as_plain_string() {
        let json = serde_json::to_string(&Feedback::from("A - B")).unwrap();
        assert_eq!(json, "\"A - B\"");
    }
}
