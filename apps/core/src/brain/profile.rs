//! Vibe Profile - Output structure for vibe interpretation.
//!
//! Holds the structured musical attributes derived from a free-text vibe.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of genres kept on a profile
pub const MAX_GENRES: usize = 5;

/// Maximum number of characteristics kept on a profile
pub const MAX_CHARACTERISTICS: usize = 6;

/// Coarse tempo bucket, always derived from energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tempo {
    Slow,
    Medium,
    Fast,
}

impl Tempo {
    /// Map an energy level to a tempo bucket
    pub fn from_energy(energy: f32) -> Self {
        if energy < 0.3 {
            Tempo::Slow
        } else if energy < 0.6 {
            Tempo::Medium
        } else {
            Tempo::Fast
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tempo::Slow => "slow",
            Tempo::Medium => "medium",
            Tempo::Fast => "fast",
        }
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured interpretation of a vibe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeProfile {
    /// Genres in priority order, de-duplicated
    pub primary_genres: Vec<String>,
    /// Energy level (0.0 - 1.0)
    pub energy: f32,
    /// Musical positiveness (0.0 - 1.0)
    pub valence: f32,
    /// Tempo bucket derived from energy
    pub tempo: Tempo,
    /// Descriptive words, de-duplicated
    pub characteristics: Vec<String>,
}

impl VibeProfile {
    /// Build a profile, enforcing clamping, caps and the energy/tempo relation.
    pub fn new<G, C>(genres: G, energy: f32, valence: f32, characteristics: C) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let energy = clamp_unit(energy);
        let valence = clamp_unit(valence);

        Self {
            primary_genres: dedup_capped(genres, MAX_GENRES),
            energy,
            valence,
            tempo: Tempo::from_energy(energy),
            characteristics: dedup_capped(characteristics, MAX_CHARACTERISTICS),
        }
    }

    /// The genres used for suggestion generation
    pub fn top_genres(&self, n: usize) -> &[String] {
        &self.primary_genres[..n.min(self.primary_genres.len())]
    }

    /// Get a summary for logging
    pub fn summary(&self) -> String {
        format!(
            "Genres: {}, Energy: {:.2}, Valence: {:.2}, Tempo: {}, Characteristics: {}",
            self.primary_genres.join(", "),
            self.energy,
            self.valence,
            self.tempo,
            self.characteristics.join(", ")
        )
    }
}

/// Clamp a score to [0, 1]; NaN maps to 0.
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Keep the first occurrence of each non-empty item, up to `cap` items.
fn dedup_capped<I>(items: I, cap: usize) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::with_capacity(cap);
    for item in items {
        if out.len() == cap {
            break;
        }
        let item: String = item.into();
        let item = item.trim();
        if item.is_empty() || out.iter().any(|existing| existing == item) {
            continue;
        }
        out.push(item.to_string());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tempo_thresholds() {
        assert_eq!(Tempo::from_energy(0.0), Tempo::Slow);
        assert_eq!(Tempo::from_energy(0.29), Tempo::Slow);
        assert_eq!(Tempo::from_energy(0.3), Tempo::Medium);
        assert_eq!(Tempo::from_energy(0.59), Tempo::Medium);
        assert_eq!(Tempo::from_energy(0.6), Tempo::Fast);
        assert_eq!(Tempo::from_energy(1.0), Tempo::Fast);
    }

    #[test]
    fn test_profile_clamps_scores() {
        let profile = VibeProfile::new(["rock"], 1.7, -0.4, ["loud"]);
        assert_eq!(profile.energy, 1.0);
        assert_eq!(profile.valence, 0.0);
        assert_eq!(profile.tempo, Tempo::Fast);

        let profile = VibeProfile::new(["rock"], f32::NAN, 0.5, Vec::<String>::new());
        assert_eq!(profile.energy, 0.0);
        assert_eq!(profile.tempo, Tempo::Slow);
    }

    #[test]
    fn test_profile_dedups_and_caps() {
        let profile = VibeProfile::new(
            ["a", "b", "a", "c", "d", "e", "f"],
            0.5,
            0.5,
            ["x", "x", "y", "z", "w", "v", "u", "t"],
        );
        assert_eq!(profile.primary_genres, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(profile.characteristics, vec!["x", "y", "z", "w", "v", "u"]);
    }

    #[test]
    fn test_top_genres_bounds() {
        let profile = VibeProfile::new(["jazz"], 0.4, 0.6, ["smooth"]);
        assert_eq!(profile.top_genres(3), &["jazz".to_string()]);
    }

    #[test]
    fn test_summary() {
        let profile = VibeProfile::new(["jazz"], 0.4, 0.6, ["smooth"]);
        let summary = profile.summary();
        assert!(summary.contains("Genres: jazz"));
        assert!(summary.contains("Tempo: medium"));
    }
}
