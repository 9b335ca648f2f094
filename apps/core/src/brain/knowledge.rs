//! Static music knowledge shared by every request.
//!
//! Genre families, the genre → artist table and the words used to describe
//! energy and valence bands. Read-only, compiled into the binary.

/// Related genres for each known genre word
const GENRE_FAMILIES: &[(&str, &[&str])] = &[
    ("electronic", &["electronic", "techno", "house", "ambient", "downtempo"]),
    ("rock", &["rock", "alternative rock", "indie rock", "classic rock"]),
    ("pop", &["pop", "indie pop", "synth-pop", "electropop"]),
    ("jazz", &["jazz", "smooth jazz", "contemporary jazz", "nu jazz"]),
    ("classical", &["classical", "orchestral", "chamber music", "piano"]),
    ("hip-hop", &["hip hop", "rap", "trap", "old school hip hop"]),
    ("indie", &["indie", "indie folk", "indie rock", "indie pop"]),
    ("ambient", &["ambient", "drone", "dark ambient", "space ambient"]),
    ("lo-fi", &["lo-fi", "chillhop", "lo-fi hip hop", "bedroom pop"]),
    ("folk", &["folk", "acoustic", "singer-songwriter", "americana"]),
    ("r&b", &["r&b", "soul", "neo soul", "contemporary r&b"]),
    ("dance", &["dance", "edm", "house", "trance", "disco"]),
];

/// Representative artists per genre
const GENRE_ARTISTS: &[(&str, &[&str])] = &[
    ("electronic", &["Daft Punk", "Aphex Twin", "Boards of Canada", "Tycho"]),
    ("rock", &["The Beatles", "Led Zeppelin", "Radiohead", "Arctic Monkeys"]),
    ("jazz", &["Miles Davis", "John Coltrane", "Bill Evans", "Herbie Hancock"]),
    ("ambient", &["Brian Eno", "Stars of the Lid", "Tim Hecker", "Grouper"]),
    ("lo-fi", &["Nujabes", "J Dilla", "Emancipator", "Bonobo"]),
    ("pop", &["The Weeknd", "Billie Eilish", "Taylor Swift", "Dua Lipa"]),
    ("hip-hop", &["Kendrick Lamar", "J. Cole", "Tyler, The Creator", "Mac Miller"]),
    ("indie", &["Tame Impala", "Arctic Monkeys", "The Strokes", "Vampire Weekend"]),
];

/// Energy adjectives, one per band (index 0 = lowest)
pub const ENERGY_WORDS: [&str; 5] = ["Slow", "Gentle", "Moderate", "Energetic", "Intense"];

/// Valence adjectives, one per band (index 0 = lowest)
pub const VALENCE_WORDS: [&str; 5] = ["Blue", "Calm", "Neutral", "Bright", "Euphoric"];

pub const LOW_ENERGY_TRAITS: &[&str] = &["calm", "peaceful", "relaxed"];
pub const HIGH_ENERGY_TRAITS: &[&str] = &["energetic", "upbeat", "dynamic"];
pub const MID_ENERGY_TRAITS: &[&str] = &["moderate", "balanced"];

pub const LOW_VALENCE_TRAITS: &[&str] = &["melancholy", "introspective", "emotional"];
pub const HIGH_VALENCE_TRAITS: &[&str] = &["happy", "uplifting", "positive"];
pub const MID_VALENCE_TRAITS: &[&str] = &["neutral", "contemplative"];

/// Expand a genre word into its family, if known
pub fn genre_family(genre: &str) -> Option<&'static [&'static str]> {
    GENRE_FAMILIES
        .iter()
        .find(|(name, _)| *name == genre)
        .map(|(_, family)| *family)
}

/// Artists known for a genre, if any
pub fn genre_artists(genre: &str) -> Option<&'static [&'static str]> {
    GENRE_ARTISTS
        .iter()
        .find(|(name, _)| *name == genre)
        .map(|(_, artists)| *artists)
}

/// Band index for a unit score: `floor(v * 5)` clamped to 0..=4
pub fn band_index(value: f32) -> usize {
    let scaled = (value.max(0.0) * 5.0).floor() as usize;
    scaled.min(4)
}

/// Words describing an energy level
pub fn energy_traits(energy: f32) -> &'static [&'static str] {
    if energy < 0.3 {
        LOW_ENERGY_TRAITS
    } else if energy > 0.7 {
        HIGH_ENERGY_TRAITS
    } else {
        MID_ENERGY_TRAITS
    }
}

/// Words describing a valence level
pub fn valence_traits(valence: f32) -> &'static [&'static str] {
    if valence < 0.3 {
        LOW_VALENCE_TRAITS
    } else if valence > 0.7 {
        HIGH_VALENCE_TRAITS
    } else {
        MID_VALENCE_TRAITS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_index() {
        assert_eq!(band_index(0.0), 0);
        assert_eq!(band_index(0.19), 0);
        assert_eq!(band_index(0.2), 1);
        assert_eq!(band_index(0.4), 2);
        assert_eq!(band_index(0.6), 3);
        assert_eq!(band_index(0.99), 4);
        assert_eq!(band_index(1.0), 4);
    }

    #[test]
    fn test_known_tables() {
        assert_eq!(genre_family("dance").map(|f| f.len()), Some(5));
        assert!(genre_family("polka").is_none());
        assert_eq!(genre_artists("jazz").map(|a| a[0]), Some("Miles Davis"));
        assert!(genre_artists("acoustic").is_none());
    }

    #[test]
    fn test_trait_bands() {
        assert_eq!(energy_traits(0.1), LOW_ENERGY_TRAITS);
        assert_eq!(energy_traits(0.7), MID_ENERGY_TRAITS);
        assert_eq!(energy_traits(0.71), HIGH_ENERGY_TRAITS);
        assert_eq!(valence_traits(0.3), MID_VALENCE_TRAITS);
        assert_eq!(valence_traits(0.9), HIGH_VALENCE_TRAITS);
    }
}
