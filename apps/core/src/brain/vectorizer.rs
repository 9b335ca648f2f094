//! Text vectorization using TF-IDF.
//!
//! Turns a vibe description into a feature vector over a fixed vocabulary.
//! Includes English stopword filtering.

use std::collections::{HashMap, HashSet};

/// Stopwords for English language
const STOPWORDS_EN: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "nor", "for", "yet", "so", "i", "you", "he", "she", "it",
    "we", "they", "me", "him", "her", "us", "them", "my", "your", "his", "her", "its", "our",
    "their", "mine", "yours", "hers", "ours", "theirs", "this", "that", "these", "those", "who",
    "whom", "which", "what", "whose", "is", "am", "are", "was", "were", "be", "been", "being",
    "have", "has", "had", "having", "do", "does", "did", "doing", "will", "would", "shall",
    "should", "can", "could", "may", "might", "must", "in", "on", "at", "to", "from", "by", "with",
    "about", "against", "between", "into", "through", "during", "before", "after", "above",
    "below", "up", "down", "out", "off", "over", "under", "again", "further", "here", "there",
    "where", "when", "why", "how", "all", "each", "every", "both", "few", "more", "most", "other",
    "some", "any", "no", "not", "only", "own", "same", "than", "too", "very", "just", "also",
    "now", "then", "once", "always", "never", "if", "because", "as", "until", "while", "although",
    "though", "yes", "maybe", "s", "t", "ve", "re", "ll", "d", "m", "of", "like", "want", "need",
    "some", "music", "songs", "song", "playlist",
];

/// TF-IDF vectorizer over a fixed vocabulary
#[derive(Debug, Clone)]
pub struct TfIdfVectorizer {
    /// Term → column index
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    idf: Vec<f32>,
    stopwords: HashSet<&'static str>,
}

impl TfIdfVectorizer {
    /// Create a vectorizer; `terms[i]` is weighted by `idf[i]`.
    ///
    /// Callers guarantee `terms.len() == idf.len()`; extra weights are ignored.
    pub fn new(terms: &[String], idf: &[f32]) -> Self {
        let vocabulary = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.to_lowercase(), idx))
            .collect();

        Self {
            vocabulary,
            idf: idf.iter().copied().take(terms.len()).collect(),
            stopwords: STOPWORDS_EN.iter().copied().collect(),
        }
    }

    /// Number of feature columns
    pub fn dimension(&self) -> usize {
        self.idf.len()
    }

    /// Tokenize text into lowercase words, dropping stopwords and numbers
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric() && c != '-' && c != '&')
            .map(|word| word.trim_matches('-'))
            .filter(|word| {
                !word.is_empty()
                    && !self.stopwords.contains(word)
                    && !word.chars().all(|c| c.is_numeric())
            })
            .map(|s| s.to_string())
            .collect()
    }

    /// L2-normalized TF-IDF vector for `text`. Out-of-vocabulary words are ignored.
    pub fn transform(&self, text: &str) -> Vec<f32> {
        let mut features = vec![0.0f32; self.dimension()];

        for word in self.tokenize(text) {
            if let Some(&idx) = self.vocabulary.get(&word) {
                features[idx] += 1.0;
            }
        }

        for (value, idf) in features.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        let norm = features.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for value in &mut features {
                *value /= norm;
            }
        }

        features
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vectorizer() -> TfIdfVectorizer {
        let terms: Vec<String> = ["party", "chill", "lo-fi", "r&b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        TfIdfVectorizer::new(&terms, &[1.0, 2.0, 1.5, 1.0])
    }

    #[test]
    fn test_tokenize_keeps_genre_punctuation() {
        let v = vectorizer();
        let tokens = v.tokenize("Some chill LO-FI and R&B for the 2 of us");
        assert_eq!(tokens, vec!["chill", "lo-fi", "r&b"]);
    }

    #[test]
    fn test_transform_is_normalized() {
        let v = vectorizer();
        let features = v.transform("party party chill");
        let norm: f32 = features.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
        assert!(features[0] > 0.0 && features[1] > 0.0);
        assert_eq!(features[2], 0.0);
    }

    #[test]
    fn test_transform_unknown_words() {
        let v = vectorizer();
        assert_eq!(v.transform("completely unrelated"), vec![0.0; 4]);
        assert_eq!(v.transform(""), vec![0.0; 4]);
    }
}
