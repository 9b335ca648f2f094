//! Predictive model for vibe text.
//!
//! The model is produced offline and shipped as a JSON artifact holding a
//! TF-IDF vocabulary, a genre label encoder, a linear genre classifier and two
//! linear regressors (energy, valence). Any loading problem is reported as a
//! [`ModelError`] so the caller can switch to the rule-based interpreter.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, info};

use super::vectorizer::TfIdfVectorizer;
use crate::error::ModelError;

/// Text → musical attribute predictor.
///
/// Implementations must be safe for unlimited concurrent readers.
pub trait PredictiveModel: Send + Sync + 'static {
    /// Most likely genre label for the text
    fn predict_genre(&self, text: &str) -> String;

    /// Raw energy estimate (callers clamp)
    fn predict_energy(&self, text: &str) -> f32;

    /// Raw valence estimate (callers clamp)
    fn predict_valence(&self, text: &str) -> f32;
}

/// A linear regressor over the feature vector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub weights: Vec<f32>,
    pub bias: f32,
}

impl LinearRegressor {
    fn predict(&self, features: &[f32]) -> f32 {
        dot(&self.weights, features) + self.bias
    }
}

/// On-disk layout of the model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub vocabulary: Vec<String>,
    pub idf: Vec<f32>,
    pub genre_labels: Vec<String>,
    /// One weight row per label
    pub genre_weights: Vec<Vec<f32>>,
    pub genre_bias: Vec<f32>,
    pub energy: LinearRegressor,
    pub valence: LinearRegressor,
}

impl ModelArtifact {
    /// Check that every matrix matches the vocabulary and label counts
    fn validate(&self) -> Result<(), ModelError> {
        let dim = self.vocabulary.len();

        if dim == 0 {
            return Err(ModelError::Inconsistent("empty vocabulary".to_string()));
        }
        if self.idf.len() != dim {
            return Err(ModelError::Inconsistent(format!(
                "idf has {} entries for a vocabulary of {}",
                self.idf.len(),
                dim
            )));
        }
        if self.genre_labels.is_empty() {
            return Err(ModelError::Inconsistent("no genre labels".to_string()));
        }
        if self.genre_weights.len() != self.genre_labels.len()
            || self.genre_bias.len() != self.genre_labels.len()
        {
            return Err(ModelError::Inconsistent(format!(
                "classifier shape does not match {} labels",
                self.genre_labels.len()
            )));
        }
        if let Some(row) = self.genre_weights.iter().position(|row| row.len() != dim) {
            return Err(ModelError::Inconsistent(format!(
                "classifier row {} does not match vocabulary size {}",
                row, dim
            )));
        }
        for (name, regressor) in [("energy", &self.energy), ("valence", &self.valence)] {
            if regressor.weights.len() != dim {
                return Err(ModelError::Inconsistent(format!(
                    "{} regressor has {} weights for a vocabulary of {}",
                    name,
                    regressor.weights.len(),
                    dim
                )));
            }
        }

        Ok(())
    }
}

/// Linear model loaded from a [`ModelArtifact`]
#[derive(Debug, Clone)]
pub struct LinearVibeModel {
    vectorizer: TfIdfVectorizer,
    genre_labels: Vec<String>,
    genre_weights: Vec<Vec<f32>>,
    genre_bias: Vec<f32>,
    energy: LinearRegressor,
    valence: LinearRegressor,
}

impl LinearVibeModel {
    /// Load and validate a model artifact from disk
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ModelError::Missing(path.to_path_buf()),
            _ => ModelError::Malformed(format!("{}: {}", path.display(), e)),
        })?;

        let artifact: ModelArtifact =
            serde_json::from_str(&raw).map_err(|e| ModelError::Malformed(e.to_string()))?;

        let model = Self::from_artifact(artifact)?;
        info!(
            "Vibe model loaded from {:?} ({} terms, {} genres)",
            path,
            model.vectorizer.dimension(),
            model.genre_labels.len()
        );
        Ok(model)
    }

    /// Build a model from an in-memory artifact
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        artifact.validate()?;

        Ok(Self {
            vectorizer: TfIdfVectorizer::new(&artifact.vocabulary, &artifact.idf),
            genre_labels: artifact.genre_labels,
            genre_weights: artifact.genre_weights,
            genre_bias: artifact.genre_bias,
            energy: artifact.energy,
            valence: artifact.valence,
        })
    }
}

impl PredictiveModel for LinearVibeModel {
    fn predict_genre(&self, text: &str) -> String {
        let features = self.vectorizer.transform(text);

        // Ties resolve to the earliest label
        let mut best = 0;
        let mut best_score = f32::NEG_INFINITY;
        for (idx, (row, bias)) in self.genre_weights.iter().zip(&self.genre_bias).enumerate() {
            let score = dot(row, &features) + bias;
            if score > best_score {
                best_score = score;
                best = idx;
            }
        }

        let label = self.genre_labels[best].clone();
        debug!(label = %label, score = best_score, "Genre predicted");
        label
    }

    fn predict_energy(&self, text: &str) -> f32 {
        self.energy.predict(&self.vectorizer.transform(text))
    }

    fn predict_valence(&self, text: &str) -> f32 {
        self.valence.predict(&self.vectorizer.transform(text))
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}
