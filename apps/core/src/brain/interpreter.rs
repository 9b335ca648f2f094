//! Vibe Interpreter - turns vibe text into a [`VibeProfile`].
//!
//! Two implementations of one capability:
//! 1. [`ModelInterpreter`] backed by a [`PredictiveModel`]
//! 2. [`RuleBasedInterpreter`] keyword fallback when no model could be loaded
//!
//! The choice is made once at startup by [`select_interpreter`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::knowledge::{energy_traits, genre_family, valence_traits};
use super::model::PredictiveModel;
use super::profile::{clamp_unit, VibeProfile};
use super::rules::{context_traits, fallback_profile};
use crate::error::ModelError;

/// Which interpreter is serving requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpreterKind {
    Model,
    RuleBased,
}

impl fmt::Display for InterpreterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpreterKind::Model => f.write_str("model"),
            InterpreterKind::RuleBased => f.write_str("rule_based"),
        }
    }
}

/// Text → profile. Pure function of the text and the loaded model state.
pub trait VibeInterpreter: Send + Sync + 'static {
    fn interpret(&self, text: &str) -> VibeProfile;

    fn kind(&self) -> InterpreterKind;
}

/// Model-backed interpretation
pub struct ModelInterpreter {
    model: Arc<dyn PredictiveModel>,
}

impl ModelInterpreter {
    pub fn new(model: Arc<dyn PredictiveModel>) -> Self {
        Self { model }
    }
}

impl VibeInterpreter for ModelInterpreter {
    fn interpret(&self, text: &str) -> VibeProfile {
        let genre = self.model.predict_genre(text);
        let energy = clamp_unit(self.model.predict_energy(text));
        let valence = clamp_unit(self.model.predict_valence(text));

        let profile = VibeProfile::new(
            expand_genres(&genre),
            energy,
            valence,
            derive_characteristics(text, energy, valence),
        );
        debug!("Model interpretation: {}", profile.summary());
        profile
    }

    fn kind(&self) -> InterpreterKind {
        InterpreterKind::Model
    }
}

/// Keyword fallback interpretation
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedInterpreter;

impl VibeInterpreter for RuleBasedInterpreter {
    fn interpret(&self, text: &str) -> VibeProfile {
        let profile = fallback_profile(text);
        debug!("Rule-based interpretation: {}", profile.summary());
        profile
    }

    fn kind(&self) -> InterpreterKind {
        InterpreterKind::RuleBased
    }
}

/// Pick the interpreter from the outcome of loading the model
pub fn select_interpreter<M>(model: Result<M, ModelError>) -> Arc<dyn VibeInterpreter>
where
    M: PredictiveModel,
{
    match model {
        Ok(model) => {
            info!("Using model-based vibe interpretation");
            Arc::new(ModelInterpreter::new(Arc::new(model)))
        }
        Err(e) => {
            warn!("{}. Falling back to rule-based vibe interpretation", e);
            Arc::new(RuleBasedInterpreter)
        }
    }
}

/// Expand a predicted label into related genres.
///
/// Each word of the label is looked up in the genre families; unknown words
/// are kept as-is. The profile constructor de-duplicates and caps the result.
pub fn expand_genres(label: &str) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();
    for word in label.split_whitespace() {
        match genre_family(word) {
            Some(family) => expanded.extend(family.iter().map(|g| g.to_string())),
            None => expanded.push(word.to_string()),
        }
    }
    expanded
}

/// Characteristic words for a vibe: context words first, then energy and
/// valence band words. De-duplication and the cap happen in the profile.
pub fn derive_characteristics(text: &str, energy: f32, valence: f32) -> Vec<&'static str> {
    let mut characteristics = context_traits(text);
    characteristics.extend_from_slice(energy_traits(energy));
    characteristics.extend_from_slice(valence_traits(valence));
    characteristics
}
