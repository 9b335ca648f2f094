//! # Brain Module
//!
//! Offline vibe understanding for VibeCurator.
//! Turns free text into a [`VibeProfile`] and the profile into song candidates,
//! BEFORE anything is sent to the music catalog.
//!
//! ## Components
//! - `profile`: Output data structure
//! - `knowledge`: Static genre/artist tables and band words
//! - `rules`: Mood and context detection using regex patterns (fast path)
//! - `vectorizer`: TF-IDF text features
//! - `model`: Predictive model artifact
//! - `interpreter`: Model-backed or rule-based interpretation
//! - `generator`: Candidate generation with catalog feedback

pub mod generator;
pub mod interpreter;
pub mod knowledge;
pub mod model;
pub mod profile;
pub mod rules;
pub mod vectorizer;

// Re-export main types for convenience
pub use generator::SuggestionGenerator;
pub use interpreter::{
    select_interpreter, InterpreterKind, ModelInterpreter, RuleBasedInterpreter, VibeInterpreter,
};
pub use model::{LinearVibeModel, ModelArtifact, PredictiveModel};
pub use profile::{Tempo, VibeProfile};
