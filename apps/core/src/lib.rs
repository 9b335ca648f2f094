// VibeCurator core
// Free-text vibe → musical profile → catalog-refined playlist

pub mod actors;
pub mod brain;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod history;
pub mod models;
pub mod preflight;
pub mod telemetry;

pub use actors::SupervisorHandle;
pub use config::AppConfig;
pub use error::AppError;
pub use models::{PlaylistOutcome, PlaylistRequest};

#[cfg(test)]
mod tests;
