use tokio::sync::oneshot;

use crate::models::{PlaylistHistoryEntry, PlaylistOutcome, PlaylistRequest};

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// Build a playlist for a validated request.
    GeneratePlaylist {
        request: PlaylistRequest,
        /// A channel to send the finished playlist back.
        responder: oneshot::Sender<Result<PlaylistOutcome, AppError>>,
    },
    /// Read the most recent history entries, newest first.
    RecentHistory {
        limit: usize,
        responder: oneshot::Sender<Vec<PlaylistHistoryEntry>>,
    },
}
