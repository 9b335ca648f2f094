use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::ConfirmedTrack;

/// Defines the public interface for a music catalog.
///
/// This trait abstracts the concrete catalog service, so the reconciler and
/// the supervisor can run against a real web API or an in-memory double.
/// "Not found" is reported as `Ok(None)` / an empty list, never as an error.
#[async_trait]
pub trait CatalogSearch: Send + Sync + 'static {
    /// Looks up one track whose artist and title both match the request.
    async fn find_exact(&self, artist: &str, title: &str) -> Result<Option<ConfirmedTrack>, CatalogError>;

    /// Tracks by an artist, most relevant first.
    async fn find_by_artist(&self, artist: &str, limit: usize) -> Result<Vec<ConfirmedTrack>, CatalogError>;

    /// Tracks tagged with a genre, most relevant first.
    async fn find_by_genre(&self, genre: &str, limit: usize) -> Result<Vec<ConfirmedTrack>, CatalogError>;
}
