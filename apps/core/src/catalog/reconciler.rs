//! Catalog Reconciler - checks candidates against the catalog.
//!
//! Every candidate is looked up exactly; when that fails, the catalog is asked
//! for the artist's tracks, then for the genre's. The best near-match is kept
//! and the top near-matches are returned as feedback for the generator.

use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use super::traits::CatalogSearch;
use crate::error::CatalogError;
use crate::models::{CatalogStatus, ConfirmedTrack, Feedback, SongCandidate};

/// Results requested from each fallback search
pub const FALLBACK_SEARCH_LIMIT: usize = 3;
/// Near-matches turned into feedback per candidate
pub const FEEDBACK_PER_CANDIDATE: usize = 2;
/// Default bound on lookups in flight
pub const DEFAULT_MAX_CONCURRENT_LOOKUPS: usize = 4;

/// Outcome of one reconciliation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub confirmed: Vec<ConfirmedTrack>,
    pub feedback: Vec<Feedback>,
    pub status: CatalogStatus,
}

impl Reconciliation {
    fn empty() -> Self {
        Self {
            confirmed: Vec::new(),
            feedback: Vec::new(),
            status: CatalogStatus::Available,
        }
    }
}

/// What the catalog said about one candidate
#[derive(Debug, Default)]
struct Lookup {
    track: Option<ConfirmedTrack>,
    feedback: Vec<Feedback>,
    /// Some lookup for this candidate failed
    failed: bool,
    /// Some lookup for this candidate reported the catalog unavailable
    unavailable: bool,
}

impl Lookup {
    fn record(&mut self, err: &CatalogError) {
        self.failed = true;
        self.unavailable |= err.is_unavailable();
    }
}

pub struct CatalogReconciler<C: CatalogSearch> {
    catalog: Arc<C>,
    max_concurrent_lookups: usize,
}

impl<C: CatalogSearch> Clone for CatalogReconciler<C> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
            max_concurrent_lookups: self.max_concurrent_lookups,
        }
    }
}

impl<C: CatalogSearch> CatalogReconciler<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self::with_concurrency(catalog, DEFAULT_MAX_CONCURRENT_LOOKUPS)
    }

    pub fn with_concurrency(catalog: Arc<C>, max_concurrent_lookups: usize) -> Self {
        Self {
            catalog,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
        }
    }

    /// Validate candidates in order until `target_count` tracks are confirmed.
    ///
    /// Lookups overlap up to the concurrency bound but results are consumed in
    /// input order, so the output matches a sequential run.
    #[instrument(skip(self, candidates), fields(candidates = candidates.len()))]
    pub async fn reconcile(&self, candidates: Vec<SongCandidate>, target_count: usize) -> Reconciliation {
        let mut result = Reconciliation::empty();
        if target_count == 0 || candidates.is_empty() {
            return result;
        }

        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut unavailable = 0usize;

        let catalog = Arc::clone(&self.catalog);
        let mut lookups = stream::iter(candidates)
            .map(move |candidate| {
                let catalog = Arc::clone(&catalog);
                async move { lookup(&*catalog, &candidate).await }
            })
            .buffered(self.max_concurrent_lookups);

        while result.confirmed.len() < target_count {
            let Some(found) = lookups.next().await else {
                break;
            };

            processed += 1;
            failed += usize::from(found.failed);
            unavailable += usize::from(found.unavailable);

            result.feedback.extend(found.feedback);
            if let Some(track) = found.track {
                if seen_ids.insert(track.id.clone()) {
                    result.confirmed.push(track);
                } else {
                    debug!(track_id = %track.id, "Track already confirmed, skipping");
                }
            }
        }

        result.status = if processed > 0 && unavailable == processed {
            CatalogStatus::Unavailable
        } else if failed > 0 {
            CatalogStatus::Degraded
        } else {
            CatalogStatus::Available
        };

        if result.status != CatalogStatus::Available {
            warn!(
                processed,
                failed,
                unavailable,
                status = ?result.status,
                "Catalog lookups failed during reconciliation"
            );
        }
        info!(
            confirmed = result.confirmed.len(),
            feedback = result.feedback.len(),
            processed,
            "Reconciliation finished"
        );

        result
    }
}

/// Exact lookup, then artist search, then genre search
async fn lookup<C: CatalogSearch + ?Sized>(catalog: &C, candidate: &SongCandidate) -> Lookup {
    let mut outcome = Lookup::default();

    match catalog.find_exact(&candidate.artist, &candidate.song).await {
        Ok(Some(track)) => {
            outcome.track = Some(track);
            return outcome;
        }
        Ok(None) => {}
        Err(e) => {
            debug!(artist = %candidate.artist, song = %candidate.song, error = %e, "Exact lookup failed");
            outcome.record(&e);
            if e.is_unavailable() {
                return outcome;
            }
        }
    }

    let mut near = match catalog.find_by_artist(&candidate.artist, FALLBACK_SEARCH_LIMIT).await {
        Ok(tracks) => tracks,
        Err(e) => {
            debug!(artist = %candidate.artist, error = %e, "Artist search failed");
            outcome.record(&e);
            if e.is_unavailable() {
                return outcome;
            }
            Vec::new()
        }
    };

    if near.is_empty() {
        near = match catalog.find_by_genre(&candidate.genre, FALLBACK_SEARCH_LIMIT).await {
            Ok(tracks) => tracks,
            Err(e) => {
                debug!(genre = %candidate.genre, error = %e, "Genre search failed");
                outcome.record(&e);
                Vec::new()
            }
        };
    }

    outcome.feedback = near
        .iter()
        .take(FEEDBACK_PER_CANDIDATE)
        .map(Feedback::from_track)
        .collect();
    outcome.track = near.into_iter().next();
    outcome
}
