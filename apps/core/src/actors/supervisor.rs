use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};
use validator::Validate;

use crate::actors::messages::{AppError, SupervisorMessage};
use crate::brain::{select_interpreter, LinearVibeModel, SuggestionGenerator, VibeInterpreter, VibeProfile};
use crate::catalog::reconciler::DEFAULT_MAX_CONCURRENT_LOOKUPS;
use crate::catalog::{CatalogReconciler, CatalogSearch, SpotifyCatalog};
use crate::config::AppConfig;
use crate::history::PlaylistHistory;
use crate::models::{
    CatalogStatus, ConfirmedTrack, DisplayTrack, Feedback, PlaylistHistoryEntry, PlaylistOutcome,
    PlaylistRequest, SongCandidate,
};

/// Reconciliation passes per request: the base pass plus one feedback pass
pub const MAX_RECONCILE_PASSES: usize = 2;

const HISTORY_TIMEOUT: Duration = Duration::from_secs(5);
/// Slack on top of the request deadline before a handle gives up on the actor
const ANSWER_GRACE: Duration = Duration::from_secs(5);

/// Tuning knobs for the supervisor
#[derive(Debug, Clone, Copy)]
pub struct SupervisorSettings {
    pub max_concurrent_lookups: usize,
    /// Deadline for the catalog passes of one request; past it the request
    /// answers with unvalidated suggestions
    pub request_timeout: Duration,
}

impl Default for SupervisorSettings {
    fn default() -> Self {
        Self {
            max_concurrent_lookups: DEFAULT_MAX_CONCURRENT_LOOKUPS,
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&AppConfig> for SupervisorSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            max_concurrent_lookups: config.catalog_concurrency,
            request_timeout: config.request_timeout(),
        }
    }
}

/// A handle to the `SupervisorActor`.
///
/// This is the primary entry point for all business logic in the application. It owns the
/// interpret → generate → reconcile pipeline and the playlist history.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    answer_timeout: Duration,
}

impl SupervisorHandle {
    /// Creates a `SupervisorActor` from the runtime configuration.
    ///
    /// Loads the predictive model (falling back to the rule-based interpreter)
    /// and builds the Spotify catalog client.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let interpreter = select_interpreter(LinearVibeModel::load(&config.model_path));
        let catalog = Arc::new(SpotifyCatalog::from_config(config)?);
        Ok(Self::new(interpreter, catalog, SupervisorSettings::from(config)))
    }

    /// Spawns the actor with injected collaborators and returns a handle to it.
    pub fn new<C: CatalogSearch>(
        interpreter: Arc<dyn VibeInterpreter>,
        catalog: Arc<C>,
        settings: SupervisorSettings,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner {
            receiver,
            pipeline: Arc::new(PlaylistPipeline {
                interpreter,
                reconciler: CatalogReconciler::with_concurrency(
                    catalog,
                    settings.max_concurrent_lookups,
                ),
                refine_timeout: settings.request_timeout,
            }),
            history: Arc::new(PlaylistHistory::new()),
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            answer_timeout: settings.request_timeout + ANSWER_GRACE,
        }
    }

    /// Generates a playlist for a vibe.
    ///
    /// Fails only for an invalid request (blank vibe, size outside 10..=50)
    /// or when the actor cannot answer. Catalog problems, including a catalog
    /// too slow for the request deadline, are reported through
    /// [`PlaylistOutcome::catalog_status`].
    #[instrument(skip(self))]
    pub async fn generate_playlist(&self, vibe: String, size: usize) -> Result<PlaylistOutcome, AppError> {
        let request = PlaylistRequest::new(vibe, size);
        request.validate()?;

        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::GeneratePlaylist {
            request,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.answer_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Most recent playlists, newest first.
    pub async fn recent_history(&self, limit: usize) -> Result<Vec<PlaylistHistoryEntry>, AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(SupervisorMessage::RecentHistory {
                limit,
                responder: send,
            })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        Ok(timeout(HISTORY_TIMEOUT, recv).await??)
    }
}

// --- Actor Runner ---
struct SupervisorRunner<C: CatalogSearch> {
    receiver: mpsc::Receiver<SupervisorMessage>,
    pipeline: Arc<PlaylistPipeline<C>>,
    history: Arc<PlaylistHistory>,
}

impl<C: CatalogSearch> SupervisorRunner<C> {
    async fn run(mut self) {
        info!("Supervisor started (interpreter: {})", self.pipeline.interpreter.kind());
        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("Supervisor stopped");
    }

    fn handle_message(&self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::GeneratePlaylist { request, responder } => {
                // Each request runs on its own task so requests never wait on each other
                let pipeline = Arc::clone(&self.pipeline);
                let history = Arc::clone(&self.history);
                tokio::spawn(async move {
                    let outcome = pipeline.run(&request).await;
                    if responder.is_closed() {
                        warn!(vibe = %request.vibe, "Playlist requester went away, not recording");
                        return;
                    }
                    history.append(PlaylistHistoryEntry::new(&request.vibe, &outcome));
                    if responder.send(Ok(outcome)).is_err() {
                        error!("Playlist requester went away before the answer was ready");
                    }
                });
            }
            SupervisorMessage::RecentHistory { limit, responder } => {
                let _ = responder.send(self.history.recent(limit));
            }
        }
    }
}

/// Catalog passes of one request
struct Refinement {
    confirmed: Vec<ConfirmedTrack>,
    feedback: Vec<Feedback>,
    status: CatalogStatus,
    refined: bool,
}

/// Shared, read-only request pipeline
struct PlaylistPipeline<C: CatalogSearch> {
    interpreter: Arc<dyn VibeInterpreter>,
    reconciler: CatalogReconciler<C>,
    /// Deadline for the catalog passes of one request
    refine_timeout: Duration,
}

impl<C: CatalogSearch> PlaylistPipeline<C> {
    /// interpret → generate → reconcile → (generate → reconcile) → truncate
    #[instrument(skip(self, request), fields(size = request.size))]
    async fn run(&self, request: &PlaylistRequest) -> PlaylistOutcome {
        let profile = self.interpreter.interpret(&request.vibe);
        info!("Vibe interpreted: {}", profile.summary());

        let generator = SuggestionGenerator::new(request.size);
        let base = generator.generate(&profile, None);

        let refinement = match timeout(
            self.refine_timeout,
            self.refine(&generator, &profile, base.clone(), request.size),
        )
        .await
        {
            Ok(refinement) => refinement,
            Err(_) => {
                warn!(
                    timeout_ms = self.refine_timeout.as_millis() as u64,
                    "Catalog passes missed the request deadline"
                );
                Refinement {
                    confirmed: Vec::new(),
                    feedback: Vec::new(),
                    status: CatalogStatus::Degraded,
                    refined: false,
                }
            }
        };

        let Refinement {
            confirmed,
            feedback,
            status: catalog_status,
            mut refined,
        } = refinement;

        let tracks: Vec<DisplayTrack> = if confirmed.is_empty() {
            warn!(
                status = ?catalog_status,
                "No track confirmed, returning unvalidated suggestions"
            );
            refined = false;
            base.iter().take(request.size).map(DisplayTrack::from).collect()
        } else {
            confirmed.iter().take(request.size).map(DisplayTrack::from).collect()
        };

        PlaylistOutcome {
            profile,
            tracks,
            feedback,
            refined,
            catalog_status,
            interpreter: self.interpreter.kind(),
        }
    }

    async fn refine(
        &self,
        generator: &SuggestionGenerator,
        profile: &VibeProfile,
        base: Vec<SongCandidate>,
        size: usize,
    ) -> Refinement {
        let mut candidates = base;
        let mut confirmed: Vec<ConfirmedTrack> = Vec::new();
        let mut feedback: Vec<Feedback> = Vec::new();
        let mut status: Option<CatalogStatus> = None;
        let mut refined = false;

        for pass in 1..=MAX_RECONCILE_PASSES {
            let result = self.reconciler.reconcile(candidates, size).await;
            info!(
                pass,
                confirmed = result.confirmed.len(),
                feedback = result.feedback.len(),
                "Reconcile pass finished"
            );

            status = Some(match status {
                Some(previous) => previous.combine(result.status),
                None => result.status,
            });
            confirmed = result.confirmed;
            let new_feedback = result.feedback;

            if pass == MAX_RECONCILE_PASSES || new_feedback.is_empty() {
                feedback.extend(new_feedback);
                break;
            }

            // Re-validate what is already confirmed together with the refined suggestions
            let refined_candidates = generator.generate(profile, Some(new_feedback.as_slice()));
            candidates = merge_for_refinement(&confirmed, refined_candidates, profile);
            feedback.extend(new_feedback);
            refined = true;
        }

        Refinement {
            confirmed,
            feedback,
            status: status.unwrap_or(CatalogStatus::Available),
            refined,
        }
    }
}

/// Confirmed tracks first (as candidates), then the refined suggestions
fn merge_for_refinement(
    confirmed: &[ConfirmedTrack],
    refined: Vec<SongCandidate>,
    profile: &VibeProfile,
) -> Vec<SongCandidate> {
    confirmed
        .iter()
        .map(|track| SongCandidate::from_confirmed(track, profile))
        .chain(refined)
        .collect()
}
