use super::mocks::{track, MockCatalog};
use crate::actors::{SupervisorHandle, SupervisorSettings};
use crate::brain::RuleBasedInterpreter;
use crate::catalog::CatalogReconciler;
use crate::error::CatalogError;
use crate::models::{CandidateSource, CatalogStatus, SongCandidate};
use std::sync::Arc;
use tokio::time::{Duration, Instant};

fn candidate(artist: &str, song: &str) -> SongCandidate {
    SongCandidate {
        artist: artist.to_string(),
        song: song.to_string(),
        genre: "pop".to_string(),
        energy: 0.5,
        valence: 0.5,
        confidence: 0.8,
        source: CandidateSource::Base,
    }
}

#[tokio::test]
async fn test_chaos_concurrent_requests() {
    // 1. Setup: slow catalog, many clients sharing one supervisor
    let catalog = Arc::new(
        MockCatalog::new()
            .with_artist("Nujabes", vec![track("nuj1", "Nujabes", "Aruarian Dance")])
            .with_delay(Duration::from_millis(10)),
    );
    let handle = SupervisorHandle::new(
        Arc::new(RuleBasedInterpreter),
        catalog,
        SupervisorSettings::default(),
    );

    // 2. Act
    let mut tasks = Vec::new();
    for i in 0..8 {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle
                .generate_playlist(format!("chill afternoon #{}", i), 10)
                .await
        }));
    }

    // 3. Assert: every request answered, every one recorded
    for task in tasks {
        let outcome = task.await.unwrap().unwrap();
        assert_eq!(outcome.tracks[0].name, "Aruarian Dance");
    }
    assert_eq!(handle.recent_history(20).await.unwrap().len(), 8);
}

#[tokio::test]
async fn test_concurrent_lookups_keep_input_order() {
    let mut catalog = MockCatalog::new().with_delay(Duration::from_millis(40));
    let mut candidates = Vec::new();
    for i in 0..8 {
        let artist = format!("Artist {}", i);
        let song = format!("Song {}", i);
        catalog = catalog.with_exact(track(&format!("id{}", i), &artist, &song));
        candidates.push(candidate(&artist, &song));
    }

    let reconciler = CatalogReconciler::with_concurrency(Arc::new(catalog), 4);
    let start = Instant::now();
    let result = reconciler.reconcile(candidates, 20).await;
    let elapsed = start.elapsed();

    let ids: Vec<String> = result.confirmed.iter().map(|t| t.id.clone()).collect();
    let expected: Vec<String> = (0..8).map(|i| format!("id{}", i)).collect();
    assert_eq!(ids, expected);
    // 8 lookups of 40ms, 4 at a time
    assert!(elapsed < Duration::from_millis(300), "lookups did not overlap: {:?}", elapsed);
}

#[tokio::test]
async fn test_reconcile_idempotent_on_confirmed_set() {
    let catalog = Arc::new(
        MockCatalog::new()
            .with_exact(track("a", "Tycho", "Awake"))
            .with_exact(track("b", "Bonobo", "Kiara")),
    );
    let reconciler = CatalogReconciler::new(catalog);
    let input = vec![candidate("Tycho", "Awake"), candidate("Bonobo", "Kiara")];

    let first = reconciler.reconcile(input.clone(), 20).await;
    let second = reconciler.reconcile(input, 20).await;

    assert_eq!(first, second);
    assert_eq!(first.confirmed.len(), 2);
    assert!(first.feedback.is_empty());
    assert_eq!(first.status, CatalogStatus::Available);
}

#[tokio::test]
async fn test_outage_yields_empty_reconciliation() {
    let reconciler = CatalogReconciler::new(Arc::new(MockCatalog::failing(
        CatalogError::Unavailable("dns failure".to_string()),
    )));

    let result = reconciler
        .reconcile(vec![candidate("A", "B"), candidate("C", "D"), candidate("E", "F")], 20)
        .await;
    assert!(result.confirmed.is_empty());
    assert!(result.feedback.is_empty());
    assert_eq!(result.status, CatalogStatus::Unavailable);
}
