use super::*;
use crate::testing::{FakeAcquisition, FakeStore};

fn row(page_id: &str, title: &str, tag: &str, confirmed: bool, added: bool) -> PendingRequest {
    PendingRequest {
        page_id: page_id.to_string(),
        title: Some(title.to_string()),
        tags: vec![tag.to_string()],
        confirmed,
        added,
        ..PendingRequest::default()
    }
}

fn tv_row(page_id: &str, title: &str, tvdb_id: Option<u64>) -> PendingRequest {
    PendingRequest {
        tvdb_id,
        ..row(page_id, title, "TV", true, false)
    }
}

fn movie_row(page_id: &str, title: &str, tmdb_id: Option<u64>) -> PendingRequest {
    PendingRequest {
        tmdb_id,
        ..row(page_id, title, "Movie", true, false)
    }
}

struct Harness {
    store: Arc<FakeStore>,
    sonarr: Arc<FakeAcquisition>,
    radarr: Arc<FakeAcquisition>,
    poller: FulfillmentPoller,
}

fn harness(store: FakeStore, sonarr: FakeAcquisition, radarr: FakeAcquisition) -> Harness {
    let store = Arc::new(store);
    let sonarr = Arc::new(sonarr);
    let radarr = Arc::new(radarr);
    let poller = FulfillmentPoller::new(store.clone(), sonarr.clone(), radarr.clone());
    Harness {
        store,
        sonarr,
        radarr,
        poller,
    }
}

#[tokio::test]
async fn test_unconfirmed_rows_are_never_processed() {
    let mut unconfirmed = tv_row("p1", "Severance", Some(371980));
    unconfirmed.confirmed = false;
    let mut unconfirmed_added = movie_row("p2", "Dune", Some(438631));
    unconfirmed_added.confirmed = false;
    unconfirmed_added.added = true;

    let h = harness(
        FakeStore::new().with_rows(vec![unconfirmed, unconfirmed_added]),
        FakeAcquisition::new("sonarr").knowing(371980, "Severance"),
        FakeAcquisition::new("radarr").knowing(438631, "Dune"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.rows_seen, 2);
    assert_eq!(report.outcome_for("p1"), Some(&RowOutcome::Skipped(SkipReason::NotEligible)));
    assert_eq!(report.outcome_for("p2"), Some(&RowOutcome::Skipped(SkipReason::NotEligible)));
    assert!(h.sonarr.lookups().is_empty());
    assert!(h.radarr.lookups().is_empty());
    assert!(h.store.completed().is_empty());
}

#[tokio::test]
async fn test_already_added_rows_are_skipped() {
    let h = harness(
        FakeStore::new().with_rows(vec![row("p1", "Dune", "Movie", true, true)]),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr"),
    );
    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.skipped(), 1);
    assert!(h.radarr.lookups().is_empty());
}

#[tokio::test]
async fn test_success_writes_completed_and_archives() {
    let h = harness(
        FakeStore::new().with_rows(vec![tv_row("p1", "Severance", Some(371980))]),
        FakeAcquisition::new("sonarr").knowing(371980, "Severance"),
        FakeAcquisition::new("radarr"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.added(), 1);
    assert_eq!(h.sonarr.added().len(), 1);
    assert_eq!(
        h.store.completed(),
        vec![CompletedRequest {
            title: "Severance".to_string(),
            tags: vec!["TV".to_string()],
            classification: Classification::Tv,
            cross_ref_id: 371980,
        }]
    );
    assert_eq!(h.store.archived(), vec!["p1".to_string()]);
}

#[tokio::test]
async fn test_second_run_does_not_duplicate() {
    let h = harness(
        FakeStore::new().with_rows(vec![movie_row("p1", "The Matrix", Some(603))]),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix"),
    );

    h.poller.run_cycle().await.unwrap();
    let second = h.poller.run_cycle().await.unwrap();

    assert_eq!(second.rows_seen, 0);
    assert_eq!(h.store.completed().len(), 1);
    assert_eq!(h.radarr.added().len(), 1);
}

#[tokio::test]
async fn test_failed_lookup_leaves_row_pending() {
    let h = harness(
        FakeStore::new().with_rows(vec![tv_row("p1", "Severance", Some(371980))]),
        FakeAcquisition::new("sonarr").failing_lookup(),
        FakeAcquisition::new("radarr"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.outcome_for("p1"), Some(&RowOutcome::Skipped(SkipReason::NoMatch)));
    assert!(h.store.completed().is_empty());
    assert!(h.store.archived().is_empty());
}

#[tokio::test]
async fn test_unknown_item_is_no_match() {
    let h = harness(
        FakeStore::new().with_rows(vec![movie_row("p1", "Nothing", Some(42))]),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr"),
    );
    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.outcome_for("p1"), Some(&RowOutcome::Skipped(SkipReason::NoMatch)));
    assert_eq!(h.radarr.lookups(), vec![42]);
}

#[tokio::test]
async fn test_missing_fields_are_skipped() {
    let mut untitled = tv_row("p1", "", Some(1));
    untitled.title = Some("   ".to_string());
    let untagged = PendingRequest {
        tags: vec!["Anime".to_string()],
        ..tv_row("p2", "Frieren", Some(2))
    };
    let no_id = tv_row("p3", "Severance", None);
    // Only the id matching the tag counts
    let wrong_id = PendingRequest {
        tmdb_id: Some(95396),
        ..tv_row("p4", "Severance", None)
    };

    let h = harness(
        FakeStore::new().with_rows(vec![untitled, untagged, no_id, wrong_id]),
        FakeAcquisition::new("sonarr").knowing(1, "x").knowing(2, "y"),
        FakeAcquisition::new("radarr"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.outcome_for("p1"), Some(&RowOutcome::Skipped(SkipReason::MissingTitle)));
    assert_eq!(report.outcome_for("p2"), Some(&RowOutcome::Skipped(SkipReason::MissingClassification)));
    assert_eq!(report.outcome_for("p3"), Some(&RowOutcome::Skipped(SkipReason::MissingCrossRefId)));
    assert_eq!(report.outcome_for("p4"), Some(&RowOutcome::Skipped(SkipReason::MissingCrossRefId)));
    assert!(h.sonarr.lookups().is_empty());
}

#[tokio::test]
async fn test_rejected_add_is_failure() {
    let h = harness(
        FakeStore::new().with_rows(vec![movie_row("p1", "The Matrix", Some(603))]),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix").rejecting_add(),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.failed(), 1);
    assert!(matches!(report.outcome_for("p1"), Some(RowOutcome::Failed(msg)) if msg.contains("400")));
    assert!(h.store.completed().is_empty());
    assert!(h.store.archived().is_empty());
}

#[tokio::test]
async fn test_completed_write_failure_keeps_row() {
    let h = harness(
        FakeStore::new()
            .with_rows(vec![movie_row("p1", "The Matrix", Some(603))])
            .failing_completed(),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert!(matches!(report.outcome_for("p1"), Some(RowOutcome::Failed(_))));
    assert!(h.store.archived().is_empty());
}

#[tokio::test]
async fn test_tracked_item_is_recorded_without_adding() {
    let h = harness(
        FakeStore::new().with_rows(vec![tv_row("p1", "Severance", Some(371980))]),
        FakeAcquisition::new("sonarr").tracking(371980, "Severance").rejecting_add(),
        FakeAcquisition::new("radarr"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.outcome_for("p1"), Some(&RowOutcome::Added));
    assert!(h.sonarr.added().is_empty());
    assert_eq!(h.store.completed().len(), 1);
    assert_eq!(h.store.archived(), vec!["p1".to_string()]);
}

#[tokio::test]
async fn test_unrecorded_add_finishes_next_cycle() {
    let h = harness(
        FakeStore::new()
            .with_rows(vec![movie_row("p1", "The Matrix", Some(603))])
            .failing_completed_once(),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix"),
    );

    let first = h.poller.run_cycle().await.unwrap();
    assert!(matches!(first.outcome_for("p1"), Some(RowOutcome::Failed(msg)) if msg.starts_with("added to radarr")));
    assert!(h.store.archived().is_empty());

    let second = h.poller.run_cycle().await.unwrap();
    assert_eq!(second.outcome_for("p1"), Some(&RowOutcome::Added));
    assert_eq!(h.radarr.added().len(), 1);
    assert_eq!(h.store.completed().len(), 1);
    assert_eq!(h.store.archived(), vec!["p1".to_string()]);
}

#[tokio::test]
async fn test_archive_failure_is_reported() {
    let h = harness(
        FakeStore::new()
            .with_rows(vec![movie_row("p1", "The Matrix", Some(603))])
            .failing_archive(),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert!(matches!(report.outcome_for("p1"), Some(RowOutcome::Failed(msg)) if msg.starts_with("recorded but not archived")));
    assert_eq!(h.store.completed().len(), 1);
}

#[tokio::test]
async fn test_one_bad_row_does_not_stop_the_cycle() {
    let h = harness(
        FakeStore::new().with_rows(vec![
            tv_row("p1", "Severance", Some(371980)),
            movie_row("p2", "The Matrix", Some(603)),
        ]),
        FakeAcquisition::new("sonarr").failing_lookup(),
        FakeAcquisition::new("radarr").knowing(603, "The Matrix"),
    );

    let report = h.poller.run_cycle().await.unwrap();
    assert_eq!(report.skipped(), 1);
    assert_eq!(report.added(), 1);
    assert_eq!(h.store.archived(), vec!["p2".to_string()]);
}

#[tokio::test]
async fn test_list_failure_is_cycle_error() {
    let h = harness(
        FakeStore::new().failing_list(),
        FakeAcquisition::new("sonarr"),
        FakeAcquisition::new("radarr"),
    );
    let err = h.poller.run_cycle().await.unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to list requests"));
}
