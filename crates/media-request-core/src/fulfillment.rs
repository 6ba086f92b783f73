//! Background loop that hands confirmed requests to Sonarr/Radarr.
//!
//! Each cycle lists every row of the active store and handles them one at a
//! time. A row that is accepted by its acquisition service is copied to the
//! completed store and archived; anything else leaves the row untouched so
//! the next cycle sees it again.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use media_request_models::{Classification, CompletedRequest, PendingRequest};
use media_request_sources::{AcquisitionService, RequestStore, Services};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};

/// Pause between the end of one cycle and the start of the next
pub const POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Not confirmed, or already added
    NotEligible,
    MissingTitle,
    MissingClassification,
    /// No TVDB/TMDB id for the row's classification
    MissingCrossRefId,
    /// The acquisition service did not find the item (or the lookup failed)
    NoMatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum RowOutcome {
    Added,
    Skipped(SkipReason),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowReport {
    pub page_id: String,
    pub title: Option<String>,
    #[serde(flatten)]
    pub outcome: RowOutcome,
}

/// Everything one cycle did
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub rows_seen: usize,
    pub rows: Vec<RowReport>,
}

impl CycleReport {
    pub fn added(&self) -> usize {
        self.rows.iter().filter(|r| r.outcome == RowOutcome::Added).count()
    }

    pub fn skipped(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(r.outcome, RowOutcome::Failed(_)))
            .count()
    }

    pub fn outcome_for(&self, page_id: &str) -> Option<&RowOutcome> {
        self.rows.iter().find(|r| r.page_id == page_id).map(|r| &r.outcome)
    }
}

pub struct FulfillmentPoller {
    store: Arc<dyn RequestStore>,
    sonarr: Arc<dyn AcquisitionService>,
    radarr: Arc<dyn AcquisitionService>,
}

impl FulfillmentPoller {
    pub fn new(
        store: Arc<dyn RequestStore>,
        sonarr: Arc<dyn AcquisitionService>,
        radarr: Arc<dyn AcquisitionService>,
    ) -> Self {
        Self { store, sonarr, radarr }
    }

    pub fn from_services(services: &Services) -> Self {
        Self::new(services.store.clone(), services.sonarr.clone(), services.radarr.clone())
    }

    fn service_for(&self, classification: Classification) -> &dyn AcquisitionService {
        match classification {
            Classification::Tv => self.sonarr.as_ref(),
            Classification::Movie => self.radarr.as_ref(),
        }
    }

    /// One pass over the active store. Only a failure to list the rows is an
    /// error; per-row problems are recorded in the report.
    #[instrument(skip(self), name = "poll_cycle")]
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let started_at = Utc::now();
        let rows = self
            .store
            .list_requests()
            .await
            .context("Failed to list requests")?;
        info!(operation = "poll_query", rows = rows.len(), "Fetched request rows");

        let mut report = CycleReport {
            started_at,
            rows_seen: rows.len(),
            rows: Vec::with_capacity(rows.len()),
        };
        for row in rows {
            let outcome = self.process_row(&row).await;
            report.rows.push(RowReport {
                page_id: row.page_id,
                title: row.title,
                outcome,
            });
        }

        info!(
            operation = "poll_cycle",
            rows_seen = report.rows_seen,
            added = report.added(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Poll cycle finished"
        );
        Ok(report)
    }

    async fn process_row(&self, row: &PendingRequest) -> RowOutcome {
        if !row.is_eligible() {
            debug!(page_id = %row.page_id, confirmed = row.confirmed, added = row.added, "Row not eligible");
            return RowOutcome::Skipped(SkipReason::NotEligible);
        }
        let Some(title) = row.display_title() else {
            info!(page_id = %row.page_id, "Skipping row without a title");
            return RowOutcome::Skipped(SkipReason::MissingTitle);
        };
        let Some(classification) = row.classification() else {
            info!(page_id = %row.page_id, title, tags = ?row.tags, "Skipping row without a TV/Movie tag");
            return RowOutcome::Skipped(SkipReason::MissingClassification);
        };
        let Some(cross_ref_id) = row.cross_ref_id(classification) else {
            info!(
                page_id = %row.page_id,
                title,
                catalog = classification.cross_ref_catalog(),
                "Skipping row without a cross-reference id"
            );
            return RowOutcome::Skipped(SkipReason::MissingCrossRefId);
        };

        let service = self.service_for(classification);
        let item = match service.lookup(cross_ref_id).await {
            Ok(Some(item)) => item,
            Ok(None) => {
                info!(service = service.service_name(), title, cross_ref_id, "No lookup match");
                return RowOutcome::Skipped(SkipReason::NoMatch);
            }
            Err(e) => {
                warn!(service = service.service_name(), title, cross_ref_id, error = %e, "Lookup failed");
                return RowOutcome::Skipped(SkipReason::NoMatch);
            }
        };

        // An earlier cycle may have added it without finishing the bookkeeping
        if let Some(library_id) = item.library_id() {
            info!(
                service = service.service_name(),
                title,
                library_id,
                "Already tracked, recording as added"
            );
        } else if let Err(e) = service.add(&item).await {
            error!(operation = "add", service = service.service_name(), title, error = %e, "Add rejected");
            return RowOutcome::Failed(e.to_string());
        }

        let completed = CompletedRequest {
            title: title.to_string(),
            tags: row.tags.clone(),
            classification,
            cross_ref_id,
        };
        if let Err(e) = self.store.create_completed(&completed).await {
            error!(page_id = %row.page_id, title, error = %e, "Could not record completed request");
            return RowOutcome::Failed(format!("added to {} but not recorded: {}", service.service_name(), e));
        }
        if let Err(e) = self.store.archive_request(&row.page_id).await {
            error!(page_id = %row.page_id, title, error = %e, "Could not archive request");
            return RowOutcome::Failed(format!("recorded but not archived: {}", e));
        }

        info!(
            operation = "fulfilled",
            service = service.service_name(),
            title,
            cross_ref_id,
            "Request fulfilled"
        );
        RowOutcome::Added
    }

    /// Poll forever with a fixed pause between cycles; errors never end the
    /// loop
    pub async fn run_forever(&self) {
        info!(
            operation = "poller_started",
            interval_secs = POLL_INTERVAL.as_secs(),
            "Fulfillment poller started"
        );
        loop {
            if let Err(e) = self.run_cycle().await {
                error!(operation = "poll_cycle_error", error = %format!("{:#}", e), "Poll cycle failed");
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

#[cfg(test)]
mod tests;
