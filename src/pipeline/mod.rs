//! Daily match-and-store job: fetch occurrences, decide native status, persist.

pub mod matcher;

pub use matcher::genus_species;

use crate::db::{DbActorHandle, StoreSummary};
use crate::gbif::OccurrenceSource;
use chrono::Utc;
use tracing::{error, info};

/// Runs one fetch/match/store pass.
///
/// Never fails the caller: a failing source or a rolled-back batch is logged and
/// reported as an empty summary. All rows of one run share one `fetch_date`.
pub async fn run_gbif_job(source: &dyn OccurrenceSource, db: &DbActorHandle) -> StoreSummary {
    info!("Starting GBIF data fetch job");

    let records = match source.fetch_occurrences().await {
        Ok(records) => records,
        Err(e) => {
            error!(error = %e, "GBIF data job failed before storing; nothing persisted");
            return StoreSummary::default();
        }
    };

    if records.is_empty() {
        info!("No species data retrieved from GBIF");
        return StoreSummary::default();
    }

    let fetched = records.len();
    let fetch_date = Utc::now();

    match db.store_observations(records, fetch_date).await {
        Ok(summary) => {
            info!(
                fetched,
                stored = summary.stored,
                skipped = summary.skipped,
                "Stored GBIF observations"
            );
            info!(
                native = summary.native,
                "Native plants found: {} ({:.1}%)",
                summary.native,
                summary.native_percent()
            );
            summary
        }
        Err(e) => {
            error!(error = %e, fetched, "GBIF data job failed; batch rolled back");
            StoreSummary::default()
        }
    }
}
