//! GBIF occurrence search: paging client and the records it yields.

mod client;
mod types;

pub use client::GbifClient;
pub use types::{GbifOccurrence, OccurrencePage, OccurrenceRecord};

use crate::error::SpeciesTrackError;
use async_trait::async_trait;

/// Anything that can produce a batch of occurrence records for one job run.
#[async_trait]
pub trait OccurrenceSource: Send + Sync {
    async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>, SpeciesTrackError>;
}
