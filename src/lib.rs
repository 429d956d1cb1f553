pub mod config;
pub mod db;
pub mod error;
pub mod gbif;
pub mod geometry;
pub mod pipeline;
pub mod scheduler;
pub mod server;
pub mod utils;

pub use error::SpeciesTrackError;
pub use gbif::{GbifClient, OccurrenceRecord, OccurrenceSource};
pub use pipeline::run_gbif_job;
