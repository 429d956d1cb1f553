mod speciestrack;

pub use speciestrack::{ApiErrorBody, ApiErrorObject, SpeciesTrackError};
