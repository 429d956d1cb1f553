use super::extract::NativePlantsFilter;
use crate::db::DbObservation;
use crate::error::SpeciesTrackError;
use crate::server::router::SpeciesTrackState;
use axum::{Json, extract::State};
use tracing::debug;

pub(super) async fn native_plants_handler(
    State(state): State<SpeciesTrackState>,
    NativePlantsFilter(filter): NativePlantsFilter,
) -> Result<Json<Vec<DbObservation>>, SpeciesTrackError> {
    let rows = state.db.list_native_observations(filter).await?;
    debug!(count = rows.len(), "Serving native plant observations");
    Ok(Json(rows))
}
