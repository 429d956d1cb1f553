use crate::server::router::SpeciesTrackState;
use axum::{Router, routing::get};

pub mod extract;
pub mod handlers;

pub fn router() -> Router<SpeciesTrackState> {
    Router::new().route("/native-plants", get(handlers::native_plants_handler))
}
