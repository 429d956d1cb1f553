use crate::server::router::SpeciesTrackState;
use axum::{Router, response::Html, routing::get};
use std::sync::LazyLock;

/// Sample species shown on the map page: (scientific name, common name).
pub const SAMPLE_SPECIES: &[(&str, &str)] = &[
    ("Quercus lobata", "Valley Oak"),
    ("Aesculus californica", "California Buckeye"),
    ("Arctostaphylos glauca", "Bigberry Manzanita"),
    ("Eschscholzia californica", "California Poppy"),
    ("Artemisia californica", "California Sagebrush"),
    ("Umbellularia californica", "California Bay"),
];

static MAP_PAGE: LazyLock<String> = LazyLock::new(render_map_page);

fn render_map_page() -> String {
    let items: String = SAMPLE_SPECIES
        .iter()
        .map(|(scientific, common)| {
            format!("      <li><em>{scientific}</em> &mdash; {common}</li>\n")
        })
        .collect();
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n    <meta charset=\"utf-8\">\n    <title>SpeciesTrack</title>\n</head>\n\
         <body>\n    <h1>Species observed near Wildcat Canyon</h1>\n    <ul>\n{items}    </ul>\n</body>\n\
         </html>\n"
    )
}

async fn index_handler() -> Html<&'static str> {
    Html("Hello World")
}

async fn map_handler() -> Html<&'static str> {
    Html(MAP_PAGE.as_str())
}

pub fn router() -> Router<SpeciesTrackState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/map", get(map_handler))
}
