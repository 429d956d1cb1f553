use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbNativePlant {
    pub id: i64,
    pub botanical_name: String,
    pub common_name: Option<String>,
    pub other_names: Option<String>,
    pub alternative_common_names: Option<String>,
    pub obsolete_names: Option<String>,
    pub plant_type: Option<String>,
    pub form: Option<String>,
    pub is_cultivar: bool,
    pub rarity: Option<String>,
    pub butterflies_and_moths_supported: Option<String>,
    pub attracts_wildlife: Option<String>,
    pub height: Option<String>,
    pub width: Option<String>,
    pub height_min: Option<f64>,
    pub height_max: Option<f64>,
    pub width_min: Option<f64>,
    pub width_max: Option<f64>,
    pub growth_rate: Option<String>,
    pub seasonality: Option<String>,
    pub flower_color: Option<String>,
    pub flowering_season: Option<String>,
    pub fragrance: Option<String>,
    pub sun: Option<String>,
    pub soil_drainage: Option<String>,
    pub water_requirement: Option<String>,
    pub summer_irrigation: Option<String>,
    pub ease_of_care: Option<String>,
    pub soil: Option<String>,
    pub soil_texture: Option<String>,
    pub soil_ph: Option<String>,
    pub soil_toxicity: Option<String>,
    pub mulch: Option<String>,
    pub site_type: Option<String>,
    pub elevation_min: Option<i64>,
    pub elevation_max: Option<i64>,
    pub rainfall_min: Option<f64>,
    pub rainfall_max: Option<f64>,
    pub hardiness: Option<String>,
    pub sunset_zones: Option<String>,
    pub communities_simplified: Option<String>,
    pub communities: Option<String>,
    pub nursery_availability: Option<String>,
    pub companions: Option<String>,
    pub special_uses: Option<String>,
    pub tips: Option<String>,
    pub pests: Option<String>,
    pub propagation: Option<String>,
    pub jepson_link: Option<String>,
    pub plant_url: Option<String>,
    pub qr_codes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The slice of a native plant row the matcher needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct NativePlantMatch {
    pub id: i64,
    pub botanical_name: String,
    pub common_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct DbObservation {
    pub id: i64,
    /// As returned by GBIF, possibly including the taxonomic authority.
    pub scientific_name: String,
    /// Copied from the matched native plant at store time.
    pub common_name: Option<String>,
    pub occurrence_id: Option<String>,
    pub observation_count: i64,
    pub observation_type: String,
    pub native: bool,
    pub decimal_latitude: Option<f64>,
    pub decimal_longitude: Option<f64>,
    pub fetch_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
