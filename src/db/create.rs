use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One reference row for the bulk native-plant import.
///
/// Upserted by `botanical_name`; every other attribute is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NativePlantCreate {
    pub botanical_name: String,
    pub common_name: Option<String>,
    pub other_names: Option<String>,
    pub alternative_common_names: Option<String>,
    pub obsolete_names: Option<String>,
    pub plant_type: Option<String>,
    pub form: Option<String>,
    #[serde(deserialize_with = "deserialize_flag_lax")]
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
}

impl NativePlantCreate {
    pub fn new(botanical_name: impl Into<String>, common_name: Option<&str>) -> Self {
        Self {
            botanical_name: botanical_name.into(),
            common_name: common_name.map(str::to_string),
            ..Default::default()
        }
    }
}

/// Spreadsheet exports spell booleans as `Y`, `Yes`, `TRUE`, `1`, `T`, ...
fn deserialize_flag_lax<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64().is_some_and(|f| f != 0.0)),
        Value::String(s) => Ok(matches!(
            s.trim().to_ascii_uppercase().as_str(),
            "Y" | "YES" | "TRUE" | "1" | "T"
        )),
        Value::Null => Ok(false),
        _ => Err(serde::de::Error::custom(
            "expected a boolean, number or string for is_cultivar",
        )),
    }
}

/// Filters for the native observation listing. All bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationFilter {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    /// Case-insensitive substring of the copied common name.
    pub common_name: Option<String>,
    /// Case-insensitive substring of the GBIF scientific name.
    pub scientific_name: Option<String>,
}

/// Outcome of one match-and-store batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreSummary {
    pub stored: usize,
    pub native: usize,
    pub skipped: usize,
}

impl StoreSummary {
    pub fn native_percent(&self) -> f64 {
        if self.stored == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = self.native as f64 / self.stored as f64 * 100.0;
        pct
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}
