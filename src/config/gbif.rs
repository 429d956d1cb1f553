use crate::geometry::WILDCAT_CANYON_WKT;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use url::Url;

/// Page size requested from the occurrence search; the largest GBIF accepts.
pub const GBIF_PAGE_LIMIT: u32 = 300;

/// Highest offset GBIF serves for occurrence search paging.
pub const GBIF_MAX_OFFSET: u32 = 100_000;

/// GBIF occurrence search settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GbifConfig {
    /// Occurrence search endpoint.
    /// TOML: `gbif.api_url`. Env: `GBIF_API_URL`.
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// Basic-auth user name.
    /// TOML: `gbif.username`. Env: `GBIF_USERNAME`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub username: String,

    /// Basic-auth password.
    /// TOML: `gbif.password`. Env: `GBIF_PASSWORD`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub password: String,

    /// Dataset the search is restricted to.
    /// TOML: `gbif.dataset_key`. Env: `DATASET_KEY`.
    #[serde(default, deserialize_with = "deserialize_string_lax")]
    pub dataset_key: String,

    /// TOML: `gbif.state_province`. Default: `California`.
    #[serde(default = "default_state_province")]
    pub state_province: String,

    /// WKT polygon scoping the search. Default: Wildcat Canyon Regional Park.
    #[serde(default = "default_geometry")]
    pub geometry: String,

    /// Fixed observation year; the current local year when unset.
    #[serde(default)]
    pub year: Option<i32>,

    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default = "default_max_offset")]
    pub max_offset: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Optional upstream HTTP proxy.
    #[serde(default)]
    pub proxy: Option<Url>,
}

impl Default for GbifConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            username: String::new(),
            password: String::new(),
            dataset_key: String::new(),
            state_province: default_state_province(),
            geometry: default_geometry(),
            year: None,
            page_limit: default_page_limit(),
            max_offset: default_max_offset(),
            request_timeout_secs: default_request_timeout_secs(),
            proxy: None,
        }
    }
}

fn deserialize_string_lax<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    match v {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(serde::de::Error::custom(
            "expected a string or a number for a gbif credential field",
        )),
    }
}

fn default_api_url() -> Url {
    Url::parse("https://api.gbif.org/v1/occurrence/search").expect("valid GBIF occurrence URL")
}

fn default_state_province() -> String {
    "California".to_string()
}

fn default_geometry() -> String {
    WILDCAT_CANYON_WKT.to_string()
}

fn default_page_limit() -> u32 {
    GBIF_PAGE_LIMIT
}

fn default_max_offset() -> u32 {
    GBIF_MAX_OFFSET
}

fn default_request_timeout_secs() -> u64 {
    30
}
