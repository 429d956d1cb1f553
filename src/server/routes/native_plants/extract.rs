use crate::db::ObservationFilter;
use crate::error::SpeciesTrackError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
struct NativePlantsQuery {
    start_time: Option<String>,
    end_time: Option<String>,
    common_name: Option<String>,
    scientific_name: Option<String>,
}

/// Query-string filters for `GET /native-plants`.
pub(crate) struct NativePlantsFilter(pub(crate) ObservationFilter);

impl<S> FromRequestParts<S> for NativePlantsFilter
where
    S: Send + Sync,
{
    type Rejection = SpeciesTrackError;

    /// Empty parameters are ignored. Timestamps accept RFC 3339 or a naive
    /// ISO-8601 date/datetime (taken as UTC); anything else is a 400.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<NativePlantsQuery>::try_from_uri(&parts.uri).map_err(|e| {
            SpeciesTrackError::InvalidQuery {
                param: "query",
                message: e.body_text(),
            }
        })?;

        let filter = ObservationFilter {
            start_time: non_empty(query.start_time)
                .map(|raw| parse_timestamp("start_time", &raw))
                .transpose()?,
            end_time: non_empty(query.end_time)
                .map(|raw| parse_timestamp("end_time", &raw))
                .transpose()?,
            common_name: non_empty(query.common_name),
            scientific_name: non_empty(query.scientific_name),
        };

        debug!(?filter, "Extracted native plants filter");
        Ok(Self(filter))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub(crate) fn parse_timestamp(
    param: &'static str,
    raw: &str,
) -> Result<DateTime<Utc>, SpeciesTrackError> {
    let raw = raw.trim();
    // An unencoded `+hh:mm` offset arrives as a space.
    try_parse_timestamp(raw)
        .or_else(|| try_parse_timestamp(&raw.replace(' ', "+")))
        .ok_or_else(|| SpeciesTrackError::InvalidQuery {
            param,
            message: format!("`{raw}` is not an ISO-8601 timestamp"),
        })
}

fn try_parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
