use serde::{Deserialize, Serialize};

/// One page of `GET /occurrence/search`.
///
/// Only `results` drives pagination; `count` and `end_of_records` are logged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrencePage {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub end_of_records: Option<bool>,
    #[serde(default)]
    pub results: Vec<GbifOccurrence>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GbifOccurrence {
    #[serde(default)]
    pub key: Option<u64>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub decimal_latitude: Option<f64>,
    #[serde(default)]
    pub decimal_longitude: Option<f64>,
}

/// A fetched occurrence flattened for the match-and-store pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccurrenceRecord {
    pub name: String,
    #[serde(rename = "type", default)]
    pub observation_type: String,
    #[serde(default = "default_count")]
    pub count: i64,
    #[serde(default)]
    pub occurrence_id: Option<String>,
    #[serde(default)]
    pub decimal_latitude: Option<f64>,
    #[serde(default)]
    pub decimal_longitude: Option<f64>,
}

fn default_count() -> i64 {
    1
}

impl OccurrenceRecord {
    /// A single observation of `name` with no type or location.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            observation_type: String::new(),
            count: default_count(),
            occurrence_id: None,
            decimal_latitude: None,
            decimal_longitude: None,
        }
    }

    /// Drops occurrences without a (non-empty) scientific name.
    pub fn from_occurrence(occurrence: GbifOccurrence) -> Option<Self> {
        let name = occurrence.scientific_name.filter(|n| !n.is_empty())?;
        Some(Self {
            occurrence_id: occurrence.key.map(|k| k.to_string()),
            decimal_latitude: occurrence.decimal_latitude,
            decimal_longitude: occurrence.decimal_longitude,
            ..Self::named(name)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_tolerates_sparse_results() {
        let page: OccurrencePage = serde_json::from_str(
            r#"{
                "offset": 0,
                "limit": 300,
                "endOfRecords": true,
                "count": 1234,
                "results": [
                    {"key": 4055379494, "scientificName": "Quercus lobata Née", "decimalLatitude": 37.9187, "decimalLongitude": -122.3244},
                    {"commonName": "No scientific name"},
                    {}
                ]
            }"#,
        )
        .expect("page should parse");

        assert_eq!(page.results.len(), 3);
        assert_eq!(page.end_of_records, Some(true));
        assert_eq!(page.count, Some(1234));

        let records: Vec<OccurrenceRecord> = page
            .results
            .into_iter()
            .filter_map(OccurrenceRecord::from_occurrence)
            .collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Quercus lobata Née");
        assert_eq!(records[0].occurrence_id.as_deref(), Some("4055379494"));
        assert_eq!(records[0].count, 1);
        assert_eq!(records[0].observation_type, "");
        assert_eq!(records[0].decimal_latitude, Some(37.9187));
    }

    #[test]
    fn empty_names_are_dropped() {
        let occurrence = GbifOccurrence {
            scientific_name: Some(String::new()),
            ..Default::default()
        };
        assert!(OccurrenceRecord::from_occurrence(occurrence).is_none());
    }
}
