use super::OccurrenceSource;
use super::types::{OccurrencePage, OccurrenceRecord};
use crate::config::GbifConfig;
use crate::error::SpeciesTrackError;
use crate::utils::logging::debug_pretty_json;
use async_trait::async_trait;
use chrono::{Datelike, Local};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tracing::{debug, error, info, warn};

/// Characters of a failed response body kept for logs.
const UPSTREAM_BODY_PREVIEW_CHARS: usize = 512;

const GBIF_USER_AGENT: &str = concat!("speciestrack/", env!("CARGO_PKG_VERSION"));

/// Paginating client for the GBIF occurrence search.
#[derive(Clone)]
pub struct GbifClient {
    http: reqwest::Client,
    cfg: Arc<GbifConfig>,
}

impl GbifClient {
    pub fn new(cfg: GbifConfig) -> Result<Self, SpeciesTrackError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(GBIF_USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(cfg.request_timeout_secs.max(1)));

        if let Some(proxy_url) = cfg.proxy.as_ref() {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url.as_str())?);
        }

        Ok(Self {
            http: builder.build()?,
            cfg: Arc::new(cfg),
        })
    }

    fn page_limit(&self) -> u32 {
        self.cfg.page_limit.max(1)
    }

    /// Year the search is pinned to: the configured one, else the current local year.
    pub fn query_year(&self) -> i32 {
        self.cfg.year.unwrap_or_else(|| Local::now().year())
    }

    fn page_params(&self, offset: u32) -> Vec<(&'static str, String)> {
        vec![
            ("dataset_key", self.cfg.dataset_key.clone()),
            ("has_coordinate", "true".to_string()),
            ("has_geospatial_issue", "false".to_string()),
            ("state_province", self.cfg.state_province.clone()),
            ("advanced", "1".to_string()),
            ("year", self.query_year().to_string()),
            ("geometry", self.cfg.geometry.clone()),
            ("limit", self.page_limit().to_string()),
            ("offset", offset.to_string()),
        ]
    }

    pub fn build_page_request(&self, offset: u32) -> Result<reqwest::Request, reqwest::Error> {
        let params = self.page_params(offset);
        debug_pretty_json(
            "GBIF page query",
            &params.iter().cloned().collect::<BTreeMap<_, _>>(),
        );

        let mut req = self.http.get(self.cfg.api_url.clone()).query(&params);
        if !self.cfg.username.is_empty() {
            req = req.basic_auth(&self.cfg.username, Some(&self.cfg.password));
        }
        req.build()
    }

    /// Fetches one page. Non-success statuses come back as `UpstreamStatus`.
    pub async fn fetch_page(&self, offset: u32) -> Result<OccurrencePage, SpeciesTrackError> {
        let req = self.build_page_request(offset)?;
        let resp = self.http.execute(req).await?;

        let status = resp.status();
        if !status.is_success() {
            let body_preview = match resp.text().await {
                Ok(text) => format!("{:.len$}", text, len = UPSTREAM_BODY_PREVIEW_CHARS),
                Err(e) => format!("<failed to read body: {e}>"),
            };
            warn!(%status, offset, body = %body_preview, "GBIF returned a non-success status");
            return Err(SpeciesTrackError::UpstreamStatus(status));
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Walks every page until a short page, an error status, a request failure
    /// or the offset ceiling. Never fails: whatever was collected is returned.
    pub async fn fetch_all_pages(&self) -> Vec<OccurrenceRecord> {
        let limit = self.page_limit();
        let max_offset = self.cfg.max_offset;
        let mut records: Vec<OccurrenceRecord> = Vec::new();
        let mut offset: u32 = 0;

        info!(limit, max_offset, "Starting GBIF pagination");

        while offset <= max_offset {
            debug!(offset, "Fetching GBIF page");

            let page = match self.fetch_page(offset).await {
                Ok(page) => page,
                Err(SpeciesTrackError::UpstreamStatus(status)) => {
                    warn!(%status, offset, "Stopping pagination on upstream status");
                    break;
                }
                Err(e) => {
                    error!(error = %e, offset, "GBIF request failed; keeping partial results");
                    break;
                }
            };

            if page.results.is_empty() {
                info!(offset, "No more results; pagination complete");
                break;
            }

            let page_len = page.results.len();
            let (total, end_of_records) = (page.count, page.end_of_records);
            let before = records.len();
            records.extend(
                page.results
                    .into_iter()
                    .filter_map(OccurrenceRecord::from_occurrence),
            );
            info!(
                offset,
                received = page_len,
                accepted = records.len() - before,
                total = ?total,
                end_of_records = ?end_of_records,
                "Fetched GBIF page"
            );

            if page_len < limit as usize {
                info!(
                    received = page_len,
                    limit, "Short page; pagination complete"
                );
                break;
            }

            offset = match offset.checked_add(limit) {
                Some(next) => next,
                None => break,
            };
        }

        info!(total = records.len(), "GBIF pagination finished");
        records
    }
}

#[async_trait]
impl OccurrenceSource for GbifClient {
    async fn fetch_occurrences(&self) -> Result<Vec<OccurrenceRecord>, SpeciesTrackError> {
        Ok(self.fetch_all_pages().await)
    }
}
