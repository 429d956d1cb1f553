use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum SpeciesTrackError {
    #[error("Upstream error with status: {0}")]
    UpstreamStatus(StatusCode),

    #[error("HTTP request error: {0}")]
    ReqwestError(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Invalid query parameter `{param}`: {message}")]
    InvalidQuery { param: &'static str, message: String },

    #[error("Occurrence record has a blank scientific name")]
    BlankScientificName,

    #[error("Scheduler error: {0}")]
    SchedulerError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<tokio_cron_scheduler::JobSchedulerError> for SpeciesTrackError {
    fn from(e: tokio_cron_scheduler::JobSchedulerError) -> Self {
        SpeciesTrackError::SchedulerError(e.to_string())
    }
}

impl IntoResponse for SpeciesTrackError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            SpeciesTrackError::InvalidQuery { param, message } => {
                let status = StatusCode::BAD_REQUEST;
                let body = ApiErrorObject {
                    code: "INVALID_QUERY".to_string(),
                    message: format!("Invalid `{param}`: {message}"),
                    details: None,
                };
                (status, body)
            }

            SpeciesTrackError::UpstreamStatus(_)
            | SpeciesTrackError::ReqwestError(_)
            | SpeciesTrackError::JsonError(_)
            | SpeciesTrackError::UrlError(_) => {
                let status = StatusCode::BAD_GATEWAY;
                let body = ApiErrorObject {
                    code: "UPSTREAM_ERROR".to_string(),
                    message: "Upstream service error.".to_string(),
                    details: None,
                };
                (status, body)
            }

            SpeciesTrackError::DatabaseError(_)
            | SpeciesTrackError::RactorError(_)
            | SpeciesTrackError::SchedulerError(_)
            | SpeciesTrackError::UnexpectedError(_)
            | SpeciesTrackError::IoError(_)
            | SpeciesTrackError::BlankScientificName => {
                let status = StatusCode::INTERNAL_SERVER_ERROR;
                let body = ApiErrorObject {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                    details: None,
                };
                (status, body)
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn invalid_query_maps_to_bad_request_with_error_object() {
        let err = SpeciesTrackError::InvalidQuery {
            param: "start_time",
            message: "not a timestamp".to_string(),
        };
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let json: Value = serde_json::from_slice(&body).expect("body was not json");
        assert_eq!(json["error"]["code"], "INVALID_QUERY");
        assert_eq!(
            json["error"]["message"],
            "Invalid `start_time`: not a timestamp"
        );
    }

    #[tokio::test]
    async fn database_errors_do_not_leak_details() {
        let resp = SpeciesTrackError::DatabaseError(sqlx::Error::RowNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
