//! FILENAME: app/src/client.rs
//! PURPOSE: Analytics HTTP client.
//! CONTEXT: One GET per (tab, date-range, bucket[, geo-level]). Relative
//! endpoint paths resolve against the configured base URL; a bearer token
//! is attached when configured; non-2xx responses surface as a typed error
//! carrying the response body.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use rollup_engine::{Bucket, SourceRow};

use crate::config::DashboardConfig;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analytics endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
}

// ============================================================================
// QUERY & RESPONSE
// ============================================================================

/// Server-side aggregation level for the geo tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeoLevel {
    Region,
    Department,
    City,
}

impl GeoLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoLevel::Region => "region",
            GeoLevel::Department => "department",
            GeoLevel::City => "city",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "region" => Ok(GeoLevel::Region),
            "department" => Ok(GeoLevel::Department),
            "city" => Ok(GeoLevel::City),
            other => Err(format!("unknown geo level: {other:?}")),
        }
    }
}

/// Parameters of one analytics fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsQuery {
    pub bucket: Bucket,
    pub date_from: String,
    pub date_to: String,
    pub geo_level: Option<GeoLevel>,
}

/// The analytics payload: the row window plus whatever pre-aggregated
/// extras the endpoint ships (`by_method`, `by_zone`, ...). Extras stay raw
/// JSON; the engines only ever re-aggregate `rows`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    #[serde(default)]
    pub rows: Vec<SourceRow>,
    #[serde(default)]
    pub summary: Option<serde_json::Value>,
    #[serde(flatten)]
    pub extras: HashMap<String, serde_json::Value>,
}

// ============================================================================
// CLIENT
// ============================================================================

/// Thin wrapper around reqwest bound to the configured base URL and token.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl AnalyticsClient {
    pub fn new(config: &DashboardConfig) -> Self {
        AnalyticsClient {
            http: reqwest::Client::new(),
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    /// Absolute URL for a relative endpoint path.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetches one tab's analytics window.
    pub async fn fetch_tab(
        &self,
        endpoint: &str,
        query: &AnalyticsQuery,
    ) -> Result<AnalyticsResponse, ApiError> {
        let mut request = self.http.get(self.endpoint_url(endpoint)).query(&[
            ("bucket", query.bucket.as_str()),
            ("date_from", query.date_from.as_str()),
            ("date_to", query.date_to.as_str()),
        ]);
        if let Some(level) = query.geo_level {
            request = request.query(&[("level", level.as_str())]);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}
