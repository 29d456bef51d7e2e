//! TimeCamp activity API client
//!
//! Implements [`ActivityFetcher`] over `GET {base}/activity?date=YYYY-MM-DD`.
//! One attempt per call: retry policy, if any, belongs to the caller.

use std::time::Duration;

use async_trait::async_trait;
use daytrace_core::ActivityFetcher;
use daytrace_domain::{parse_activities, Activity, ApiConfig, DaytraceError, Result};
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use tracing::{debug, info, instrument, warn};

use crate::http::HttpClient;

/// Client for the TimeCamp third-party API.
#[derive(Debug, Clone)]
pub struct ActivityApiClient {
    http: HttpClient,
    base_url: String,
}

impl ActivityApiClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be created
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .user_agent(concat!("daytrace/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http_client(http, &config.base_url))
    }

    /// Use an existing HTTP client against `base_url`.
    pub fn with_http_client(http: HttpClient, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    /// API root with any trailing slash removed.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the activities recorded on `date`.
    ///
    /// `api_token` is sent verbatim as a bearer credential.
    ///
    /// # Errors
    ///
    /// - [`DaytraceError::Remote`] with status and body for non-2xx answers
    /// - [`DaytraceError::Network`] when the request could not complete
    /// - [`DaytraceError::Internal`] when the body is not an activity list
    #[instrument(skip(self, api_token))]
    pub async fn get_activities(&self, date: &str, api_token: &str) -> Result<Vec<Activity>> {
        let url = format!("{}/activity", self.base_url);
        debug!(url = %url, "GET request");

        let request = self
            .http
            .request(Method::GET, &url)
            .query(&[("date", date)])
            .header(AUTHORIZATION, format!("Bearer {api_token}"));

        let response = self.http.send(request).await?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DaytraceError::Network(format!("failed to read response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "activity request rejected");
            return Err(DaytraceError::Remote { status: status.as_u16(), body });
        }

        let activities = parse_body(&body)?;
        info!(count = activities.len(), "GET request successful");
        Ok(activities)
    }
}

/// Decode a success body. An empty body is an empty day.
fn parse_body(body: &str) -> Result<Vec<Activity>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value = serde_json::from_str(body)
        .map_err(|e| DaytraceError::Internal(format!("Failed to parse response: {e}")))?;
    parse_activities(value)
}

#[async_trait]
impl ActivityFetcher for ActivityApiClient {
    async fn fetch_day(&self, date: &str, api_token: &str) -> Result<Vec<Activity>> {
        self.get_activities(date, api_token).await
    }
}
