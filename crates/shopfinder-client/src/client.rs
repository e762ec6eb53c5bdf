//! HTTP client for the marketplace shops API.
//!
//! Wraps `reqwest` with envelope checking and typed shop deserialization.
//! Calls are single-shot: failures are returned to the caller as
//! [`ClientError`] and never retried here.

use std::time::Duration;

use reqwest::{Client, Url};
use shopfinder_core::{AppConfig, Coordinate, Shop};

use crate::error::ClientError;
use crate::types::ApiEnvelope;

const ALL_SHOPS_PATH: &str = "api/shops";
const SHOPS_NEAR_PATH: &str = "api/shops/coordinates";

/// Which shops endpoint to call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShopQuery {
    /// `GET /api/shops`
    All,
    /// `GET /api/shops/coordinates?lat=..&lng=..`
    Near(Coordinate),
}

impl std::fmt::Display for ShopQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShopQuery::All => write!(f, "all shops"),
            ShopQuery::Near(c) => write!(f, "shops near {c}"),
        }
    }
}

/// Client for the marketplace shops endpoints.
///
/// Use [`ShopsClient::new`] with the backend origin, or
/// [`ShopsClient::from_config`] to pick up timeout and user agent from
/// [`AppConfig`]. Tests point it at a wiremock server.
pub struct ShopsClient {
    client: Client,
    base_url: Url,
}

impl ShopsClient {
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends to any path prefix
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// # Errors
    ///
    /// See [`ShopsClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetches the complete shop list.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ClientError::Api`] when the envelope reports `success: false`.
    /// - [`ClientError::Deserialize`] if the body is not a valid envelope.
    pub async fn fetch_all_shops(&self) -> Result<Vec<Shop>, ClientError> {
        let url = self.build_url(ALL_SHOPS_PATH, &[])?;
        self.request_shops(url).await
    }

    /// Fetches shops the backend considers near `coord`. Radius and ranking
    /// are decided server-side.
    ///
    /// # Errors
    ///
    /// Same as [`ShopsClient::fetch_all_shops`].
    pub async fn fetch_shops_near(&self, coord: Coordinate) -> Result<Vec<Shop>, ClientError> {
        let lat = coord.lat.to_string();
        let lng = coord.lng.to_string();
        let url = self.build_url(SHOPS_NEAR_PATH, &[("lat", &lat), ("lng", &lng)])?;
        self.request_shops(url).await
    }

    /// Dispatches to the endpoint selected by `query`.
    ///
    /// # Errors
    ///
    /// Same as [`ShopsClient::fetch_all_shops`].
    pub async fn fetch(&self, query: ShopQuery) -> Result<Vec<Shop>, ClientError> {
        match query {
            ShopQuery::All => self.fetch_all_shops().await,
            ShopQuery::Near(coord) => self.fetch_shops_near(coord).await,
        }
    }

    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends a GET, checks the HTTP status and the `success` flag, and parses
    /// `data` as a shop list.
    ///
    /// Individual records that fail to deserialize are skipped with a warning
    /// rather than failing the whole list.
    async fn request_shops(&self, url: Url) -> Result<Vec<Shop>, ClientError> {
        tracing::debug!(url = %url, "requesting shops");

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let envelope: ApiEnvelope<Vec<serde_json::Value>> =
            serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if !envelope.success {
            return Err(ClientError::Api(envelope.failure_message()));
        }

        let raw = envelope.data.unwrap_or_default();
        let total = raw.len();
        let shops: Vec<Shop> = raw
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<Shop>(v) {
                Ok(shop) => Some(shop),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "skipping malformed shop record");
                    None
                }
            })
            .collect();

        tracing::debug!(url = %url, total, parsed = shops.len(), "shops received");
        Ok(shops)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
