//! Where the viewer is.
//!
//! [`LocationSource`] plays the part of a device geolocation service: it can
//! report the current position and the state of the location permission.
//! Three sources ship with the crate:
//!
//! - [`FixedLocation`]: a known coordinate (map pick, CLI flags).
//! - [`NoLocation`]: location is unsupported or has been refused.
//! - [`HttpGeolocator`]: approximate position from an IP lookup endpoint.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use shopfinder_core::Coordinate;
use thiserror::Error;

/// Options for a single position lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    /// The lookup is abandoned with [`LocationError::Timeout`] after this long.
    pub timeout: Duration,
    /// Zero means a cached fix must not be reused.
    pub maximum_age: Duration,
}

impl PositionOptions {
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Self::default()
        }
    }
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            enable_high_accuracy: true,
            timeout: Duration::from_secs(10),
            maximum_age: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    Prompt,
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PermissionState::Granted => write!(f, "granted"),
            PermissionState::Denied => write!(f, "denied"),
            PermissionState::Prompt => write!(f, "prompt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("location lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("location is not supported on this device")]
    Unsupported,

    #[error("location unavailable: {0}")]
    Unavailable(String),
}

/// Source of the viewer's position and location permission.
pub trait LocationSource {
    /// Resolves the current position.
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send;

    /// Reports the location permission state without prompting.
    fn query_permission(
        &self,
    ) -> impl Future<Output = Result<PermissionState, LocationError>> + Send;
}

impl<T: LocationSource + Sync> LocationSource for &T {
    fn current_position(
        &self,
        options: &PositionOptions,
    ) -> impl Future<Output = Result<Coordinate, LocationError>> + Send {
        (**self).current_position(options)
    }

    fn query_permission(
        &self,
    ) -> impl Future<Output = Result<PermissionState, LocationError>> + Send {
        (**self).query_permission()
    }
}

/// A position known up front.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Coordinate);

impl LocationSource for FixedLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        Ok(self.0)
    }

    async fn query_permission(&self) -> Result<PermissionState, LocationError> {
        Ok(PermissionState::Granted)
    }
}

/// No position will ever be available.
#[derive(Debug, Clone, Copy)]
pub enum NoLocation {
    /// The viewer refused access; the permission reads as denied.
    Denied,
    /// The platform has no location service at all.
    Unsupported,
}

impl LocationSource for NoLocation {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        Err(match self {
            NoLocation::Denied => LocationError::PermissionDenied,
            NoLocation::Unsupported => LocationError::Unsupported,
        })
    }

    async fn query_permission(&self) -> Result<PermissionState, LocationError> {
        match self {
            NoLocation::Denied => Ok(PermissionState::Denied),
            NoLocation::Unsupported => Err(LocationError::Unsupported),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "lon", alias = "longitude")]
    lng: f64,
}

/// Approximate position from an HTTP endpoint answering
/// `{"lat": .., "lng": ..}` (`lon`, `latitude`, `longitude` also accepted).
pub struct HttpGeolocator {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpGeolocator {
    /// # Errors
    ///
    /// Returns [`LocationError::Unavailable`] if `url` does not parse or the
    /// HTTP client cannot be built.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, LocationError> {
        let url = reqwest::Url::parse(url).map_err(|e| {
            LocationError::Unavailable(format!("invalid geolocate URL '{url}': {e}"))
        })?;
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;
        Ok(Self { client, url })
    }
}

impl LocationSource for HttpGeolocator {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinate, LocationError> {
        tracing::debug!(url = %self.url, "looking up approximate position");

        let response = self
            .client
            .get(self.url.clone())
            .timeout(options.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LocationError::Timeout(options.timeout)
                } else {
                    LocationError::Unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocate endpoint returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(format!("malformed geolocate response: {e}")))?;

        Ok(Coordinate::new(body.lat, body.lng))
    }

    async fn query_permission(&self) -> Result<PermissionState, LocationError> {
        Ok(PermissionState::Granted)
    }
}
