//! Marketplace shop records as returned by the shops API.
//!
//! ## Parsing defaults
//!
//! The backend is loose about optional fields, so defaults are applied here,
//! once, at deserialization time:
//!
//! - `categories` may be missing or `null`; both become an empty list.
//! - `location` may be missing, `null`, or carry only one of `lat`/`lng`; all
//!   of these become `None` (distance unknown).
//! - `createdAt` is kept only when it is a valid RFC 3339 timestamp.
//!
//! `distance_km` is never read from or written to the wire. It is attached
//! client-side by [`annotate_distances`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::geo::Coordinate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "deserialize_location")]
    pub location: Option<Coordinate>,
    #[serde(default, deserialize_with = "deserialize_categories")]
    pub categories: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// Kilometers from the viewer. `None` means unknown, never zero.
    #[serde(skip)]
    pub distance_km: Option<f64>,
}

impl Shop {
    /// A bare shop with only identity and name populated.
    #[must_use]
    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            address: None,
            city: None,
            state: None,
            zip_code: None,
            country: None,
            location: None,
            categories: Vec::new(),
            created_at: None,
            distance_km: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    /// Single-line postal address built from whichever parts are present.
    #[must_use]
    pub fn display_address(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.address.as_deref(),
            self.city.as_deref(),
            self.state.as_deref(),
            self.zip_code.as_deref(),
            self.country.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Recompute `distance_km` for every shop against `origin`.
///
/// Distances are only attached when both `origin` and the shop location are
/// real coordinates; everything else is reset to `None`.
pub fn annotate_distances(shops: &mut [Shop], origin: Coordinate) {
    for shop in shops.iter_mut() {
        shop.distance_km = match shop.location {
            Some(location) if origin.is_set() && location.is_set() => {
                Some(origin.distance_to(&location))
            }
            _ => None,
        };
    }
}

/// Unique categories across `shops`, in first-seen order.
#[must_use]
pub fn collect_categories(shops: &[Shop]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for category in shops.iter().flat_map(|s| s.categories.iter()) {
        if seen.insert(category.as_str()) {
            out.push(category.clone());
        }
    }
    out
}

#[derive(Deserialize)]
struct RawLocation {
    lat: Option<f64>,
    lng: Option<f64>,
}

fn deserialize_location<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawLocation>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| match (r.lat, r.lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
        _ => None,
    }))
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

#[cfg(test)]
#[path = "shops_test.rs"]
mod tests;
