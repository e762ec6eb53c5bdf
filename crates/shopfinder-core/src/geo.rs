//! Coordinates and great-circle distance.
//!
//! Distances are haversine on a spherical Earth (R = 6371 km). Good to a few
//! tenths of a percent, which is plenty for "how far is this shop" badges.

use serde::{Deserialize, Serialize};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Movement below this distance is treated as GPS jitter (50 meters).
pub const DEFAULT_MOVEMENT_THRESHOLD_KM: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    /// `(0, 0)` stands for "no real location yet".
    pub const UNSET: Coordinate = Coordinate { lat: 0.0, lng: 0.0 };

    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `false` for the `(0, 0)` sentinel.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.lat != 0.0 || self.lng != 0.0
    }

    #[must_use]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::UNSET
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

/// Haversine distance in kilometers between two lat/lng pairs given in degrees.
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Suppresses repeat fetches while the viewer stays within `threshold_km` of
/// the coordinate the last fetch was made for.
///
/// Only the fetch orchestration writes to the gate (via [`Self::mark_fetched`]);
/// [`Self::should_fetch`] is a pure read.
#[derive(Debug, Clone)]
pub struct MovementGate {
    last_fetched: Option<Coordinate>,
    threshold_km: f64,
}

impl MovementGate {
    #[must_use]
    pub fn new(threshold_km: f64) -> Self {
        Self {
            last_fetched: None,
            threshold_km,
        }
    }

    /// `true` when no fetch has happened yet or `candidate` is strictly
    /// farther than the threshold from the last fetched coordinate.
    #[must_use]
    pub fn should_fetch(&self, candidate: Coordinate) -> bool {
        match self.last_fetched {
            None => true,
            Some(last) => last.distance_to(&candidate) > self.threshold_km,
        }
    }

    pub fn mark_fetched(&mut self, coord: Coordinate) {
        self.last_fetched = Some(coord);
    }

    #[must_use]
    pub fn last_fetched(&self) -> Option<Coordinate> {
        self.last_fetched
    }

    #[must_use]
    pub fn threshold_km(&self) -> f64 {
        self.threshold_km
    }
}

impl Default for MovementGate {
    fn default() -> Self {
        Self::new(DEFAULT_MOVEMENT_THRESHOLD_KM)
    }
}
