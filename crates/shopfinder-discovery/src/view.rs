//! Render-ready snapshot of the discovery screen.

use serde::Serialize;
use shopfinder_core::{format_distance, Shop};

use crate::controller::DiscoveryMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationNotice {
    /// First lookup failed or was refused.
    Denied,
    /// Permission is denied at the system level; retrying cannot help.
    Blocked,
    /// The platform cannot report permission state.
    Unsupported,
}

impl LocationNotice {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            LocationNotice::Denied => {
                "Location access denied. Showing all shops instead of shops near you."
            }
            LocationNotice::Blocked => {
                concat!(
                    "Location access is blocked. Allow location for this app in your ",
                    "browser or system settings, then try again."
                )
            }
            LocationNotice::Unsupported => "Location is not supported on this device.",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopCard {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub categories: Vec<String>,
    /// Present only when the distance is known.
    pub distance_badge: Option<String>,
}

impl From<&Shop> for ShopCard {
    fn from(shop: &Shop) -> Self {
        Self {
            id: shop.id.clone(),
            name: shop.name.clone(),
            city: shop.city.clone(),
            address: shop.display_address(),
            categories: shop.categories.clone(),
            distance_badge: shop.distance_km.map(format_distance),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryView {
    #[serde(serialize_with = "serialize_mode")]
    pub mode: DiscoveryMode,
    pub location_available: bool,
    pub show_enable_location: bool,
    pub notice: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub show_retry: bool,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub search_term: String,
    /// Fetched shops before filtering.
    pub total_count: usize,
    pub shops: Vec<ShopCard>,
}

fn serialize_mode<S>(mode: &DiscoveryMode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(mode)
}
