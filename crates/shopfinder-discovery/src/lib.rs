pub mod controller;
pub mod location;
pub mod source;
pub mod view;

pub use controller::{
    select_query, DiscoveryController, DiscoveryMode, DiscoveryOptions, EnableOutcome,
    LocationStatus, PendingFetch,
};
pub use location::{
    FixedLocation, HttpGeolocator, LocationError, LocationSource, NoLocation, PermissionState,
    PositionOptions,
};
pub use source::ShopSource;
pub use view::{DiscoveryView, LocationNotice, ShopCard};
