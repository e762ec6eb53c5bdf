pub mod app_config;
pub mod config;
pub mod filter;
pub mod geo;
pub mod shops;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use filter::{format_distance, ShopFilter, SortOrder};
pub use geo::{distance_km, Coordinate, MovementGate, DEFAULT_MOVEMENT_THRESHOLD_KM};
pub use shops::{annotate_distances, collect_categories, Shop};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
