pub mod client;
pub mod error;
pub mod types;

pub use client::{ShopQuery, ShopsClient};
pub use error::ClientError;
pub use types::ApiEnvelope;
