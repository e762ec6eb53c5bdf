use std::future::Future;

use shopfinder_client::{ClientError, ShopQuery, ShopsClient};
use shopfinder_core::Shop;

/// Anything that can answer a [`ShopQuery`].
pub trait ShopSource {
    fn fetch_shops(
        &self,
        query: ShopQuery,
    ) -> impl Future<Output = Result<Vec<Shop>, ClientError>> + Send;
}

impl ShopSource for ShopsClient {
    async fn fetch_shops(&self, query: ShopQuery) -> Result<Vec<Shop>, ClientError> {
        self.fetch(query).await
    }
}

impl<T: ShopSource + Sync> ShopSource for &T {
    fn fetch_shops(
        &self,
        query: ShopQuery,
    ) -> impl Future<Output = Result<Vec<Shop>, ClientError>> + Send {
        (**self).fetch_shops(query)
    }
}
