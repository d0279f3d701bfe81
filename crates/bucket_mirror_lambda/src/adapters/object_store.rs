use async_trait::async_trait;

use crate::error::StoreError;
use crate::runtime::contract::Page;

/// Remote key/value object store capability consumed by a sync run.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Lists the page of `bucket` that follows `continuation_token`, or the
    /// first page when no token is given.
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<Page, StoreError>;

    /// Copies the object named by `copy_source` (`bucket/encoded-key`) to
    /// `destination_key` in `destination_bucket`, overwriting any existing
    /// object under that key.
    async fn copy_object(
        &self,
        copy_source: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> Result<(), StoreError>;
}
