use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::debug;

use crate::adapters::object_store::ObjectStore;
use crate::error::StoreError;
use crate::runtime::contract::{ObjectDescriptor, Page};

/// [`ObjectStore`] backed by one regional S3 client.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    max_keys: Option<i32>,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_keys: None,
        }
    }

    /// Builds a client for `region` from the default credential chain.
    /// A custom endpoint switches the client to path-style addressing.
    pub async fn connect(region: &str, endpoint_url: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(endpoint) = endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let shared_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()))
    }

    pub fn with_max_keys(mut self, max_keys: Option<u16>) -> Self {
        self.max_keys = max_keys.map(i32::from);
        self
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<Page, StoreError> {
        let response = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_continuation_token(continuation_token.map(str::to_string))
            .set_max_keys(self.max_keys)
            .send()
            .await
            .map_err(|error| StoreError::List {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&error).to_string(),
            })?;

        let objects: Vec<ObjectDescriptor> = response
            .contents()
            .iter()
            .filter_map(|object| object.key())
            .map(ObjectDescriptor::new)
            .collect();

        debug!(
            bucket,
            objects = objects.len(),
            truncated = response.is_truncated().unwrap_or(false),
            "listed s3 page"
        );

        Ok(Page::new(
            objects,
            response.next_continuation_token().map(str::to_string),
        ))
    }

    async fn copy_object(
        &self,
        copy_source: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> Result<(), StoreError> {
        self.client
            .copy_object()
            .copy_source(copy_source)
            .bucket(destination_bucket)
            .key(destination_key)
            .send()
            .await
            .map(|_| ())
            .map_err(|error| StoreError::Copy {
                copy_source: copy_source.to_string(),
                message: DisplayErrorContext(&error).to_string(),
            })
    }
}
