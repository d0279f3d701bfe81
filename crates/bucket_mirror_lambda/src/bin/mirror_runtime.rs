use std::sync::Arc;

use bucket_mirror_lambda::adapters::s3_store::S3ObjectStore;
use bucket_mirror_lambda::handlers::sync::{handle_sync_event, ApiGatewayResponse, BucketMirror};
use bucket_mirror_lambda::logging::init_logging;
use bucket_mirror_lambda::runtime::config::MirrorConfig;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::info;

async fn handle_request(
    event: LambdaEvent<Value>,
    mirror: &BucketMirror,
) -> Result<ApiGatewayResponse, Error> {
    Ok(handle_sync_event(event.payload, mirror).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_logging()?;

    let config = MirrorConfig::from_env()
        .map_err(|error| Error::from(format!("invalid mirror configuration: {error}")))?;

    let endpoint_url = config.endpoint_url.as_deref();
    let source = S3ObjectStore::connect(&config.source_region, endpoint_url)
        .await
        .with_max_keys(config.list_page_size);
    let destination = S3ObjectStore::connect(&config.destination_region, endpoint_url).await;

    info!(
        component = "runtime",
        event = "runtime_configured",
        source_bucket = %config.source_bucket,
        source_region = %config.source_region,
        destination_bucket = %config.destination_bucket,
        destination_region = %config.destination_region,
        "Configured bucket mirror"
    );

    let mirror = Arc::new(BucketMirror::from_config(
        &config,
        Arc::new(source),
        Arc::new(destination),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let mirror = Arc::clone(&mirror);
        async move { handle_request(event, &mirror).await }
    }))
    .await
}
