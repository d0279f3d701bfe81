use futures::future::join_all;
use tracing::{error, info};

use crate::adapters::object_store::ObjectStore;
use crate::runtime::contract::{CopyFailure, Page, PageCopyReport};
use crate::runtime::copy_source::copy_source_reference;

/// Copies every object of `page` into `destination_bucket` under its
/// original key.
///
/// All copies are in flight at once and the call returns only after each
/// one has settled. A failed copy is logged and tallied; it never cancels
/// its siblings or fails the page.
pub async fn copy_page(
    destination: &dyn ObjectStore,
    source_bucket: &str,
    destination_bucket: &str,
    page: &Page,
) -> PageCopyReport {
    let copies = page
        .objects
        .iter()
        .map(|object| copy_object(destination, source_bucket, destination_bucket, &object.key));

    let mut report = PageCopyReport::default();
    for result in join_all(copies).await {
        match result {
            Ok(()) => report.succeeded += 1,
            Err(failure) => report.failures.push(failure),
        }
    }
    report
}

async fn copy_object(
    destination: &dyn ObjectStore,
    source_bucket: &str,
    destination_bucket: &str,
    key: &str,
) -> Result<(), CopyFailure> {
    if key.is_empty() {
        let reason = "object key is empty".to_string();
        error!(
            component = "fanout_copier",
            event = "copy_failed",
            key,
            reason = %reason,
            "Failed to copy object with empty key"
        );
        return Err(CopyFailure {
            key: String::new(),
            reason,
        });
    }

    let copy_source = copy_source_reference(source_bucket, key);
    match destination
        .copy_object(&copy_source, destination_bucket, key)
        .await
    {
        Ok(()) => {
            info!(
                component = "fanout_copier",
                event = "object_copied",
                key,
                destination_bucket,
                "Successfully copied {key} to {destination_bucket}"
            );
            Ok(())
        }
        Err(copy_error) => {
            error!(
                component = "fanout_copier",
                event = "copy_failed",
                key,
                copy_source = %copy_source,
                error = %copy_error,
                "Failed to copy {key}"
            );
            Err(CopyFailure {
                key: key.to_string(),
                reason: copy_error.to_string(),
            })
        }
    }
}
