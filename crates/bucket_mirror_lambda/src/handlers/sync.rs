use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::adapters::object_store::ObjectStore;
use crate::error::SyncError;
use crate::fanout::copy_page;
use crate::listing::PageCursor;
use crate::runtime::config::MirrorConfig;
use crate::runtime::contract::{SyncOutcome, SyncReport};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

impl ApiGatewayResponse {
    /// Decodes `body` back into the message string it carries.
    pub fn message(&self) -> Option<String> {
        serde_json::from_str(&self.body).ok()
    }
}

impl From<&SyncOutcome> for ApiGatewayResponse {
    fn from(outcome: &SyncOutcome) -> Self {
        Self {
            status_code: outcome.status_code(),
            headers: json!({"Content-Type": "application/json"}),
            body: Value::from(outcome.message()).to_string(),
        }
    }
}

/// Mirrors one source bucket into one destination bucket.
///
/// Listing goes through `source`, copies through `destination`; each handle
/// is configured for its own region by the caller.
pub struct BucketMirror {
    source: Arc<dyn ObjectStore>,
    destination: Arc<dyn ObjectStore>,
    source_bucket: String,
    destination_bucket: String,
}

impl BucketMirror {
    pub fn new(
        source: Arc<dyn ObjectStore>,
        destination: Arc<dyn ObjectStore>,
        source_bucket: impl Into<String>,
        destination_bucket: impl Into<String>,
    ) -> Self {
        Self {
            source,
            destination,
            source_bucket: source_bucket.into(),
            destination_bucket: destination_bucket.into(),
        }
    }

    pub fn from_config(
        config: &MirrorConfig,
        source: Arc<dyn ObjectStore>,
        destination: Arc<dyn ObjectStore>,
    ) -> Self {
        Self::new(
            source,
            destination,
            config.source_bucket.clone(),
            config.destination_bucket.clone(),
        )
    }

    /// Lists the source page by page and copies each page before listing the
    /// next. Per-object copy failures only show up in the report.
    pub async fn run(&self) -> Result<SyncOutcome, SyncError> {
        info!(
            component = "sync_handler",
            event = "sync_started",
            source_bucket = %self.source_bucket,
            destination_bucket = %self.destination_bucket,
            "Starting bucket sync"
        );

        let mut cursor = PageCursor::new(self.source.as_ref(), &self.source_bucket);
        let mut report = SyncReport::default();

        // An empty first page ends the run, whatever token it carries.
        let mut next = match cursor.next_page().await? {
            Some(page) if !page.is_empty() => Some(page),
            _ => {
                info!(
                    component = "sync_handler",
                    event = "nothing_to_sync",
                    source_bucket = %self.source_bucket,
                    "No objects found in the source bucket."
                );
                return Ok(SyncOutcome::NothingToSync);
            }
        };

        while let Some(page) = next {
            let copied = copy_page(
                self.destination.as_ref(),
                &self.source_bucket,
                &self.destination_bucket,
                &page,
            )
            .await;
            report.record_page(page.len(), &copied);

            info!(
                component = "sync_handler",
                event = "page_listed",
                page = report.pages_listed,
                objects = page.len(),
                copied = copied.succeeded,
                failed = copied.failures.len(),
                last = page.is_last(),
                "Copied page"
            );

            next = cursor.next_page().await?;
        }

        log_completion(&report);
        Ok(SyncOutcome::Completed(report))
    }

    /// Runs the sync and folds run-level errors into [`SyncOutcome::Failed`].
    pub async fn sync(&self) -> SyncOutcome {
        match self.run().await {
            Ok(outcome) => outcome,
            Err(sync_error) => {
                error!(
                    component = "sync_handler",
                    event = "sync_failed",
                    source_bucket = %self.source_bucket,
                    error = %sync_error,
                    "Error listing or copying objects"
                );
                SyncOutcome::Failed
            }
        }
    }
}

fn log_completion(report: &SyncReport) {
    if report.has_failures() {
        warn!(
            component = "sync_handler",
            event = "sync_completed",
            pages = report.pages_listed,
            objects = report.objects_listed,
            copied = report.copies_succeeded,
            failed = report.copies_failed,
            "Sync completed with {} failed copies",
            report.copies_failed
        );
    } else {
        info!(
            component = "sync_handler",
            event = "sync_completed",
            pages = report.pages_listed,
            objects = report.objects_listed,
            copied = report.copies_succeeded,
            "Sync completed successfully"
        );
    }
}

/// Lambda entry point. The triggering event carries no parameters and is
/// ignored.
pub async fn handle_sync_event(_event: Value, mirror: &BucketMirror) -> ApiGatewayResponse {
    ApiGatewayResponse::from(&mirror.sync().await)
}
