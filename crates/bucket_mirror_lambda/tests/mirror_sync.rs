use std::sync::Arc;
use std::time::Duration;

use bucket_mirror_lambda::adapters::memory_store::InMemoryObjectStore;
use bucket_mirror_lambda::handlers::sync::{handle_sync_event, ApiGatewayResponse, BucketMirror};
use bucket_mirror_lambda::runtime::config::MirrorConfig;
use bucket_mirror_lambda::runtime::contract::{
    NO_OBJECTS_MESSAGE, SYNC_COMPLETED_MESSAGE, SYNC_FAILED_MESSAGE,
};
use serde_json::json;

const SOURCE: &str = "verified-prod-eu-central1";
const DESTINATION: &str = "backup-prod-eu-central1";

fn seeded_store(page_size: usize, object_count: usize) -> Arc<InMemoryObjectStore> {
    let store = Arc::new(InMemoryObjectStore::new(page_size));
    store.create_bucket(SOURCE);
    store.create_bucket(DESTINATION);
    for index in 0..object_count {
        let key = format!("uploads/{index:04}.bin");
        store.put_object(SOURCE, &key, format!("body-{index}"));
    }
    store
}

fn mirror_over(store: &Arc<InMemoryObjectStore>) -> BucketMirror {
    BucketMirror::from_config(&MirrorConfig::default(), store.clone(), store.clone())
}

async fn invoke(mirror: &BucketMirror) -> ApiGatewayResponse {
    tokio::time::timeout(Duration::from_secs(5), handle_sync_event(json!({}), mirror))
        .await
        .expect("sync should not hang")
}

#[tokio::test]
async fn empty_source_reports_nothing_to_sync() {
    let store = seeded_store(10, 0);

    let response = invoke(&mirror_over(&store)).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.message().as_deref(), Some(NO_OBJECTS_MESSAGE));
    assert!(store.copy_requests().is_empty());
    assert_eq!(store.list_calls(), 1);
}

#[tokio::test]
async fn copies_every_object_across_pages() {
    let store = seeded_store(4, 10);

    let response = invoke(&mirror_over(&store)).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.message().as_deref(), Some(SYNC_COMPLETED_MESSAGE));
    assert_eq!(store.list_calls(), 3);
    assert_eq!(store.copy_requests().len(), 10);
    assert_eq!(store.contents(DESTINATION), store.contents(SOURCE));
}

#[tokio::test]
async fn page_size_multiple_needs_no_extra_listing() {
    let store = seeded_store(5, 10);

    invoke(&mirror_over(&store)).await;

    assert_eq!(store.list_calls(), 2);
    assert_eq!(store.copy_requests().len(), 10);
}

#[tokio::test]
async fn encodes_copy_source_but_not_destination_key() {
    let store = seeded_store(10, 0);
    store.put_object(SOURCE, "a b+c.txt", "spaced");
    store.put_object(SOURCE, "nested/dir/report (final).pdf", "nested");

    let response = invoke(&mirror_over(&store)).await;
    assert_eq!(response.status_code, 200);

    let mut requests = store.copy_requests();
    requests.sort_by(|left, right| left.destination_key.cmp(&right.destination_key));
    assert_eq!(requests[0].copy_source, format!("{SOURCE}/a%20b%2Bc.txt"));
    assert_eq!(requests[0].destination_key, "a b+c.txt");
    assert_eq!(
        requests[1].copy_source,
        format!("{SOURCE}/nested%2Fdir%2Freport%20(final).pdf")
    );
    assert_eq!(requests[1].destination_key, "nested/dir/report (final).pdf");
    assert!(requests
        .iter()
        .all(|request| request.destination_bucket == DESTINATION));

    assert_eq!(
        store.object(DESTINATION, "a b+c.txt"),
        Some(b"spaced".to_vec())
    );
}

#[tokio::test]
async fn second_run_leaves_destination_unchanged() {
    let store = seeded_store(3, 7);
    let mirror = mirror_over(&store);

    invoke(&mirror).await;
    let after_first = store.contents(DESTINATION);
    let response = invoke(&mirror).await;

    assert_eq!(response.message().as_deref(), Some(SYNC_COMPLETED_MESSAGE));
    assert_eq!(store.contents(DESTINATION), after_first);
    assert_eq!(store.copy_requests().len(), 14);
}

#[tokio::test]
async fn overwrites_stale_destination_objects() {
    let store = seeded_store(10, 2);
    store.put_object(DESTINATION, "uploads/0000.bin", "stale");
    store.put_object(DESTINATION, "only-in-destination", "kept");

    invoke(&mirror_over(&store)).await;

    assert_eq!(
        store.object(DESTINATION, "uploads/0000.bin"),
        Some(b"body-0".to_vec())
    );
    assert_eq!(
        store.object(DESTINATION, "only-in-destination"),
        Some(b"kept".to_vec())
    );
}

#[tokio::test]
async fn single_copy_failure_still_reports_success() {
    let store = seeded_store(5, 5);
    store.fail_copies_of("uploads/0002.bin");

    let response = invoke(&mirror_over(&store)).await;

    assert_eq!(response.status_code, 200);
    assert_eq!(response.message().as_deref(), Some(SYNC_COMPLETED_MESSAGE));

    let destination = store.contents(DESTINATION);
    assert_eq!(destination.len(), 4);
    assert!(!destination.contains_key("uploads/0002.bin"));
}

#[tokio::test]
async fn listing_failure_stops_the_run() {
    let store = seeded_store(2, 6);
    store.fail_list_call(1);

    let response = invoke(&mirror_over(&store)).await;

    assert_eq!(response.status_code, 500);
    assert_eq!(response.message().as_deref(), Some(SYNC_FAILED_MESSAGE));
    assert_eq!(store.list_calls(), 2);
    assert_eq!(store.copy_requests().len(), 2);
    assert_eq!(store.contents(DESTINATION).len(), 2);
}

#[tokio::test]
async fn first_listing_failure_copies_nothing() {
    let store = seeded_store(2, 6);
    store.fail_list_call(0);

    let response = invoke(&mirror_over(&store)).await;

    assert_eq!(response.status_code, 500);
    assert!(store.copy_requests().is_empty());
}

#[tokio::test]
async fn copies_within_a_page_run_together_and_pages_do_not_overlap() {
    let store = seeded_store(4, 10);

    invoke(&mirror_over(&store)).await;

    assert_eq!(store.max_in_flight(), 4);
}

#[tokio::test]
async fn continuation_tokens_follow_listing_order() {
    let store = seeded_store(2, 5);

    invoke(&mirror_over(&store)).await;

    assert_eq!(
        store.list_tokens(),
        vec![
            None,
            Some("uploads/0001.bin".to_string()),
            Some("uploads/0003.bin".to_string()),
        ]
    );
}
