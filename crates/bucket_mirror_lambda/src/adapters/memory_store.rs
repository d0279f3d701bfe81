//! In-process [`ObjectStore`] used by tests and local dry runs.
//!
//! One instance can hold several buckets, so the same store can be handed to
//! a mirror as both its source and destination handle. Listing and copy
//! failures can be injected per call or per key.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use percent_encoding::percent_decode_str;

use crate::adapters::object_store::ObjectStore;
use crate::error::StoreError;
use crate::runtime::contract::{ObjectDescriptor, Page};

pub const DEFAULT_PAGE_SIZE: usize = 1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest {
    pub copy_source: String,
    pub destination_bucket: String,
    pub destination_key: String,
}

#[derive(Debug, Default)]
struct StoreState {
    buckets: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    failing_copy_keys: BTreeSet<String>,
    failing_list_call: Option<usize>,
    list_tokens: Vec<Option<String>>,
    copy_requests: Vec<CopyRequest>,
}

#[derive(Debug)]
pub struct InMemoryObjectStore {
    page_size: usize,
    state: Mutex<StoreState>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl InMemoryObjectStore {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            state: Mutex::new(StoreState::default()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn create_bucket(&self, bucket: &str) {
        self.state()
            .buckets
            .entry(bucket.to_string())
            .or_default();
    }

    /// Stores `body` under `key`, creating the bucket if needed.
    pub fn put_object(&self, bucket: &str, key: &str, body: impl Into<Vec<u8>>) {
        self.state()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), body.into());
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.state()
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key).cloned())
    }

    pub fn contents(&self, bucket: &str) -> BTreeMap<String, Vec<u8>> {
        self.state()
            .buckets
            .get(bucket)
            .cloned()
            .unwrap_or_default()
    }

    /// Makes every copy of `key` (the unencoded source key) fail.
    pub fn fail_copies_of(&self, key: &str) {
        self.state().failing_copy_keys.insert(key.to_string());
    }

    /// Makes the listing call with zero-based index `call` fail.
    pub fn fail_list_call(&self, call: usize) {
        self.state().failing_list_call = Some(call);
    }

    /// Continuation tokens received by each listing call, in call order.
    pub fn list_tokens(&self) -> Vec<Option<String>> {
        self.state().list_tokens.clone()
    }

    pub fn list_calls(&self) -> usize {
        self.state().list_tokens.len()
    }

    pub fn copy_requests(&self) -> Vec<CopyRequest> {
        self.state().copy_requests.clone()
    }

    /// Highest number of copies observed in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn apply_copy(
        &self,
        copy_source: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> Result<(), StoreError> {
        let copy_error = |message: String| StoreError::Copy {
            copy_source: copy_source.to_string(),
            message,
        };

        let mut state = self.state();
        state.copy_requests.push(CopyRequest {
            copy_source: copy_source.to_string(),
            destination_bucket: destination_bucket.to_string(),
            destination_key: destination_key.to_string(),
        });

        let (source_bucket, encoded_key) = copy_source
            .split_once('/')
            .ok_or_else(|| copy_error("copy source must be bucket/key".to_string()))?;
        let source_key = percent_decode_str(encoded_key)
            .decode_utf8()
            .map_err(|error| copy_error(format!("copy source key is not valid UTF-8: {error}")))?
            .into_owned();

        if state.failing_copy_keys.contains(&source_key) {
            return Err(copy_error("injected copy failure".to_string()));
        }

        let body = state
            .buckets
            .get(source_bucket)
            .ok_or_else(|| copy_error(format!("NoSuchBucket: {source_bucket}")))?
            .get(&source_key)
            .cloned()
            .ok_or_else(|| copy_error(format!("NoSuchKey: {source_key}")))?;

        state
            .buckets
            .get_mut(destination_bucket)
            .ok_or_else(|| copy_error(format!("NoSuchBucket: {destination_bucket}")))?
            .insert(destination_key.to_string(), body);
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn list_page(
        &self,
        bucket: &str,
        continuation_token: Option<&str>,
    ) -> Result<Page, StoreError> {
        let mut state = self.state();
        let call = state.list_tokens.len();
        state
            .list_tokens
            .push(continuation_token.map(str::to_string));

        if state.failing_list_call == Some(call) {
            return Err(StoreError::List {
                bucket: bucket.to_string(),
                message: "injected listing failure".to_string(),
            });
        }

        let objects = state.buckets.get(bucket).ok_or_else(|| StoreError::List {
            bucket: bucket.to_string(),
            message: "NoSuchBucket".to_string(),
        })?;

        let lower = match continuation_token {
            Some(token) => Bound::Excluded(token),
            None => Bound::Unbounded,
        };
        let mut keys = objects
            .range::<str, _>((lower, Bound::Unbounded))
            .map(|(key, _)| key.clone());

        let page_keys: Vec<String> = keys.by_ref().take(self.page_size).collect();
        let next_continuation_token = match keys.next() {
            Some(_) => page_keys.last().cloned(),
            None => None,
        };

        Ok(Page::new(
            page_keys.into_iter().map(ObjectDescriptor::new).collect(),
            next_continuation_token,
        ))
    }

    async fn copy_object(
        &self,
        copy_source: &str,
        destination_bucket: &str,
        destination_key: &str,
    ) -> Result<(), StoreError> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        // Let sibling copies start before this one settles.
        tokio::task::yield_now().await;

        let result = self.apply_copy(copy_source, destination_bucket, destination_key);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
