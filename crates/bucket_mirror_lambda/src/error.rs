use thiserror::Error;

/// Failure reported by an object store adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("failed to list objects in bucket '{bucket}': {message}")]
    List { bucket: String, message: String },

    #[error("failed to copy '{copy_source}': {message}")]
    Copy { copy_source: String, message: String },
}

/// Run-level failure. Every variant aborts the sync.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Listing(#[from] StoreError),

    #[error("continuation token '{token}' did not advance the listing")]
    StalledPagination { token: String },
}
