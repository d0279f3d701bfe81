use serde::{Deserialize, Serialize};

pub const NO_OBJECTS_MESSAGE: &str = "No objects to sync.";
pub const SYNC_COMPLETED_MESSAGE: &str = "Sync completed successfully.";
pub const SYNC_FAILED_MESSAGE: &str = "Error occurred during sync.";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub key: String,
}

impl ObjectDescriptor {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// One batch of listing results.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub objects: Vec<ObjectDescriptor>,
    pub next_continuation_token: Option<String>,
}

impl Page {
    pub fn new(objects: Vec<ObjectDescriptor>, next_continuation_token: Option<String>) -> Self {
        Self {
            objects,
            next_continuation_token,
        }
    }

    pub fn last(objects: Vec<ObjectDescriptor>) -> Self {
        Self::new(objects, None)
    }

    /// Token to send for the following page, if any. An empty token ends
    /// the listing the same way an absent one does.
    pub fn continuation(&self) -> Option<&str> {
        self.next_continuation_token
            .as_deref()
            .filter(|token| !token.is_empty())
    }

    pub fn is_last(&self) -> bool {
        self.continuation().is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CopyFailure {
    pub key: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageCopyReport {
    pub succeeded: usize,
    pub failures: Vec<CopyFailure>,
}

impl PageCopyReport {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failures.len()
    }
}

/// Running totals for one invocation. Only logged; the response payload does
/// not carry them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncReport {
    pub pages_listed: usize,
    pub objects_listed: usize,
    pub copies_succeeded: usize,
    pub copies_failed: usize,
}

impl SyncReport {
    pub fn record_page(&mut self, listed: usize, copied: &PageCopyReport) {
        self.pages_listed += 1;
        self.objects_listed += listed;
        self.copies_succeeded += copied.succeeded;
        self.copies_failed += copied.failures.len();
    }

    pub fn has_failures(&self) -> bool {
        self.copies_failed > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingToSync,
    Completed(SyncReport),
    Failed,
}

impl SyncOutcome {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NothingToSync | Self::Completed(_) => 200,
            Self::Failed => 500,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::NothingToSync => NO_OBJECTS_MESSAGE,
            Self::Completed(_) => SYNC_COMPLETED_MESSAGE,
            Self::Failed => SYNC_FAILED_MESSAGE,
        }
    }
}
