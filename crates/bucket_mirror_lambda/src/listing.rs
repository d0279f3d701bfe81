use tracing::debug;

use crate::adapters::object_store::ObjectStore;
use crate::error::SyncError;
use crate::runtime::contract::Page;

/// Walks a bucket listing one page at a time.
///
/// The cursor is single-use: after the last page (or the first error) every
/// call to [`PageCursor::next_page`] returns `Ok(None)` without contacting
/// the store.
pub struct PageCursor<'a> {
    store: &'a dyn ObjectStore,
    bucket: &'a str,
    continuation_token: Option<String>,
    pages_listed: usize,
    exhausted: bool,
}

impl<'a> PageCursor<'a> {
    pub fn new(store: &'a dyn ObjectStore, bucket: &'a str) -> Self {
        Self {
            store,
            bucket,
            continuation_token: None,
            pages_listed: 0,
            exhausted: false,
        }
    }

    #[cfg(test)]
    fn pages_listed(&self) -> usize {
        self.pages_listed
    }

    #[cfg(test)]
    fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub async fn next_page(&mut self) -> Result<Option<Page>, SyncError> {
        if self.exhausted {
            return Ok(None);
        }

        let sent_token = self.continuation_token.take();
        let page = match self.store.list_page(self.bucket, sent_token.as_deref()).await {
            Ok(page) => page,
            Err(error) => {
                self.exhausted = true;
                return Err(error.into());
            }
        };
        self.pages_listed += 1;

        match page.continuation() {
            Some(next) if sent_token.as_deref() == Some(next) => {
                self.exhausted = true;
                return Err(SyncError::StalledPagination {
                    token: next.to_string(),
                });
            }
            Some(next) => self.continuation_token = Some(next.to_string()),
            None => self.exhausted = true,
        }

        debug!(
            bucket = self.bucket,
            page = self.pages_listed,
            objects = page.len(),
            last = self.exhausted,
            "listed page"
        );
        Ok(Some(page))
    }
}
