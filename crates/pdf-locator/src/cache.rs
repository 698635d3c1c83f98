//! Read-through resolution cache
//!
//! Results are a pure function of the immutable index, so entries never go
//! stale. The cache lives exactly as long as the index it borrows.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shared_types::{PageRect, Result};
use tracing::trace;

use crate::resolver::{CoordinateResolver, Locate};
use crate::text_index::TextIndex;

type SpanKey = (usize, usize);

/// [`CoordinateResolver`] with memoized results, shareable across threads
#[derive(Debug)]
pub struct CachedResolver<'a> {
    resolver: CoordinateResolver<'a>,
    entries: RwLock<HashMap<SpanKey, Arc<[PageRect]>>>,
}

impl<'a> CachedResolver<'a> {
    pub fn new(index: &'a TextIndex) -> Self {
        Self {
            resolver: CoordinateResolver::new(index),
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn index(&self) -> &'a TextIndex {
        self.resolver.index()
    }

    /// Number of memoized spans
    pub fn len(&self) -> usize {
        match self.entries.read() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        match self.entries.write() {
            Ok(mut entries) => entries.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    fn cached(&self, key: SpanKey) -> Option<Arc<[PageRect]>> {
        // A poisoned lock only means another reader panicked; entries are still valid
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(poisoned) => poisoned.into_inner(),
        };
        entries.get(&key).cloned()
    }
}

impl Locate for CachedResolver<'_> {
    fn locate(&self, start: usize, end: usize) -> Result<Vec<PageRect>> {
        let key = (start, end);
        if let Some(hit) = self.cached(key) {
            trace!(start, end, "Resolution cache hit");
            return Ok(hit.to_vec());
        }

        trace!(start, end, "Resolution cache miss");
        // Errors are not cached; they are cheap to recompute and must stay visible
        let rects = self.resolver.locate(start, end)?;

        let shared: Arc<[PageRect]> = Arc::from(rects.as_slice());
        match self.entries.write() {
            Ok(mut entries) => {
                entries.entry(key).or_insert(shared);
            }
            Err(poisoned) => {
                poisoned.into_inner().entry(key).or_insert(shared);
            }
        }

        Ok(rects)
    }
}
