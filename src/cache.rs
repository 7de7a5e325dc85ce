//! Memoization of loaded tables for the lifetime of a session.
//!
//! Loading is the only I/O in the crate and dashboards re-run it on every interaction.
//! [`TableCache`] keeps one normalized table per (resolved path, encoding) and hands out
//! shared [`Arc`] handles. Entries live until [`TableCache::clear`] is called.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::LoadResult;
use crate::ingestion::{LoadOptions, load, resolve_path};
use crate::types::CongestionTable;

type CacheKey = (PathBuf, String);

/// Cache of normalized tables keyed by resolved input path and encoding label.
#[derive(Default)]
pub struct TableCache {
    tables: Mutex<HashMap<CacheKey, Arc<CongestionTable>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Immutable snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl fmt::Display for CacheStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hits={}, misses={}, entries={}", self.hits, self.misses, self.entries)
    }
}

impl fmt::Debug for TableCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableCache").field("stats", &self.stats()).finish()
    }
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `options`, loading (and caching) it on first use.
    ///
    /// The cache lock is held while loading, so concurrent misses on the same input load it
    /// once. Failed loads are not cached, so a later call retries.
    pub fn get_or_load(&self, options: &LoadOptions) -> LoadResult<Arc<CongestionTable>> {
        let path = resolve_path(options)?;
        let key = (path.clone(), options.encoding.clone());

        let mut tables = self.lock();
        if let Some(table) = tables.get(&key) {
            self.hits.fetch_add(1, Ordering::SeqCst);
            return Ok(Arc::clone(table));
        }

        self.misses.fetch_add(1, Ordering::SeqCst);
        let resolved = LoadOptions {
            path: Some(path),
            ..options.clone()
        };
        let table = Arc::new(load(&resolved)?);
        tables.insert(key, Arc::clone(&table));
        Ok(table)
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::SeqCst),
            misses: self.misses.load(Ordering::SeqCst),
            entries: self.lock().len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, Arc<CongestionTable>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
