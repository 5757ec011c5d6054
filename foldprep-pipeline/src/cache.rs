//! Per-sequence memoization of search results.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use serde::Serialize;
use tracing::debug;

use crate::errors::{PipelineError, Result};

///
/// Cache key: a sequence together with the full set of search configs applied
/// to it, rendered as canonical JSON so that float tunables compare by value.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    sequence: String,
    configs: String,
}

impl CacheKey {
    pub fn new<C: Serialize>(sequence: &str, configs: &C) -> Result<Self> {
        let configs = serde_json::to_string(configs)
            .map_err(|e| PipelineError::InvalidArgument(format!("unserializable search config: {}", e)))?;
        Ok(Self {
            sequence: sequence.to_string(),
            configs,
        })
    }

    pub fn sequence(&self) -> &str {
        &self.sequence
    }
}

type Slot<V> = Arc<OnceLock<Result<Arc<V>>>>;

///
/// Memoizes one computation per key for the lifetime of the cache.
///
/// Concurrent requests for the same key are single-flight: the first caller
/// computes, later callers block until that result is ready and share it,
/// including a failure. Different keys compute in parallel.
///
#[derive(Debug)]
pub struct SequenceCache<V> {
    entries: Mutex<HashMap<CacheKey, Slot<V>>>,
}

impl<V> Default for SequenceCache<V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<V> SequenceCache<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Result<Arc<V>>
    where
        F: FnOnce() -> Result<V>,
    {
        // the map lock is only held to find the slot, never while computing
        let slot = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(entries.entry(key.clone()).or_default())
        };

        let mut computed = false;
        let result = slot.get_or_init(|| {
            computed = true;
            compute().map(Arc::new)
        });
        if !computed {
            debug!("Cache hit for sequence of length {}", key.sequence().len());
        }
        result.clone()
    }

    /// Number of keys seen, including those still computing.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
