// src/io/cache.rs
//! Content-addressed cache of parsed recordings
//!
//! Interactive callers re-run the pipeline on every parameter change; the
//! cache avoids re-parsing the same capture bytes each time. Entries are
//! keyed by a CRC32 of the raw input, and invalidation is entirely under
//! the caller's control (no implicit memoization).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::GaitResult;
use crate::io::loader::parse_recording;
use crate::recording::{ChannelLayout, Recording};

/// Cache of parsed recordings keyed by input-content hash.
#[derive(Debug, Default)]
pub struct RecordingCache {
    entries: HashMap<u32, Arc<Recording>>,
}

impl RecordingCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `bytes` under `layout`, reusing a prior parse of identical
    /// content when available.
    ///
    /// The layout is not part of the key; callers that switch layouts for
    /// the same bytes must invalidate first.
    pub fn load(&mut self, bytes: &[u8], layout: &ChannelLayout) -> GaitResult<Arc<Recording>> {
        let key = crc32fast::hash(bytes);
        if let Some(hit) = self.entries.get(&key) {
            debug!(key, "recording cache hit");
            return Ok(Arc::clone(hit));
        }

        let text = String::from_utf8_lossy(bytes);
        let recording = Arc::new(parse_recording(&text, layout)?);
        debug!(key, samples = recording.len(), "recording cache miss, parsed");
        self.entries.insert(key, Arc::clone(&recording));
        Ok(recording)
    }

    /// Drop the entry for this exact content, if cached.
    pub fn invalidate(&mut self, bytes: &[u8]) -> bool {
        self.entries.remove(&crc32fast::hash(bytes)).is_some()
    }

    /// Drop every cached entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of cached recordings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = "\
0.000 0.1 0.0 10.0 20.0 -5.0
0.001 0.2 0.0 10.1 20.2 -4.9
";

    #[test]
    fn test_identical_bytes_hit_cache() {
        let mut cache = RecordingCache::new();
        let layout = ChannelLayout::base();
        let a = cache.load(DATA.as_bytes(), &layout).unwrap();
        let b = cache.load(DATA.as_bytes(), &layout).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_different_bytes_get_distinct_entries() {
        let mut cache = RecordingCache::new();
        let layout = ChannelLayout::base();
        let other = DATA.replace("0.2", "0.3");
        let a = cache.load(DATA.as_bytes(), &layout).unwrap();
        let b = cache.load(other.as_bytes(), &layout).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reparse() {
        let mut cache = RecordingCache::new();
        let layout = ChannelLayout::base();
        let a = cache.load(DATA.as_bytes(), &layout).unwrap();
        assert!(cache.invalidate(DATA.as_bytes()));
        assert!(!cache.invalidate(DATA.as_bytes()));
        let b = cache.load(DATA.as_bytes(), &layout).unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_parse_failure_is_not_cached() {
        let mut cache = RecordingCache::new();
        let layout = ChannelLayout::base();
        assert!(cache.load(b"not a table", &layout).is_err());
        assert!(cache.is_empty());
    }
}
