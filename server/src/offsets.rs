//! Committed offsets, tracked per key and separately from the logs.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};

/// Remembers the last offset a client declared as processed for each key.
///
/// Commits are not checked against the log or against earlier commits: the
/// most recent commit for a key always wins.
#[derive(Default)]
pub struct OffsetTracker {
    committed: RwLock<HashMap<String, u64>>,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commit(&self, offsets: &HashMap<String, u64>) -> Result<()> {
        let mut committed = self
            .committed
            .write()
            .map_err(|_| Error::Poisoned("offset tracker"))?;

        for (key, &offset) in offsets {
            committed.insert(key.clone(), offset);
        }
        Ok(())
    }

    /// Committed offsets for `keys`. Keys that were never committed are left
    /// out rather than defaulted.
    pub fn list(&self, keys: &[String]) -> Result<HashMap<String, u64>> {
        let committed = self
            .committed
            .read()
            .map_err(|_| Error::Poisoned("offset tracker"))?;

        Ok(keys
            .iter()
            .filter_map(|key| committed.get(key).map(|&offset| (key.clone(), offset)))
            .collect())
    }
}
