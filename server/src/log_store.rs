//! In-memory append-only logs, one per key.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::Record;

/// Owns every log and hands out offsets on append.
///
/// A log is created the first time its key is appended to and is never
/// removed. The position of a record in its vector is its offset.
pub struct LogStore {
    logs: RwLock<HashMap<String, Vec<Record>>>,
    max_poll_records: Option<usize>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::with_max_poll_records(None)
    }

    /// Caps how many records a single poll returns per key. `None` returns the
    /// whole suffix.
    pub fn with_max_poll_records(max_poll_records: Option<usize>) -> Self {
        Self {
            logs: RwLock::new(HashMap::new()),
            max_poll_records,
        }
    }

    /// Appends `value` to the log for `key` and returns the offset it was
    /// assigned.
    ///
    /// Computing the next offset and pushing the record happen under a single
    /// write lock, so concurrent appends to one key get distinct offsets with
    /// no gaps, in lock acquisition order.
    pub fn append(&self, key: String, value: Vec<u8>) -> Result<u64> {
        let mut logs = self.logs.write().map_err(|_| Error::Poisoned("log store"))?;
        let log = logs.entry(key).or_default();

        let offset = log.len() as u64;
        debug_assert!(log.last().map_or(true, |last| last.offset + 1 == offset));
        log.push(Record::new(offset, value));

        Ok(offset)
    }

    /// Returns, for every requested key, the records at or after its start
    /// offset in offset order.
    ///
    /// Unknown keys and offsets at or past the end of a log yield an empty
    /// list; the key is still present in the result.
    pub fn poll(&self, offsets: &HashMap<String, u64>) -> Result<HashMap<String, Vec<Record>>> {
        let logs = self.logs.read().map_err(|_| Error::Poisoned("log store"))?;

        Ok(offsets
            .iter()
            .map(|(key, &from)| {
                let records = logs
                    .get(key)
                    .map(|log| self.suffix(log, from))
                    .unwrap_or_default();
                (key.clone(), records)
            })
            .collect())
    }

    /// The offset the next append to `key` will receive.
    pub fn end_offset(&self, key: &str) -> Result<u64> {
        let logs = self.logs.read().map_err(|_| Error::Poisoned("log store"))?;
        Ok(logs.get(key).map_or(0, |log| log.len() as u64))
    }

    fn suffix(&self, log: &[Record], from: u64) -> Vec<Record> {
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(log.len());
        let tail = &log[start..];
        let len = self.max_poll_records.map_or(tail.len(), |max| max.min(tail.len()));
        tail[..len].to_vec()
    }
}

impl Default for LogStore {
    fn default() -> Self {
        Self::new()
    }
}
