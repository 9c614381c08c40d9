//! A consumer that resumes from committed offsets.

use std::collections::HashMap;

use crate::client::{LogClient, Message};
use crate::Error;

/// Reads a fixed set of logs, tracking the next offset to read for each.
///
/// On [`subscribe`](Consumer::subscribe) each position starts one past the
/// key's committed offset, or at 0 when nothing was committed yet.
/// [`commit`](Consumer::commit) stores the offset of the last record actually
/// returned by [`poll`](Consumer::poll) for each key, independent of seeks.
pub struct Consumer {
    client: LogClient,
    positions: HashMap<String, u64>,
    consumed: HashMap<String, u64>,
}

impl Consumer {
    pub async fn subscribe<I, K>(client: LogClient, keys: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let committed = client.list_committed_offsets(keys.clone()).await?;

        // Commits are unbounded; a commit at u64::MAX leaves nothing to read.
        let positions: HashMap<String, u64> = keys
            .into_iter()
            .map(|key| {
                let position = committed
                    .get(&key)
                    .map_or(0, |&offset| offset.saturating_add(1));
                (key, position)
            })
            .collect();
        tracing::debug!(?positions, "consumer subscribed");

        Ok(Self {
            client,
            positions,
            consumed: committed,
        })
    }

    /// Fetches everything past the current positions and advances them.
    pub async fn poll(&mut self) -> Result<HashMap<String, Vec<Message>>, Error> {
        let batch = self.client.poll(self.positions.clone()).await?;

        for (key, messages) in &batch {
            if let (Some(last), Some(position)) = (messages.last(), self.positions.get_mut(key)) {
                *position = last.offset.saturating_add(1);
                self.consumed.insert(key.clone(), last.offset);
            }
        }
        Ok(batch)
    }

    /// Commits the last consumed offset of every key that has one.
    pub async fn commit(&self) -> Result<(), Error> {
        if self.consumed.is_empty() {
            return Ok(());
        }
        self.client.commit_offsets(self.consumed.clone()).await
    }

    /// The next offset that will be read for `key`, if subscribed.
    pub fn position(&self, key: &str) -> Option<u64> {
        self.positions.get(key).copied()
    }

    /// Offset of the last record returned for `key`, or its committed offset
    /// when nothing has been polled since subscribing.
    pub fn consumed(&self, key: &str) -> Option<u64> {
        self.consumed.get(key).copied()
    }

    /// Moves the read position of a subscribed key. The consumed offset is
    /// left alone until the next poll returns records.
    pub fn seek(&mut self, key: &str, offset: u64) {
        if let Some(position) = self.positions.get_mut(key) {
            *position = offset;
        }
    }
}
