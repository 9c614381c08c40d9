//! Validated commands and the broker that executes them against the stores.

use std::collections::HashMap;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::log_store::LogStore;
use crate::models::Record;
use crate::offsets::OffsetTracker;

/// A request that has passed field validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Append { key: String, msg: Vec<u8> },
    Poll { offsets: HashMap<String, u64> },
    CommitOffsets { offsets: HashMap<String, u64> },
    ListCommittedOffsets { keys: Vec<String> },
}

impl Command {
    pub fn append(key: String, msg: Vec<u8>) -> Result<Self> {
        check_key("append", &key)?;
        Ok(Command::Append { key, msg })
    }

    pub fn poll(offsets: HashMap<String, u64>) -> Result<Self> {
        offsets.keys().try_for_each(|key| check_key("poll", key))?;
        Ok(Command::Poll { offsets })
    }

    pub fn commit_offsets(offsets: HashMap<String, u64>) -> Result<Self> {
        offsets
            .keys()
            .try_for_each(|key| check_key("commit_offsets", key))?;
        Ok(Command::CommitOffsets { offsets })
    }

    pub fn list_committed_offsets(keys: Vec<String>) -> Result<Self> {
        keys.iter()
            .try_for_each(|key| check_key("list_committed_offsets", key))?;
        Ok(Command::ListCommittedOffsets { keys })
    }
}

fn check_key(op: &'static str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(Error::EmptyKey(op));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    AppendOk { offset: u64 },
    PollOk { msgs: HashMap<String, Vec<Record>> },
    CommitOffsetsOk,
    ListCommittedOffsetsOk { offsets: HashMap<String, u64> },
}

/// The two stores, built once at startup and shared by every request task.
///
/// No command touches both stores, so each keeps its own lock.
pub struct Broker {
    logs: LogStore,
    offsets: OffsetTracker,
}

impl Broker {
    pub fn new(config: &Config) -> Self {
        Self {
            logs: LogStore::with_max_poll_records(config.max_poll_records),
            offsets: OffsetTracker::new(),
        }
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn offsets(&self) -> &OffsetTracker {
        &self.offsets
    }

    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::Append { key, msg } => {
                let offset = self.logs.append(key, msg)?;
                Ok(Reply::AppendOk { offset })
            }
            Command::Poll { offsets } => {
                let msgs = self.logs.poll(&offsets)?;
                Ok(Reply::PollOk { msgs })
            }
            Command::CommitOffsets { offsets } => {
                self.offsets.commit(&offsets)?;
                Ok(Reply::CommitOffsetsOk)
            }
            Command::ListCommittedOffsets { keys } => {
                let offsets = self.offsets.list(&keys)?;
                Ok(Reply::ListCommittedOffsetsOk { offsets })
            }
        }
    }
}

impl Default for Broker {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
