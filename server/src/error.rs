//! Error types for the log server.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}: key must not be empty")]
    EmptyKey(&'static str),

    /// A writer panicked while holding the lock; the map can no longer be trusted.
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
}
