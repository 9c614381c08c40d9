//! Per-key append-only commit logs served over gRPC.
//!
//! Producers append records to named logs and get back gapless offsets
//! starting at 0. Consumers poll a log from any offset and may record a
//! committed offset per log, which is kept apart from the log itself.

pub mod broker;
pub mod config;
pub mod error;
pub mod grpc;
pub mod log_store;
pub mod models;
pub mod offsets;

pub use broker::{Broker, Command, Reply};
pub use config::Config;
pub use error::{Error, Result};
