//! An async client for the kafka-log server.
//!
//! `kafka-log-client` wraps the server's gRPC API in [`LogClient`] and builds
//! a [`Consumer`] on top of it that resumes from committed offsets.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use kafka_log_client::{Consumer, LogClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LogClient::connect("localhost:50051").await?;
//!
//!     let offset = client.append("orders", b"first".to_vec()).await?;
//!     let msgs = client.poll(HashMap::from([("orders".to_string(), offset)])).await?;
//!     assert_eq!(msgs["orders"][0].value, b"first");
//!
//!     let mut consumer = Consumer::subscribe(client, ["orders"]).await?;
//!     let batch = consumer.poll().await?;
//!     consumer.commit().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod consumer;
mod error;

pub use client::{LogClient, Message, ServerAddr};
pub use consumer::Consumer;
pub use error::Error;
