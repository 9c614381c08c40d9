//! Typed wrapper around the generated gRPC client.

use std::collections::HashMap;

use kafka_log_types::kafka::log_service_client::LogServiceClient;
use kafka_log_types::kafka::{
    AppendRequest, CommitOffsetsRequest, ListCommittedOffsetsRequest, PollRequest,
};
use tonic::transport::{Channel, Endpoint};

use crate::error::Error;

/// A record read back from a log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub offset: u64,
    pub value: Vec<u8>,
}

/// Connection to a kafka-log server.
///
/// Cloning is cheap: clones share the underlying channel, so a single
/// `LogClient` can be handed to many tasks.
///
/// # Example
///
/// ```no_run
/// use kafka_log_client::LogClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = LogClient::connect("localhost:50051").await?;
///
///     assert_eq!(client.append("k", b"a".to_vec()).await?, 0);
///     client.commit_offsets([("k".to_string(), 0)].into()).await?;
///
///     let committed = client.list_committed_offsets(vec!["k".to_string()]).await?;
///     assert_eq!(committed["k"], 0);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct LogClient {
    client: LogServiceClient<Channel>,
}

impl LogClient {
    /// Connects to a server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Server address (e.g., `"localhost:50051"`)
    pub async fn connect(addr: impl Into<ServerAddr>) -> Result<Self, Error> {
        let server_addr = addr.into();
        let endpoint = Endpoint::from_shared(format!("http://{}", server_addr.0))?;
        let channel = endpoint.connect().await?;

        Ok(Self {
            client: LogServiceClient::new(channel),
        })
    }

    /// Appends `msg` to the log for `key` and returns its offset.
    pub async fn append(&self, key: impl Into<String>, msg: Vec<u8>) -> Result<u64, Error> {
        let request = AppendRequest {
            key: key.into(),
            msg,
        };
        let response = self.client.clone().append(request).await?;
        Ok(response.into_inner().offset)
    }

    /// Reads every record at or after the given offset for each key.
    pub async fn poll(
        &self,
        offsets: HashMap<String, u64>,
    ) -> Result<HashMap<String, Vec<Message>>, Error> {
        let response = self.client.clone().poll(PollRequest { offsets }).await?;

        Ok(response
            .into_inner()
            .msgs
            .into_iter()
            .map(|(key, entries)| {
                let messages = entries
                    .entries
                    .into_iter()
                    .map(|entry| Message {
                        offset: entry.offset,
                        value: entry.msg,
                    })
                    .collect();
                (key, messages)
            })
            .collect())
    }

    pub async fn commit_offsets(&self, offsets: HashMap<String, u64>) -> Result<(), Error> {
        self.client
            .clone()
            .commit_offsets(CommitOffsetsRequest { offsets })
            .await?;
        Ok(())
    }

    /// Keys that were never committed are missing from the result.
    pub async fn list_committed_offsets(
        &self,
        keys: Vec<String>,
    ) -> Result<HashMap<String, u64>, Error> {
        let response = self
            .client
            .clone()
            .list_committed_offsets(ListCommittedOffsetsRequest { keys })
            .await?;
        Ok(response.into_inner().offsets)
    }
}

/// Server address wrapper for type-safe connection.
#[derive(Clone)]
pub struct ServerAddr(pub String);

impl From<String> for ServerAddr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServerAddr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<std::net::SocketAddr> for ServerAddr {
    fn from(addr: std::net::SocketAddr) -> Self {
        Self(addr.to_string())
    }
}
