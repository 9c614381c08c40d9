use crate::broker::{Broker, Command, Reply};
use crate::error::Error;
use crate::models::Record;
use kafka_log_types::kafka::{
    log_service_server::{LogService, LogServiceServer},
    AppendRequest, AppendResponse, CommitOffsetsRequest, CommitOffsetsResponse, Entries, Entry,
    ListCommittedOffsetsRequest, ListCommittedOffsetsResponse, PollRequest, PollResponse,
};
use std::collections::HashMap;
use std::sync::Arc;
use tonic::{Request, Response, Status};

#[derive(Clone)]
pub struct LogServiceImpl {
    broker: Arc<Broker>,
}

impl LogServiceImpl {
    pub fn new(broker: Arc<Broker>) -> Self {
        Self { broker }
    }

    fn execute(&self, command: Command) -> Result<Reply, Status> {
        self.broker.execute(command).map_err(|e| {
            if let Error::Poisoned(_) = e {
                tracing::error!(error = %e, "broker state is unusable");
            }
            Status::from(e)
        })
    }
}

impl From<Error> for Status {
    fn from(err: Error) -> Self {
        match err {
            Error::EmptyKey(_) => Status::invalid_argument(err.to_string()),
            Error::Poisoned(_) => Status::internal(err.to_string()),
        }
    }
}

fn unexpected(reply: Reply) -> Status {
    Status::internal(format!("unexpected reply: {:?}", reply))
}

fn to_entries(records: Vec<Record>) -> Entries {
    Entries {
        entries: records
            .into_iter()
            .map(|record| Entry {
                offset: record.offset,
                msg: record.value,
            })
            .collect(),
    }
}

#[tonic::async_trait]
impl LogService for LogServiceImpl {
    async fn append(
        &self,
        request: Request<AppendRequest>,
    ) -> Result<Response<AppendResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(key = %req.key, len = req.msg.len(), "append");

        match self.execute(Command::append(req.key, req.msg)?)? {
            Reply::AppendOk { offset } => Ok(Response::new(AppendResponse { offset })),
            other => Err(unexpected(other)),
        }
    }

    async fn poll(&self, request: Request<PollRequest>) -> Result<Response<PollResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(offsets = ?req.offsets, "poll");

        match self.execute(Command::poll(req.offsets)?)? {
            Reply::PollOk { msgs } => {
                let msgs: HashMap<String, Entries> = msgs
                    .into_iter()
                    .map(|(key, records)| (key, to_entries(records)))
                    .collect();
                Ok(Response::new(PollResponse { msgs }))
            }
            other => Err(unexpected(other)),
        }
    }

    async fn commit_offsets(
        &self,
        request: Request<CommitOffsetsRequest>,
    ) -> Result<Response<CommitOffsetsResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(offsets = ?req.offsets, "commit_offsets");

        match self.execute(Command::commit_offsets(req.offsets)?)? {
            Reply::CommitOffsetsOk => Ok(Response::new(CommitOffsetsResponse {})),
            other => Err(unexpected(other)),
        }
    }

    async fn list_committed_offsets(
        &self,
        request: Request<ListCommittedOffsetsRequest>,
    ) -> Result<Response<ListCommittedOffsetsResponse>, Status> {
        let req = request.into_inner();
        tracing::debug!(keys = ?req.keys, "list_committed_offsets");

        match self.execute(Command::list_committed_offsets(req.keys)?)? {
            Reply::ListCommittedOffsetsOk { offsets } => {
                Ok(Response::new(ListCommittedOffsetsResponse { offsets }))
            }
            other => Err(unexpected(other)),
        }
    }
}

pub fn create_server(broker: Arc<Broker>) -> LogServiceServer<LogServiceImpl> {
    LogServiceServer::new(LogServiceImpl::new(broker))
}
