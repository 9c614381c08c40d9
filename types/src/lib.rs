//! Wire types shared by the kafka-log server and client.

pub mod kafka {
    tonic::include_proto!("kafka");
}
