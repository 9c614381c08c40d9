use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use kafka_log_client::{Consumer, Error, LogClient, Message};
use kafka_log_server::{grpc, Broker, Config};
use tokio::net::TcpListener;
use tokio::time::sleep;

async fn start_test_server() -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let broker = Arc::new(Broker::new(&Config::default()));
    let server = grpc::create_server(broker);

    let handle = tokio::spawn(async move {
        tonic::transport::Server::builder()
            .add_service(server)
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    sleep(Duration::from_millis(100)).await;
    (addr, handle)
}

fn values(messages: &[Message]) -> Vec<&[u8]> {
    messages.iter().map(|m| m.value.as_slice()).collect()
}

#[tokio::test]
async fn test_client_round_trip() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();

    assert_eq!(client.append("x", b"a".to_vec()).await.unwrap(), 0);
    assert_eq!(client.append("x", b"b".to_vec()).await.unwrap(), 1);

    let msgs = client
        .poll(HashMap::from([("x".to_string(), 1)]))
        .await
        .unwrap();
    assert_eq!(
        msgs["x"],
        vec![Message {
            offset: 1,
            value: b"b".to_vec()
        }]
    );

    client
        .commit_offsets(HashMap::from([("x".to_string(), 1)]))
        .await
        .unwrap();
    let committed = client
        .list_committed_offsets(vec!["x".to_string(), "y".to_string()])
        .await
        .unwrap();
    assert_eq!(committed, HashMap::from([("x".to_string(), 1)]));
}

#[tokio::test]
async fn test_client_surfaces_invalid_argument() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();

    match client.append("", b"a".to_vec()).await {
        Err(Error::Status(status)) => assert_eq!(status.code(), tonic::Code::InvalidArgument),
        other => panic!("expected invalid argument, got {:?}", other),
    }
}

#[tokio::test]
async fn test_consumer_resumes_after_commit() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();

    for msg in ["a", "b", "c"] {
        client.append("orders", msg.as_bytes().to_vec()).await.unwrap();
    }

    let mut consumer = Consumer::subscribe(client.clone(), ["orders"]).await.unwrap();
    assert_eq!(consumer.position("orders"), Some(0));

    let batch = consumer.poll().await.unwrap();
    assert_eq!(
        values(&batch["orders"]),
        vec![b"a".as_slice(), b"b".as_slice(), b"c".as_slice()]
    );
    assert_eq!(consumer.position("orders"), Some(3));

    // Nothing new yet.
    assert!(consumer.poll().await.unwrap()["orders"].is_empty());
    consumer.commit().await.unwrap();

    client.append("orders", b"d".to_vec()).await.unwrap();

    let mut resumed = Consumer::subscribe(client.clone(), ["orders"]).await.unwrap();
    assert_eq!(resumed.position("orders"), Some(3));
    let batch = resumed.poll().await.unwrap();
    assert_eq!(values(&batch["orders"]), vec![b"d".as_slice()]);
    assert_eq!(batch["orders"][0].offset, 3);
}

#[tokio::test]
async fn test_consumer_commit_skips_unread_keys() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();
    client.append("read", b"1".to_vec()).await.unwrap();

    let mut consumer = Consumer::subscribe(client.clone(), ["read", "idle"])
        .await
        .unwrap();
    consumer.poll().await.unwrap();
    consumer.commit().await.unwrap();

    let committed = client
        .list_committed_offsets(vec!["read".to_string(), "idle".to_string()])
        .await
        .unwrap();
    assert_eq!(committed, HashMap::from([("read".to_string(), 0)]));
}

#[tokio::test]
async fn test_consumer_seek() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();
    for i in 0..4u8 {
        client.append("k", vec![i]).await.unwrap();
    }

    let mut consumer = Consumer::subscribe(client, ["k"]).await.unwrap();
    consumer.seek("k", 2);
    let batch = consumer.poll().await.unwrap();
    let offsets: Vec<u64> = batch["k"].iter().map(|m| m.offset).collect();
    assert_eq!(offsets, vec![2, 3]);

    consumer.seek("unsubscribed", 7);
    assert_eq!(consumer.position("unsubscribed"), None);
}

#[tokio::test]
async fn test_concurrent_producers_on_many_keys() {
    const KEYS: usize = 4;
    const PER_KEY: u64 = 16;

    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();

    let tasks = (0..KEYS).flat_map(|k| {
        let client = client.clone();
        (0..PER_KEY).map(move |i| {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .append(format!("key-{k}"), i.to_be_bytes().to_vec())
                    .await
                    .unwrap()
            })
        })
    });
    assert_eq!(join_all(tasks).await.len(), KEYS * PER_KEY as usize);

    let request = (0..KEYS).map(|k| (format!("key-{k}"), 0)).collect();
    let msgs = client.poll(request).await.unwrap();
    for k in 0..KEYS {
        let offsets: Vec<u64> = msgs[&format!("key-{k}")].iter().map(|m| m.offset).collect();
        assert_eq!(offsets, (0..PER_KEY).collect::<Vec<_>>());
    }
}

#[tokio::test]
async fn test_consumer_subscribes_after_commit_at_max_offset() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();
    client.append("k", b"a".to_vec()).await.unwrap();
    client
        .commit_offsets(HashMap::from([("k".to_string(), u64::MAX)]))
        .await
        .unwrap();

    let mut consumer = Consumer::subscribe(client, ["k"]).await.unwrap();
    assert_eq!(consumer.position("k"), Some(u64::MAX));
    assert_eq!(consumer.consumed("k"), Some(u64::MAX));
    assert!(consumer.poll().await.unwrap()["k"].is_empty());
    assert_eq!(consumer.position("k"), Some(u64::MAX));
}

#[tokio::test]
async fn test_consumer_commits_only_what_poll_returned() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();
    for i in 0..3u8 {
        client.append("k", vec![i]).await.unwrap();
    }

    let mut consumer = Consumer::subscribe(client.clone(), ["k"]).await.unwrap();
    consumer.seek("k", 10);
    consumer.commit().await.unwrap();
    let committed = client
        .list_committed_offsets(vec!["k".to_string()])
        .await
        .unwrap();
    assert!(committed.is_empty());

    consumer.seek("k", 1);
    consumer.poll().await.unwrap();
    assert_eq!(consumer.consumed("k"), Some(2));
    consumer.commit().await.unwrap();
    let committed = client
        .list_committed_offsets(vec!["k".to_string()])
        .await
        .unwrap();
    assert_eq!(committed["k"], 2);
}

#[tokio::test]
async fn test_consumer_seek_back_then_commit() {
    let (addr, _handle) = start_test_server().await;
    let client = LogClient::connect(addr).await.unwrap();
    for i in 0..3u8 {
        client.append("k", vec![i]).await.unwrap();
    }
    client
        .commit_offsets(HashMap::from([("k".to_string(), 5)]))
        .await
        .unwrap();

    let mut consumer = Consumer::subscribe(client.clone(), ["k"]).await.unwrap();
    assert_eq!(consumer.position("k"), Some(6));

    // A seek alone does not change what gets committed.
    consumer.seek("k", 0);
    consumer.commit().await.unwrap();
    let committed = client
        .list_committed_offsets(vec!["k".to_string()])
        .await
        .unwrap();
    assert_eq!(committed["k"], 5);

    let batch = consumer.poll().await.unwrap();
    assert_eq!(batch["k"].len(), 3);
    consumer.commit().await.unwrap();
    let committed = client
        .list_committed_offsets(vec!["k".to_string()])
        .await
        .unwrap();
    assert_eq!(committed["k"], 2);
}
