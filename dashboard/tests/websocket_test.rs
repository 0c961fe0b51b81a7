//! WebSocket streaming tests against a real listener

mod common;

use futures_util::{SinkExt, Stream, StreamExt};
use serde_json::Value;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use dashboard::{AudienceService, CreateAudienceRequest};

use common::fixtures::quiet_config;
use common::helpers::{build_test_app, spawn_server};

async fn next_event<S>(stream: &mut S) -> Value
where
    S: Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    loop {
        let message = tokio::time::timeout(Duration::from_secs(2), stream.next())
            .await
            .expect("timed out waiting for an event")
            .expect("stream closed")
            .expect("websocket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

#[tokio::test]
async fn test_events_stream_to_clients() {
    let (router, service) = build_test_app(quiet_config());
    let addr = spawn_server(router).await;

    let (mut socket, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    let audience = service
        .create(CreateAudienceRequest::lookalike("Streamed", "list-2").with_size(4.5))
        .await
        .unwrap();

    let event = next_event(&mut socket).await;
    assert_eq!(event["type"], "audience_created");
    assert_eq!(event["audience_id"], audience.id.0);
    assert_eq!(event["audience"]["name"], "Streamed");

    service.delete(audience.id).await;
    let event = next_event(&mut socket).await;
    assert_eq!(event["type"], "audience_deleted");

    socket.send(Message::Close(None)).await.unwrap();
}

#[tokio::test]
async fn test_forced_update_reaches_every_client() {
    let (router, service) = build_test_app(quiet_config());
    let addr = spawn_server(router).await;

    let (mut first, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
    let (mut second, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();

    // Delta may be zero, which publishes nothing; retry until one lands
    let mut published = None;
    for _ in 0..10 {
        published = service.force_update().await;
        if published.is_some() {
            break;
        }
    }
    let published = published.expect("a seeded active audience should get a reach update");

    for socket in [&mut first, &mut second] {
        let event = next_event(socket).await;
        assert_eq!(event["type"], "reach_update");
        assert_eq!(event["audience_id"], published.audience_id.0);
    }
}
