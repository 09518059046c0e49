//! JSON-lines transport: line codec plus a full request/reply exchange with a
//! scripted host on the other end of an in-memory pipe.

use aero_shell::channel::json_lines::{decode_line, encode_request, Inbound, JsonLinesChannel};
use aero_shell::channel::CommandChannel;
use aero_shell::types::command::Command;
use aero_shell::types::errors::ChannelError;
use aero_shell::types::event::HostEvent;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

// === Codec ===

#[test]
fn test_encode_request_uses_host_wire_form() {
    let line = encode_request(
        7,
        &Command::TabReorder {
            label: "tab-2".to_string(),
            new_index: 0,
        },
    )
    .unwrap();
    let value: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(
        value,
        json!({"id": 7, "method": "tab_reorder", "params": {"label": "tab-2", "new_index": 0}})
    );
    assert!(!line.ends_with('\n'));
}

#[test]
fn test_encode_request_without_params() {
    let line = encode_request(1, &Command::TabGetAll).unwrap();
    let value: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(value["id"], 1);
    assert_eq!(value["method"], "tab_get_all");
}

#[test]
fn test_decode_success_reply() {
    let inbound = decode_line(r#"{"id":3,"result":["tab-1"]}"#).unwrap();
    assert_eq!(
        inbound,
        Inbound::Reply {
            id: 3,
            outcome: Ok(json!(["tab-1"]))
        }
    );
}

#[test]
fn test_decode_error_reply() {
    let inbound = decode_line(r#"{"id":4,"error":"Invalid index"}"#).unwrap();
    assert_eq!(
        inbound,
        Inbound::Reply {
            id: 4,
            outcome: Err("Invalid index".to_string())
        }
    );
}

#[test]
fn test_decode_reply_without_result_is_null() {
    let inbound = decode_line(r#"{"id":5}"#).unwrap();
    assert_eq!(
        inbound,
        Inbound::Reply {
            id: 5,
            outcome: Ok(Value::Null)
        }
    );
}

#[test]
fn test_decode_event() {
    let inbound = decode_line(r#"{"event":"tab_closed","payload":{"label":"tab-2"}}"#).unwrap();
    assert_eq!(
        inbound,
        Inbound::Event(HostEvent::TabClosed {
            label: "tab-2".to_string()
        })
    );
}

#[test]
fn test_decode_rejects_garbage() {
    assert!(matches!(decode_line("not json"), Err(ChannelError::Codec(_))));
    assert!(matches!(decode_line(r#"{"result":1}"#), Err(ChannelError::Codec(_))));
    assert!(matches!(
        decode_line(r#"{"event":"tab_exploded","payload":{}}"#),
        Err(ChannelError::Codec(_))
    ));
}

// === Exchange ===

fn tab_json(label: &str) -> Value {
    json!({"label": label, "url": "https://a.test", "title": "New Tab", "is_loading": true})
}

#[tokio::test]
async fn test_reply_and_events_are_routed() {
    let (client, server) = tokio::io::duplex(4096);
    let (client_read, client_write) = tokio::io::split(client);
    let channel = JsonLinesChannel::new(client_write);
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();

    let host = tokio::spawn(async move {
        let (server_read, mut server_write) = tokio::io::split(server);
        let mut lines = BufReader::new(server_read).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let request: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(request["method"], "tab_create");
        assert_eq!(request["params"]["url"], "https://a.test");

        let event = json!({"event": "tab_created", "payload": tab_json("tab-1")});
        let reply = json!({"id": request["id"], "result": tab_json("tab-1")});
        let script = format!("{}\nthis is not json\n\n{}\n", event, reply);
        server_write.write_all(script.as_bytes()).await.unwrap();
    });

    let (reply, dispatched) = tokio::join!(
        channel.invoke(Command::TabCreate {
            url: Some("https://a.test".to_string())
        }),
        channel.dispatch(BufReader::new(client_read), events_tx),
    );
    host.await.unwrap();

    let tab = reply.unwrap().into_tab("tab_create").unwrap();
    assert_eq!(tab.label, "tab-1");
    assert!(dispatched.is_ok());
    assert_eq!(channel.pending_count(), 0);

    match events_rx.try_recv().unwrap() {
        HostEvent::TabCreated(record) => assert_eq!(record, tab),
        other => panic!("unexpected event {:?}", other),
    }
    assert!(events_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_host_error_becomes_rejected() {
    let (client, server) = tokio::io::duplex(4096);
    let (client_read, client_write) = tokio::io::split(client);
    let channel = JsonLinesChannel::new(client_write);
    let (events_tx, _events_rx) = mpsc::unbounded_channel();

    let host = tokio::spawn(async move {
        let (server_read, mut server_write) = tokio::io::split(server);
        let mut lines = BufReader::new(server_read).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let request: Value = serde_json::from_str(&line).unwrap();
        let reply = json!({"id": request["id"], "error": "Tab tab-9 not found"});
        server_write
            .write_all(format!("{}\n", reply).as_bytes())
            .await
            .unwrap();
    });

    let (reply, _) = tokio::join!(
        channel.invoke(Command::TabSetActive {
            label: "tab-9".to_string()
        }),
        channel.dispatch(BufReader::new(client_read), events_tx),
    );
    host.await.unwrap();

    assert_eq!(
        reply,
        Err(ChannelError::Rejected("Tab tab-9 not found".to_string()))
    );
}

#[tokio::test]
async fn test_reply_of_wrong_shape_is_codec_error() {
    let (client, server) = tokio::io::duplex(4096);
    let (client_read, client_write) = tokio::io::split(client);
    let channel = JsonLinesChannel::new(client_write);
    let (events_tx, _events_rx) = mpsc::unbounded_channel();

    let host = tokio::spawn(async move {
        let (server_read, mut server_write) = tokio::io::split(server);
        let mut lines = BufReader::new(server_read).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        let request: Value = serde_json::from_str(&line).unwrap();
        let reply = json!({"id": request["id"], "result": 42});
        server_write
            .write_all(format!("{}\n", reply).as_bytes())
            .await
            .unwrap();
    });

    let (reply, _) = tokio::join!(
        channel.invoke(Command::TabGetAll),
        channel.dispatch(BufReader::new(client_read), events_tx),
    );
    host.await.unwrap();

    assert!(matches!(reply, Err(ChannelError::Codec(_))));
}

#[tokio::test]
async fn test_pending_request_fails_when_host_goes_away() {
    let (client, server) = tokio::io::duplex(4096);
    let (client_read, client_write) = tokio::io::split(client);
    let channel = JsonLinesChannel::new(client_write);
    let (events_tx, _events_rx) = mpsc::unbounded_channel();

    let host = tokio::spawn(async move {
        let (server_read, _server_write) = tokio::io::split(server);
        let mut lines = BufReader::new(server_read).lines();
        // Read the request, then exit without answering.
        lines.next_line().await.unwrap().unwrap();
    });

    let (reply, dispatched) = tokio::join!(
        channel.invoke(Command::TabClose {
            label: "tab-1".to_string()
        }),
        channel.dispatch(BufReader::new(client_read), events_tx),
    );
    host.await.unwrap();

    assert_eq!(reply, Err(ChannelError::Disconnected));
    assert!(dispatched.is_ok());
    assert_eq!(channel.pending_count(), 0);
}

#[tokio::test]
async fn test_write_to_closed_pipe_is_transport_error() {
    let (client, server) = tokio::io::duplex(64);
    drop(server);
    let (_client_read, client_write) = tokio::io::split(client);
    let channel = JsonLinesChannel::new(client_write);

    let reply = channel.invoke(Command::TabGetActive).await;

    assert!(matches!(reply, Err(ChannelError::Transport(_))));
    assert_eq!(channel.pending_count(), 0);
}
