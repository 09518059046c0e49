//! Newline-delimited JSON transport to a host process.
//!
//! Protocol: one JSON object per line.
//! Request: `{"id":1,"method":"tab_create","params":{"url":"..."}}`
//! Reply:   `{"id":1,"result":{...}}` or `{"id":1,"error":"..."}`
//! Event:   `{"event":"tab_created","payload":{...}}`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

use super::CommandChannel;
use crate::types::command::{Command, CommandReply, ReplyKind};
use crate::types::errors::ChannelError;
use crate::types::event::HostEvent;

type ReplySender = oneshot::Sender<Result<CommandReply, ChannelError>>;

#[derive(Serialize)]
struct Request<'a> {
    id: u64,
    #[serde(flatten)]
    command: &'a Command,
}

/// One decoded inbound line.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    Reply { id: u64, outcome: Result<Value, String> },
    Event(HostEvent),
}

/// Encode a request line, without the trailing newline.
pub fn encode_request(id: u64, command: &Command) -> Result<String, ChannelError> {
    serde_json::to_string(&Request { id, command })
        .map_err(|e| ChannelError::Codec(format!("encode {}: {}", command.method(), e)))
}

/// Decode one inbound line into a reply or an event.
pub fn decode_line(line: &str) -> Result<Inbound, ChannelError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| ChannelError::Codec(format!("parse error: {}", e)))?;

    if value.get("event").is_some() {
        let event = serde_json::from_value(value)
            .map_err(|e| ChannelError::Codec(format!("bad event: {}", e)))?;
        return Ok(Inbound::Event(event));
    }

    let id = value
        .get("id")
        .and_then(Value::as_u64)
        .ok_or_else(|| ChannelError::Codec("reply without numeric id".to_string()))?;

    let outcome = match value.get("error") {
        Some(err) if !err.is_null() => Err(err
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| err.to_string())),
        _ => Ok(value.get("result").cloned().unwrap_or(Value::Null)),
    };
    Ok(Inbound::Reply { id, outcome })
}

/// [`CommandChannel`] over a byte stream speaking the JSON-lines protocol.
///
/// Requests are written by [`invoke`](CommandChannel::invoke); replies and
/// events are read by [`dispatch`](JsonLinesChannel::dispatch), which must be
/// polled concurrently for any request to complete.
pub struct JsonLinesChannel<W> {
    writer: tokio::sync::Mutex<W>,
    pending: Mutex<HashMap<u64, (ReplyKind, &'static str, ReplySender)>>,
    next_id: AtomicU64,
}

impl<W: AsyncWrite + Unpin> JsonLinesChannel<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: tokio::sync::Mutex::new(writer),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Number of requests still waiting for a reply.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Read lines until EOF, routing replies to waiting requests and events to
    /// `events`. Malformed lines are logged and skipped. At EOF every request
    /// still waiting fails with [`ChannelError::Disconnected`].
    pub async fn dispatch<R: AsyncBufRead + Unpin>(
        &self,
        reader: R,
        events: mpsc::UnboundedSender<HostEvent>,
    ) -> Result<(), ChannelError> {
        let mut lines = reader.lines();
        let result = loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break Ok(()),
                Err(e) => break Err(ChannelError::from(e)),
            };
            if line.trim().is_empty() {
                continue;
            }
            match decode_line(&line) {
                Ok(Inbound::Event(event)) => {
                    trace!(event = event.name(), "event line");
                    if events.send(event).is_err() {
                        debug!("event receiver dropped; discarding events");
                    }
                }
                Ok(Inbound::Reply { id, outcome }) => self.complete(id, outcome),
                Err(e) => warn!(error = %e, "skipping malformed line"),
            }
        };
        self.fail_pending();
        result
    }

    fn complete(&self, id: u64, outcome: Result<Value, String>) {
        let waiting = match self.pending.lock() {
            Ok(mut pending) => pending.remove(&id),
            Err(_) => None,
        };
        let Some((kind, method, reply_tx)) = waiting else {
            warn!(id, "reply for unknown request id");
            return;
        };
        let reply = match outcome {
            Ok(result) => kind.decode(method, result),
            Err(message) => Err(ChannelError::Rejected(message)),
        };
        // The caller may have given up on the request; nothing to do then.
        let _ = reply_tx.send(reply);
    }

    fn fail_pending(&self) {
        let drained: Vec<ReplySender> = match self.pending.lock() {
            Ok(mut pending) => pending.drain().map(|(_, (_, _, tx))| tx).collect(),
            Err(_) => Vec::new(),
        };
        for tx in drained {
            let _ = tx.send(Err(ChannelError::Disconnected));
        }
    }

    fn forget(&self, id: u64) {
        if let Ok(mut pending) = self.pending.lock() {
            pending.remove(&id);
        }
    }
}

impl<W: AsyncWrite + Unpin> CommandChannel for JsonLinesChannel<W> {
    async fn invoke(&self, command: Command) -> Result<CommandReply, ChannelError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut line = encode_request(id, &command)?;
        line.push('\n');

        let (tx, rx) = oneshot::channel();
        self.pending
            .lock()
            .map_err(|_| ChannelError::Transport("pending table poisoned".to_string()))?
            .insert(id, (command.reply_kind(), command.method(), tx));

        let written = {
            let mut writer = self.writer.lock().await;
            match writer.write_all(line.as_bytes()).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = written {
            self.forget(id);
            return Err(ChannelError::from(e));
        }
        trace!(id, method = command.method(), "request written");

        rx.await.map_err(|_| ChannelError::Disconnected)?
    }
}
