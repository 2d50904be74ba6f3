//! Streaming-run event model and SSE parsing.
//!
//! A streaming run emits named server-sent events (`event:` / `data:` line
//! pairs separated by blank lines). The parser here is incremental: it is fed
//! raw byte chunks as they arrive off the wire and yields complete records,
//! so a record split across two network chunks is handled transparently.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::warn;

// --- Run Events ---

/// One event from a streaming assistant run, forwarded to the caller's
/// [`RunEventHandler`].
#[derive(Debug, Clone, PartialEq)]
pub enum RunEvent {
    /// An incremental piece of the assistant's reply text.
    MessageDelta { text: String },
    /// A full message finished; carries the complete text.
    MessageCompleted { text: String },
    /// The run ended in failure on the server side.
    RunFailed { message: String },
    /// Any other named event, passed through for observability.
    Other { event: String },
}

/// Capability supplied by the caller for each streaming run: it receives
/// incremental events and a final run-complete signal. The client never
/// retains the handler past the call.
#[async_trait]
pub trait RunEventHandler: Send {
    /// Called once per parsed streaming event, in arrival order.
    async fn on_event(&mut self, event: RunEvent);

    /// Called once after the stream runs to completion. Not called when the
    /// stream aborts on a transport error; the missing signal is how the
    /// handler observes an incomplete run.
    async fn on_done(&mut self);
}

// --- SSE Wire Shapes ---
// Only the fields the run stream actually reads; everything else in the
// event payloads is ignored.

#[derive(Deserialize)]
struct MessageDeltaEvent {
    delta: MessageDeltaBody,
}

#[derive(Deserialize)]
struct MessageDeltaBody {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct CompletedMessage {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<TextValue>,
}

#[derive(Deserialize)]
struct TextValue {
    #[serde(default)]
    value: String,
}

#[derive(Deserialize)]
struct FailedRun {
    #[serde(default)]
    last_error: Option<LastError>,
}

#[derive(Deserialize)]
struct LastError {
    #[serde(default)]
    message: String,
}

fn collect_text(blocks: Vec<ContentBlock>) -> String {
    let mut text = String::new();
    for block in blocks {
        if let Some(t) = block.text {
            text.push_str(&t.value);
        }
    }
    text
}

/// Interpret one complete SSE record. Returns `None` when the record carries
/// nothing the handler needs to see (unparseable payloads are logged).
pub(crate) fn parse_sse_record(event: &str, data: &str) -> Option<RunEvent> {
    match event {
        "thread.message.delta" => match serde_json::from_str::<MessageDeltaEvent>(data) {
            Ok(delta) => Some(RunEvent::MessageDelta {
                text: collect_text(delta.delta.content),
            }),
            Err(e) => {
                warn!(event, error = %e, "unparseable message delta payload");
                None
            }
        },
        "thread.message.completed" => match serde_json::from_str::<CompletedMessage>(data) {
            Ok(message) => Some(RunEvent::MessageCompleted {
                text: collect_text(message.content),
            }),
            Err(e) => {
                warn!(event, error = %e, "unparseable completed message payload");
                None
            }
        },
        "thread.run.failed" => {
            let message = serde_json::from_str::<FailedRun>(data)
                .ok()
                .and_then(|run| run.last_error)
                .map(|e| e.message)
                .unwrap_or_else(|| "run failed".to_string());
            Some(RunEvent::RunFailed { message })
        }
        // Events without a name carry nothing dispatchable.
        "" => None,
        other => Some(RunEvent::Other {
            event: other.to_string(),
        }),
    }
}

// --- Incremental Parser ---

/// A parsed record: either a run event or the stream terminator.
#[derive(Debug, PartialEq)]
pub(crate) enum SseRecord {
    Event(RunEvent),
    Done,
}

/// Buffers raw bytes and yields complete SSE records at blank-line
/// boundaries. `data: [DONE]` and the `done` event both terminate the stream.
pub(crate) struct SseParser {
    buffer: String,
    event_name: Option<String>,
    data: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            event_name: None,
            data: String::new(),
        }
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseRecord> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        let mut records = Vec::new();

        while let Some(newline_pos) = self.buffer.find('\n') {
            let line = self.buffer[..newline_pos].trim_end_matches('\r').to_string();
            self.buffer = self.buffer[newline_pos + 1..].to_string();

            if line.is_empty() {
                // Blank line: record boundary.
                if let Some(record) = self.flush() {
                    records.push(record);
                }
                continue;
            }

            if let Some(name) = line.strip_prefix("event:") {
                self.event_name = Some(name.trim().to_string());
            } else if let Some(data) = line.strip_prefix("data:") {
                if !self.data.is_empty() {
                    self.data.push('\n');
                }
                self.data.push_str(data.trim_start());
            }
            // Comment lines (":") and unknown fields are ignored.
        }

        records
    }

    fn flush(&mut self) -> Option<SseRecord> {
        let event = self.event_name.take();
        let data = std::mem::take(&mut self.data);

        if data.is_empty() && event.is_none() {
            return None;
        }
        if data.trim() == "[DONE]" || event.as_deref() == Some("done") {
            return Some(SseRecord::Done);
        }
        parse_sse_record(event.as_deref().unwrap_or(""), &data).map(SseRecord::Event)
    }
}
