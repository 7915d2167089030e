use crate::error::Error;
use axum::response::sse::Event as SseEvent;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outer tag of the envelope micro-format understood by the client library.
pub const PROTOCOL_TAG: &str = "turbo-stream";

/// SSE event type carried by every broadcast frame.
pub const MESSAGE_EVENT_TYPE: &str = "message";

/// How the client applies an envelope's body to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Append,
    Prepend,
    Replace,
    Update,
    Remove,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Append => "append",
            Action::Prepend => "prepend",
            Action::Replace => "replace",
            Action::Update => "update",
            Action::Remove => "remove",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(action: &str) -> Result<Action, Self::Err> {
        match action.to_lowercase().as_str() {
            "append" => Ok(Action::Append),
            "prepend" => Ok(Action::Prepend),
            "replace" => Ok(Action::Replace),
            "update" => Ok(Action::Update),
            "remove" => Ok(Action::Remove),
            _ => Err(Error::invalid_action(action)),
        }
    }
}

/// One DOM patch: apply `body` to the element identified by `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub action: Action,
    pub target: String,
    pub body: String,
}

impl Envelope {
    pub fn new(action: Action, target: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            action,
            target: target.into(),
            body: body.into(),
        }
    }

    /// Serialize to the wire micro-format.
    ///
    /// The body is trusted HTML and is written verbatim; only the `target`
    /// attribute value is escaped.
    pub fn render(&self) -> String {
        let target = escape_attribute(&self.target);
        let mut out = String::with_capacity(
            2 * PROTOCOL_TAG.len() + target.len() + self.body.len() + 64,
        );

        out.push('<');
        out.push_str(PROTOCOL_TAG);
        out.push_str(" action=\"");
        out.push_str(self.action.as_str());
        out.push_str("\" target=\"");
        out.push_str(&target);
        out.push_str("\"><template>");
        out.push_str(&self.body);
        out.push_str("</template></");
        out.push_str(PROTOCOL_TAG);
        out.push('>');
        out
    }
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&#34;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A numbered event ready for fan-out. Shared between connections behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub sequence: u64,
    pub event_type: &'static str,
    pub payload: String,
}

impl StreamEvent {
    pub fn message(sequence: u64, payload: impl Into<String>) -> Self {
        Self {
            sequence,
            event_type: MESSAGE_EVENT_TYPE,
            payload: payload.into(),
        }
    }

    /// Build the axum SSE frame: `id`, `event` and one `data` line per payload line.
    pub fn to_sse_event(&self) -> SseEvent {
        SseEvent::default()
            .id(self.sequence.to_string())
            .event(self.event_type)
            .data(normalize_line_endings(&self.payload))
    }
}

// SSE framing is line based; bare carriage returns would otherwise end a field early.
fn normalize_line_endings(payload: &str) -> String {
    payload.replace("\r\n", "\n").replace('\r', "\n")
}
