//! HTML templates for the demo room.
//!
//! Built once at startup and handed to handlers through `AppState`; the
//! broadcaster only ever sees the rendered strings.

use serde_json::Value;
use sse::{FragmentRenderer, RenderError};

pub const ROOM_TEMPLATE: &str = "room";
pub const MESSAGE_TEMPLATE: &str = "message";

const TURBO_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/@hotwired/turbo@7.3.0/dist/turbo.es2017-esm.js";

#[derive(Debug, Default, Clone, Copy)]
pub struct RoomTemplates;

impl RoomTemplates {
    fn message(&self, data: &Value) -> Result<String, RenderError> {
        let id = field(MESSAGE_TEMPLATE, data, "id")?;
        let body = field(MESSAGE_TEMPLATE, data, "body")?;
        let created_at = field(MESSAGE_TEMPLATE, data, "created_at")?;

        Ok(format!(
            "<div id=\"message-{id}\" class=\"message\"><p>{body}</p>\
             <time datetime=\"{created_at}\">{created_at}</time></div>",
            id = escape_html(id),
            body = escape_html(body),
            created_at = escape_html(created_at),
        ))
    }

    fn room(&self, data: &Value) -> Result<String, RenderError> {
        let messages = data["messages"]
            .as_array()
            .ok_or_else(|| RenderError::new(ROOM_TEMPLATE, "missing field `messages`"))?;

        let rendered = messages
            .iter()
            .map(|message| self.message(message))
            .collect::<Result<String, _>>()?;

        Ok(format!(
            "<!DOCTYPE html>\n\
             <html>\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <title>Room</title>\n\
             <script type=\"module\" src=\"{TURBO_SCRIPT}\"></script>\n\
             </head>\n\
             <body>\n\
             <turbo-stream-source src=\"/events\"></turbo-stream-source>\n\
             <div id=\"room-messages\">{rendered}</div>\n\
             <form action=\"/messages\" method=\"post\">\
             <input name=\"body\" autocomplete=\"off\"><button>Send</button></form>\n\
             </body>\n\
             </html>\n"
        ))
    }
}

impl FragmentRenderer for RoomTemplates {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError> {
        match template {
            MESSAGE_TEMPLATE => self.message(data),
            ROOM_TEMPLATE => self.room(data),
            _ => Err(RenderError::not_found(template)),
        }
    }
}

fn field<'a>(template: &str, data: &'a Value, name: &str) -> Result<&'a str, RenderError> {
    data[name]
        .as_str()
        .ok_or_else(|| RenderError::new(template, format!("missing field `{name}`")))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
