//! In-memory chat room backing the demo pages. Nothing is persisted.

use chrono::{DateTime, SubsecRound, Utc};
use parking_lot::RwLock;
use serde::Serialize;

/// DOM id of the element holding the room's message list.
pub const MESSAGES_TARGET: &str = "room-messages";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    fn new(body: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            body: body.into(),
            created_at: Utc::now().trunc_subsecs(0),
        }
    }

    /// DOM id of the element rendering this message.
    pub fn dom_id(&self) -> String {
        dom_id(&self.id)
    }
}

pub fn dom_id(message_id: &str) -> String {
    format!("message-{message_id}")
}

#[derive(Debug, Default)]
pub struct Room {
    messages: RwLock<Vec<Message>>,
}

impl Room {
    pub fn new() -> Self {
        Self::default()
    }

    /// A room seeded with a greeting, as served on first start.
    pub fn with_greeting() -> Self {
        let room = Self::new();
        room.add_message("hello world");
        room
    }

    pub fn add_message(&self, body: impl Into<String>) -> Message {
        let message = Message::new(body);
        self.messages.write().push(message.clone());
        message
    }

    pub fn update_message(&self, id: &str, body: impl Into<String>) -> Option<Message> {
        let mut messages = self.messages.write();
        let message = messages.iter_mut().find(|m| m.id == id)?;
        message.body = body.into();
        Some(message.clone())
    }

    pub fn get_message(&self, id: &str) -> Option<Message> {
        self.messages.read().iter().find(|m| m.id == id).cloned()
    }

    pub fn remove_message(&self, id: &str) -> Option<Message> {
        let mut messages = self.messages.write();
        let index = messages.iter().position(|m| m.id == id)?;
        Some(messages.remove(index))
    }

    pub fn list_messages(&self) -> Vec<Message> {
        self.messages.read().clone()
    }
}
