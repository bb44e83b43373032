//! Room event and state event payload helpers.
//!
//! # Design
//! Message kinds are a closed enum rather than open string tags, so a new
//! kind cannot be half-wired without the compiler pointing at every match.
//! Content construction is map-based because the protocol allows arbitrary
//! extra keys on text messages; the file kind is the one deliberate
//! exception — it forwards only its allow-list and silently drops the rest.

use serde_json::{Map, Value};

use crate::encode::encode_path_segment;
use crate::error::Error;

/// Event type for room messages.
pub const ROOM_MESSAGE: &str = "m.room.message";

/// Default `format` applied when a `formatted_body` is supplied without one.
pub const HTML_FORMAT: &str = "org.matrix.custom.html";

/// Closed set of supported message kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Notice,
    File,
}

impl MessageKind {
    /// Protocol `msgtype` constant for this kind.
    pub fn msgtype(&self) -> &'static str {
        match self {
            MessageKind::Text => "m.text",
            MessageKind::Notice => "m.notice",
            MessageKind::File => "m.file",
        }
    }
}

/// An outgoing timeline event: content, event type, target room, and the
/// caller-supplied idempotency token that becomes a path segment of the send
/// request. The core never generates transaction ids — retries keyed by a
/// caller-controlled value are the caller's tool for deduplication.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomEvent {
    pub content: Map<String, Value>,
    pub event_type: String,
    pub room_id: String,
    pub transaction_id: String,
}

impl RoomEvent {
    /// Build an `m.room.message` event from a field map.
    ///
    /// Text and notice messages require `body`; every supplied field is
    /// forwarded and `msgtype` is set last so it cannot be overridden. If
    /// `formatted_body` is present without `format`, the format defaults to
    /// [`HTML_FORMAT`]. File messages require `body` and `url` and forward
    /// only `{body, url, filename, info}`.
    pub fn message(
        room_id: &str,
        kind: MessageKind,
        fields: Map<String, Value>,
        transaction_id: &str,
    ) -> Result<Self, Error> {
        let content = message_content(kind, fields)?;
        Ok(Self {
            content,
            event_type: ROOM_MESSAGE.to_string(),
            room_id: room_id.to_string(),
            transaction_id: transaction_id.to_string(),
        })
    }

    /// Shorthand for a plain text message with just a body.
    pub fn message_text(room_id: &str, body: &str, transaction_id: &str) -> Self {
        let mut content = Map::new();
        content.insert("msgtype".to_string(), MessageKind::Text.msgtype().into());
        content.insert("body".to_string(), body.into());
        Self {
            content,
            event_type: ROOM_MESSAGE.to_string(),
            room_id: room_id.to_string(),
            transaction_id: transaction_id.to_string(),
        }
    }

    /// An event of an arbitrary type with caller-provided content.
    pub fn custom(
        room_id: &str,
        event_type: &str,
        content: Map<String, Value>,
        transaction_id: &str,
    ) -> Self {
        Self {
            content,
            event_type: event_type.to_string(),
            room_id: room_id.to_string(),
            transaction_id: transaction_id.to_string(),
        }
    }
}

/// Build message content for the given kind, enforcing required fields.
fn message_content(kind: MessageKind, fields: Map<String, Value>) -> Result<Map<String, Value>, Error> {
    match kind {
        MessageKind::Text | MessageKind::Notice => {
            if !fields.contains_key("body") {
                return Err(Error::Construction(format!(
                    "{} message requires a body",
                    kind.msgtype()
                )));
            }
            let mut content = fields;
            if content.contains_key("formatted_body") && !content.contains_key("format") {
                content.insert("format".to_string(), HTML_FORMAT.into());
            }
            content.insert("msgtype".to_string(), kind.msgtype().into());
            Ok(content)
        }
        MessageKind::File => {
            if !fields.contains_key("body") || !fields.contains_key("url") {
                return Err(Error::Construction(
                    "file message requires body and url".to_string(),
                ));
            }
            // Allow-list: anything outside it is dropped, not an error.
            let mut content = Map::new();
            for key in ["body", "url", "filename", "info"] {
                if let Some(value) = fields.get(key) {
                    content.insert(key.to_string(), value.clone());
                }
            }
            content.insert("msgtype".to_string(), MessageKind::File.msgtype().into());
            Ok(content)
        }
    }
}

/// An outgoing room-state event, keyed by `(event_type, state_key)` on the
/// server. `state_key` defaults to the empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEvent {
    pub content: Map<String, Value>,
    pub event_type: String,
    pub room_id: String,
    pub state_key: String,
}

impl StateEvent {
    /// `m.room.join_rules` with content `{join_rule}`.
    pub fn join_rules(room_id: &str, rule: &str) -> Self {
        let mut content = Map::new();
        content.insert("join_rule".to_string(), rule.into());
        Self::custom(room_id, "m.room.join_rules", "", content)
    }

    /// `m.room.topic` with content `{topic}`.
    pub fn topic(room_id: &str, topic: &str) -> Self {
        let mut content = Map::new();
        content.insert("topic".to_string(), topic.into());
        Self::custom(room_id, "m.room.topic", "", content)
    }

    /// `m.room.name` with content `{name}`.
    pub fn name(room_id: &str, name: &str) -> Self {
        let mut content = Map::new();
        content.insert("name".to_string(), name.into());
        Self::custom(room_id, "m.room.name", "", content)
    }

    /// A state event of an arbitrary type and state key.
    pub fn custom(room_id: &str, event_type: &str, state_key: &str, content: Map<String, Value>) -> Self {
        Self {
            content,
            event_type: event_type.to_string(),
            room_id: room_id.to_string(),
            state_key: state_key.to_string(),
        }
    }

    /// Path of the state write/read endpoint for this event, with every
    /// caller-supplied segment encoded.
    pub(crate) fn path(&self) -> String {
        format!(
            "/_matrix/client/r0/rooms/{}/state/{}/{}",
            encode_path_segment(&self.room_id),
            encode_path_segment(&self.event_type),
            encode_path_segment(&self.state_key)
        )
    }
}
