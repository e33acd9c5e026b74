use std::str::FromStr;

use serde::Serialize;
use sqlx::{sqlite::SqliteRow, FromRow, Row};

/// Recipient name meaning "everyone in the room".
pub const BROADCAST: &str = "Todos";
pub const ARRIVAL_TEXT: &str = "entra na sala...";
pub const DEPARTURE_TEXT: &str = "sai da sala...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Participant {
    pub name: String,
    #[serde(rename = "lastStatus")]
    pub last_status: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Message,
    PrivateMessage,
    Status,
}

impl MessageKind {
    /// Kinds a participant may choose when sending or editing.
    pub const USER: [&'static str; 2] = ["message", "private_message"];

    pub fn as_str(self) -> &'static str {
        match self {
            MessageKind::Message => "message",
            MessageKind::PrivateMessage => "private_message",
            MessageKind::Status => "status",
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("unknown message type: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for MessageKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "message" => Ok(MessageKind::Message),
            "private_message" => Ok(MessageKind::PrivateMessage),
            "status" => Ok(MessageKind::Status),
            other => Err(UnknownKind(other.into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub time: String,
}

impl<'r> FromRow<'r, SqliteRow> for Message {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("kind")?;
        Ok(Self {
            id: row.try_get("id")?,
            from: row.try_get("from_name")?,
            to: row.try_get("to_name")?,
            text: row.try_get("text")?,
            kind: kind.parse().map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            time: row.try_get("time")?,
        })
    }
}

/// A message before storage has assigned it an id.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub from: String,
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
    pub time: String,
}

impl NewMessage {
    pub fn arrival(name: &str, time: String) -> Self {
        Self::status(name, ARRIVAL_TEXT, time)
    }

    pub fn departure(name: &str, time: String) -> Self {
        Self::status(name, DEPARTURE_TEXT, time)
    }

    fn status(name: &str, text: &str, time: String) -> Self {
        Self {
            from: name.into(),
            to: BROADCAST.into(),
            text: text.into(),
            kind: MessageKind::Status,
            time,
        }
    }
}

/// The editable part of a message.
#[derive(Debug, Clone)]
pub struct MessageEdit {
    pub to: String,
    pub text: String,
    pub kind: MessageKind,
}
