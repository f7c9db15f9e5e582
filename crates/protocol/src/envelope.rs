use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::Event;
use crate::messages::Payload;

/// Request identifier as it appears on the wire.
///
/// Wallets send it either as a JSON number or as a numeric string. Anything
/// else (missing, `null`, a non-numeric string, a negative number) degrades to
/// [`MessageId::Absent`] instead of failing the whole message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MessageId {
    #[default]
    Absent,
    Present(u64),
}

impl MessageId {
    /// Interprets an arbitrary JSON value as a request id.
    pub fn from_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Number(n) => n.as_u64().map_or(Self::Absent, Self::Present),
            serde_json::Value::String(s) => s.parse::<u64>().map_or(Self::Absent, Self::Present),
            _ => Self::Absent,
        }
    }

    /// Returns the numeric id, if one was parsed.
    pub fn get(self) -> Option<u64> {
        match self {
            Self::Present(id) => Some(id),
            Self::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<u64> for MessageId {
    fn from(id: u64) -> Self {
        Self::Present(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Present(id) => write!(f, "{id}"),
            Self::Absent => f.write_str("-"),
        }
    }
}

impl Serialize for MessageId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Present(id) => serializer.serialize_u64(*id),
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for MessageId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(value.as_ref().map(Self::from_value).unwrap_or_default())
    }
}

/// Error object reported by the wallet, either at the top level of a reply
/// or inside a connect item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireError {
    #[serde(default)]
    pub code: i64,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub message: String,
}

/// Reads an optional string, treating an explicit `null` as empty.
pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl WireError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Error carrying only a numeric code.
    pub fn code(code: i64) -> Self {
        Self::new(code, "")
    }
}

/// Decrypted wallet-to-app message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, skip_serializing_if = "is_other_event")]
    pub event: Event,
    #[serde(default, skip_serializing_if = "MessageId::is_absent")]
    pub id: MessageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}

fn is_other_event(event: &Event) -> bool {
    *event == Event::Other
}

impl Message {
    /// Parses a decrypted bridge payload.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Creates a message tagged with `event`.
    pub fn event(event: Event, payload: Option<Payload>) -> Self {
        Self {
            event,
            payload,
            ..Self::default()
        }
    }

    /// Creates an untagged RPC reply.
    pub fn reply(id: impl Into<MessageId>, error: Option<WireError>) -> Self {
        Self {
            id: id.into(),
            error,
            ..Self::default()
        }
    }

    /// Sets the request id.
    pub fn with_id(mut self, id: impl Into<MessageId>) -> Self {
        self.id = id.into();
        self
    }

    /// Returns the payload, or an empty one when the message carried none.
    pub fn payload_or_default(&self) -> Payload {
        self.payload.clone().unwrap_or_default()
    }
}

/// One message delivered by a bridge subscription, tagged with its origin.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeMessage {
    /// Client id of the peer that sent the message.
    pub from: String,
    /// Bridge the message arrived through.
    pub bridge_url: String,
    pub message: Message,
}

impl BridgeMessage {
    pub fn new(from: impl Into<String>, bridge_url: impl Into<String>, message: Message) -> Self {
        Self {
            from: from.into(),
            bridge_url: bridge_url.into(),
            message,
        }
    }
}
