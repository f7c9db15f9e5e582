use serde::{Deserialize, Serialize};

use crate::constants::METHOD_DISCONNECT;
use crate::envelope::{WireError, null_as_empty};

// ---------------------------------------------------------------------------
// Wallet -> app
// ---------------------------------------------------------------------------

/// Payload of a `connect` or `connect_error` event.
///
/// A `connect` event fills `device` and `items`; a `connect_error` event
/// fills `code` and `message`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<DeviceInfo>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<ConnectItemReply>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub code: i64,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "String::is_empty"
    )]
    pub message: String,
}

fn is_zero(v: &i64) -> bool {
    *v == 0
}

impl Payload {
    /// Payload of a successful `connect` event.
    pub fn connected(device: DeviceInfo, items: Vec<ConnectItemReply>) -> Self {
        Self {
            device: Some(device),
            items,
            ..Self::default()
        }
    }

    /// Payload of a `connect_error` event.
    pub fn error(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }
}

/// Wallet device description sent with a successful connect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub app_name: String,
    #[serde(default)]
    pub app_version: String,
    #[serde(default)]
    pub max_protocol_version: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<serde_json::Value>,
}

/// Reply to one requested connect item (`ton_addr`, `ton_proof`, ...).
///
/// Item-specific fields are kept opaque in `data`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectItemReply {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
    #[serde(flatten)]
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl ConnectItemReply {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Marks the item as failed.
    pub fn with_error(mut self, error: WireError) -> Self {
        self.error = Some(error);
        self
    }

    /// Adds an item-specific field.
    pub fn with_field(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}

// ---------------------------------------------------------------------------
// App -> wallet
// ---------------------------------------------------------------------------

/// Disconnect RPC request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisconnectRequest {
    pub id: String,
    pub method: String,
    pub params: Vec<serde_json::Value>,
}

impl DisconnectRequest {
    pub fn new(id: u64) -> Self {
        Self {
            id: id.to_string(),
            method: METHOD_DISCONNECT.to_string(),
            params: Vec::new(),
        }
    }
}
