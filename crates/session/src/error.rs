//! Error taxonomy for the connect and disconnect handshakes.
//!
//! Wallets report failures as a numeric code plus an optional message. A
//! non-empty message always wins and is shown verbatim; otherwise the code is
//! mapped per phase. Codes a phase does not know map to that phase's
//! `Unknown` variant.

use tonconnect_protocol::constants::METHOD_SEND_TRANSACTION;
use tonconnect_protocol::{Payload, WireError};

use crate::bridge::BridgeError;
use crate::config::ConfigError;

/// Failure reported by the wallet in a `connect_error` event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectError {
    #[error("bad request")]
    BadRequest,

    #[error("app manifest not found")]
    ManifestNotFound,

    #[error("app manifest content error")]
    ManifestContentError,

    #[error("unknown app")]
    UnknownApp,

    #[error("user declined the connection")]
    UserDeclined,

    #[error("{message}")]
    Reported { code: i64, message: String },

    #[error("unknown connection error")]
    Unknown { code: i64 },
}

impl ConnectError {
    pub fn from_code(code: i64, message: &str) -> Self {
        if !message.is_empty() {
            return Self::Reported {
                code,
                message: message.to_string(),
            };
        }
        match code {
            1 => Self::BadRequest,
            2 => Self::ManifestNotFound,
            3 => Self::ManifestContentError,
            100 => Self::UnknownApp,
            300 => Self::UserDeclined,
            _ => Self::Unknown { code },
        }
    }

    pub fn from_payload(payload: &Payload) -> Self {
        Self::from_code(payload.code, &payload.message)
    }
}

/// Failure of a single connect item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("{item:?} method is not supported")]
    NotSupported { item: String },

    #[error("{message}")]
    Reported {
        item: String,
        code: i64,
        message: String,
    },

    #[error("{item:?} method unknown error")]
    Unknown { item: String, code: i64 },
}

impl ItemError {
    pub fn from_wire(item: &str, error: &WireError) -> Self {
        if !error.message.is_empty() {
            return Self::Reported {
                item: item.to_string(),
                code: error.code,
                message: error.message.clone(),
            };
        }
        match error.code {
            400 => Self::NotSupported {
                item: item.to_string(),
            },
            code => Self::Unknown {
                item: item.to_string(),
                code,
            },
        }
    }

    /// Name of the item the error belongs to.
    pub fn item(&self) -> &str {
        match self {
            Self::NotSupported { item } | Self::Reported { item, .. } | Self::Unknown { item, .. } => {
                item
            }
        }
    }
}

/// Failure reported by the wallet in reply to a disconnect request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DisconnectError {
    #[error("bad request")]
    BadRequest,

    #[error("unknown app")]
    UnknownApp,

    #[error("{method:?} method is not supported", method = METHOD_SEND_TRANSACTION)]
    MethodNotSupported,

    #[error("{message}")]
    Reported { code: i64, message: String },

    #[error("unknown disconnection error")]
    Unknown { code: i64 },
}

impl DisconnectError {
    pub fn from_wire(error: &WireError) -> Self {
        if !error.message.is_empty() {
            return Self::Reported {
                code: error.code,
                message: error.message.clone(),
            };
        }
        match error.code {
            1 => Self::BadRequest,
            100 => Self::UnknownApp,
            400 => Self::MethodNotSupported,
            code => Self::Unknown { code },
        }
    }
}

/// Errors returned by [`SessionClient`](crate::SessionClient) operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("connection rejected: {0}")]
    Connect(#[from] ConnectError),

    #[error("disconnection rejected: {0}")]
    Disconnect(#[from] DisconnectError),

    #[error("cancelled")]
    Cancelled,

    #[error("timed out")]
    Timeout,

    #[error("no bridge to connect through")]
    NoBridges,

    #[error("session is not connected")]
    NotConnected,

    #[error("all bridge subscriptions closed")]
    StreamClosed,

    #[error("subscription task failed: {0}")]
    Task(String),
}
