//! Public types for the session client.

use tonconnect_protocol::{ConnectItemReply, DeviceInfo};

use crate::items::ItemErrors;

/// Identity state binding the app to one wallet peer.
///
/// Owned by the caller and passed to every handshake. Only a successful
/// connect and a correlated disconnect reply write to it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Client id of the wallet peer bound by the last connect.
    pub client_id: String,
    /// Bridge the wallet answered through.
    pub bridge_url: String,
    /// Highest request id sent or observed.
    pub last_request_id: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once a connect has bound a bridge.
    pub fn is_connected(&self) -> bool {
        !self.bridge_url.is_empty()
    }

    /// Id to use for the next request.
    pub fn next_request_id(&self) -> u64 {
        self.last_request_id.saturating_add(1)
    }

    /// Records an id seen on the wire. `last_request_id` never decreases.
    pub fn observe_id(&mut self, id: u64) {
        if id > self.last_request_id {
            self.last_request_id = id;
        }
    }
}

/// Result of a connect handshake that the wallet accepted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectResponse {
    pub device: DeviceInfo,
    /// Items the wallet granted.
    pub items: Vec<ConnectItemReply>,
    /// Items the wallet refused, if any.
    pub item_errors: Option<ItemErrors>,
}

impl ConnectResponse {
    /// Fails if any requested item was refused.
    pub fn check(&self) -> Result<(), &ItemErrors> {
        match &self.item_errors {
            Some(errors) => Err(errors),
            None => Ok(()),
        }
    }

    /// Returns the granted item named `name`.
    pub fn item(&self, name: &str) -> Option<&ConnectItemReply> {
        self.items.iter().find(|i| i.name == name)
    }
}
