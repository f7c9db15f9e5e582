use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default time-to-live the bridge keeps an undelivered message.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_secs(300);

/// Default deadline for the connect handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default deadline for the disconnect handshake.
pub const DEFAULT_DISCONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default capacity of the fan-in channel shared by all bridge subscriptions.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 16;

/// RPC method name of the disconnect request.
pub const METHOD_DISCONNECT: &str = "disconnect";

/// RPC method the wallet names when it rejects a disconnect with code 400.
pub const METHOD_SEND_TRANSACTION: &str = "sendTransaction";

/// Event tag carried by wallet-to-app messages.
///
/// Replies to RPC requests carry no event tag at all; they and any tag this
/// client does not know about deserialize as [`Event::Other`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Event {
    #[serde(rename = "connect")]
    Connect,
    #[serde(rename = "connect_error")]
    ConnectError,
    #[serde(rename = "disconnect")]
    Disconnect,
    #[default]
    #[serde(other, rename = "other")]
    Other,
}

impl Event {
    /// Returns `true` for events that end the connect wait loop.
    pub fn is_connect_terminal(self) -> bool {
        matches!(self, Event::Connect | Event::ConnectError)
    }
}
