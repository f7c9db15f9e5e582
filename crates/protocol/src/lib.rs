//! Wire types for the wallet bridge protocol.
//!
//! Covers the decrypted messages a wallet sends through a bridge (`connect`,
//! `connect_error`, RPC replies) and the requests this client sends back.

pub mod constants;
pub mod envelope;
pub mod messages;

pub use constants::Event;
pub use envelope::{BridgeMessage, Message, MessageId, WireError};
pub use messages::{ConnectItemReply, DeviceInfo, DisconnectRequest, Payload};
