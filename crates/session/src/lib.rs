//! Session handshakes for the wallet bridge protocol.
//!
//! A [`SessionClient`] establishes a session with one of several candidate
//! wallets by racing their bridges for the first `connect` event, and later
//! tears it down with a disconnect request correlated by id. The bridge
//! transport itself is supplied by the app through [`BridgeTransport`].

pub mod bridge;
pub mod client;
pub mod config;
mod connect;
mod disconnect;
pub mod error;
pub mod items;
#[cfg(test)]
pub(crate) mod mock;
mod multiplexer;
pub mod types;

pub use bridge::{BridgeError, BridgeTransport, MessageStream, SendOptions, Wallet, bridge_urls};
pub use client::SessionClient;
pub use config::{ConfigError, SessionConfig};
pub use error::{ConnectError, DisconnectError, ItemError, SessionError};
pub use items::{ItemErrors, split_items};
pub use types::{ConnectResponse, Session};
