//! Bridge transport seam and wallet-to-bridge resolution.
//!
//! The transport (HTTP event stream, WebSocket relay, ...) lives outside this
//! crate. The app implements [`BridgeTransport`] on top of it, which keeps the
//! handshakes decoupled from I/O and testable with mocks.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use futures_util::Stream;
use tokio_util::sync::CancellationToken;

use tonconnect_protocol::BridgeMessage;

/// Errors raised by a bridge transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("subscribe to {url} failed: {reason}")]
    Subscribe { url: String, reason: String },

    #[error("send through {url} failed: {reason}")]
    Send { url: String, reason: String },

    #[error("subscription to {url} closed")]
    Closed { url: String },
}

/// Boxed future returned by [`BridgeTransport`] methods.
pub type BridgeFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, BridgeError>> + Send + 'a>>;

/// Stream of decrypted messages from one bridge subscription.
///
/// An `Err` item or the end of the stream is a transport failure.
pub type MessageStream = Pin<Box<dyn Stream<Item = Result<BridgeMessage, BridgeError>> + Send>>;

/// Abstract connection to wallet bridges.
pub trait BridgeTransport: Send + Sync {
    /// Opens a long-lived subscription to the bridge at `url`.
    ///
    /// `cancel` is the scope of the calling handshake; implementations should
    /// stop any background work once it fires.
    fn subscribe<'a>(
        &'a self,
        url: &'a str,
        cancel: CancellationToken,
    ) -> BridgeFuture<'a, MessageStream>;

    /// Delivers `body` to peer `to` through the bridge at `url`.
    fn send<'a>(
        &'a self,
        url: &'a str,
        to: &'a str,
        body: String,
        options: &'a SendOptions,
        cancel: CancellationToken,
    ) -> BridgeFuture<'a, ()>;
}

/// Per-message delivery options forwarded to the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// How long the bridge keeps the message for an offline peer.
    pub ttl: Option<Duration>,
    /// Push-notification topic; the RPC method name when unset.
    pub topic: Option<String>,
}

impl SendOptions {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Fills unset fields from the given defaults.
    pub(crate) fn or_defaults(mut self, ttl: Duration, topic: &str) -> Self {
        self.ttl.get_or_insert(ttl);
        self.topic.get_or_insert_with(|| topic.to_string());
        self
    }
}

/// Candidate wallet as resolved by the wallet registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wallet {
    pub name: String,
    pub bridge_url: String,
}

impl Wallet {
    pub fn new(name: impl Into<String>, bridge_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bridge_url: bridge_url.into(),
        }
    }
}

/// Returns the distinct bridge URLs of `wallets`, in first-seen order.
///
/// Wallets sharing a bridge are served by a single subscription.
pub fn bridge_urls(wallets: &[Wallet]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::with_capacity(wallets.len());
    for wallet in wallets {
        let url = wallet.bridge_url.trim_end_matches('/');
        if url.is_empty() || urls.iter().any(|u| u == url) {
            continue;
        }
        urls.push(url.to_string());
    }
    urls
}
