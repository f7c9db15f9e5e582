//! In-memory bridge transport for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::stream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tonconnect_protocol::{BridgeMessage, Message};

use crate::bridge::{BridgeError, BridgeFuture, BridgeTransport, MessageStream, SendOptions};

type Feed = mpsc::UnboundedReceiver<Result<BridgeMessage, BridgeError>>;

/// Message recorded by [`MockTransport::send`].
#[derive(Debug, Clone)]
pub(crate) struct SentMessage {
    pub url: String,
    pub to: String,
    pub body: serde_json::Value,
    pub options: SendOptions,
}

/// Feeds messages into one mock bridge subscription.
pub(crate) struct BridgeHandle {
    url: String,
    tx: mpsc::UnboundedSender<Result<BridgeMessage, BridgeError>>,
}

impl BridgeHandle {
    pub fn deliver(&self, from: &str, message: Message) {
        let _ = self
            .tx
            .send(Ok(BridgeMessage::new(from, self.url.clone(), message)));
    }

    pub fn fail(&self, error: BridgeError) {
        let _ = self.tx.send(Err(error));
    }
}

/// Decrements the live stream count when the subscription stream is dropped.
struct LiveGuard(Arc<AtomicUsize>);

impl Drop for LiveGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub(crate) struct MockTransport {
    feeds: Mutex<HashMap<String, Feed>>,
    subscriptions: Mutex<Vec<(String, CancellationToken)>>,
    live: Arc<AtomicUsize>,
    sent: Mutex<Vec<SentMessage>>,
    send_error: Mutex<Option<BridgeError>>,
    hold_sends: AtomicBool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a bridge; subscribing to an unregistered URL fails.
    pub fn bridge(&self, url: &str) -> BridgeHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        self.feeds.lock().unwrap().insert(url.to_string(), rx);
        BridgeHandle {
            url: url.to_string(),
            tx,
        }
    }

    /// Makes every subsequent send fail with `error`.
    pub fn fail_sends(&self, error: BridgeError) {
        *self.send_error.lock().unwrap() = Some(error);
    }

    /// Makes every subsequent send stay pending until it is dropped.
    pub fn hold_sends(&self) {
        self.hold_sends.store(true, Ordering::SeqCst);
    }

    /// Number of subscription streams not yet dropped.
    pub fn live_streams(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    /// URLs subscribed so far, with the scope each was opened under.
    pub fn subscriptions(&self) -> Vec<(String, CancellationToken)> {
        self.subscriptions.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl BridgeTransport for MockTransport {
    fn subscribe<'a>(
        &'a self,
        url: &'a str,
        cancel: CancellationToken,
    ) -> BridgeFuture<'a, MessageStream> {
        Box::pin(async move {
            self.subscriptions
                .lock()
                .unwrap()
                .push((url.to_string(), cancel));
            let feed = self
                .feeds
                .lock()
                .unwrap()
                .remove(url)
                .ok_or_else(|| BridgeError::Subscribe {
                    url: url.to_string(),
                    reason: "unreachable".into(),
                })?;

            self.live.fetch_add(1, Ordering::SeqCst);
            let guard = LiveGuard(self.live.clone());
            let stream = stream::unfold((feed, guard), |(mut feed, guard)| async move {
                feed.recv().await.map(|item| (item, (feed, guard)))
            });
            Ok(Box::pin(stream) as MessageStream)
        })
    }

    fn send<'a>(
        &'a self,
        url: &'a str,
        to: &'a str,
        body: String,
        options: &'a SendOptions,
        _cancel: CancellationToken,
    ) -> BridgeFuture<'a, ()> {
        Box::pin(async move {
            if self.hold_sends.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if let Some(err) = self.send_error.lock().unwrap().clone() {
                return Err(err);
            }
            let body = serde_json::from_str(&body).map_err(|e| BridgeError::Send {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
            self.sent.lock().unwrap().push(SentMessage {
                url: url.to_string(),
                to: to.to_string(),
                body,
                options: options.clone(),
            });
            Ok(())
        })
    }
}
