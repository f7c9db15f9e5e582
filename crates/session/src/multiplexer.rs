//! Fan-in of several bridge subscriptions into one ordered delivery point.
//!
//! One pump task per bridge forwards messages into a shared channel. All
//! pumps observe the same [`CancellationToken`]; any pump failure cancels the
//! scope and fails the whole multiplexer.

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use tonconnect_protocol::BridgeMessage;

use crate::bridge::{BridgeError, BridgeTransport};
use crate::error::SessionError;

/// Merged stream of messages from every subscribed bridge.
pub(crate) struct Multiplexer {
    rx: mpsc::Receiver<BridgeMessage>,
    tasks: JoinSet<Result<(), BridgeError>>,
    cancel: CancellationToken,
}

impl Multiplexer {
    /// Spawns one subscription pump per URL under `cancel`.
    pub(crate) fn spawn(
        transport: Arc<dyn BridgeTransport>,
        urls: &[String],
        cancel: CancellationToken,
        capacity: usize,
    ) -> Self {
        let (tx, rx) = mpsc::channel(capacity);
        let mut tasks = JoinSet::new();
        for url in urls {
            tasks.spawn(pump(
                transport.clone(),
                url.clone(),
                tx.clone(),
                cancel.clone(),
            ));
        }
        Self { rx, tasks, cancel }
    }

    /// Cancels the scope; idempotent.
    pub(crate) fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the next message from any bridge.
    ///
    /// Fails with [`SessionError::Cancelled`] once the scope is cancelled, or
    /// with the first pump failure (which also cancels the scope).
    pub(crate) async fn next(&mut self) -> Result<BridgeMessage, SessionError> {
        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => return Err(SessionError::Cancelled),

                // Messages queued before a pump failed are still delivered, so
                // a failure can be reported late while a busy peer keeps the
                // channel full.
                msg = self.rx.recv() => {
                    return match msg {
                        Some(msg) => Ok(msg),
                        None => Err(self.drain_failure().await),
                    };
                }

                Some(joined) = self.tasks.join_next() => {
                    self.check_joined(joined)?;
                }
            }
        }
    }

    /// Cancels the scope and waits until every pump has exited.
    pub(crate) async fn shutdown(mut self) {
        self.cancel.cancel();
        while self.tasks.join_next().await.is_some() {}
    }

    fn check_joined(
        &self,
        joined: Result<Result<(), BridgeError>, tokio::task::JoinError>,
    ) -> Result<(), SessionError> {
        match joined {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                self.cancel.cancel();
                Err(e.into())
            }
            Err(e) => {
                self.cancel.cancel();
                Err(SessionError::Task(e.to_string()))
            }
        }
    }

    /// Called once every sender is gone: reports the pump failure that
    /// closed the channel, if any.
    async fn drain_failure(&mut self) -> SessionError {
        while let Some(joined) = self.tasks.join_next().await {
            if let Err(e) = self.check_joined(joined) {
                return e;
            }
        }
        if self.cancel.is_cancelled() {
            SessionError::Cancelled
        } else {
            SessionError::StreamClosed
        }
    }
}

/// Forwards one bridge subscription into the shared channel until the scope
/// is cancelled or the subscription fails.
async fn pump(
    transport: Arc<dyn BridgeTransport>,
    url: String,
    tx: mpsc::Sender<BridgeMessage>,
    cancel: CancellationToken,
) -> Result<(), BridgeError> {
    let mut stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Ok(()),
        stream = transport.subscribe(&url, cancel.clone()) => match stream {
            Ok(s) => s,
            Err(e) => {
                warn!(bridge = %url, error = %e, "subscription failed");
                return Err(e);
            }
        },
    };
    debug!(bridge = %url, "subscription opened");

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            item = stream.next() => match item {
                Some(Ok(msg)) => {
                    trace!(bridge = %url, from = %msg.from, event = ?msg.message.event, id = %msg.message.id, "bridge message");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => break,
                        sent = tx.send(msg) => if sent.is_err() {
                            break;
                        },
                    }
                }
                Some(Err(e)) => {
                    warn!(bridge = %url, error = %e, "subscription error");
                    return Err(e);
                }
                None => {
                    warn!(bridge = %url, "subscription ended");
                    return Err(BridgeError::Closed { url });
                }
            },
        }
    }

    debug!(bridge = %url, "subscription closed");
    Ok(())
}
