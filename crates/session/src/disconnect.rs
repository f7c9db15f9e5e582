//! Disconnect handshake over the bridge bound by connect.

use std::slice;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use tonconnect_protocol::DisconnectRequest;
use tonconnect_protocol::constants::METHOD_DISCONNECT;

use crate::bridge::{BridgeTransport, SendOptions};
use crate::client::{SessionClient, with_deadline};
use crate::error::{DisconnectError, SessionError};
use crate::multiplexer::Multiplexer;
use crate::types::Session;

impl SessionClient {
    /// Asks the bound wallet to end the session and waits for its reply.
    ///
    /// The request is tagged `last_request_id + 1`; only a reply carrying
    /// that id ends the wait. Ids of every other message are still harvested
    /// into the session. A failed send fails the call immediately.
    ///
    /// The session is not cleared; the caller decides what to do with it.
    pub async fn disconnect(
        &self,
        session: &mut Session,
        options: SendOptions,
        cancel: &CancellationToken,
    ) -> Result<(), SessionError> {
        if !session.is_connected() {
            return Err(SessionError::NotConnected);
        }

        let request_id = session.next_request_id();
        let body = serde_json::to_string(&DisconnectRequest::new(request_id))?;
        let options = options.or_defaults(self.config.message_ttl(), METHOD_DISCONNECT);

        let scope = cancel.child_token();
        let mut mux = Multiplexer::spawn(
            self.transport.clone(),
            slice::from_ref(&session.bridge_url),
            scope.clone(),
            self.config.channel_capacity(),
        );
        debug!(bridge = %session.bridge_url, id = request_id, "sending disconnect");

        let result = with_deadline(
            self.config.disconnect_timeout(),
            exchange(
                self.transport.as_ref(),
                &mut mux,
                session,
                request_id,
                body,
                &options,
                scope,
            ),
        )
        .await;
        mux.shutdown().await;
        result
    }
}

/// Races the send against the reply stream of the bound bridge.
async fn exchange(
    transport: &dyn BridgeTransport,
    mux: &mut Multiplexer,
    session: &mut Session,
    request_id: u64,
    body: String,
    options: &SendOptions,
    scope: CancellationToken,
) -> Result<(), SessionError> {
    let bridge_url = session.bridge_url.clone();
    let peer = session.client_id.clone();
    let send = transport.send(&bridge_url, &peer, body, options, scope);
    tokio::pin!(send);
    let mut sent = false;

    loop {
        tokio::select! {
            biased;

            res = &mut send, if !sent => {
                if let Err(e) = res {
                    warn!(bridge = %bridge_url, error = %e, "disconnect send failed");
                    mux.cancel();
                    return Err(e.into());
                }
                sent = true;
                session.observe_id(request_id);
                trace!(id = request_id, "disconnect request delivered");
            }

            msg = mux.next() => {
                let msg = msg?;
                let id = msg.message.id.get();
                match id {
                    Some(id) => session.observe_id(id),
                    None => debug!(bridge = %bridge_url, "reply carried no usable id"),
                }
                if id != Some(request_id) {
                    trace!(id = %msg.message.id, expected = request_id, "ignoring uncorrelated message");
                    continue;
                }

                mux.cancel();
                if let Some(error) = &msg.message.error {
                    let err = DisconnectError::from_wire(error);
                    warn!(error = %err, "wallet rejected disconnect");
                    return Err(err.into());
                }
                info!(client_id = %peer, "wallet disconnected");
                return Ok(());
            }
        }
    }
}
