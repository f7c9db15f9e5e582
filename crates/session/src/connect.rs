//! Connect handshake: first `connect` or `connect_error` on any bridge wins.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use tonconnect_protocol::{BridgeMessage, Event};

use crate::bridge::{Wallet, bridge_urls};
use crate::client::{SessionClient, with_deadline};
use crate::error::{ConnectError, SessionError};
use crate::items::split_items;
use crate::multiplexer::Multiplexer;
use crate::types::{ConnectResponse, Session};

impl SessionClient {
    /// Waits for one of `wallets` to answer the pending connect request.
    ///
    /// Every distinct bridge is subscribed concurrently. The first terminal
    /// event delivered on any of them decides the outcome and cancels the
    /// rest. On `connect` the session is bound to the answering peer and
    /// bridge; refused items are reported in
    /// [`ConnectResponse::item_errors`]. On `connect_error` the session is
    /// left untouched.
    pub async fn connect(
        &self,
        session: &mut Session,
        wallets: &[Wallet],
        cancel: &CancellationToken,
    ) -> Result<ConnectResponse, SessionError> {
        let urls = bridge_urls(wallets);
        if urls.is_empty() {
            return Err(SessionError::NoBridges);
        }
        debug!(bridges = urls.len(), "waiting for wallet to connect");

        let scope = cancel.child_token();
        let mut mux = Multiplexer::spawn(
            self.transport.clone(),
            &urls,
            scope,
            self.config.channel_capacity(),
        );

        let result = with_deadline(
            self.config.connect_timeout(),
            await_connect(&mut mux, session),
        )
        .await;
        mux.shutdown().await;
        result
    }
}

/// Consumes the merged stream until the first terminal event.
async fn await_connect(
    mux: &mut Multiplexer,
    session: &mut Session,
) -> Result<ConnectResponse, SessionError> {
    loop {
        let msg = mux.next().await?;
        let event = msg.message.event;
        if !event.is_connect_terminal() {
            trace!(bridge = %msg.bridge_url, ?event, "ignoring non-terminal message");
            continue;
        }

        mux.cancel();
        if event == Event::Connect {
            return Ok(accept(msg, session));
        }
        let err = ConnectError::from_payload(&msg.message.payload_or_default());
        warn!(bridge = %msg.bridge_url, from = %msg.from, error = %err, "wallet rejected connection");
        return Err(err.into());
    }
}

/// Binds the session to the winning peer and builds the response.
fn accept(msg: BridgeMessage, session: &mut Session) -> ConnectResponse {
    let BridgeMessage {
        from,
        bridge_url,
        message,
    } = msg;

    match message.id.get() {
        Some(id) => session.observe_id(id),
        None => debug!(bridge = %bridge_url, "connect event carried no usable id"),
    }
    session.client_id = from;
    session.bridge_url = bridge_url;

    let payload = message.payload.unwrap_or_default();
    let (items, item_errors) = split_items(payload.items);
    if let Some(errors) = &item_errors {
        warn!(failed = errors.len(), granted = items.len(), "wallet refused some connect items");
    }
    info!(
        client_id = %session.client_id,
        bridge = %session.bridge_url,
        "wallet connected"
    );

    ConnectResponse {
        device: payload.device.unwrap_or_default(),
        items,
        item_errors,
    }
}
