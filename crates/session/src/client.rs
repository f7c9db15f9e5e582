//! Session client: runs connect and disconnect handshakes over a transport.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::bridge::BridgeTransport;
use crate::config::SessionConfig;
use crate::error::SessionError;

/// Runs handshakes against wallet bridges.
///
/// Holds no session state itself; every call takes the caller's
/// [`Session`](crate::Session).
#[derive(Clone)]
pub struct SessionClient {
    pub(crate) transport: Arc<dyn BridgeTransport>,
    pub(crate) config: SessionConfig,
}

impl SessionClient {
    pub fn new(transport: Arc<dyn BridgeTransport>) -> Self {
        Self::with_config(transport, SessionConfig::default())
    }

    pub fn with_config(transport: Arc<dyn BridgeTransport>, config: SessionConfig) -> Self {
        Self { transport, config }
    }
}

/// Runs `fut`, failing with [`SessionError::Timeout`] once `deadline` passes.
pub(crate) async fn with_deadline<T, F>(deadline: Option<Duration>, fut: F) -> Result<T, SessionError>
where
    F: Future<Output = Result<T, SessionError>>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .unwrap_or(Err(SessionError::Timeout)),
        None => fut.await,
    }
}
