//! Command dispatch
//!
//! Every typed accessor issues its commands through a [`CommandExecutor`].
//! [`RespConnection`] is the network-backed implementation; tests and
//! embedders can supply their own.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ProtocolError, ProtocolResult};
use crate::resp::{RespCodec, RespValue};

/// Sends one command and yields its single reply.
///
/// `args[0]` is the command name, the rest are its arguments. Error replies
/// are returned as `ProtocolError::ServerError`, never as a value.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, args: Vec<String>) -> ProtocolResult<RespValue>;
}

/// A single RESP2 connection with one command in flight at a time.
///
/// A request is marked unfinished before it is written and cleared once its
/// reply has been read. If the reply is never read (timeout, a caller dropping
/// the future, a frame the codec rejects, the server hanging up) the stream is
/// out of step with the requests, so every later command fails with
/// `ConnectionError` carrying the first cause.
pub struct RespConnection {
    config: ClientConfig,
    framed: Mutex<Framed<TcpStream, RespCodec>>,
    broken: StdMutex<Option<String>>,
}

impl RespConnection {
    /// Connect using the given configuration
    pub async fn connect(config: ClientConfig) -> ProtocolResult<Self> {
        config.validate()?;

        let socket = timeout(config.connect_timeout(), TcpStream::connect(&config.address))
            .await
            .map_err(|_| {
                ProtocolError::Timeout(format!(
                    "connecting to {} after {:?}",
                    config.address,
                    config.connect_timeout()
                ))
            })?
            .map_err(|e| {
                ProtocolError::ConnectionError(format!("{}: {}", config.address, e))
            })?;
        socket.set_nodelay(true)?;

        info!("Connected to RESP server at {}", config.address);
        let codec = RespCodec::with_max_frame_size(config.max_frame_size);
        Ok(Self {
            framed: Mutex::new(Framed::new(socket, codec)),
            broken: StdMutex::new(None),
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn broken(&self) -> MutexGuard<'_, Option<String>> {
        self.broken.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn mark_broken(&self, reason: String) {
        *self.broken() = Some(reason);
    }

    async fn round_trip(&self, command: &str, request: RespValue) -> ProtocolResult<RespValue> {
        let mut framed = self.framed.lock().await;
        if let Some(reason) = self.broken().clone() {
            return Err(ProtocolError::ConnectionError(format!(
                "connection to {} is unusable: {}",
                self.config.address, reason
            )));
        }

        self.mark_broken(format!("{} was interrupted before its reply was read", command));
        if let Err(e) = framed.send(request).await {
            self.mark_broken(format!("sending {} failed: {}", command, e));
            return Err(e);
        }
        match framed.next().await {
            Some(Ok(reply)) => {
                *self.broken() = None;
                Ok(reply)
            }
            Some(Err(e)) => {
                self.mark_broken(format!("reply to {} was unreadable: {}", command, e));
                Err(e)
            }
            None => {
                self.mark_broken("server closed the connection".to_string());
                Err(ProtocolError::ConnectionError(format!(
                    "{} closed the connection",
                    self.config.address
                )))
            }
        }
    }
}

#[async_trait]
impl CommandExecutor for RespConnection {
    async fn execute(&self, args: Vec<String>) -> ProtocolResult<RespValue> {
        let command = args.first().cloned().unwrap_or_default();
        if command.is_empty() {
            return Err(ProtocolError::InvalidArgument(
                "command name must not be empty".to_string(),
            ));
        }
        debug!("Executing command: {} with {} args", command, args.len() - 1);

        let reply = match timeout(
            self.config.request_timeout(),
            self.round_trip(&command, RespValue::command(args)),
        )
        .await
        {
            Ok(reply) => reply?,
            Err(elapsed) => {
                warn!("Command {} timed out on {}", command, self.config.address);
                return Err(elapsed.into());
            }
        };

        match reply {
            RespValue::Error(message) => {
                warn!("Command {} failed: {}", command, message);
                Err(ProtocolError::ServerError(message))
            }
            reply => {
                debug!("Reply to {}: {}", command, reply);
                Ok(reply)
            }
        }
    }
}
