//! Generic key handle shared by the typed accessors

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{ProtocolError, ProtocolResult};
use crate::executor::CommandExecutor;
use crate::reply;
use crate::resp::RespValue;

/// A named key bound to the executor its commands are sent through
#[derive(Clone)]
pub struct Key {
    name: String,
    executor: Arc<dyn CommandExecutor>,
}

impl Key {
    pub fn new(executor: Arc<dyn CommandExecutor>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            executor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Same key, issued through a different executor
    pub fn with_executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = executor;
        self
    }

    /// `[command, key, rest...]`
    pub(crate) fn args<I>(&self, command: &str, rest: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = vec![command.to_string(), self.name.clone()];
        args.extend(rest);
        args
    }

    pub(crate) async fn execute(&self, args: Vec<String>) -> ProtocolResult<RespValue> {
        self.executor.execute(args).await
    }

    /// TYPE: the server-side type name, `"none"` when the key is absent
    pub async fn key_type(&self) -> ProtocolResult<String> {
        reply::to_status(self.execute(self.args("TYPE", [])).await?)
    }

    /// EXISTS
    pub async fn exists(&self) -> ProtocolResult<bool> {
        reply::to_bool(self.execute(self.args("EXISTS", [])).await?)
    }

    /// DEL: whether anything was removed
    pub async fn delete(&self) -> ProtocolResult<bool> {
        reply::to_bool(self.execute(self.args("DEL", [])).await?)
    }

    /// PEXPIRE: whether a timeout was set.
    ///
    /// The server counts whole milliseconds, so a partial millisecond rounds
    /// up. A zero `ttl` would delete the key and is rejected.
    pub async fn expire(&self, ttl: Duration) -> ProtocolResult<bool> {
        if ttl.is_zero() {
            return Err(ProtocolError::InvalidArgument(
                "expiry must be longer than zero".to_string(),
            ));
        }
        let mut millis = ttl.as_millis();
        if ttl.subsec_nanos() % 1_000_000 != 0 {
            millis += 1;
        }
        reply::to_bool(self.execute(self.args("PEXPIRE", [millis.to_string()])).await?)
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Key").field("name", &self.name).finish()
    }
}
