//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use orbit_zset::{CommandExecutor, ProtocolError, ProtocolResult, RespValue};
use std::collections::VecDeque;
use std::sync::Mutex;

/// Records every command and answers with scripted replies in order
#[derive(Default)]
pub struct MockExecutor {
    replies: Mutex<VecDeque<RespValue>>,
    sent: Mutex<Vec<Vec<String>>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = RespValue>) -> Self {
        let mock = Self::new();
        mock.replies.lock().unwrap().extend(replies);
        mock
    }

    pub fn push_reply(&self, reply: RespValue) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn sent(&self) -> Vec<Vec<String>> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, args: Vec<String>) -> ProtocolResult<RespValue> {
        self.sent.lock().unwrap().push(args);
        match self.replies.lock().unwrap().pop_front() {
            Some(RespValue::Error(message)) => Err(ProtocolError::ServerError(message)),
            Some(reply) => Ok(reply),
            None => Err(ProtocolError::ConnectionError("no scripted reply".to_string())),
        }
    }
}

pub fn bulk(s: &str) -> RespValue {
    RespValue::bulk_string_from_str(s)
}

pub fn status(s: &str) -> RespValue {
    RespValue::SimpleString(s.to_string())
}

pub fn error_reply(message: impl Into<String>) -> RespValue {
    RespValue::Error(message.into())
}

pub fn array(items: &[&str]) -> RespValue {
    RespValue::Array(items.iter().map(|s| bulk(s)).collect())
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
