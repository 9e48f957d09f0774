//! # Orbit sorted set client
//!
//! A typed accessor for one sorted set stored in a Redis-compatible server.
//! Each method becomes a single `Z*` command that is dispatched through a
//! [`CommandExecutor`] and whose reply is decoded into a native type.
//!
//! - [`SortedSet`]: one-to-one command mappings (`ZADD`, `ZRANK`, `ZRANGE`, ...)
//! - [`ScoreRange`]: score bounds, ordering and paging for `Z*BYSCORE` queries
//! - [`SortedSetCombo`]: weighted `ZUNIONSTORE` / `ZINTERSTORE`
//! - [`RespConnection`]: a single RESP2 connection implementing [`CommandExecutor`]

pub mod config;
pub mod error;
pub mod executor;
pub mod key;
pub mod reply;
pub mod resp;
pub mod sorted_set;

pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{ProtocolError, ProtocolResult};
pub use executor::{CommandExecutor, RespConnection};
pub use key::Key;
pub use resp::{RespCodec, RespValue};
pub use sorted_set::{
    Aggregate, ComboOperation, ScoreBound, ScoreRange, SortedSet, SortedSetCombo,
};
