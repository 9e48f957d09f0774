//! Sorted set accessor
//!
//! [`SortedSet`] maps each method onto one `Z*` command for a single key.
//! Score filtered queries go through [`ScoreRange`], and stored unions or
//! intersections through [`SortedSetCombo`].
//!
//! ```rust,no_run
//! # use orbit_zset::{ClientConfig, SortedSet};
//! # use std::sync::Arc;
//! # async fn example() -> orbit_zset::ProtocolResult<()> {
//! let connection = ClientConfig::builder().with_address("127.0.0.1:6379").connect().await?;
//! let board = SortedSet::new(Arc::new(connection), "leaderboard");
//!
//! board.add("alice", 31.0).await?;
//! board.increment_by("alice", 4.5).await?;
//! let top = board.scores().above(30.0).reversed().limit(0, 10).get_with_scores().await?;
//! # Ok(())
//! # }
//! ```

mod combo;
mod range;

pub use combo::{Aggregate, ComboOperation, SortedSetCombo};
pub use range::{ScoreBound, ScoreRange};

use std::sync::Arc;

use crate::error::{ProtocolError, ProtocolResult};
use crate::executor::CommandExecutor;
use crate::key::Key;
use crate::reply::{self, format_score};

/// Type name the server reports for a sorted set
pub const SORTED_SET_TYPE: &str = "zset";

/// A sorted set stored under one key
#[derive(Debug, Clone)]
pub struct SortedSet {
    key: Key,
}

impl SortedSet {
    pub fn new(executor: Arc<dyn CommandExecutor>, name: impl Into<String>) -> Self {
        Self {
            key: Key::new(executor, name),
        }
    }

    pub fn key(&self) -> &Key {
        &self.key
    }

    pub fn name(&self) -> &str {
        self.key.name()
    }

    /// Same set, issued through a different executor
    pub fn with_executor(self, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            key: self.key.with_executor(executor),
        }
    }

    /// Whether the key currently holds a sorted set
    pub async fn is_valid(&self) -> ProtocolResult<bool> {
        Ok(self.key.key_type().await? == SORTED_SET_TYPE)
    }

    /// ZADD: true when the member was added, false when its score was updated
    pub async fn add(&self, member: &str, score: f64) -> ProtocolResult<bool> {
        let args = self.key.args("ZADD", [wire_score(score)?, member.to_string()]);
        reply::to_bool(self.key.execute(args).await?)
    }

    /// ZINCRBY: the member's new score
    pub async fn increment_by(&self, member: &str, delta: f64) -> ProtocolResult<f64> {
        let args = self
            .key
            .args("ZINCRBY", [wire_score(delta)?, member.to_string()]);
        reply::to_score(self.key.execute(args).await?)
    }

    /// ZREM: whether the member was part of the set
    pub async fn remove(&self, member: &str) -> ProtocolResult<bool> {
        let args = self.key.args("ZREM", [member.to_string()]);
        reply::to_bool(self.key.execute(args).await?)
    }

    /// ZCARD
    pub async fn size(&self) -> ProtocolResult<u64> {
        reply::to_count(self.key.execute(self.key.args("ZCARD", [])).await?)
    }

    /// ZRANK: zero-based position by ascending score, `None` for non-members
    pub async fn index_of(&self, member: &str) -> ProtocolResult<Option<u64>> {
        let args = self.key.args("ZRANK", [member.to_string()]);
        reply::to_optional_count(self.key.execute(args).await?)
    }

    /// ZREVRANK: zero-based position by descending score
    pub async fn reverse_index_of(&self, member: &str) -> ProtocolResult<Option<u64>> {
        let args = self.key.args("ZREVRANK", [member.to_string()]);
        reply::to_optional_count(self.key.execute(args).await?)
    }

    /// ZSCORE
    pub async fn score_of(&self, member: &str) -> ProtocolResult<Option<f64>> {
        let args = self.key.args("ZSCORE", [member.to_string()]);
        reply::to_optional_score(self.key.execute(args).await?)
    }

    /// ZRANGE: members between two inclusive indices; negative indices count from the end
    pub async fn indexed_between(&self, start: i64, stop: i64) -> ProtocolResult<Vec<String>> {
        let args = self.index_args("ZRANGE", start, stop, false);
        reply::to_members(self.key.execute(args).await?)
    }

    /// ZREVRANGE
    pub async fn reverse_indexed_between(
        &self,
        start: i64,
        stop: i64,
    ) -> ProtocolResult<Vec<String>> {
        let args = self.index_args("ZREVRANGE", start, stop, false);
        reply::to_members(self.key.execute(args).await?)
    }

    /// ZRANGE ... WITHSCORES, in rank order
    pub async fn indexed_between_with_scores(
        &self,
        start: i64,
        stop: i64,
    ) -> ProtocolResult<Vec<(String, f64)>> {
        let args = self.index_args("ZRANGE", start, stop, true);
        reply::to_scored_members(self.key.execute(args).await?)
    }

    /// ZREVRANGE ... WITHSCORES, in reverse rank order
    pub async fn reverse_indexed_between_with_scores(
        &self,
        start: i64,
        stop: i64,
    ) -> ProtocolResult<Vec<(String, f64)>> {
        let args = self.index_args("ZREVRANGE", start, stop, true);
        reply::to_scored_members(self.key.execute(args).await?)
    }

    /// ZREMRANGEBYRANK: number of members removed
    pub async fn remove_indexed_between(&self, start: i64, stop: i64) -> ProtocolResult<u64> {
        let args = self.index_args("ZREMRANGEBYRANK", start, stop, false);
        reply::to_count(self.key.execute(args).await?)
    }

    /// Start a score filtered query over the whole set
    pub fn scores(&self) -> ScoreRange {
        ScoreRange::new(self.key.clone())
    }

    /// Store the union of other sets into this one
    pub fn store_union(&self) -> SortedSetCombo {
        SortedSetCombo::new(self.key.clone(), ComboOperation::Union)
    }

    /// Store the intersection of other sets into this one
    pub fn store_intersection(&self) -> SortedSetCombo {
        SortedSetCombo::new(self.key.clone(), ComboOperation::Intersection)
    }

    fn index_args(&self, command: &str, start: i64, stop: i64, with_scores: bool) -> Vec<String> {
        let mut rest = vec![start.to_string(), stop.to_string()];
        if with_scores {
            rest.push("WITHSCORES".to_string());
        }
        self.key.args(command, rest)
    }
}

/// Scores must be numbers the server can parse; NaN never is.
fn wire_score(score: f64) -> ProtocolResult<String> {
    if score.is_nan() {
        return Err(ProtocolError::InvalidArgument(
            "score must not be NaN".to_string(),
        ));
    }
    Ok(format_score(score))
}
