//! Score range query builder

use crate::error::{ProtocolError, ProtocolResult};
use crate::key::Key;
use crate::reply::{self, format_score};

/// One end of a score interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreBound {
    Unbounded,
    Inclusive(f64),
    Exclusive(f64),
}

impl ScoreBound {
    fn value(self) -> Option<f64> {
        match self {
            ScoreBound::Unbounded => None,
            ScoreBound::Inclusive(v) | ScoreBound::Exclusive(v) => Some(v),
        }
    }

    fn as_min(self) -> String {
        self.render("-inf")
    }

    fn as_max(self) -> String {
        self.render("+inf")
    }

    fn render(self, unbounded: &str) -> String {
        match self {
            ScoreBound::Unbounded => unbounded.to_string(),
            ScoreBound::Inclusive(v) => format_score(v),
            ScoreBound::Exclusive(v) => format!("({}", format_score(v)),
        }
    }
}

/// Accumulates score bounds, ordering and paging for a later query.
///
/// Bounds only tighten: a looser `above`/`below` after a stricter one is
/// ignored, and at the same value an exclusive bound beats an inclusive one.
/// Ordering and `limit` apply to [`get`](Self::get) and
/// [`get_with_scores`](Self::get_with_scores) only.
#[derive(Debug, Clone)]
pub struct ScoreRange {
    key: Key,
    min: ScoreBound,
    max: ScoreBound,
    limit: Option<(i64, i64)>,
    reversed: bool,
}

impl ScoreRange {
    pub(crate) fn new(key: Key) -> Self {
        Self {
            key,
            min: ScoreBound::Unbounded,
            max: ScoreBound::Unbounded,
            limit: None,
            reversed: false,
        }
    }

    pub fn min(&self) -> ScoreBound {
        self.min
    }

    pub fn max(&self) -> ScoreBound {
        self.max
    }

    /// Scores strictly greater than `min`
    pub fn above(mut self, min: f64) -> Self {
        if self.min.value().map_or(true, |current| current <= min) {
            self.min = ScoreBound::Exclusive(min);
        }
        self
    }

    /// Scores greater than or equal to `min`
    pub fn above_or_equal_to(mut self, min: f64) -> Self {
        if self.min.value().map_or(true, |current| current < min) {
            self.min = ScoreBound::Inclusive(min);
        }
        self
    }

    /// Scores strictly less than `max`
    pub fn below(mut self, max: f64) -> Self {
        if self.max.value().map_or(true, |current| current >= max) {
            self.max = ScoreBound::Exclusive(max);
        }
        self
    }

    /// Scores less than or equal to `max`
    pub fn below_or_equal_to(mut self, max: f64) -> Self {
        if self.max.value().map_or(true, |current| current > max) {
            self.max = ScoreBound::Inclusive(max);
        }
        self
    }

    /// Flip result ordering to descending score; calling twice restores it
    pub fn reversed(mut self) -> Self {
        self.reversed = !self.reversed;
        self
    }

    /// Skip `offset` matches, then return at most `count` (negative = all)
    pub fn limit(mut self, offset: i64, count: i64) -> Self {
        self.limit = Some((offset, count));
        self
    }

    /// ZCOUNT
    pub async fn count(&self) -> ProtocolResult<u64> {
        let args = self.key.args("ZCOUNT", self.bounds()?);
        reply::to_count(self.key.execute(args).await?)
    }

    /// ZREMRANGEBYSCORE: number of members removed
    pub async fn remove(&self) -> ProtocolResult<u64> {
        let args = self.key.args("ZREMRANGEBYSCORE", self.bounds()?);
        reply::to_count(self.key.execute(args).await?)
    }

    /// ZRANGEBYSCORE, or ZREVRANGEBYSCORE when reversed
    pub async fn get(&self) -> ProtocolResult<Vec<String>> {
        reply::to_members(self.key.execute(self.query_args(false)?).await?)
    }

    /// As [`get`](Self::get), with each member's score
    pub async fn get_with_scores(&self) -> ProtocolResult<Vec<(String, f64)>> {
        reply::to_scored_members(self.key.execute(self.query_args(true)?).await?)
    }

    /// `[min, max]` on the wire. A NaN bound never reaches the server.
    fn bounds(&self) -> ProtocolResult<[String; 2]> {
        for bound in [self.min, self.max] {
            if bound.value().is_some_and(f64::is_nan) {
                return Err(ProtocolError::InvalidArgument(
                    "score bound must not be NaN".to_string(),
                ));
            }
        }
        Ok([self.min.as_min(), self.max.as_max()])
    }

    pub(crate) fn query_args(&self, with_scores: bool) -> ProtocolResult<Vec<String>> {
        let [min, max] = self.bounds()?;
        let (command, rest) = if self.reversed {
            ("ZREVRANGEBYSCORE", [max, min])
        } else {
            ("ZRANGEBYSCORE", [min, max])
        };

        let mut args = self.key.args(command, rest);
        if with_scores {
            args.push("WITHSCORES".to_string());
        }
        if let Some((offset, count)) = self.limit {
            args.extend(["LIMIT".to_string(), offset.to_string(), count.to_string()]);
        }
        Ok(args)
    }
}
