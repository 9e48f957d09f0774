//! ZUNIONSTORE / ZINTERSTORE builder

use crate::error::{ProtocolError, ProtocolResult};
use crate::key::Key;
use crate::reply::{self, format_score};

use super::SortedSet;

/// How the source sets are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComboOperation {
    Union,
    Intersection,
}

impl ComboOperation {
    pub fn command(self) -> &'static str {
        match self {
            ComboOperation::Union => "ZUNIONSTORE",
            ComboOperation::Intersection => "ZINTERSTORE",
        }
    }
}

/// Which score survives when a member appears in several sources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    Sum,
    Min,
    Max,
}

/// Collects source sets and weights, then stores the combination into the
/// destination set with one of the `use_*` calls.
///
/// Sources keep insertion order. Adding a key twice replaces its weight.
#[derive(Debug, Clone)]
pub struct SortedSetCombo {
    destination: Key,
    operation: ComboOperation,
    sources: Vec<(String, f64)>,
    weighted: bool,
}

impl SortedSetCombo {
    pub(crate) fn new(destination: Key, operation: ComboOperation) -> Self {
        Self {
            destination,
            operation,
            sources: Vec::new(),
            weighted: false,
        }
    }

    pub fn operation(&self) -> ComboOperation {
        self.operation
    }

    /// Add a source with weight 1
    pub fn of_set(self, set: &SortedSet) -> Self {
        self.insert(set.name(), 1.0)
    }

    /// Add a source whose scores are multiplied by `weight`
    pub fn of_weighted_set(mut self, set: &SortedSet, weight: f64) -> Self {
        self.weighted = true;
        self.insert(set.name(), weight)
    }

    /// Keep the lowest score; returns the size of the stored set
    pub async fn use_lower_score(&self) -> ProtocolResult<u64> {
        self.store(Aggregate::Min).await
    }

    /// Keep the highest score; returns the size of the stored set
    pub async fn use_higher_score(&self) -> ProtocolResult<u64> {
        self.store(Aggregate::Max).await
    }

    /// Add the scores together; returns the size of the stored set
    pub async fn use_combined_scores(&self) -> ProtocolResult<u64> {
        self.store(Aggregate::Sum).await
    }

    async fn store(&self, aggregate: Aggregate) -> ProtocolResult<u64> {
        let args = self.args(aggregate)?;
        reply::to_count(self.destination.execute(args).await?)
    }

    fn insert(mut self, name: &str, weight: f64) -> Self {
        match self.sources.iter().position(|(key, _)| key == name) {
            Some(index) => self.sources[index].1 = weight,
            None => self.sources.push((name.to_string(), weight)),
        }
        self
    }

    /// `OP dest numkeys key... [WEIGHTS w...] [AGGREGATE MIN|MAX]`
    pub(crate) fn args(&self, aggregate: Aggregate) -> ProtocolResult<Vec<String>> {
        if self.sources.is_empty() {
            return Err(ProtocolError::InvalidArgument(format!(
                "{} into '{}' needs at least one source set",
                self.operation.command(),
                self.destination.name()
            )));
        }
        if let Some((key, _)) = self.sources.iter().find(|(_, w)| w.is_nan()) {
            return Err(ProtocolError::InvalidArgument(format!(
                "weight for '{}' must not be NaN",
                key
            )));
        }

        let mut rest = Vec::with_capacity(self.sources.len() * 2 + 4);
        rest.push(self.sources.len().to_string());
        rest.extend(self.sources.iter().map(|(key, _)| key.clone()));

        if self.weighted {
            rest.push("WEIGHTS".to_string());
            rest.extend(self.sources.iter().map(|(_, weight)| format_score(*weight)));
        }

        // SUM is the server default and is left implicit.
        match aggregate {
            Aggregate::Sum => {}
            Aggregate::Min => rest.extend(["AGGREGATE".to_string(), "MIN".to_string()]),
            Aggregate::Max => rest.extend(["AGGREGATE".to_string(), "MAX".to_string()]),
        }

        Ok(self.destination.args(self.operation.command(), rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::CommandExecutor;
    use crate::resp::RespValue;
    use async_trait::async_trait;
    use std::sync::Arc;

    struct Unreachable;

    #[async_trait]
    impl CommandExecutor for Unreachable {
        async fn execute(&self, _args: Vec<String>) -> ProtocolResult<RespValue> {
            unreachable!("builder tests never dispatch")
        }
    }

    fn set(name: &str) -> SortedSet {
        SortedSet::new(Arc::new(Unreachable), name)
    }

    #[test]
    fn test_unweighted_union_omits_weights() {
        let combo = set("dest").store_union().of_set(&set("a")).of_set(&set("b"));
        assert_eq!(
            combo.args(Aggregate::Sum).unwrap(),
            vec!["ZUNIONSTORE", "dest", "2", "a", "b"]
        );
        assert_eq!(
            combo.args(Aggregate::Max).unwrap(),
            vec!["ZUNIONSTORE", "dest", "2", "a", "b", "AGGREGATE", "MAX"]
        );
    }

    #[test]
    fn test_weighted_intersection_lists_every_weight_in_order() {
        let combo = set("dest")
            .store_intersection()
            .of_set(&set("a"))
            .of_weighted_set(&set("b"), 2.5)
            .of_set(&set("c"));
        assert_eq!(combo.operation(), ComboOperation::Intersection);
        assert_eq!(
            combo.args(Aggregate::Min).unwrap(),
            vec![
                "ZINTERSTORE", "dest", "3", "a", "b", "c", "WEIGHTS", "1", "2.5", "1", "AGGREGATE",
                "MIN"
            ]
        );
    }

    #[test]
    fn test_repeated_source_replaces_weight() {
        let combo = set("dest")
            .store_union()
            .of_weighted_set(&set("a"), 3.0)
            .of_set(&set("b"))
            .of_set(&set("a"));
        assert_eq!(
            combo.args(Aggregate::Sum).unwrap(),
            vec!["ZUNIONSTORE", "dest", "2", "a", "b", "WEIGHTS", "1", "1"]
        );
    }

    #[test]
    fn test_empty_or_nan_is_rejected() {
        let empty = set("dest").store_union();
        assert!(matches!(
            empty.args(Aggregate::Sum),
            Err(ProtocolError::InvalidArgument(_))
        ));

        let nan = set("dest").store_union().of_weighted_set(&set("a"), f64::NAN);
        assert!(matches!(
            nan.args(Aggregate::Sum),
            Err(ProtocolError::InvalidArgument(_))
        ));
    }
}
