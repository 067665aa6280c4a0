//! Per-instance transition history.
//!
//! Every committed transition on an instance machine is recorded here, so a
//! host can inspect how it reached its current state or ship the history
//! inside a checkpoint. A history may be capped, in which case the oldest
//! records are dropped first.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single committed transition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// The event that caused the transition
    pub event: String,
    /// The state being left
    pub from: State,
    /// The state entered
    pub to: State,
    /// When the transition was committed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of committed transitions.
///
/// # Example
///
/// ```rust
/// use ssm::core::{State, TransitionHistory, TransitionRecord};
/// use chrono::Utc;
///
/// let mut history = TransitionHistory::new();
/// history.record(TransitionRecord {
///     event: "open".to_string(),
///     from: State::new("closed"),
///     to: State::new("opened"),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.path();
/// assert_eq!(path.len(), 2);
/// assert_eq!(path[1].name(), "opened");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: Vec<TransitionRecord>,
    #[serde(default)]
    limit: Option<usize>,
}

impl TransitionHistory {
    /// Create a new empty, unbounded history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            limit: None,
        }
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Maximum number of records kept, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Change the cap, dropping the oldest records that no longer fit.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
        self.evict();
    }

    /// Append a committed transition, evicting the oldest record when full.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
        self.evict();
    }

    /// Drop every record, keeping the cap.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Move all records out into a new history, leaving this one empty.
    ///
    /// Both histories keep the same cap.
    pub fn take(&mut self) -> Self {
        Self {
            records: std::mem::take(&mut self.records),
            limit: self.limit,
        }
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            if self.records.len() > limit {
                let excess = self.records.len() - limit;
                self.records.drain(..excess);
            }
        }
    }

    /// States traversed: the first origin, then each target in order.
    pub fn path(&self) -> Vec<&State> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.first() {
            path.push(&first.from);
        }
        for record in &self.records {
            path.push(&record.to);
        }
        path
    }

    /// Time between the first and last recorded transitions.
    ///
    /// Returns `None` when nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.first()?, self.records.last()?);
        last.timestamp
            .signed_duration_since(first.timestamp)
            .to_std()
            .ok()
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.last()
    }

    /// All kept records, oldest first.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
