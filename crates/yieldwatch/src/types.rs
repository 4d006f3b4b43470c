//! Core data types for subjects, readings, and operation outcomes.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A monitored entity. Identity is the `id`; `name` is only a display label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
}

impl Subject {
    /// Create a new subject.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl PartialEq for Subject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Subject {}

impl Hash for Subject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Subject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Subject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (id {})", self.name, self.id)
    }
}

/// A single scalar measurement. Equality and ordering use `quantity` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Reading {
    pub quantity: i64,
}

impl Reading {
    pub fn new(quantity: i64) -> Self {
        Self { quantity }
    }
}

impl From<i64> for Reading {
    fn from(quantity: i64) -> Self {
        Self { quantity }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quantity)
    }
}

/// Readings of one subject, in insertion order.
pub type ReadingSeries = Vec<Reading>;

/// Readings per subject, iterated in subject `id` order.
pub type SubjectReadings = BTreeMap<Subject, ReadingSeries>;

/// Build a series from raw quantities.
pub fn series_of(quantities: &[i64]) -> ReadingSeries {
    quantities.iter().copied().map(Reading::new).collect()
}

/// Where a pattern was found inside one subject's series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub subject: Subject,
    pub offset: usize,
}

/// Result of a pattern search across every subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternOutcome {
    pub pattern: Vec<i64>,
    pub found: bool,
    pub matched: Vec<PatternMatch>,
    pub unmatched: Vec<Subject>,
}

/// Mean quantity of one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMean {
    pub subject: Subject,
    pub mean: f64,
}

/// Partition of subjects by whether their mean meets a threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub threshold: f64,
    pub found: bool,
    pub high: Vec<Subject>,
    pub low: Vec<Subject>,
    pub means: Vec<SubjectMean>,
}

impl Classification {
    /// Look up the mean computed for a subject id.
    pub fn mean_of(&self, id: &str) -> Option<f64> {
        self.means
            .iter()
            .find(|m| m.subject.id == id)
            .map(|m| m.mean)
    }

    /// Whether the subject with this id was classified high.
    pub fn is_high(&self, id: &str) -> bool {
        self.high.iter().any(|s| s.id == id)
    }
}

/// Errors reported at the operations engine boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Subject {subject} has no readings")]
    NoReadings { subject: String },

    #[error("Invalid subject: {0}")]
    InvalidSubject(String),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(f64),
}

/// Convenience result type.
pub type EngineResult<T> = Result<T, EngineError>;
