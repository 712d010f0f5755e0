use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical intent name. Trimmed and lowercased on construction so that
/// registry inserts and lookups always agree on one spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intent(String);

impl Intent {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Fulfilled { value: serde_json::Value },
    Rejected { reason: String },
}

impl DispatchOutcome {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self, DispatchOutcome::Fulfilled { .. })
    }
}

/// Per-listener outcomes of one dispatch call. Index `i` corresponds to the
/// `i`-th registered listener, not to completion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub intent: Intent,
    pub outcomes: Vec<DispatchOutcome>,
}

impl AggregateResult {
    /// Any-success rule: one fulfilled outcome makes the dispatch fulfilled.
    pub fn is_fulfilled(&self) -> bool {
        self.outcomes.iter().any(DispatchOutcome::is_fulfilled)
    }

    pub fn rejection_reasons(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|outcome| match outcome {
                DispatchOutcome::Rejected { reason } => Some(reason.clone()),
                DispatchOutcome::Fulfilled { .. } => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentCatalogEntry {
    pub intent: Intent,
    pub listener_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IntentCatalog {
    pub version: u64,
    #[serde(default)]
    pub entries: Vec<IntentCatalogEntry>,
}
