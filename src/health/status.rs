// src/health/status.rs
use super::result::CheckResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckStatus {
    pub healthy: bool,
    pub message: String,
}

impl From<CheckResult> for CheckStatus {
    fn from(result: CheckResult) -> Self {
        Self {
            healthy: !result.failed(),
            message: result.message,
        }
    }
}

/// Point-in-time snapshot of every registered check, keyed by name.
///
/// Serializes as a plain JSON object: `{"db":{"healthy":true,"message":""}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Status(BTreeMap<String, CheckStatus>);

impl Status {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, status: CheckStatus) {
        self.0.insert(name.into(), status);
    }

    pub fn get(&self, name: &str) -> Option<&CheckStatus> {
        self.0.get(name)
    }

    /// True when no entry is unhealthy. An empty snapshot is healthy.
    pub fn is_healthy(&self) -> bool {
        self.0.values().all(|check| check.healthy)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CheckStatus)> {
        self.0.iter()
    }
}

impl FromIterator<(String, CheckStatus)> for Status {
    fn from_iter<I: IntoIterator<Item = (String, CheckStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Status {
    type Item = (String, CheckStatus);
    type IntoIter = std::collections::btree_map::IntoIter<String, CheckStatus>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
