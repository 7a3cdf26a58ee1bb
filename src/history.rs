use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Append-only record of every node visited in the current play session.
///
/// One entry per completed transition, with the start node first. Only `append` and
/// `clear` mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathHistory {
    entries: Vec<String>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, node_id: impl Into<String>) {
        self.entries.push(node_id.into());
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.entries.get(position).map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of times `node_id` was visited.
    pub fn visits(&self, node_id: &str) -> usize {
        self.entries.iter().filter(|id| *id == node_id).count()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.entries.clone()
    }
}

impl Index<usize> for PathHistory {
    type Output = str;

    fn index(&self, position: usize) -> &str {
        &self.entries[position]
    }
}
