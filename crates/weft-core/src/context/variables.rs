//! Context variable system
//!
//! An ordered string map with case-insensitive keys. One reserved key,
//! [`MAIN_KEY`], holds the "input" value that functions read by default and
//! that their results are written back to.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Reserved key for the main input/output slot
pub const MAIN_KEY: &str = "input";

/// Variables available to templates and functions
///
/// Keys compare case-insensitively; the spelling of the most recent write is
/// kept for display. Insertion order is preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "IndexMap<String, String>",
    into = "IndexMap<String, String>"
)]
pub struct ContextVariables {
    entries: IndexMap<String, Entry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    value: String,
}

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl ContextVariables {
    /// Create an empty set of variables
    pub fn new() -> Self {
        Self::default()
    }

    /// Create variables holding `content` in the main slot
    pub fn with_input(content: impl Into<String>) -> Self {
        let mut variables = Self::new();
        variables.update(content);
        variables
    }

    /// Value of the main slot, empty when unset
    pub fn input(&self) -> &str {
        self.get(MAIN_KEY).unwrap_or_default()
    }

    /// Get a variable by name
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .get(&normalize(key))
            .map(|entry| entry.value.as_str())
    }

    /// Get a variable only when it is set to a non-empty value
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Set a variable, replacing any value stored under the same key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let name = key.into();
        let value = value.into();
        match self.entries.get_mut(&normalize(&name)) {
            Some(entry) => {
                entry.name = name;
                entry.value = value;
            }
            None => {
                self.entries.insert(normalize(&name), Entry { name, value });
            }
        }
        self
    }

    /// Append to a variable, treating a missing value as empty
    pub fn append_to(&mut self, key: impl Into<String>, value: &str) -> &mut Self {
        let key = key.into();
        let current = self.get(&key).unwrap_or_default().to_string();
        self.set(key, current + value)
    }

    /// Overwrite the main slot
    pub fn update(&mut self, content: impl Into<String>) -> &mut Self {
        self.set(MAIN_KEY, content)
    }

    /// Import every variable from `other`.
    ///
    /// With `overwrite_existing == false` keys already present are kept and
    /// only new keys are added.
    pub fn merge(&mut self, other: &ContextVariables, overwrite_existing: bool) -> &mut Self {
        for (name, value) in other.iter() {
            if overwrite_existing || !self.contains_key(name) {
                self.set(name, value);
            }
        }
        self
    }

    /// Check if a variable is set
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&normalize(key))
    }

    /// Remove a variable, keeping the order of the others
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries
            .shift_remove(&normalize(key))
            .map(|entry| entry.value)
    }

    /// Number of variables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no variables are set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .values()
            .map(|entry| (entry.name.as_str(), entry.value.as_str()))
    }

    /// Variable names in insertion order
    pub fn names(&self) -> Vec<String> {
        self.entries.values().map(|entry| entry.name.clone()).collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ContextVariables {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut variables = Self::new();
        for (key, value) in iter {
            variables.set(key, value);
        }
        variables
    }
}

impl From<IndexMap<String, String>> for ContextVariables {
    fn from(map: IndexMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<ContextVariables> for IndexMap<String, String> {
    fn from(variables: ContextVariables) -> Self {
        variables
            .entries
            .into_values()
            .map(|entry| (entry.name, entry.value))
            .collect()
    }
}
