//! Typed forms of the comma-joined wire values
//!
//! Callers hand over source lists and chart overrides as single strings
//! (`a,b,c` and `k=v,k=v`). They are parsed here once and carried as typed
//! values afterwards. Re-encoding an accepted override string reproduces it
//! byte for byte.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::ConfigurationError;

/// Ordered list of source locators (URLs, kustomize paths, chart references)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SourceList(Vec<String>);

impl SourceList {
    /// Parses a comma-separated list, trimming whitespace around entries
    ///
    /// Blank entries are rejected, which includes an all-blank input.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let mut entries = Vec::new();
        for (position, entry) in raw.split(',').enumerate() {
            let entry = entry.trim();
            if entry.is_empty() {
                return Err(ConfigurationError::EmptySource { position });
            }
            entries.push(entry.to_string());
        }
        Ok(Self(entries))
    }

    pub fn from_static(entries: &[&str]) -> Self {
        Self(entries.iter().map(|entry| entry.to_string()).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// The comma-joined wire form
    pub fn encode(&self) -> String {
        self.0.join(",")
    }
}

impl fmt::Display for SourceList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Flat `key=value` overrides for a chart deployment, in caller order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideValues(Vec<(String, String)>);

impl OverrideValues {
    /// Parses `key=value` pairs joined by commas
    ///
    /// The empty string means no overrides. Entries are not trimmed; the value
    /// is everything after the first `=` and may be empty. Duplicate keys are
    /// rejected rather than resolved.
    pub fn parse(raw: &str) -> Result<Self, ConfigurationError> {
        let mut pairs: Vec<(String, String)> = Vec::new();
        if raw.is_empty() {
            return Ok(Self(pairs));
        }

        for (position, entry) in raw.split(',').enumerate() {
            if entry.is_empty() {
                return Err(ConfigurationError::EmptyOverride { position });
            }

            let Some((key, value)) = entry.split_once('=') else {
                return Err(ConfigurationError::MissingSeparator {
                    entry: entry.to_string(),
                });
            };

            if key.is_empty() {
                return Err(ConfigurationError::EmptyKey {
                    entry: entry.to_string(),
                });
            }
            if pairs.iter().any(|(existing, _)| existing == key) {
                return Err(ConfigurationError::DuplicateKey {
                    key: key.to_string(),
                });
            }

            pairs.push((key.to_string(), value.to_string()));
        }

        Ok(Self(pairs))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The comma-joined wire form handed to the chart primitive
    pub fn encode(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for OverrideValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl Serialize for OverrideValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
