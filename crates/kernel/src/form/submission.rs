//! Submitted form data.

use std::collections::HashMap;

use super::types::wire_name;

/// Name/value pairs received from the browser, keyed by wire name.
///
/// When a name appears more than once the last value wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    values: HashMap<String, String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded name/value pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(name, value)| (name.into(), value.into()))
            .collect()
    }

    /// Parse an `application/x-www-form-urlencoded` body or query string.
    pub fn from_urlencoded(input: &[u8]) -> Self {
        url::form_urlencoded::parse(input).into_owned().collect()
    }

    /// Set a value under its wire name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Set a value by field identifier, applying the wire prefix.
    pub fn with(mut self, identifier: &str, value: impl Into<String>) -> Self {
        self.insert(wire_name(identifier), value);
        self
    }

    /// Value under a raw wire name.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Untrimmed value of a field by identifier.
    pub fn field(&self, identifier: &str) -> Option<&str> {
        self.raw(&wire_name(identifier))
    }

    /// Trimmed value of a field by identifier, empty when absent.
    pub fn get_string(&self, identifier: &str) -> String {
        self.field(identifier)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// Field value parsed as an integer.
    pub fn get_int(&self, identifier: &str) -> Option<i64> {
        self.get_string(identifier).parse().ok()
    }

    /// Whether anything was submitted at all.
    pub fn has_response(&self) -> bool {
        !self.values.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Submission {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut submission = Self::new();
        for (name, value) in iter {
            submission.insert(name, value);
        }
        submission
    }
}
