use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const FILTER_TYPE: &str = "filter.type";
pub const FILTER_LOCATION_QUERY: &str = "filter.location.query";
pub const SIGNAL_TAGS: &str = "signal.interests.tags";

/// A single query parameter value as produced by templates or suggested by the model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    List(Vec<String>),
    Number(serde_json::Number),
    Flag(bool),
    /// JSON `null`; treated as blank.
    Null,
}

impl ParamValue {
    /// Wire form: lists are comma-joined, scalars rendered as text.
    pub fn to_canonical(&self) -> String {
        match self {
            Self::Text(value) => value.clone(),
            Self::List(values) => values.join(","),
            Self::Number(value) => value.to_string(),
            Self::Flag(value) => value.to_string(),
            Self::Null => String::new(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(value) => value.trim().is_empty(),
            Self::List(values) => values.iter().all(|value| value.trim().is_empty()),
            Self::Null => true,
            Self::Number(_) | Self::Flag(_) => false,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryParameters {
    values: BTreeMap<String, ParamValue>,
}

impl QueryParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.values.insert(key.into(), value);
    }

    pub fn insert_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, ParamValue::Text(value.into()));
    }

    pub fn insert_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.insert(key, ParamValue::List(values));
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Canonical text of `key`, if present.
    pub fn text(&self, key: &str) -> Option<String> {
        self.values.get(key).map(ParamValue::to_canonical)
    }

    /// Canonical text of `key` when present and not blank.
    pub fn non_blank_text(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|value| !value.is_blank()).map(ParamValue::to_canonical)
    }

    /// Absent keys count as blank.
    pub fn is_blank(&self, key: &str) -> bool {
        self.values.get(key).map(ParamValue::is_blank).unwrap_or(true)
    }

    /// Overwrites every key present in `overrides`.
    pub fn overlay(&mut self, overrides: &QueryParameters) {
        for (key, value) in &overrides.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Rewrites every list value as its comma-joined text form.
    pub fn normalize_lists(&mut self) {
        for value in self.values.values_mut() {
            if let ParamValue::List(items) = value {
                *value = ParamValue::Text(items.join(","));
            }
        }
    }

    /// Key/value pairs for the query string. Blank values are omitted.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_blank())
            .map(|(key, value)| (key.clone(), value.to_canonical()))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
