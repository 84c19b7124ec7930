//! The stamp extension field: `key=v1,v2;key2=v3;flag`.
//!
//! Encoding is strict and rejects reserved characters. Decoding is
//! permissive: it accepts whatever a stamp carries and never fails.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fields::split_fields;
use crate::HashcashError;

const RESERVED_IN_KEY: [char; 3] = [':', ';', '='];
const RESERVED_IN_VALUE: [char; 3] = [':', ';', ','];

/// Extension key/value lists carried by a stamp.
///
/// A key maps to `None` when it appears bare (no `=`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extensions(BTreeMap<String, Option<Vec<String>>>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to a list of values.
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.0.insert(key.into(), Some(values));
    }

    /// Set `key` as a bare flag with no value list.
    pub fn insert_flag(&mut self, key: impl Into<String>) {
        self.0.insert(key.into(), None);
    }

    /// `None` if the key is absent, `Some(None)` for a bare flag.
    pub fn get(&self, key: &str) -> Option<Option<&[String]>> {
        self.0.get(key).map(|v| v.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&[String]>)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Serialize to the wire form, in key order.
    pub fn encode(&self) -> Result<String, HashcashError> {
        let mut items = Vec::with_capacity(self.0.len());
        for (key, values) in &self.0 {
            if key.contains(RESERVED_IN_KEY) {
                return Err(HashcashError::validation(format!(
                    "extension key contains an illegal character: {key}"
                )));
            }
            let Some(values) = values else {
                items.push(key.clone());
                continue;
            };
            if let Some(bad) = values.iter().find(|v| v.contains(RESERVED_IN_VALUE)) {
                return Err(HashcashError::validation(format!(
                    "extension value contains an illegal character: {bad}"
                )));
            }
            items.push(format!("{key}={}", values.join(",")));
        }
        Ok(items.join(";"))
    }

    /// Parse the wire form. Later duplicates of a key replace earlier ones.
    pub fn decode(s: &str) -> Self {
        let mut map = BTreeMap::new();
        if s.is_empty() {
            return Self(map);
        }
        for item in split_fields(s, ';') {
            match item.split_once('=') {
                None => map.insert(item.to_string(), None),
                Some((key, rest)) => map.insert(
                    key.to_string(),
                    Some(split_fields(rest, ',').into_iter().map(str::to_string).collect()),
                ),
            };
        }
        Self(map)
    }
}

impl FromIterator<(String, Option<Vec<String>>)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (String, Option<Vec<String>>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
