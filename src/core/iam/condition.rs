//! Condition blocks for policy statements
//!
//! A statement's `Condition` is a two-level map:
//! - test name (`StringLike`, `IpAddress`, ...) to a [`ConditionKeyMap`]
//! - variable name (`s3:prefix`, `aws:SourceIp`, ...) to a set of values
//!
//! Value sets are only ever unioned or differenced, never overwritten. Every
//! operation copies into fresh storage, so maps handed in by a caller are
//! never aliased.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Set of acceptable values for one condition variable
pub type ValueSet = BTreeSet<String>;

/// Variable name to value set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConditionKeyMap(BTreeMap<String, ValueSet>);

impl ConditionKeyMap {
    /// Create an empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `values` into the set stored under `key`
    pub fn add(&mut self, key: &str, values: &ValueSet) {
        match self.0.get_mut(key) {
            Some(existing) => existing.extend(values.iter().cloned()),
            None => {
                self.0.insert(key.to_string(), values.clone());
            }
        }
    }

    /// Remove `values` from the set stored under `key`
    ///
    /// A key left without values is dropped.
    pub fn remove(&mut self, key: &str, values: &ValueSet) {
        let emptied = match self.0.get_mut(key) {
            Some(existing) => {
                existing.retain(|v| !values.contains(v));
                existing.is_empty()
            }
            None => false,
        };
        if emptied {
            self.0.remove(key);
        }
    }

    /// Union another key map into this one
    pub fn extend_from(&mut self, other: &ConditionKeyMap) {
        for (key, values) in &other.0 {
            self.add(key, values);
        }
    }

    pub fn get(&self, key: &str) -> Option<&ValueSet> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ValueSet)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for ConditionKeyMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Documents in the wild write single values without brackets, and
        // `Bool` / `Numeric*` tests carry bare JSON scalars
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for (key, value) in raw {
            let set = match value {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| scalar_value(&key, item))
                    .collect::<Result<ValueSet, String>>(),
                scalar => scalar_value(&key, scalar).map(|v| ValueSet::from([v])),
            }
            .map_err(de::Error::custom)?;
            map.insert(key, set);
        }
        Ok(ConditionKeyMap(map))
    }
}

/// String form of one condition value
fn scalar_value(key: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(format!(
            "condition values for {} must be strings, numbers or booleans, found {}",
            key, other
        )),
    }
}

/// Test name to key map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionMap(BTreeMap<String, ConditionKeyMap>);

impl ConditionMap {
    /// Create an empty condition map
    pub fn new() -> Self {
        Self::default()
    }

    /// Union a key map into the entry for `test`
    pub fn add(&mut self, test: &str, key_map: &ConditionKeyMap) {
        match self.0.get_mut(test) {
            Some(existing) => existing.extend_from(key_map),
            None => {
                self.0.insert(test.to_string(), key_map.clone());
            }
        }
    }

    /// Union `values` into `test` / `variable`
    pub fn add_values(&mut self, test: &str, variable: &str, values: &ValueSet) {
        self.0
            .entry(test.to_string())
            .or_default()
            .add(variable, values);
    }

    /// Remove every value of `key_map` from the entry for `test`
    ///
    /// Tests left without variables are dropped.
    pub fn remove(&mut self, test: &str, key_map: &ConditionKeyMap) {
        let emptied = match self.0.get_mut(test) {
            Some(existing) => {
                for (key, values) in key_map.iter() {
                    existing.remove(key, values);
                }
                existing.is_empty()
            }
            None => false,
        };
        if emptied {
            self.0.remove(test);
        }
    }

    /// Combine two condition maps into a new one
    ///
    /// Tests and variables present in only one input are copied; shared ones
    /// are unioned. Neither input is modified.
    pub fn merge(a: &ConditionMap, b: &ConditionMap) -> ConditionMap {
        let mut merged = a.clone();
        for (test, key_map) in &b.0 {
            merged.add(test, key_map);
        }
        merged
    }

    pub fn get(&self, test: &str) -> Option<&ConditionKeyMap> {
        self.0.get(test)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConditionKeyMap)> {
        self.0.iter()
    }
}
