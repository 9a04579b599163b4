//! String-or-list values
//!
//! Policy documents allow `Action` and `Resource` to be written either as a
//! single string or as an array of strings. [`StringOrList`] keeps that shape
//! explicit so substitution and serialization never inspect runtime types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A policy value written as one string or as a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    Scalar(String),
    List(Vec<String>),
}

impl StringOrList {
    /// Build the declared form of a value set.
    ///
    /// Duplicates are removed. Exactly one value collapses to
    /// [`StringOrList::Scalar`]; two or more become a list sorted in
    /// **reverse lexicographic order**.
    ///
    /// The reverse ordering is surprising, but documents that are already
    /// attached to buckets and users were produced this way, and changing the
    /// order would change every fingerprint downstream. Keep it.
    pub fn from_set<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.len() == 1 {
            // len checked above
            let only = set.into_iter().next().unwrap_or_default();
            return StringOrList::Scalar(only);
        }
        StringOrList::List(set.into_iter().rev().collect())
    }

    /// Number of values
    pub fn len(&self) -> usize {
        match self {
            StringOrList::Scalar(_) => 1,
            StringOrList::List(values) => values.len(),
        }
    }

    /// True for an empty list
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate values in written order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            StringOrList::Scalar(value) => std::slice::from_ref(value),
            StringOrList::List(values) => values,
        };
        slice.iter().map(String::as_str)
    }

    /// Apply a fallible rewrite to every value, keeping the shape
    pub fn try_map<E, F>(&self, mut f: F) -> Result<Self, E>
    where
        F: FnMut(&str) -> Result<String, E>,
    {
        match self {
            StringOrList::Scalar(value) => f(value).map(StringOrList::Scalar),
            StringOrList::List(values) => values
                .iter()
                .map(|v| f(v))
                .collect::<Result<Vec<_>, E>>()
                .map(StringOrList::List),
        }
    }

    /// Check if any value equals `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.iter().any(|v| v == needle)
    }
}

impl Default for StringOrList {
    fn default() -> Self {
        StringOrList::List(Vec::new())
    }
}

impl From<&str> for StringOrList {
    fn from(value: &str) -> Self {
        StringOrList::Scalar(value.to_string())
    }
}

impl From<String> for StringOrList {
    fn from(value: String) -> Self {
        StringOrList::Scalar(value)
    }
}

impl From<Vec<String>> for StringOrList {
    fn from(values: Vec<String>) -> Self {
        StringOrList::List(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value_collapses_to_scalar() {
        let value = StringOrList::from_set(["s3:GetObject"]);
        assert_eq!(value, StringOrList::Scalar("s3:GetObject".to_string()));
    }

    #[test]
    fn test_duplicates_collapse_to_scalar() {
        let value = StringOrList::from_set(["s3:GetObject", "s3:GetObject"]);
        assert_eq!(value, StringOrList::Scalar("s3:GetObject".to_string()));
    }

    #[test]
    fn test_multiple_values_reverse_sorted() {
        let value = StringOrList::from_set(["s3:GetBucketLocation", "s3:ListAllMyBuckets"]);
        assert_eq!(
            value,
            StringOrList::List(vec![
                "s3:ListAllMyBuckets".to_string(),
                "s3:GetBucketLocation".to_string(),
            ])
        );

        let value = StringOrList::from_set(["a", "c", "b"]);
        assert_eq!(value.iter().collect::<Vec<_>>(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_empty_set_is_empty_list() {
        let value = StringOrList::from_set(Vec::<String>::new());
        assert!(value.is_empty());
        assert_eq!(value, StringOrList::List(vec![]));
    }

    #[test]
    fn test_try_map_keeps_shape() {
        let scalar = StringOrList::from("a");
        let mapped: Result<_, ()> = scalar.try_map(|v| Ok(v.to_uppercase()));
        assert_eq!(mapped.unwrap(), StringOrList::Scalar("A".to_string()));

        let list = StringOrList::List(vec!["x".to_string()]);
        let mapped: Result<_, ()> = list.try_map(|v| Ok(format!("{v}!")));
        assert_eq!(mapped.unwrap(), StringOrList::List(vec!["x!".to_string()]));

        let failed: Result<StringOrList, &str> = list.try_map(|_| Err("nope"));
        assert_eq!(failed, Err("nope"));
    }

    #[test]
    fn test_json_shapes() {
        let scalar: StringOrList = serde_json::from_str(r#""arn:aws:s3:::*""#).unwrap();
        assert_eq!(scalar, StringOrList::from("arn:aws:s3:::*"));

        let list: StringOrList = serde_json::from_str(r#"["b","a"]"#).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec!["b", "a"]);

        assert_eq!(serde_json::to_string(&scalar).unwrap(), r#""arn:aws:s3:::*""#);
        assert_eq!(serde_json::to_string(&list).unwrap(), r#"["b","a"]"#);
    }
}
