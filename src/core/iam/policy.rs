//! Policy document structure
//!
//! Documents follow the bucket / identity policy grammar used by
//! S3-compatible object stores: a `Version`, an optional `Id` and a list of
//! `Statement`s.

use super::condition::ConditionMap;
use super::value::StringOrList;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Effect of a policy statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// Allow the action
    #[default]
    Allow,
    /// Deny the action
    Deny,
}

/// Policy grammar version
///
/// Variants are declared oldest first so `Ord` follows release order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolicyVersion {
    /// Original grammar, no policy variables
    #[serde(rename = "2008-10-17")]
    V2008_10_17,
    /// Current grammar, allows `${...}` policy variables
    #[default]
    #[serde(rename = "2012-10-17")]
    V2012_10_17,
}

impl PolicyVersion {
    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyVersion::V2008_10_17 => "2008-10-17",
            PolicyVersion::V2012_10_17 => "2012-10-17",
        }
    }

    /// Whether `${...}` policy variables may appear in documents of this version
    pub fn supports_variables(&self) -> bool {
        *self >= PolicyVersion::V2012_10_17
    }

    /// Version assumed when a document omits `Version`
    pub fn unversioned() -> Self {
        PolicyVersion::V2008_10_17
    }
}

impl std::fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2008-10-17" => Ok(PolicyVersion::V2008_10_17),
            "2012-10-17" => Ok(PolicyVersion::V2012_10_17),
            other => Err(format!(
                "unsupported policy version '{}' (expected 2008-10-17 or 2012-10-17)",
                other
            )),
        }
    }
}

/// A single policy statement
///
/// Field order here is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct Statement {
    /// Statement ID, empty when unnamed
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub sid: String,

    #[serde(default)]
    pub effect: Effect,

    #[serde(default)]
    pub action: StringOrList,

    #[serde(default)]
    pub resource: StringOrList,

    /// `*` or an identity reference, empty when absent
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub principal: String,

    #[serde(default, skip_serializing_if = "ConditionMap::is_empty")]
    pub condition: ConditionMap,
}

impl Statement {
    /// Create a new unnamed statement without principal or conditions
    pub fn new(
        effect: Effect,
        action: impl Into<StringOrList>,
        resource: impl Into<StringOrList>,
    ) -> Self {
        Statement {
            sid: String::new(),
            effect,
            action: action.into(),
            resource: resource.into(),
            principal: String::new(),
            condition: ConditionMap::new(),
        }
    }

    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = sid.into();
        self
    }

    pub fn with_principal(mut self, principal: impl Into<String>) -> Self {
        self.principal = principal.into();
        self
    }

    pub fn with_condition(mut self, condition: ConditionMap) -> Self {
        self.condition = condition;
        self
    }

    /// Sid when the statement is named
    pub fn sid(&self) -> Option<&str> {
        if self.sid.is_empty() {
            None
        } else {
            Some(&self.sid)
        }
    }
}

/// Complete policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default = "PolicyVersion::unversioned")]
    pub version: PolicyVersion,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, deserialize_with = "one_or_many")]
    pub statement: Vec<Statement>,
}

impl PolicyDocument {
    /// Create an empty document of the given version
    pub fn new(version: PolicyVersion) -> Self {
        PolicyDocument {
            version,
            id: String::new(),
            statement: Vec::new(),
        }
    }

    /// The document every composition folds into
    ///
    /// It carries the oldest version so any merged-in document can upgrade it.
    pub fn empty() -> Self {
        Self::new(PolicyVersion::unversioned())
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Add a statement to this document
    pub fn add_statement(&mut self, statement: Statement) {
        self.statement.push(statement);
    }

    /// Parse a document from JSON text
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Find the index of the statement named `sid`
    pub fn position_of(&self, sid: &str) -> Option<usize> {
        self.statement.iter().position(|s| s.sid() == Some(sid))
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::empty()
    }
}

/// Accept `"Statement": {...}` as well as `"Statement": [...]`
///
/// Dispatches on the JSON shape so a bad statement reports its own error.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<Statement>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Array(_) => serde_json::from_value(value).map_err(de::Error::custom),
        value @ Value::Object(_) => serde_json::from_value::<Statement>(value)
            .map(|statement| vec![statement])
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a statement or a list of statements, found {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ordering() {
        assert!(PolicyVersion::V2012_10_17 > PolicyVersion::V2008_10_17);
        assert!(PolicyVersion::V2012_10_17.supports_variables());
        assert!(!PolicyVersion::V2008_10_17.supports_variables());
        assert_eq!(PolicyVersion::default(), PolicyVersion::V2012_10_17);
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!(
            "2012-10-17".parse::<PolicyVersion>().unwrap(),
            PolicyVersion::V2012_10_17
        );
        assert_eq!(
            "2008-10-17".parse::<PolicyVersion>().unwrap(),
            PolicyVersion::V2008_10_17
        );
        assert!("2024-01-01".parse::<PolicyVersion>().is_err());
    }

    #[test]
    fn test_document_creation() {
        let mut doc = PolicyDocument::new(PolicyVersion::V2012_10_17);
        assert_eq!(doc.statement.len(), 0);

        doc.add_statement(
            Statement::new(Effect::Allow, "s3:GetObject", "arn:aws:s3:::bucket/*").with_sid("read"),
        );

        assert_eq!(doc.statement.len(), 1);
        assert_eq!(doc.position_of("read"), Some(0));
        assert_eq!(doc.position_of("write"), None);
    }

    #[test]
    fn test_parse_defaults() {
        let doc = PolicyDocument::from_json(
            r#"{"Statement": [{"Action": "s3:GetObject", "Resource": "arn:aws:s3:::b/*"}]}"#,
        )
        .unwrap();

        assert_eq!(doc.version, PolicyVersion::V2008_10_17);
        assert!(doc.id.is_empty());
        assert_eq!(doc.statement[0].effect, Effect::Allow);
        assert_eq!(doc.statement[0].sid(), None);
        assert!(doc.statement[0].condition.is_empty());
    }

    #[test]
    fn test_parse_single_statement_object() {
        let doc = PolicyDocument::from_json(
            r#"{
                "Version": "2012-10-17",
                "Statement": {"Sid": "one", "Effect": "Deny", "Action": "s3:*", "Resource": "*"}
            }"#,
        )
        .unwrap();

        assert_eq!(doc.statement.len(), 1);
        assert_eq!(doc.statement[0].sid(), Some("one"));
        assert_eq!(doc.statement[0].effect, Effect::Deny);
    }

    #[test]
    fn test_parse_rejects_unknown_version() {
        let result = PolicyDocument::from_json(r#"{"Version": "2024-01-01", "Statement": []}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_unknown_fields() {
        let err = PolicyDocument::from_json(
            r#"{"Version": "2012-10-17", "Statement": [{"NotAction": "s3:*", "Resource": "*"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("NotAction"), "{}", err);

        let err = PolicyDocument::from_json(
            r#"{"Statement": {"NotResource": "*", "Action": "s3:*"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("NotResource"), "{}", err);
    }

    #[test]
    fn test_parse_reports_bad_condition_value() {
        let err = PolicyDocument::from_json(
            r#"{"Statement": [{"Action": "s3:*", "Resource": "*",
                "Condition": {"StringLike": {"s3:prefix": {"a": 1}}}}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("s3:prefix"), "{}", err);
        assert!(!err.to_string().contains("untagged"), "{}", err);
    }

    #[test]
    fn test_parse_rejects_scalar_statement() {
        let err = PolicyDocument::from_json(r#"{"Statement": "s3:*"}"#).unwrap_err();
        assert!(err.to_string().contains("list of statements"), "{}", err);
    }

    #[test]
    fn test_empty_sid_is_unnamed() {
        let statement = Statement::new(Effect::Allow, "s3:GetObject", "*").with_sid("");
        assert_eq!(statement.sid(), None);
    }
}
