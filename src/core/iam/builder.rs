//! Statement declarations and the builder that turns them into statements
//!
//! A [`LocalDocument`] is what the calling configuration layer declares: a
//! version, an optional id and a list of [`StatementDeclaration`]s. Building
//! it checks sid uniqueness, shapes action and resource sets and rewrites
//! policy variables.

use super::condition::{ConditionMap, ValueSet};
use super::policy::{Effect, PolicyDocument, PolicyVersion, Statement};
use super::value::StringOrList;
use super::variables::{substitute, substitute_values};
use crate::error::{PolicyError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;
use validator::Validate;

/// One condition of a declared statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ConditionDeclaration {
    /// Condition operator, e.g. `StringLike`
    #[validate(length(min = 1, message = "condition test cannot be empty"))]
    pub test: String,

    /// Context key, e.g. `s3:prefix`
    #[validate(length(min = 1, message = "condition variable cannot be empty"))]
    pub variable: String,

    #[validate(length(min = 1, message = "condition needs at least one value"))]
    pub values: Vec<String>,
}

impl ConditionDeclaration {
    pub fn new<I, S>(test: impl Into<String>, variable: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ConditionDeclaration {
            test: test.into(),
            variable: variable.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// One declared statement
///
/// Actions and resources are sets: order and duplicates in the declaration
/// do not affect the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct StatementDeclaration {
    pub sid: String,

    pub effect: Effect,

    #[validate(length(min = 1, message = "statement needs at least one action"))]
    pub actions: Vec<String>,

    #[validate(length(min = 1, message = "statement needs at least one resource"))]
    pub resources: Vec<String>,

    pub principal: String,

    pub conditions: Vec<ConditionDeclaration>,
}

impl StatementDeclaration {
    /// Declare an `Allow` statement
    pub fn allow<A, R, S, T>(actions: A, resources: R) -> Self
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        StatementDeclaration {
            actions: actions.into_iter().map(Into::into).collect(),
            resources: resources.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Declare a `Deny` statement
    pub fn deny<A, R, S, T>(actions: A, resources: R) -> Self
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        StatementDeclaration {
            effect: Effect::Deny,
            ..Self::allow(actions, resources)
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

    pub fn with_condition(mut self, condition: ConditionDeclaration) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Run field validation on this declaration and its conditions
    pub fn check(&self) -> Result<()> {
        let label = if self.sid.is_empty() {
            "unnamed statement".to_string()
        } else {
            format!("statement '{}'", self.sid)
        };

        self.validate()
            .map_err(|e| PolicyError::InvalidDeclaration(format!("{}: {}", label, e)))?;
        for condition in &self.conditions {
            condition
                .validate()
                .map_err(|e| PolicyError::InvalidDeclaration(format!("{}: {}", label, e)))?;
        }
        Ok(())
    }
}

/// The locally declared document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalDocument {
    pub version: PolicyVersion,
    pub id: String,
    pub statements: Vec<StatementDeclaration>,
}

impl LocalDocument {
    /// Create an empty declaration set for `version`
    pub fn new(version: PolicyVersion) -> Self {
        LocalDocument {
            version,
            id: String::new(),
            statements: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_statement(mut self, statement: StatementDeclaration) -> Self {
        self.statements.push(statement);
        self
    }

    /// Build the declared statements into a policy document
    pub fn build(&self) -> Result<PolicyDocument> {
        let statements = StatementBuilder::new(self.version).build_all(&self.statements)?;
        Ok(PolicyDocument {
            version: self.version,
            id: self.id.clone(),
            statement: statements,
        })
    }
}

/// Builds statements for one document version
#[derive(Debug, Clone, Copy)]
pub struct StatementBuilder {
    version: PolicyVersion,
}

impl StatementBuilder {
    pub fn new(version: PolicyVersion) -> Self {
        StatementBuilder { version }
    }

    /// Build a batch of declarations
    ///
    /// # Errors
    ///
    /// - `DuplicateSid` when two declarations share a non-empty sid. Only this
    ///   batch is checked; sids inherited from a base document are not.
    /// - `InvalidDeclaration`, `UnsupportedVariable`, `ConditionValue` from
    ///   the individual statements.
    pub fn build_all(&self, declarations: &[StatementDeclaration]) -> Result<Vec<Statement>> {
        let mut seen_sids: HashSet<&str> = HashSet::new();
        let mut statements = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            if !declaration.sid.is_empty() && !seen_sids.insert(declaration.sid.as_str()) {
                return Err(PolicyError::DuplicateSid(declaration.sid.clone()));
            }
            statements.push(self.build(declaration)?);
        }

        debug!(
            "Built {} statements for version {}",
            statements.len(),
            self.version
        );
        Ok(statements)
    }

    /// Build one declaration
    pub fn build(&self, declaration: &StatementDeclaration) -> Result<Statement> {
        declaration.check()?;

        let action = StringOrList::from_set(declaration.actions.iter().cloned());
        // Shape first, then rewrite: ordering is decided on the declared text
        let resource = substitute_values(
            &StringOrList::from_set(declaration.resources.iter().cloned()),
            self.version,
        )?;
        let condition = self.build_conditions(&declaration.conditions)?;

        Ok(Statement {
            sid: declaration.sid.clone(),
            effect: declaration.effect,
            action,
            resource,
            principal: declaration.principal.clone(),
            condition,
        })
    }

    fn build_conditions(&self, declarations: &[ConditionDeclaration]) -> Result<ConditionMap> {
        let mut conditions = ConditionMap::new();

        for declaration in declarations {
            let values = declaration
                .values
                .iter()
                .map(|value| substitute(value, self.version))
                .collect::<Result<ValueSet>>()
                .map_err(|e| PolicyError::ConditionValue {
                    test: declaration.test.clone(),
                    variable: declaration.variable.clone(),
                    reason: e.to_string(),
                })?;

            conditions.add_values(&declaration.test, &declaration.variable, &values);
        }

        Ok(conditions)
    }
}
