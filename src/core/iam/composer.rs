//! Policy composition
//!
//! Ties the pieces together: parse the optional base and override documents,
//! build the local declarations, fold `base -> local -> override` and encode
//! the result canonically.
//!
//! ```
//! use policy_composer::{LocalDocument, PolicyComposer, PolicyVersion, StatementDeclaration};
//!
//! let local = LocalDocument::new(PolicyVersion::V2012_10_17).with_statement(
//!     StatementDeclaration::allow(["s3:GetObject"], ["arn:aws:s3:::public/*"]).with_principal("*"),
//! );
//!
//! let composed = PolicyComposer::new().local(local).compose().unwrap();
//! assert!(composed.json.contains("\"Principal\": \"*\""));
//! ```

use super::builder::LocalDocument;
use super::canonical::ComposedPolicy;
use super::policy::PolicyDocument;
use crate::error::{DocumentSource, PolicyError, Result};
use tracing::{debug, info};

/// Where an outer document comes from
#[derive(Debug, Clone)]
enum Source {
    Json(String),
    Document(PolicyDocument),
}

impl Source {
    fn resolve(&self, which: DocumentSource) -> Result<PolicyDocument> {
        match self {
            Source::Json(json) => {
                PolicyDocument::from_json(json).map_err(|e| PolicyError::parse(which, e))
            }
            Source::Document(document) => Ok(document.clone()),
        }
    }
}

/// Builder for one composition
///
/// The composer only holds inputs; every [`compose`](Self::compose) call
/// works on fresh copies, so one composer can be reused or shared between
/// threads.
#[derive(Debug, Clone, Default)]
pub struct PolicyComposer {
    base: Option<Source>,
    local: LocalDocument,
    overrides: Option<Source>,
}

impl PolicyComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base document as JSON text
    pub fn base_json(mut self, json: impl Into<String>) -> Self {
        self.base = Some(Source::Json(json.into()));
        self
    }

    /// Already parsed base document
    pub fn base_document(mut self, document: PolicyDocument) -> Self {
        self.base = Some(Source::Document(document));
        self
    }

    /// Locally declared statements
    pub fn local(mut self, local: LocalDocument) -> Self {
        self.local = local;
        self
    }

    /// Override document as JSON text
    pub fn override_json(mut self, json: impl Into<String>) -> Self {
        self.overrides = Some(Source::Json(json.into()));
        self
    }

    /// Already parsed override document
    pub fn override_document(mut self, document: PolicyDocument) -> Self {
        self.overrides = Some(Source::Document(document));
        self
    }

    /// Produce the merged document without encoding it
    pub fn compose_document(&self) -> Result<PolicyDocument> {
        let mut merged = match &self.base {
            Some(base) => base.resolve(DocumentSource::Base)?,
            None => PolicyDocument::empty(),
        };
        debug!("Base document has {} statements", merged.statement.len());

        let local = self.local.build()?;
        merged = merged.merged_with(&local);
        debug!(
            "Merged {} local statements, {} total",
            local.statement.len(),
            merged.statement.len()
        );

        if let Some(overrides) = &self.overrides {
            let overrides = overrides.resolve(DocumentSource::Override)?;
            merged = merged.merged_with(&overrides);
            debug!(
                "Merged {} override statements, {} total",
                overrides.statement.len(),
                merged.statement.len()
            );
        }

        Ok(merged)
    }

    /// Produce the canonical document and its fingerprint
    pub fn compose(&self) -> Result<ComposedPolicy> {
        let document = self.compose_document()?;
        let composed = ComposedPolicy::from_document(&document)?;
        info!(
            "Composed policy version {} with {} statements (id {})",
            document.version,
            document.statement.len(),
            composed.id()
        );
        Ok(composed)
    }
}

/// Compose in one call
pub fn compose(
    base_json: Option<&str>,
    local: &LocalDocument,
    override_json: Option<&str>,
) -> Result<ComposedPolicy> {
    let mut composer = PolicyComposer::new().local(local.clone());
    if let Some(json) = base_json {
        composer = composer.base_json(json);
    }
    if let Some(json) = override_json {
        composer = composer.override_json(json);
    }
    composer.compose()
}
