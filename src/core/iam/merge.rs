//! Document merging
//!
//! Composition folds documents in a fixed order: base, then local, then
//! override. Each step is one [`merge`] call.
//!
//! Statement identity is the sid:
//! - an incoming unnamed statement is appended
//! - an incoming named statement replaces the target statement with the same
//!   sid at that statement's index, or is appended if there is none
//!
//! Merging never touches its inputs; the result is a new document.

use super::policy::PolicyDocument;
use tracing::debug;

/// Merge `incoming` over `target`, returning the combined document
///
/// - `Id`: incoming wins when non-empty
/// - `Version`: the newer of the two
/// - `Statement`: sid-keyed replace in place, otherwise append
pub fn merge(target: &PolicyDocument, incoming: &PolicyDocument) -> PolicyDocument {
    let mut merged = target.clone();

    if !incoming.id.is_empty() {
        merged.id = incoming.id.clone();
    }

    if incoming.version > merged.version {
        merged.version = incoming.version;
    }

    for statement in &incoming.statement {
        let slot = statement.sid().and_then(|sid| merged.position_of(sid));
        match slot {
            Some(index) => {
                debug!("Replacing statement '{}' at index {}", statement.sid, index);
                merged.statement[index] = statement.clone();
            }
            None => merged.statement.push(statement.clone()),
        }
    }

    merged
}

/// Fold a sequence of documents into one, starting from an empty document
pub fn merge_all<'a, I>(documents: I) -> PolicyDocument
where
    I: IntoIterator<Item = &'a PolicyDocument>,
{
    documents
        .into_iter()
        .fold(PolicyDocument::empty(), |acc, doc| merge(&acc, doc))
}

impl PolicyDocument {
    /// Merge `incoming` over this document, see [`merge`]
    pub fn merged_with(&self, incoming: &PolicyDocument) -> PolicyDocument {
        merge(self, incoming)
    }
}
