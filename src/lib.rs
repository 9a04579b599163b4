//! # Policy Composer - Deterministic Bucket and Identity Policies
//!
//! `policy-composer` builds the access policy documents an S3-compatible
//! object store attaches to buckets, users and groups. A composition takes:
//!
//! - an optional **base** document (JSON)
//! - the **local** statement declarations, with their own version and id
//! - an optional **override** document (JSON)
//!
//! and folds them, in that order, into one canonical document plus a
//! fingerprint that changes whenever the document does.
//!
//! ## Quick Start
//!
//! ```rust
//! use policy_composer::{compose, LocalDocument, PolicyVersion, Result, StatementDeclaration};
//!
//! # fn main() -> Result<()> {
//! let local = LocalDocument::new(PolicyVersion::V2012_10_17).with_statement(
//!     StatementDeclaration::allow(
//!         ["s3:ListAllMyBuckets", "s3:GetBucketLocation"],
//!         ["arn:aws:s3:::*"],
//!     )
//!     .with_sid("1"),
//! );
//!
//! let composed = compose(None, &local, None)?;
//! println!("{}", composed.json);
//! println!("id: {}", composed.id());
//! # Ok(())
//! # }
//! ```
//!
//! ## Composition rules
//!
//! - Statements with a `Sid` replace the earlier statement with the same
//!   `Sid`, keeping its position. Statements without one are appended.
//! - Two local declarations may not share a non-empty `Sid`.
//! - `&{aws:username}` in resources and condition values becomes
//!   `${aws:username}`; version `2008-10-17` rejects it.
//! - A single action or resource is written as a string, several as a list in
//!   reverse lexicographic order. Existing documents depend on this order.
//! - Condition values for the same test and variable are unioned.
//!
//! ## Architecture
//!
//! ```text
//! base JSON ──parse──┐
//!                    ├─ merge ─┐
//! declarations ─build┘         ├─ merge ── canonical JSON ── CRC-32 id
//! override JSON ──parse────────┘
//! ```

// Core implementation
pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{config, error, iam};

// Re-export core types that users need
pub use crate::core::{
    config::{from_toml_str, load as load_declarations},
    error::{DocumentSource, PolicyError, Result},
    iam::{
        compose, fingerprint, merge, merge_all, to_canonical_json, ComposedPolicy,
        ConditionDeclaration, ConditionKeyMap, ConditionMap, Effect, LocalDocument,
        PolicyComposer, PolicyDocument, PolicyVersion, Statement, StatementBuilder,
        StatementDeclaration, StringOrList, ValueSet,
    },
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
