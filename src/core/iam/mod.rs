//! Policy documents for bucket and identity access control
//!
//! Provides deterministic composition of policy documents:
//! - JSON policy documents with `Version`, `Id` and `Statement`s
//! - Statement declarations with sid uniqueness checks
//! - Condition value set algebra (union, difference, merge)
//! - `&{...}` to `${...}` policy variable rewriting
//! - Sid-keyed merging of base, local and override documents
//! - Canonical encoding with a CRC-32 fingerprint

mod builder;
mod canonical;
mod composer;
mod condition;
mod merge;
mod policy;
mod value;
mod variables;

pub use builder::{ConditionDeclaration, LocalDocument, StatementBuilder, StatementDeclaration};
pub use canonical::{fingerprint, to_canonical_json, ComposedPolicy};
pub use composer::{compose, PolicyComposer};
pub use condition::{ConditionKeyMap, ConditionMap, ValueSet};
pub use merge::{merge, merge_all};
pub use policy::{Effect, PolicyDocument, PolicyVersion, Statement};
pub use value::StringOrList;
pub use variables::{substitute, substitute_values};
