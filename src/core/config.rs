//! Declaration files
//!
//! The local statements of a composition are usually written by hand in a
//! TOML file next to the bucket or user they apply to:
//!
//! ```toml
//! version = "2012-10-17"
//! id = "shared-bucket"
//!
//! [[statements]]
//! sid = "HomeListing"
//! actions = ["s3:ListBucket"]
//! resources = ["arn:aws:s3:::shared"]
//!
//! [[statements.conditions]]
//! test = "StringLike"
//! variable = "s3:prefix"
//! values = ["home/&{aws:username}/*"]
//! ```
//!
//! Every statement is validated on load, so a file that loads cleanly only
//! fails composition on sid, variable or document errors.

use crate::error::Result;
use crate::iam::LocalDocument;
use std::path::Path;
use tracing::debug;

/// Parse a declaration file from TOML text
///
/// # Examples
///
/// ```
/// use policy_composer::from_toml_str;
///
/// let local = from_toml_str(r#"
///     [[statements]]
///     actions = ["s3:GetObject"]
///     resources = ["arn:aws:s3:::public/*"]
///     principal = "*"
/// "#).unwrap();
///
/// assert_eq!(local.statements.len(), 1);
/// ```
pub fn from_toml_str(text: &str) -> Result<LocalDocument> {
    let local: LocalDocument = toml::from_str(text)?;
    for statement in &local.statements {
        statement.check()?;
    }
    Ok(local)
}

/// Load a declaration file from disk
pub fn load(path: impl AsRef<Path>) -> Result<LocalDocument> {
    let path = path.as_ref();
    debug!("Loading declarations from {:?}", path);
    let text = std::fs::read_to_string(path)?;
    let local = from_toml_str(&text)?;
    debug!(
        "Loaded {} statement declarations (version {})",
        local.statements.len(),
        local.version
    );
    Ok(local)
}

impl LocalDocument {
    /// Parse a declaration file from TOML text, see [`from_toml_str`]
    pub fn from_toml(text: &str) -> Result<Self> {
        from_toml_str(text)
    }
}
