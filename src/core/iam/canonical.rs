//! Canonical document encoding and fingerprinting
//!
//! The canonical form is what gets attached to buckets and users and what
//! drift detection compares, so it must be byte-stable:
//! - document fields in the order `Version`, `Id`, `Statement`
//! - statement fields in the order `Sid`, `Effect`, `Action`, `Resource`,
//!   `Principal`, `Condition`
//! - empty `Id`, `Sid`, `Principal` and `Condition` omitted
//! - condition tests, variables and values in ascending order
//! - two-space indentation, no trailing newline

use super::policy::PolicyDocument;
use crate::error::Result;
use serde::Serialize;

/// Encode a document in canonical form
pub fn to_canonical_json(document: &PolicyDocument) -> Result<String> {
    let mut buf = Vec::with_capacity(256);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    document.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Non-cryptographic fingerprint of canonical bytes
///
/// The IEEE CRC-32 is read as a signed 32-bit integer and made non-negative.
/// `i32::MIN` has no positive counterpart and maps to `0`.
pub fn fingerprint(bytes: &[u8]) -> u32 {
    fold_sign(crc32fast::hash(bytes))
}

/// Absolute value of `checksum` read as `i32`, `0` for `i32::MIN`
fn fold_sign(checksum: u32) -> u32 {
    let signed = checksum as i32;
    if signed >= 0 {
        return signed as u32;
    }
    signed.checked_neg().map_or(0, |v| v as u32)
}

/// A composed document in canonical form with its fingerprint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPolicy {
    pub json: String,
    pub fingerprint: u32,
}

impl ComposedPolicy {
    /// Encode `document` and fingerprint the result
    pub fn from_document(document: &PolicyDocument) -> Result<Self> {
        let json = to_canonical_json(document)?;
        let fingerprint = fingerprint(json.as_bytes());
        Ok(ComposedPolicy { json, fingerprint })
    }

    /// Opaque identifier: the fingerprint in decimal
    pub fn id(&self) -> String {
        self.fingerprint.to_string()
    }
}

impl std::fmt::Display for ComposedPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.json)
    }
}
