//! Policy variable substitution
//!
//! Declarations write policy variables as `&{aws:username}` so the
//! declaring configuration language does not try to interpolate them. The
//! object store expects `${aws:username}`. Substitution is a plain text
//! rewrite, nothing is evaluated.

use super::policy::PolicyVersion;
use super::value::StringOrList;
use crate::error::{PolicyError, Result};

/// Delimiter used in declarations
pub const DECLARED_VARIABLE_PREFIX: &str = "&{";

/// Delimiter understood by the object store
pub const RUNTIME_VARIABLE_PREFIX: &str = "${";

/// Rewrite declared variables in one value
///
/// # Errors
///
/// Returns `UnsupportedVariable` when `value` contains a variable and
/// `version` predates policy variables.
pub fn substitute(value: &str, version: PolicyVersion) -> Result<String> {
    if !value.contains(DECLARED_VARIABLE_PREFIX) {
        return Ok(value.to_string());
    }

    if !version.supports_variables() {
        return Err(PolicyError::UnsupportedVariable {
            value: value.to_string(),
            version: version.to_string(),
        });
    }

    Ok(value.replace(DECLARED_VARIABLE_PREFIX, RUNTIME_VARIABLE_PREFIX))
}

/// Rewrite declared variables in a scalar or list, keeping its shape
pub fn substitute_values(values: &StringOrList, version: PolicyVersion) -> Result<StringOrList> {
    values.try_map(|value| substitute(value, version))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_variable() {
        let out = substitute("arn:x:::foo/&{aws:username}", PolicyVersion::V2012_10_17).unwrap();
        assert_eq!(out, "arn:x:::foo/${aws:username}");
    }

    #[test]
    fn test_rejects_variable_in_old_version() {
        let err = substitute("arn:x:::foo/&{aws:username}", PolicyVersion::V2008_10_17).unwrap_err();
        assert!(matches!(err, PolicyError::UnsupportedVariable { .. }));
        assert!(err.to_string().contains("2008-10-17"));
    }

    #[test]
    fn test_plain_values_pass_through_any_version() {
        for version in [PolicyVersion::V2008_10_17, PolicyVersion::V2012_10_17] {
            assert_eq!(substitute("arn:x:::foo/*", version).unwrap(), "arn:x:::foo/*");
        }
    }

    #[test]
    fn test_already_runtime_variables_untouched() {
        // Only the declared delimiter is gated
        let out = substitute("arn:x:::foo/${aws:username}", PolicyVersion::V2008_10_17).unwrap();
        assert_eq!(out, "arn:x:::foo/${aws:username}");
    }

    #[test]
    fn test_multiple_variables() {
        let out = substitute("&{aws:userid}/&{aws:username}/*", PolicyVersion::V2012_10_17).unwrap();
        assert_eq!(out, "${aws:userid}/${aws:username}/*");
    }

    #[test]
    fn test_substitute_values_keeps_shape() {
        let scalar = StringOrList::from("home/&{aws:username}");
        assert_eq!(
            substitute_values(&scalar, PolicyVersion::V2012_10_17).unwrap(),
            StringOrList::from("home/${aws:username}")
        );

        let list = StringOrList::List(vec!["a/&{x}".to_string(), "b".to_string()]);
        assert_eq!(
            substitute_values(&list, PolicyVersion::V2012_10_17).unwrap(),
            StringOrList::List(vec!["a/${x}".to_string(), "b".to_string()])
        );

        assert!(substitute_values(&list, PolicyVersion::V2008_10_17).is_err());
    }
}
