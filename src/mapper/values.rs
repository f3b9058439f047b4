//! Total field extraction.

use crate::model::NOASSERTION;

/// The value itself, or `""` when it is absent or blank.
#[must_use]
pub fn value_or_default(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .map(String::from)
        .unwrap_or_default()
}

/// Declared license with the `NOASSERTION` sentinel mapped to `""`.
#[must_use]
pub fn declared_license(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case(NOASSERTION) => String::new(),
        _ => value_or_default(value),
    }
}

/// Creation date stamp in the catalog's `YYYY-MM-DD` form.
#[must_use]
pub fn created_on_today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_or_default() {
        assert_eq!(value_or_default(None), "");
        assert_eq!(value_or_default(Some("   ")), "");
        assert_eq!(value_or_default(Some("MIT")), "MIT");
    }

    #[test]
    fn test_declared_license_noassertion() {
        assert_eq!(declared_license(Some("NOASSERTION")), "");
        assert_eq!(declared_license(Some("noassertion")), "");
        assert_eq!(declared_license(Some("Apache-2.0")), "Apache-2.0");
        assert_eq!(declared_license(None), "");
    }

    #[test]
    fn test_created_on_format() {
        let today = created_on_today();
        assert_eq!(today.len(), 10);
        assert_eq!(today.as_bytes()[4], b'-');
    }
}
