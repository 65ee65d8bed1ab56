//! Storage path templating
//!
//! Collaborator interface for the attribute-persistence glue: a path
//! template like `gallery/{slug}/{hash}.{extension}` is resolved against a
//! map of model/image fields. Placeholders with no matching non-empty field
//! are left for a later resolution pass, mirroring how templated paths get
//! filled in incrementally as image data and model attributes become
//! available.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").unwrap());

/// Resolve `{field}` placeholders in `template` from `fields`. Placeholders
/// missing from the map (or mapped to an empty string) are left intact.
pub fn resolve(template: &str, fields: &HashMap<String, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let key = &caps[1];
            match fields.get(key) {
                Some(value) if !value.is_empty() => value.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Whether a path still contains unresolved placeholders.
pub fn is_fully_resolved(path: &str) -> bool {
    !PLACEHOLDER.is_match(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_resolve_all_placeholders() {
        let resolved = resolve(
            "gallery/{slug}/{hash}.{extension}",
            &fields(&[("slug", "sunset"), ("hash", "abc123"), ("extension", "jpg")]),
        );
        assert_eq!(resolved, "gallery/sunset/abc123.jpg");
        assert!(is_fully_resolved(&resolved));
    }

    #[test]
    fn test_unresolved_placeholders_kept() {
        let resolved = resolve("gallery/{slug}/{hash}.jpg", &fields(&[("slug", "sunset")]));
        assert_eq!(resolved, "gallery/sunset/{hash}.jpg");
        assert!(!is_fully_resolved(&resolved));
    }

    #[test]
    fn test_empty_field_treated_as_missing() {
        let resolved = resolve("img/{id}.png", &fields(&[("id", "")]));
        assert_eq!(resolved, "img/{id}.png");
    }
}
