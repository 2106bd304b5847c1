//! Shared utility functions: key=value parsing, pluralization, and
//! group/version extraction from package paths.

use crate::error::{Error, Result};

/// Parses a `key=value` element and returns the key and value.
///
/// Surrounding double quotes on the value are stripped, so `path="ships"`
/// and `path=ships` are equivalent. A missing or repeated `=` is a grammar
/// error; `payload` is only used for error reporting.
pub fn parse_kv<'a>(element: &'a str, payload: &str) -> Result<(&'a str, &'a str)> {
    let parts: Vec<&str> = element.split('=').collect();
    if parts.len() != 2 {
        return Err(Error::MalformedKeyValue {
            element: element.to_string(),
            payload: payload.to_string(),
        });
    }
    let (key, mut value) = (parts[0], parts[1]);
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        value = &value[1..value.len() - 1];
    }
    Ok((key, value))
}

/// Lowercases and pluralizes a kind name into its default resource name,
/// e.g. `Frigate` -> `frigates`, `NetworkPolicy` -> `networkpolicies`.
pub fn pluralize(kind: &str) -> String {
    let lower = kind.to_lowercase();
    if let Some(stem) = lower.strip_suffix('y') {
        // consonant + y -> ies; vowel + y -> ys
        match stem.chars().last() {
            Some('a') | Some('e') | Some('i') | Some('o') | Some('u') | None => {
                format!("{}s", lower)
            }
            Some(_) => format!("{}ies", stem),
        }
    } else if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        format!("{}es", lower)
    } else {
        format!("{}s", lower)
    }
}

/// Extracts (group, version) from an API package path.
///
/// By convention the version is the last path segment and the group the
/// segment before it, e.g. `example.com/pkg/apis/ship/v1beta1` yields
/// `("ship", "v1beta1")`. Missing segments come back empty.
pub fn group_version(package: &str) -> (String, String) {
    let mut segments = package.rsplit('/');
    let version = segments.next().unwrap_or("").to_string();
    let group = segments.next().unwrap_or("").to_string();
    (group, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kv_basic() {
        assert_eq!(parse_kv("path=ships", "").unwrap(), ("path", "ships"));
    }

    #[test]
    fn test_parse_kv_strips_quotes() {
        assert_eq!(parse_kv("path=\"ships\"", "").unwrap(), ("path", "ships"));
    }

    #[test]
    fn test_parse_kv_rejects_bare_word() {
        assert!(parse_kv("ships", "ships").is_err());
    }

    #[test]
    fn test_parse_kv_rejects_double_equals() {
        assert!(parse_kv("a=b=c", "a=b=c").is_err());
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Frigate"), "frigates");
        assert_eq!(pluralize("NetworkPolicy"), "networkpolicies");
        assert_eq!(pluralize("Ingress"), "ingresses");
        assert_eq!(pluralize("Box"), "boxes");
        assert_eq!(pluralize("Batch"), "batches");
        assert_eq!(pluralize("Gateway"), "gateways");
    }

    #[test]
    fn test_group_version() {
        assert_eq!(
            group_version("example.com/pkg/apis/ship/v1beta1"),
            ("ship".to_string(), "v1beta1".to_string())
        );
        assert_eq!(group_version("v1"), ("".to_string(), "v1".to_string()));
    }
}
