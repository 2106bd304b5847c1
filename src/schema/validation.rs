//! Parser for inline validation constraint directives.
//!
//! Member comment lines of the form `+kubebuilder:validation:Key=Value`
//! (short form `+validation:Key=Value`) set validation rules on the schema
//! node being derived. Unknown keys and malformed literals are fatal,
//! naming the offending line; array-only keys silently no-op on non-array
//! nodes.

use crate::error::{Error, Result};
use crate::schema::props::JsonSchemaProps;

const PREFIXES: &[&str] = &["+kubebuilder:validation:", "+validation:"];

/// Applies one comment line to the schema node if it is a validation
/// directive; other lines are ignored.
pub fn apply_validation(line: &str, props: &mut JsonSchemaProps) -> Result<()> {
    let trimmed = line.trim_start();
    let Some(rest) = PREFIXES.iter().find_map(|p| trimmed.strip_prefix(p)) else {
        return Ok(());
    };
    let Some((key, value)) = rest.split_once('=') else {
        return Err(Error::validation(line, "expected <Key>=<value>"));
    };

    match key {
        "Maximum" => props.maximum = Some(parse_float(line, value)?),
        "ExclusiveMaximum" => props.exclusive_maximum = parse_bool(line, value)?,
        "Minimum" => props.minimum = Some(parse_float(line, value)?),
        "ExclusiveMinimum" => props.exclusive_minimum = parse_bool(line, value)?,
        "MaxLength" => props.max_length = Some(parse_int(line, value)?),
        "MinLength" => props.min_length = Some(parse_int(line, value)?),
        "Pattern" => props.pattern = value.to_string(),
        "MaxItems" => {
            if props.schema_type == "array" {
                props.max_items = Some(parse_int(line, value)?);
            }
        }
        "MinItems" => {
            if props.schema_type == "array" {
                props.min_items = Some(parse_int(line, value)?);
            }
        }
        "UniqueItems" => {
            if props.schema_type == "array" {
                props.unique_items = parse_bool(line, value)?;
            }
        }
        "MultipleOf" => props.multiple_of = Some(parse_float(line, value)?),
        "Enum" => {
            if props.schema_type != "array" {
                props.enum_values = value
                    .split(',')
                    .map(|raw| coerce_enum_value(line, &props.schema_type, raw))
                    .collect::<Result<Vec<_>>>()?;
            }
        }
        "Format" => props.format = value.to_string(),
        other => {
            return Err(Error::validation(
                line,
                format!("unsupported validation key {:?}", other),
            ));
        }
    }
    Ok(())
}

/// Coerces an enum literal to match the node's current primitive type.
fn coerce_enum_value(line: &str, schema_type: &str, raw: &str) -> Result<serde_json::Value> {
    match schema_type {
        "integer" => {
            let n: i64 = raw
                .parse()
                .map_err(|_| Error::validation(line, format!("invalid integer enum {:?}", raw)))?;
            Ok(serde_json::Value::from(n))
        }
        "number" => {
            let f: f64 = raw
                .parse()
                .map_err(|_| Error::validation(line, format!("invalid number enum {:?}", raw)))?;
            Ok(serde_json::Value::from(f))
        }
        _ => Ok(serde_json::Value::String(raw.to_string())),
    }
}

fn parse_float(line: &str, value: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| Error::validation(line, format!("invalid float {:?}", value)))
}

fn parse_bool(line: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .map_err(|_| Error::validation(line, format!("invalid bool {:?}", value)))
}

fn parse_int(line: &str, value: &str) -> Result<i64> {
    let parsed: i64 = value
        .parse()
        .map_err(|_| Error::validation(line, format!("invalid integer {:?}", value)))?;
    if parsed < 0 {
        return Err(Error::validation(
            line,
            format!("length bound must be non-negative, got {}", parsed),
        ));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string_node() -> JsonSchemaProps {
        JsonSchemaProps::typed("string")
    }

    #[test]
    fn test_non_directive_lines_are_ignored() {
        let mut props = string_node();
        apply_validation("Replicas is the desired count.", &mut props).unwrap();
        apply_validation("+optional", &mut props).unwrap();
        assert_eq!(props, string_node());
    }

    #[test]
    fn test_numeric_bounds() {
        let mut props = JsonSchemaProps::typed("integer");
        apply_validation("+kubebuilder:validation:Maximum=10", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:Minimum=1.5", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:ExclusiveMaximum=true", &mut props).unwrap();
        assert_eq!(props.maximum, Some(10.0));
        assert_eq!(props.minimum, Some(1.5));
        assert!(props.exclusive_maximum);
    }

    #[test]
    fn test_exclusive_minimum() {
        let mut props = JsonSchemaProps::typed("integer");
        apply_validation("+kubebuilder:validation:Minimum=0", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:ExclusiveMinimum=true", &mut props).unwrap();
        assert_eq!(props.minimum, Some(0.0));
        assert!(props.exclusive_minimum);
        assert!(apply_validation("+kubebuilder:validation:ExclusiveMinimum=yes", &mut props).is_err());
    }

    #[test]
    fn test_multiple_of() {
        let mut props = JsonSchemaProps::typed("number");
        apply_validation("+kubebuilder:validation:MultipleOf=2.5", &mut props).unwrap();
        assert_eq!(props.multiple_of, Some(2.5));
        assert!(apply_validation("+kubebuilder:validation:MultipleOf=pair", &mut props).is_err());
    }

    #[test]
    fn test_short_prefix() {
        let mut props = string_node();
        apply_validation("+validation:Pattern=^[a-z]+$", &mut props).unwrap();
        assert_eq!(props.pattern, "^[a-z]+$");
    }

    #[test]
    fn test_length_bounds_reject_negative() {
        let mut props = string_node();
        assert!(apply_validation("+kubebuilder:validation:MaxLength=-3", &mut props).is_err());
        apply_validation("+kubebuilder:validation:MaxLength=64", &mut props).unwrap();
        assert_eq!(props.max_length, Some(64));
    }

    #[test]
    fn test_array_keys_noop_on_non_array() {
        let mut props = string_node();
        apply_validation("+kubebuilder:validation:MaxItems=5", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:UniqueItems=true", &mut props).unwrap();
        assert_eq!(props.max_items, None);
        assert!(!props.unique_items);
    }

    #[test]
    fn test_array_keys_apply_on_array() {
        let mut props = JsonSchemaProps::typed("array");
        apply_validation("+kubebuilder:validation:MaxItems=5", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:MinItems=1", &mut props).unwrap();
        apply_validation("+kubebuilder:validation:UniqueItems=true", &mut props).unwrap();
        assert_eq!(props.max_items, Some(5));
        assert_eq!(props.min_items, Some(1));
        assert!(props.unique_items);
    }

    #[test]
    fn test_enum_coerced_to_integer() {
        let mut props = JsonSchemaProps::typed("integer");
        apply_validation("+kubebuilder:validation:Enum=1,2,3", &mut props).unwrap();
        assert_eq!(
            props.enum_values,
            vec![
                serde_json::Value::from(1),
                serde_json::Value::from(2),
                serde_json::Value::from(3)
            ]
        );
    }

    #[test]
    fn test_enum_string_values() {
        let mut props = string_node();
        apply_validation("+kubebuilder:validation:Enum=Always,Never", &mut props).unwrap();
        assert_eq!(
            props.enum_values,
            vec![
                serde_json::Value::String("Always".to_string()),
                serde_json::Value::String("Never".to_string())
            ]
        );
    }

    #[test]
    fn test_enum_disallowed_on_array() {
        let mut props = JsonSchemaProps::typed("array");
        apply_validation("+kubebuilder:validation:Enum=a,b", &mut props).unwrap();
        assert!(props.enum_values.is_empty());
    }

    #[test]
    fn test_enum_integer_coercion_failure_is_fatal() {
        let mut props = JsonSchemaProps::typed("integer");
        assert!(apply_validation("+kubebuilder:validation:Enum=1,two", &mut props).is_err());
    }

    #[test]
    fn test_format_not_cross_checked_here() {
        let mut props = string_node();
        apply_validation("+kubebuilder:validation:Format=int32", &mut props).unwrap();
        assert_eq!(props.format, "int32");
    }

    #[test]
    fn test_unknown_key_is_fatal_and_names_line() {
        let mut props = string_node();
        let err = apply_validation("+kubebuilder:validation:Sparkles=yes", &mut props).unwrap_err();
        match err {
            Error::Validation { line, .. } => {
                assert_eq!(line, "+kubebuilder:validation:Sparkles=yes");
            }
            other => panic!("expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_literal_is_fatal() {
        let mut props = JsonSchemaProps::typed("integer");
        assert!(apply_validation("+kubebuilder:validation:Maximum=ten", &mut props).is_err());
        assert!(apply_validation("+kubebuilder:validation:Maximum", &mut props).is_err());
    }
}
