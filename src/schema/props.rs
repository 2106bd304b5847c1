//! Validation-schema node and its manifest rendering.
//!
//! [`JsonSchemaProps`] mirrors the OpenAPI v3 subset that
//! `apiextensions.k8s.io/v1beta1` CRD validation accepts. Properties live in
//! a `BTreeMap` so rendering is deterministic regardless of member
//! declaration order.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// One node of the derived validation-schema tree.
///
/// The node doubles as primitive, object, array, and map: `type` selects
/// the shape, `properties`/`required` carry object fields, `items` the
/// array element schema, and `additional_properties` the map value schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchemaProps {
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub schema_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_maximum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub exclusive_minimum: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub pattern: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique_items: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiple_of: Option<f64>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchemaProps>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchemaProps>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<JsonSchemaProps>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<JsonSchemaProps>,
}

impl JsonSchemaProps {
    /// A node with only its type set.
    pub fn typed(schema_type: &str) -> Self {
        Self {
            schema_type: schema_type.to_string(),
            ..Self::default()
        }
    }

    /// An empty-properties object schema, used for opaque external types
    /// and for truncated self-referential branches.
    pub fn object() -> Self {
        Self::typed("object")
    }
}

/// Renders a schema node as the pretty-printed JSON string embedded in
/// generated manifests.
pub fn render(props: &JsonSchemaProps) -> String {
    // All maps are string-keyed, so serialization cannot fail.
    serde_json::to_string_pretty(props).expect("schema nodes serialize to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_fields_are_omitted() {
        let props = JsonSchemaProps::typed("string");
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json, serde_json::json!({"type": "string"}));
    }

    #[test]
    fn test_render_is_deterministic_for_any_insertion_order() {
        let mut a = JsonSchemaProps::object();
        a.properties
            .insert("alpha".to_string(), JsonSchemaProps::typed("string"));
        a.properties
            .insert("beta".to_string(), JsonSchemaProps::typed("integer"));

        let mut b = JsonSchemaProps::object();
        b.properties
            .insert("beta".to_string(), JsonSchemaProps::typed("integer"));
        b.properties
            .insert("alpha".to_string(), JsonSchemaProps::typed("string"));

        assert_eq!(render(&a), render(&b));
    }

    #[test]
    fn test_camel_case_field_names() {
        let props = JsonSchemaProps {
            schema_type: "array".to_string(),
            max_items: Some(3),
            unique_items: true,
            ..Default::default()
        };
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["maxItems"], 3);
        assert_eq!(json["uniqueItems"], true);
    }
}
