//! Recursive type-to-schema translation.
//!
//! [`SchemaDeriver`] walks the type-declaration graph and produces one
//! [`JsonSchemaProps`] tree per API resource. Dispatch order: well-known
//! external types short-circuit, then the closed [`TypeKind`] variants.
//! Member traversal honors json-tag semantics (naming, `inline` splicing,
//! `omitempty` required-ness) and carries an explicit path-scoped visiting
//! set so self-referential types truncate to an empty object instead of
//! recursing forever.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::error::Result;
use crate::schema::props::JsonSchemaProps;
use crate::schema::validation::apply_validation;
use crate::types::{Member, TypeDef, TypeKind, Universe};

const TIME: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.Time";
const OBJECT_META: &str = "k8s.io/apimachinery/pkg/apis/meta/v1.ObjectMeta";
const UNSTRUCTURED: &str = "k8s.io/apimachinery/pkg/apis/meta/v1/unstructured.Unstructured";
const INT_OR_STRING: &str = "k8s.io/apimachinery/pkg/util/intstr.IntOrString";

/// Types under this prefix belong to the core API libraries and are not
/// introspectable; they derive to an opaque object schema.
const OPAQUE_PREFIX: &str = "k8s.io/api";

static JSON_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"json:"([^"]+)""#).expect("json tag regex compiles"));

/// Derives validation schemas for declared types against one universe.
pub struct SchemaDeriver<'a> {
    universe: &'a Universe,
    /// Suppresses `additionalProperties` emission for map values entirely.
    skip_map_validation: bool,
}

impl<'a> SchemaDeriver<'a> {
    pub fn new(universe: &'a Universe, skip_map_validation: bool) -> Self {
        Self {
            universe,
            skip_map_validation,
        }
    }

    /// Derives the schema node for the type named `type_name`.
    ///
    /// `visiting` is the recursion guard: the caller starts each root
    /// derivation with a fresh set. `comments` are the comment lines of the
    /// member (or type) being described; they supply the description text
    /// and inline validation constraints.
    pub fn derive(
        &self,
        type_name: &str,
        visiting: &mut BTreeSet<String>,
        comments: &[String],
        is_root: bool,
    ) -> Result<JsonSchemaProps> {
        match type_name {
            TIME => {
                let mut props = JsonSchemaProps::typed("string");
                props.format = "date-time".to_string();
                props.description = parse_description(comments);
                return Ok(props);
            }
            OBJECT_META | UNSTRUCTURED => {
                let mut props = JsonSchemaProps::object();
                props.description = parse_description(comments);
                return Ok(props);
            }
            INT_OR_STRING => {
                let mut props = JsonSchemaProps::default();
                props.one_of = vec![
                    JsonSchemaProps::typed("string"),
                    JsonSchemaProps::typed("integer"),
                ];
                props.description = parse_description(comments);
                return Ok(props);
            }
            _ => {}
        }

        let Some(def) = self.universe.get(type_name) else {
            // Unregistered names derive as primitives; named scalar types
            // not matching any built-in pass through verbatim.
            return derive_primitive(base_name(type_name), comments);
        };

        match &def.kind {
            TypeKind::Primitive => derive_primitive(&def.name.name, comments),
            TypeKind::Struct { .. } => self.derive_struct(def, visiting, comments, is_root),
            TypeKind::Map { value } => self.derive_map(value, visiting, comments),
            TypeKind::Slice { elem } | TypeKind::Array { elem } => {
                self.derive_array(elem, visiting, comments)
            }
            TypeKind::Pointer { pointee } => self.derive(pointee, visiting, comments, false),
            TypeKind::Alias { underlying } => self.derive(underlying, visiting, comments, false),
        }
    }

    fn derive_struct(
        &self,
        def: &TypeDef,
        visiting: &mut BTreeSet<String>,
        comments: &[String],
        is_root: bool,
    ) -> Result<JsonSchemaProps> {
        let mut props = JsonSchemaProps::object();
        props.description = parse_description(comments);

        if def.name.full().starts_with(OPAQUE_PREFIX) {
            return Ok(props);
        }

        let (properties, required) = self.walk_members(def, visiting)?;
        props.properties = properties;
        props.required = required;

        // Field validation applies only to non-inlined occurrences; inline
        // splicing never reaches here with the member's comments.
        for line in comments {
            apply_validation(line, &mut props)?;
        }

        if is_root {
            // The root descriptor schema is rendered without a top-level
            // type, matching the embedded manifest form.
            props.schema_type.clear();
        }
        Ok(props)
    }

    fn derive_map(
        &self,
        value: &str,
        visiting: &mut BTreeSet<String>,
        comments: &[String],
    ) -> Result<JsonSchemaProps> {
        let mut value_props = self.derive(value, visiting, comments, false)?;
        value_props.description.clear();

        let mut props = JsonSchemaProps::object();
        props.description = parse_description(comments);
        if !self.skip_map_validation {
            props.additional_properties = Some(Box::new(value_props));
        }
        Ok(props)
    }

    fn derive_array(
        &self,
        elem: &str,
        visiting: &mut BTreeSet<String>,
        comments: &[String],
    ) -> Result<JsonSchemaProps> {
        let mut props = JsonSchemaProps::typed("array");
        props.description = parse_description(comments);

        if base_name(elem) == "byte" {
            // Byte sequences are represented as base64 strings, not arrays.
            props.schema_type = "string".to_string();
            props.format = "byte".to_string();
        } else {
            let mut items = self.derive(elem, visiting, comments, false)?;
            items.description.clear();
            props.items = Some(Box::new(items));
        }

        for line in comments {
            apply_validation(line, &mut props)?;
        }
        Ok(props)
    }

    /// Walks a struct's declared members into (properties, required).
    ///
    /// Members without a json tag are skipped entirely. The first tag
    /// element overrides the field name; an `inline` second element splices
    /// the member's own sub-members into the parent. The visiting set is
    /// pushed before member traversal and popped after (also when traversal
    /// fails), so the guard is path-scoped and sibling branches may revisit
    /// the same type.
    fn walk_members(
        &self,
        def: &TypeDef,
        visiting: &mut BTreeSet<String>,
    ) -> Result<(BTreeMap<String, JsonSchemaProps>, Vec<String>)> {
        let full_name = def.name.full();
        if visiting.contains(&full_name) {
            debug!("breaking recursion for type {}", full_name);
            return Ok((BTreeMap::new(), Vec::new()));
        }
        let TypeKind::Struct { members } = &def.kind else {
            return Ok((BTreeMap::new(), Vec::new()));
        };

        visiting.insert(full_name.clone());
        let walked = self.collect_members(members, visiting);
        visiting.remove(&full_name);
        walked
    }

    fn collect_members(
        &self,
        members: &[Member],
        visiting: &mut BTreeSet<String>,
    ) -> Result<(BTreeMap<String, JsonSchemaProps>, Vec<String>)> {
        let mut properties = BTreeMap::new();
        let mut required = Vec::new();

        for member in members {
            let Some(tag) = JSON_TAG.captures(&member.tag) else {
                continue;
            };
            let elements: Vec<&str> = tag[1].split(',').collect();
            let name = match elements.first() {
                Some(first) if !first.is_empty() => first.to_string(),
                _ => member.name.clone(),
            };
            let strategy = elements.get(1).copied().unwrap_or("");

            if strategy == "inline" {
                if let Some(inner) = self.universe.get(&member.type_name) {
                    let (inner_properties, inner_required) =
                        self.walk_members(inner, visiting)?;
                    properties.extend(inner_properties);
                    required.extend(inner_required);
                }
                continue;
            }

            let node = self.derive(&member.type_name, visiting, &member.comment_lines, false)?;
            properties.insert(name.clone(), node);
            if !strategy.ends_with("omitempty") {
                required.push(name);
            }
        }

        Ok((properties, required))
    }
}

/// Maps a primitive base name to its schema type and numeric format, then
/// applies the member's validation constraints.
fn derive_primitive(name: &str, comments: &[String]) -> Result<JsonSchemaProps> {
    let (schema_type, format) = match name {
        "int" | "int64" | "uint64" => ("integer", "int64"),
        "int32" | "uint32" => ("integer", "int32"),
        "float" | "float32" => ("number", "float"),
        "float64" => ("number", "double"),
        "bool" => ("boolean", ""),
        "string" => ("string", ""),
        other => (other, ""),
    };
    let mut props = JsonSchemaProps::typed(schema_type);
    props.format = format.to_string();
    props.description = parse_description(comments);
    for line in comments {
        apply_validation(line, &mut props)?;
    }
    Ok(props)
}

/// The local name after the final `.`, e.g. `pkg/v1.Frigate` -> `Frigate`.
fn base_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

/// Joins the non-directive comment lines into the schema description.
fn parse_description(comments: &[String]) -> String {
    comments
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('+'))
        .collect::<Vec<_>>()
        .join(" ")
}
