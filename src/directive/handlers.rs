//! Built-in directive handlers and the accumulator object they write to.
//!
//! Every handler is a plain function over [`Accumulators`]; dispatch threads
//! the accumulator through explicitly, so a generation pass owns exactly one
//! accumulator and test passes stay isolated. Per-type state is reset
//! between declared types; policy rules and the domain accumulate across the
//! whole pass.

use serde::Serialize;

use crate::directive::registry::{ModuleNode, Registry};
use crate::error::{Error, Result};
use crate::rbac::{self, PolicyRule};
use crate::utils::parse_kv;

/// Accumulated `+resource` directive state for one declared type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceDirective {
    /// `path=` override for the pluralized resource name.
    pub path: Option<String>,
    /// `shortName=` value, carried into the CRD names.
    pub short_name: Option<String>,
}

/// One `+printcolumn` directive, mapped to an additional printer column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
    #[serde(rename = "JSONPath")]
    pub json_path: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub priority: i32,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn is_zero(priority: &i32) -> bool {
    *priority == 0
}

/// Directive state accumulated by handlers during a generation pass.
#[derive(Debug, Default)]
pub struct Accumulators {
    /// Set once any `resource` directive fires; marks the type as an API
    /// resource. Per-type.
    pub resource: Option<ResourceDirective>,
    /// Cluster-scoped flag from `nonNamespaced`. Per-type; absence means
    /// the default namespaced scope.
    pub non_namespaced: bool,
    /// Additional printer columns, in directive-appearance order. Per-type.
    pub print_columns: Vec<PrintColumn>,
    /// `subresource:status` marker. Per-type.
    pub status_subresource: bool,
    /// `subresource:scale` marker. Per-type.
    pub scale_subresource: bool,
    /// `subresource-request` marker; the generation pass records the type
    /// under its group/version/kind when set. Per-type.
    pub subresource_request: bool,
    /// Access-control rules, in directive-appearance order. Pass-global.
    pub rules: Vec<PolicyRule>,
    /// Generation-wide domain from `+domain=`. Pass-global; first writer
    /// wins so an options-level override survives directives.
    pub domain: Option<String>,
}

impl Accumulators {
    /// Clears the per-type slots before dispatching the next declared
    /// type's comment lines. Rules and domain persist across the pass.
    pub fn reset_type_scope(&mut self) {
        self.resource = None;
        self.non_namespaced = false;
        self.print_columns.clear();
        self.status_subresource = false;
        self.scale_subresource = false;
        self.subresource_request = false;
    }
}

/// Builds the registry of built-in headers and modules.
pub fn default_registry() -> Registry {
    let mut registry = Registry::new();
    registry
        .header("kubebuilder")
        .header("genclient")
        .module(ModuleNode::new("resource").handler(handle_resource))
        .module(ModuleNode::new("nonNamespaced").handler(handle_non_namespaced))
        .module(ModuleNode::new("rbac").handler(rbac::handle_rbac))
        .module(ModuleNode::new("printcolumn").handler(handle_print_column))
        .module(
            ModuleNode::new("subresource")
                .submodule(ModuleNode::new("status").handler(handle_status_subresource))
                .submodule(ModuleNode::new("scale").handler(handle_scale_subresource)),
        )
        .module(ModuleNode::new("domain").handler(handle_domain))
        // Member-level validation constraints are parsed by the schema
        // deriver; the module is registered so type-level occurrences
        // resolve instead of failing dispatch.
        .module(ModuleNode::new("validation"))
        .module(ModuleNode::new("subresource-request").handler(handle_subresource_request))
        // Marker modules recognized for compatibility.
        .module(ModuleNode::new("doc"))
        .module(ModuleNode::new("categories"));
    registry
}

/// `+resource:path=<plural>,shortName=<short>`
///
/// Unknown keys are rejected. An empty payload still marks the type as an
/// API resource.
fn handle_resource(acc: &mut Accumulators, payload: &str) -> Result<()> {
    let directive = acc.resource.get_or_insert_with(ResourceDirective::default);
    if payload.is_empty() {
        return Ok(());
    }
    for element in payload.split(',') {
        let (key, value) = parse_kv(element, payload)?;
        match key {
            "path" => directive.path = Some(value.to_string()),
            "shortName" => directive.short_name = Some(value.to_string()),
            other => {
                return Err(Error::InvalidResourceKey {
                    key: other.to_string(),
                });
            }
        }
    }
    Ok(())
}

/// `+nonNamespaced` / `+genclient:nonNamespaced` — payload-independent.
fn handle_non_namespaced(acc: &mut Accumulators, _payload: &str) -> Result<()> {
    acc.non_namespaced = true;
    Ok(())
}

fn handle_status_subresource(acc: &mut Accumulators, _payload: &str) -> Result<()> {
    acc.status_subresource = true;
    Ok(())
}

fn handle_scale_subresource(acc: &mut Accumulators, _payload: &str) -> Result<()> {
    acc.scale_subresource = true;
    Ok(())
}

/// `+subresource-request` — marks the type for the subresource-request
/// index; the generation pass resolves the group/version/kind.
fn handle_subresource_request(acc: &mut Accumulators, _payload: &str) -> Result<()> {
    acc.subresource_request = true;
    Ok(())
}

/// `+domain=<domain>` — sets the generation-wide domain once.
fn handle_domain(acc: &mut Accumulators, payload: &str) -> Result<()> {
    if acc.domain.is_none() && !payload.is_empty() {
        acc.domain = Some(payload.to_string());
    }
    Ok(())
}

const PRINT_COLUMN_TYPES: &[&str] = &["integer", "number", "string", "boolean", "date"];

/// `+printcolumn:name=<name>,type=<type>,JSONPath=<path>[,format=..,priority=..,description=..]`
///
/// Requires at least three key=value elements. `format` legality is checked
/// against the previously parsed `type` value.
fn handle_print_column(acc: &mut Accumulators, payload: &str) -> Result<()> {
    if payload.split(',').count() < 3 {
        return Err(Error::printcolumn(
            payload,
            "expected at least name=<name>,type=<type>,JSONPath=<path>",
        ));
    }
    let mut column = PrintColumn::default();
    for element in payload.split(',') {
        let (key, value) = parse_kv(element, payload)?;
        match key {
            "name" => column.name = value.to_string(),
            "type" => {
                if !PRINT_COLUMN_TYPES.contains(&value) {
                    return Err(Error::printcolumn(
                        payload,
                        format!("invalid value {:?} for type", value),
                    ));
                }
                column.column_type = value.to_string();
            }
            "format" => {
                let legal = match column.column_type.as_str() {
                    "integer" => matches!(value, "int32" | "int64"),
                    "number" => matches!(value, "float" | "double"),
                    "string" => matches!(value, "byte" | "date" | "date-time" | "password"),
                    _ => false,
                };
                if !legal {
                    return Err(Error::printcolumn(
                        payload,
                        format!(
                            "format {:?} is not valid for type {:?}",
                            value, column.column_type
                        ),
                    ));
                }
                column.format = value.to_string();
            }
            "JSONPath" => column.json_path = value.to_string(),
            "priority" => {
                column.priority = value.parse().map_err(|_| {
                    Error::printcolumn(payload, format!("invalid priority {:?}", value))
                })?;
            }
            "description" => column.description = value.to_string(),
            other => {
                return Err(Error::printcolumn(
                    payload,
                    format!("unknown key {:?}", other),
                ));
            }
        }
    }
    acc.print_columns.push(column);
    Ok(())
}
