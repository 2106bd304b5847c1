//! CustomResourceDefinition manifest value types.
//!
//! A slim mirror of `apiextensions.k8s.io/v1beta1`, covering the fields the
//! generation pass fills in. Serialization follows the Kubernetes wire
//! names; downstream templating turns these values into manifest files.

use serde::Serialize;

use crate::directive::PrintColumn;
use crate::schema::JsonSchemaProps;

pub const API_VERSION: &str = "apiextensions.k8s.io/v1beta1";
pub const KIND: &str = "CustomResourceDefinition";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomResourceDefinition {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: CrdSpec,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectMeta {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdSpec {
    pub group: String,
    pub version: String,
    pub names: CrdNames,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<CrdValidation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subresources: Option<CrdSubresources>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_printer_columns: Vec<PrintColumn>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdNames {
    pub kind: String,
    pub plural: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub short_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdValidation {
    #[serde(rename = "openAPIV3Schema")]
    pub open_api_v3_schema: JsonSchemaProps,
}

/// Empty marker objects, present when the matching subresource directive
/// was seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrdSubresources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusSubresource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleSubresource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusSubresource {}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleSubresource {
    pub spec_replicas_path: String,
    pub status_replicas_path: String,
}
