//! Resource descriptors and the dual-keyed resource index.
//!
//! Every API resource is indexed twice: by (group, kind, version) and by
//! (group, version, kind). The manifest writer walks whichever grouping it
//! needs; both maps always hold exactly the same descriptors.

use std::collections::BTreeMap;
use std::rc::Rc;

use crate::crd::CustomResourceDefinition;
use crate::directive::PrintColumn;
use crate::schema::JsonSchemaProps;

/// The generated identity and schema record for one API type.
///
/// Created once per qualifying declared type during a generation pass and
/// never mutated after insertion into the index.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResource {
    /// Fully-qualified name of the declared type.
    pub type_name: String,
    pub group: String,
    pub version: String,
    pub kind: String,
    /// Plural resource name, pluralized from the kind unless overridden by
    /// `path=`.
    pub resource: String,
    pub short_name: Option<String>,
    pub non_namespaced: bool,
    pub domain: String,
    /// Storage strategy name, `{Kind}Strategy` by default.
    pub strategy: String,
    /// Status strategy mirroring the non-status strategy.
    pub status_strategy: String,
    pub print_columns: Vec<PrintColumn>,
    pub status_subresource: bool,
    pub scale_subresource: bool,
    /// Derived validation schema for the type.
    pub schema: JsonSchemaProps,
    /// Rendered schema string for manifest embedding.
    pub validation: String,
    /// Assembled CustomResourceDefinition manifest value.
    pub crd: CustomResourceDefinition,
}

/// Three-level nesting: outer key group, then kind or version depending on
/// the map's orientation.
pub type NestedIndex = BTreeMap<String, BTreeMap<String, BTreeMap<String, Rc<ApiResource>>>>;

/// Dual maps over [`ApiResource`], kept mutually consistent: any insertion
/// updates both within the same step.
#[derive(Debug, Default)]
pub struct ResourceIndex {
    by_group_kind_version: NestedIndex,
    by_group_version_kind: NestedIndex,
}

impl ResourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a descriptor into both maps.
    pub fn insert(&mut self, resource: ApiResource) {
        let (group, kind, version) = (
            resource.group.clone(),
            resource.kind.clone(),
            resource.version.clone(),
        );
        let shared = Rc::new(resource);
        self.by_group_kind_version
            .entry(group.clone())
            .or_default()
            .entry(kind.clone())
            .or_default()
            .insert(version.clone(), Rc::clone(&shared));
        self.by_group_version_kind
            .entry(group)
            .or_default()
            .entry(version)
            .or_default()
            .insert(kind, shared);
    }

    pub fn get(&self, group: &str, kind: &str, version: &str) -> Option<&ApiResource> {
        self.by_group_kind_version
            .get(group)?
            .get(kind)?
            .get(version)
            .map(Rc::as_ref)
    }

    pub fn by_group_kind_version(&self) -> &NestedIndex {
        &self.by_group_kind_version
    }

    pub fn by_group_version_kind(&self) -> &NestedIndex {
        &self.by_group_version_kind
    }

    /// All descriptors as (group, kind, version) triples with their
    /// records, in map order.
    pub fn descriptors(&self) -> Vec<(&str, &str, &str, &ApiResource)> {
        let mut out = Vec::new();
        for (group, kinds) in &self.by_group_kind_version {
            for (kind, versions) in kinds {
                for (version, resource) in versions {
                    out.push((
                        group.as_str(),
                        kind.as_str(),
                        version.as_str(),
                        resource.as_ref(),
                    ));
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.by_group_kind_version
            .values()
            .flat_map(|kinds| kinds.values())
            .map(|versions| versions.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Verifies that both maps hold exactly the same descriptor set — the
    /// (g, k, v) -> (g, v, k) bijection.
    pub fn is_consistent(&self) -> bool {
        let mut forward = 0usize;
        for (group, kinds) in &self.by_group_kind_version {
            for (kind, versions) in kinds {
                for (version, resource) in versions {
                    forward += 1;
                    let mirrored = self
                        .by_group_version_kind
                        .get(group)
                        .and_then(|versions| versions.get(version))
                        .and_then(|kinds| kinds.get(kind));
                    match mirrored {
                        Some(other) if Rc::ptr_eq(other, resource) => {}
                        _ => return false,
                    }
                }
            }
        }
        let reverse: usize = self
            .by_group_version_kind
            .values()
            .flat_map(|versions| versions.values())
            .map(|kinds| kinds.len())
            .sum();
        forward == reverse
    }
}
