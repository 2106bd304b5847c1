//! The generation pass: directives in, resource index and rules out.
//!
//! A single synchronous pass walks the declared types in dependency order.
//! Each type's comment lines are dispatched against the built-in registry;
//! types marked by a `resource` directive get their schema derived and a
//! descriptor (with an assembled CRD) inserted into the [`ResourceIndex`].
//! Policy rules accumulate across the whole pass. Any grammar or domain
//! validation error aborts the pass — output is complete or absent.

use std::collections::{BTreeMap, BTreeSet};

use crate::crd::{
    self, CrdNames, CrdSpec, CrdSubresources, CrdValidation, CustomResourceDefinition,
    ObjectMeta, ScaleSubresource, StatusSubresource,
};
use crate::directive::{Accumulators, default_registry, tokenize};
use crate::error::{Error, Result};
use crate::index::{ApiResource, ResourceIndex};
use crate::rbac::PolicyRule;
use crate::schema::{SchemaDeriver, render};
use crate::types::{TypeDef, Universe};
use crate::utils::{group_version, pluralize};

/// Options for one generation pass.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Generation-wide domain. When unset, the universe must carry a
    /// `+domain=` directive somewhere.
    pub domain: Option<String>,
    /// Suppresses `additionalProperties` schemas for map values.
    pub skip_map_validation: bool,
}

/// Types marked `+subresource-request`, keyed group then version then kind,
/// mapping to the fully-qualified type name.
pub type SubresourceIndex = BTreeMap<String, BTreeMap<String, BTreeMap<String, String>>>;

/// The aggregate output of a generation pass.
#[derive(Debug)]
pub struct Generation {
    pub index: ResourceIndex,
    /// Access-control rules in directive-appearance order, for RBAC
    /// manifest generation.
    pub rules: Vec<PolicyRule>,
    /// Types marked by a `subresource-request` directive, independent of
    /// whether they are resources themselves.
    pub subresource_requests: SubresourceIndex,
    pub domain: String,
}

/// Runs the generation pass over a universe of declared types.
pub fn generate(universe: &Universe, options: &Options) -> Result<Generation> {
    let registry = default_registry();
    let deriver = SchemaDeriver::new(universe, options.skip_map_validation);

    let domain = options
        .domain
        .clone()
        .or_else(|| find_domain(universe))
        .ok_or(Error::MissingDomain)?;

    let mut acc = Accumulators::default();
    acc.domain = Some(domain.clone());
    let mut index = ResourceIndex::new();
    let mut subresource_requests = SubresourceIndex::new();

    for def in universe.iter() {
        acc.reset_type_scope();
        for line in &def.comment_lines {
            registry.dispatch(line, &mut acc)?;
        }

        if acc.subresource_request {
            let (group, version) = group_version(&def.name.package);
            subresource_requests
                .entry(group)
                .or_default()
                .entry(version)
                .or_default()
                .insert(def.name.name.clone(), def.name.full());
        }

        if let Some(directive) = acc.resource.clone() {
            let resource = build_resource(def, &directive, &acc, &deriver, &domain)?;
            index.insert(resource);
        }
    }

    Ok(Generation {
        index,
        rules: std::mem::take(&mut acc.rules),
        subresource_requests,
        domain,
    })
}

fn build_resource(
    def: &TypeDef,
    directive: &crate::directive::ResourceDirective,
    acc: &Accumulators,
    deriver: &SchemaDeriver<'_>,
    domain: &str,
) -> Result<ApiResource> {
    let (group, version) = group_version(&def.name.package);
    let kind = def.name.name.clone();
    let resource = directive
        .path
        .clone()
        .unwrap_or_else(|| pluralize(&kind));

    let strategy = format!("{}Strategy", kind);
    // The status strategy mirrors the non-status strategy name.
    let stem = strategy.strip_suffix("Strategy").unwrap_or(&strategy);
    let status_strategy = format!("{}StatusStrategy", stem);

    let schema = deriver.derive(
        &def.name.full(),
        &mut BTreeSet::new(),
        &def.comment_lines,
        true,
    )?;
    let validation = render(&schema);

    let scope = if acc.non_namespaced {
        "Cluster"
    } else {
        "Namespaced"
    };
    let subresources = if acc.status_subresource || acc.scale_subresource {
        Some(CrdSubresources {
            status: acc.status_subresource.then(StatusSubresource::default),
            scale: acc.scale_subresource.then(|| ScaleSubresource {
                spec_replicas_path: ".spec.replicas".to_string(),
                status_replicas_path: ".status.replicas".to_string(),
            }),
        })
    } else {
        None
    };

    let crd = CustomResourceDefinition {
        api_version: crd::API_VERSION.to_string(),
        kind: crd::KIND.to_string(),
        metadata: ObjectMeta {
            name: format!("{}.{}.{}", resource, group, domain),
        },
        spec: CrdSpec {
            group: format!("{}.{}", group, domain),
            version: version.clone(),
            names: CrdNames {
                kind: kind.clone(),
                plural: resource.clone(),
                short_names: directive.short_name.clone().into_iter().collect(),
            },
            scope: scope.to_string(),
            validation: Some(CrdValidation {
                open_api_v3_schema: schema.clone(),
            }),
            subresources,
            additional_printer_columns: acc.print_columns.clone(),
        },
    };

    Ok(ApiResource {
        type_name: def.name.full(),
        group,
        version,
        kind,
        resource,
        short_name: directive.short_name.clone(),
        non_namespaced: acc.non_namespaced,
        domain: domain.to_string(),
        strategy,
        status_strategy,
        print_columns: acc.print_columns.clone(),
        status_subresource: acc.status_subresource,
        scale_subresource: acc.scale_subresource,
        schema,
        validation,
        crd,
    })
}

/// Scans every comment line in the universe for a `+domain=` directive.
///
/// The original convention puts the domain on the apis package doc comment;
/// the front end attaches those lines to whichever declared type carries
/// them, so the whole graph is searched.
fn find_domain(universe: &Universe) -> Option<String> {
    for def in universe.iter() {
        for line in &def.comment_lines {
            if let Some(tokens) = tokenize(line) {
                if tokens.len() == 2 && tokens[0] == "domain" && !tokens[1].is_empty() {
                    return Some(tokens[1].clone());
                }
            }
        }
    }
    None
}
