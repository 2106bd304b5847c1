//! Access-control rule accumulation from `+rbac` directives.
//!
//! A directive like
//! `+kubebuilder:rbac:groups=apps,resources=deployments,verbs=get;list`
//! appends one [`PolicyRule`] to the pass-global rule list, feeding the
//! RBAC manifest generation downstream.

use serde::Serialize;

use crate::directive::handlers::Accumulators;
use crate::error::Result;
use crate::utils::parse_kv;

/// One normalized access-control grant.
///
/// Values keep insertion order and duplicates; matching downstream is exact
/// and case-sensitive. Field names serialize to the Kubernetes
/// `rbac.authorization.k8s.io/v1` wire names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PolicyRule {
    #[serde(rename = "apiGroups", skip_serializing_if = "Vec::is_empty")]
    pub api_groups: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub verbs: Vec<String>,
    #[serde(rename = "nonResourceURLs", skip_serializing_if = "Vec::is_empty")]
    pub non_resource_urls: Vec<String>,
}

/// Parses an rbac payload of comma-separated `key=value` elements, where
/// each value is a `;`-separated list. Recognized keys are `groups`,
/// `resources`, `verbs`, and `urls`.
///
/// Unrecognized keys are silently ignored — unlike the resource handler,
/// which rejects them. The asymmetry is long-standing observed behavior and
/// is deliberately preserved.
pub fn handle_rbac(acc: &mut Accumulators, payload: &str) -> Result<()> {
    let mut rule = PolicyRule::default();
    for element in payload.split(',') {
        let (key, value) = parse_kv(element, payload)?;
        let values: Vec<String> = value.split(';').map(str::to_string).collect();
        match key {
            "groups" => {
                // The literal "core" group is the unnamed default group and
                // normalizes to the empty string, value by value.
                rule.api_groups = values
                    .into_iter()
                    .map(|group| if group == "core" { String::new() } else { group })
                    .collect();
            }
            "resources" => rule.resources = values,
            "verbs" => rule.verbs = values,
            "urls" => rule.non_resource_urls = values,
            _ => {}
        }
    }
    acc.rules.push(rule);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(payload: &str) -> PolicyRule {
        let mut acc = Accumulators::default();
        handle_rbac(&mut acc, payload).unwrap();
        assert_eq!(acc.rules.len(), 1);
        acc.rules.into_iter().next().unwrap()
    }

    #[test]
    fn test_rbac_basic_rule() {
        let rule = rule_for("groups=apps,resources=deployments,verbs=get;list");
        assert_eq!(rule.api_groups, vec!["apps"]);
        assert_eq!(rule.resources, vec!["deployments"]);
        assert_eq!(rule.verbs, vec!["get", "list"]);
        assert!(rule.non_resource_urls.is_empty());
    }

    #[test]
    fn test_rbac_core_group_normalizes_to_empty() {
        let rule = rule_for("groups=core;apps,resources=pods,verbs=get");
        assert_eq!(rule.api_groups, vec!["", "apps"]);
    }

    #[test]
    fn test_rbac_non_resource_urls() {
        let rule = rule_for("urls=/healthz;/metrics,verbs=get");
        assert_eq!(rule.non_resource_urls, vec!["/healthz", "/metrics"]);
        assert_eq!(rule.verbs, vec!["get"]);
    }

    #[test]
    fn test_rbac_ignores_unknown_keys_unlike_resource() {
        // The resource handler rejects unknown keys; rbac silently drops
        // them. Observed behavior of both handlers, preserved as-is.
        let rule = rule_for("groups=apps,scope=Cluster,verbs=get");
        assert_eq!(rule.api_groups, vec!["apps"]);
        assert_eq!(rule.verbs, vec!["get"]);
    }

    #[test]
    fn test_rbac_malformed_element_is_error() {
        let mut acc = Accumulators::default();
        assert!(handle_rbac(&mut acc, "groups=apps,deployments").is_err());
        assert!(acc.rules.is_empty());
    }

    #[test]
    fn test_rbac_rules_accumulate_in_order() {
        let mut acc = Accumulators::default();
        handle_rbac(&mut acc, "groups=apps,resources=deployments,verbs=get").unwrap();
        handle_rbac(&mut acc, "groups=core,resources=pods,verbs=list").unwrap();
        assert_eq!(acc.rules.len(), 2);
        assert_eq!(acc.rules[0].resources, vec!["deployments"]);
        assert_eq!(acc.rules[1].api_groups, vec![""]);
    }

    #[test]
    fn test_policy_rule_serializes_k8s_field_names() {
        let rule = rule_for("groups=apps,resources=deployments,verbs=get,urls=/healthz");
        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(json["apiGroups"][0], "apps");
        assert_eq!(json["nonResourceURLs"][0], "/healthz");
    }
}
