use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::kube::apis::networking::gateway::v1::{
    HTTPRoute, HTTPRouteParentRefs, HTTPRouteRules, HTTPRouteRulesMatches, HTTPRouteSpec,
};

use super::{
    naming::{generator, host_slug, GENERATOR_ANNOTATION},
    ErrorList, FieldPath, Host, HostGroup, ResourceKey, RouteEntry, Translated,
    TranslationPolicy, ValidationError,
};

/// Assembles HTTPRoutes of one controller class, one per source ingress (or per ingress and
/// host when routes are split by host). Host-less rules of an ingress that also names hosts
/// get a route of their own, `<ingress>-all-hosts`.
pub struct HTTPRouteBuilder<'a> {
    gateway: &'a ResourceKey,
    policy: &'a TranslationPolicy,
}

/// Entries of one output route, all from the same ingress.
struct RouteDraft<'g> {
    name: String,
    entries: Vec<(&'g Host, &'g RouteEntry)>,
}

impl<'a> HTTPRouteBuilder<'a> {
    pub fn new(gateway: &'a ResourceKey, policy: &'a TranslationPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Host-less entries of an ingress that also names hosts go to a separate route without
    /// hostnames, so they keep matching every host.
    pub fn build(&self, groups: &[HostGroup]) -> Translated<BTreeMap<ResourceKey, HTTPRoute>> {
        let with_named_hosts: BTreeSet<&ResourceKey> = groups
            .iter()
            .filter(|group| group.host != Host::Any)
            .flat_map(|group| group.entries.iter().map(|entry| &entry.ingress))
            .collect();

        let mut drafts: BTreeMap<(ResourceKey, Option<Host>), RouteDraft> = BTreeMap::new();

        for group in groups {
            for entry in &group.entries {
                let separate = self.policy.split_routes_by_host
                    || (group.host == Host::Any && with_named_hosts.contains(&entry.ingress));

                let host = separate.then(|| group.host.clone());

                let name = match &host {
                    Some(host) => format!("{}-{}", entry.ingress.name, host_slug(host.hostname())),
                    None => entry.ingress.name.clone(),
                };

                drafts
                    .entry((entry.ingress.clone(), host))
                    .or_insert_with(|| RouteDraft {
                        name,
                        entries: Vec::new(),
                    })
                    .entries
                    .push((&group.host, entry));
            }
        }

        let mut routes = BTreeMap::new();
        let mut errors = ErrorList::new();

        for ((source, _), mut draft) in drafts {
            let key = ResourceKey::new(source.namespace.clone(), draft.name.clone());

            if routes.contains_key(&key) {
                errors.push(ValidationError::invalid(
                    &source,
                    FieldPath::new("metadata").child("name"),
                    key.name.clone(),
                    format!("generated HTTPRoute {} already exists", key),
                ));
                continue;
            }

            draft.entries.sort_by_key(|(_, entry)| entry.position);

            let route = self.route(&key, &draft.entries);

            routes.insert(key, route);
        }

        Translated::new(routes, errors)
    }

    fn route(&self, key: &ResourceKey, entries: &[(&Host, &RouteEntry)]) -> HTTPRoute {
        let mut hostnames: Vec<String> = Vec::new();

        for (host, _) in entries {
            if let Some(hostname) = host.hostname() {
                if !hostnames.iter().any(|h| h == hostname) {
                    hostnames.push(hostname.to_string());
                }
            }
        }

        let rules = entries
            .iter()
            .map(|(_, entry)| HTTPRouteRules {
                matches: entry.path.clone().map(|path| {
                    vec![HTTPRouteRulesMatches { path: Some(path) }]
                }),
                backend_refs: Some(vec![entry.backend.clone()]),
            })
            .collect();

        let parent_ref = HTTPRouteParentRefs {
            name: self.gateway.name.clone(),
            namespace: (self.gateway.namespace != key.namespace)
                .then(|| self.gateway.namespace.clone()),
            ..Default::default()
        };

        HTTPRoute {
            metadata: ObjectMeta {
                name: Some(key.name.clone()),
                namespace: Some(key.namespace.clone()),
                annotations: Some(BTreeMap::from([(
                    GENERATOR_ANNOTATION.to_string(),
                    generator(),
                )])),
                ..Default::default()
            },
            spec: HTTPRouteSpec {
                hostnames: (!hostnames.is_empty()).then_some(hostnames),
                parent_refs: Some(vec![parent_ref]),
                rules: Some(rules),
            },
        }
    }
}
