use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};

use crate::{
    kube::apis::networking::gateway::v1::{HTTPRouteRulesBackendRefs, HTTPRouteRulesMatchesPath},
    logger,
};

use super::{
    backend::translate_backend, ControllerClass, ErrorList, FieldPath, PathMatchTranslator,
    ResourceKey, Translated, ValidationError,
};

/// Host a rule applies to. An empty ingress host matches any host not otherwise claimed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Host {
    Any,
    Named(String),
}

impl Host {
    pub fn from_rule(host: Option<&str>) -> Self {
        match host {
            Some(host) if !host.is_empty() => Self::Named(host.to_string()),
            _ => Self::Any,
        }
    }

    pub fn hostname(&self) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::Named(host) => Some(host),
        }
    }
}

/// Where an entry was declared inside its ingress. The default backend sorts last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryPosition {
    Rule { rule: usize, path: usize },
    DefaultBackend,
}

/// One translated ingress path.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteEntry {
    pub ingress: ResourceKey,
    pub position: EntryPosition,
    /// `None` matches every request (default backend)
    pub path: Option<HTTPRouteRulesMatchesPath>,
    pub backend: HTTPRouteRulesBackendRefs,
}

/// Translated paths of every ingress in one class sharing one host, in input order. A host
/// only gets a group once one of its paths translates.
#[derive(Debug, Clone, PartialEq)]
pub struct HostGroup {
    pub class: ControllerClass,
    pub host: Host,
    pub entries: Vec<RouteEntry>,
    /// TLS secrets declared for this host
    pub certificates: Vec<ResourceKey>,
}

impl HostGroup {
    fn new(class: ControllerClass, host: Host) -> Self {
        Self {
            class,
            host,
            entries: Vec::new(),
            certificates: Vec::new(),
        }
    }

    pub fn has_tls(&self) -> bool {
        !self.certificates.is_empty()
    }
}

/// Insertion ordered set of host groups.
struct HostGroups {
    class: ControllerClass,
    groups: Vec<HostGroup>,
    index: BTreeMap<Host, usize>,
}

impl HostGroups {
    fn new(class: ControllerClass) -> Self {
        Self {
            class,
            groups: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    fn entry(&mut self, host: Host) -> &mut HostGroup {
        let index = match self.index.get(&host).copied() {
            Some(index) => index,
            None => {
                self.groups
                    .push(HostGroup::new(self.class.clone(), host.clone()));
                self.index.insert(host, self.groups.len() - 1);
                self.groups.len() - 1
            }
        };

        &mut self.groups[index]
    }

    fn get_mut(&mut self, host: &Host) -> Option<&mut HostGroup> {
        let index = *self.index.get(host)?;
        self.groups.get_mut(index)
    }
}

/// Groups the rules of every ingress in one controller class by host.
pub struct HostRouteGrouper<'a> {
    class: &'a ControllerClass,
    translator: PathMatchTranslator<'a>,
}

impl<'a> HostRouteGrouper<'a> {
    pub fn new(class: &'a ControllerClass, translator: PathMatchTranslator<'a>) -> Self {
        Self { class, translator }
    }

    /// Ingresses are walked by key, rules and paths in declaration order.
    pub fn group<'i, I>(&self, ingresses: I) -> Translated<Vec<HostGroup>>
    where
        I: IntoIterator<Item = (&'i ResourceKey, &'i Ingress)>,
    {
        let mut ingresses: Vec<_> = ingresses.into_iter().collect();
        ingresses.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut groups = HostGroups::new(self.class.clone());
        let mut errors = ErrorList::new();
        let mut certificates: Vec<(Host, ResourceKey)> = Vec::new();

        for (key, ingress) in ingresses {
            let Some(spec) = &ingress.spec else {
                logger!(debug, "ingress {} has no spec", key);
                continue;
            };

            self.group_rules(key, spec, &mut groups, &mut errors);

            self.group_default_backend(key, spec, &mut groups, &mut errors);

            certificates.extend(tls_certificates(key, spec, &mut errors));
        }

        for (host, secret) in certificates {
            match groups.get_mut(&host) {
                Some(group) => {
                    if !group.certificates.contains(&secret) {
                        group.certificates.push(secret);
                    }
                }
                None => {
                    logger!(
                        debug,
                        "tls host {:?} of class {} has no rules, secret {} skipped",
                        host,
                        self.class,
                        secret
                    );
                }
            }
        }

        logger!(
            debug,
            "class {}: {} host groups, {} errors",
            self.class,
            groups.groups.len(),
            errors.len()
        );

        Translated::new(groups.groups, errors)
    }

    fn group_rules(
        &self,
        key: &ResourceKey,
        spec: &IngressSpec,
        groups: &mut HostGroups,
        errors: &mut ErrorList,
    ) {
        let rules_field = FieldPath::new("spec").child("rules");

        for (rule_index, rule) in spec.rules.iter().flatten().enumerate() {
            let host = Host::from_rule(rule.host.as_deref());

            let Some(http) = &rule.http else {
                logger!(debug, "ingress {} rule {} has no http paths", key, rule_index);
                continue;
            };

            for (path_index, path) in http.paths.iter().enumerate() {
                let field = rules_field
                    .index(rule_index)
                    .child("http")
                    .child("paths")
                    .index(path_index);

                let entry = self
                    .translator
                    .translate(key, &field, path.path.as_deref(), &path.path_type)
                    .and_then(|path_match| {
                        let backend =
                            translate_backend(key, &field.child("backend"), &path.backend)?;

                        Ok(RouteEntry {
                            ingress: key.clone(),
                            position: EntryPosition::Rule {
                                rule: rule_index,
                                path: path_index,
                            },
                            path: Some(path_match),
                            backend,
                        })
                    });

                match entry {
                    Ok(entry) => groups.entry(host.clone()).entries.push(entry),
                    Err(err) => errors.push(err),
                }
            }
        }
    }

    fn group_default_backend(
        &self,
        key: &ResourceKey,
        spec: &IngressSpec,
        groups: &mut HostGroups,
        errors: &mut ErrorList,
    ) {
        let Some(default_backend) = &spec.default_backend else {
            return;
        };

        let field = FieldPath::new("spec").child("defaultBackend");

        match translate_backend(key, &field, default_backend) {
            Ok(backend) => groups.entry(Host::Any).entries.push(RouteEntry {
                ingress: key.clone(),
                position: EntryPosition::DefaultBackend,
                path: None,
                backend,
            }),
            Err(err) => errors.push(err),
        }
    }
}

fn tls_certificates(
    key: &ResourceKey,
    spec: &IngressSpec,
    errors: &mut ErrorList,
) -> Vec<(Host, ResourceKey)> {
    let tls_field = FieldPath::new("spec").child("tls");

    let mut certificates = Vec::new();

    for (index, tls) in spec.tls.iter().flatten().enumerate() {
        let hosts: Vec<_> = tls
            .hosts
            .iter()
            .flatten()
            .filter(|host| !host.is_empty())
            .collect();

        if hosts.is_empty() {
            continue;
        }

        let Some(secret) = tls.secret_name.as_deref().filter(|name| !name.is_empty()) else {
            errors.push(ValidationError::required(
                key,
                tls_field.index(index).child("secretName"),
                "TLS termination requires a certificate secret",
            ));
            continue;
        };

        for host in hosts {
            certificates.push((
                Host::Named(host.clone()),
                ResourceKey::new(key.namespace.clone(), secret),
            ));
        }
    }

    certificates
}
