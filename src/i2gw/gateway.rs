use std::collections::{BTreeMap, BTreeSet};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::kube::apis::networking::gateway::v1::{
    Gateway, GatewayListeners, GatewayListenersAllowedRoutes,
    GatewayListenersAllowedRoutesNamespaces, GatewayListenersAllowedRoutesNamespacesFrom,
    GatewayListenersTls, GatewayListenersTlsCertificateRefs, GatewayListenersTlsMode, GatewaySpec,
};

use super::{
    naming::{generator, host_slug, GENERATOR_ANNOTATION},
    ControllerClass, HostGroup, ResourceKey, TranslationPolicy,
};

pub const HTTP_PROTOCOL: &str = "HTTP";
pub const HTTPS_PROTOCOL: &str = "HTTPS";

/// Derives the listeners a class needs from its host groups.
pub struct ListenerSynthesizer<'a> {
    policy: &'a TranslationPolicy,
}

impl<'a> ListenerSynthesizer<'a> {
    pub fn new(policy: &'a TranslationPolicy) -> Self {
        Self { policy }
    }

    /// One HTTP listener per host, plus an HTTPS listener for hosts with TLS.
    ///
    /// `gateway_namespace` decides whether certificate references need a namespace.
    /// `allow_all_namespaces` opens the listeners to routes from every namespace.
    pub fn synthesize(
        &self,
        groups: &[HostGroup],
        gateway_namespace: &str,
        allow_all_namespaces: bool,
    ) -> Vec<GatewayListeners> {
        let mut listeners = Listeners::default();

        for group in groups {
            let hostname = group.host.hostname();
            let slug = host_slug(hostname);

            listeners.push(
                format!("{}-http", slug),
                GatewayListeners {
                    hostname: hostname.map(ToString::to_string),
                    port: self.policy.http_port,
                    protocol: HTTP_PROTOCOL.to_string(),
                    ..Default::default()
                },
            );

            if group.has_tls() {
                let certificate_refs = group
                    .certificates
                    .iter()
                    .map(|secret| GatewayListenersTlsCertificateRefs {
                        name: secret.name.clone(),
                        namespace: (secret.namespace != gateway_namespace)
                            .then(|| secret.namespace.clone()),
                        ..Default::default()
                    })
                    .collect();

                listeners.push(
                    format!("{}-https", slug),
                    GatewayListeners {
                        hostname: hostname.map(ToString::to_string),
                        port: self.policy.https_port,
                        protocol: HTTPS_PROTOCOL.to_string(),
                        tls: Some(GatewayListenersTls {
                            certificate_refs: Some(certificate_refs),
                            mode: Some(GatewayListenersTlsMode::Terminate),
                        }),
                        ..Default::default()
                    },
                );
            }
        }

        let mut listeners = listeners.items;

        if allow_all_namespaces {
            for listener in listeners.iter_mut() {
                listener.allowed_routes = Some(GatewayListenersAllowedRoutes {
                    namespaces: Some(GatewayListenersAllowedRoutesNamespaces {
                        from: Some(GatewayListenersAllowedRoutesNamespacesFrom::All),
                    }),
                    ..Default::default()
                });
            }
        }

        listeners
    }
}

/// Listeners deduplicated by (hostname, port, protocol) with unique names.
#[derive(Default)]
struct Listeners {
    items: Vec<GatewayListeners>,
    seen: BTreeSet<(Option<String>, i32, String)>,
    names: BTreeSet<String>,
}

impl Listeners {
    fn push(&mut self, name: String, mut listener: GatewayListeners) {
        let identity = (
            listener.hostname.clone(),
            listener.port,
            listener.protocol.clone(),
        );

        if !self.seen.insert(identity) {
            return;
        }

        let mut unique = name.clone();
        let mut suffix = 2;
        while self.names.contains(&unique) {
            unique = format!("{}-{}", name, suffix);
            suffix += 1;
        }

        self.names.insert(unique.clone());

        listener.name = unique;
        self.items.push(listener);
    }
}

/// Assembles the single Gateway of a controller class.
pub struct GatewayBuilder<'a> {
    class: &'a ControllerClass,
}

impl<'a> GatewayBuilder<'a> {
    pub fn new(class: &'a ControllerClass) -> Self {
        Self { class }
    }

    pub fn build(&self, key: &ResourceKey, listeners: Vec<GatewayListeners>) -> Gateway {
        Gateway {
            metadata: ObjectMeta {
                name: Some(key.name.clone()),
                namespace: Some(key.namespace.clone()),
                annotations: Some(BTreeMap::from([(
                    GENERATOR_ANNOTATION.to_string(),
                    generator(),
                )])),
                ..Default::default()
            },
            spec: GatewaySpec {
                gateway_class_name: self.class.to_string(),
                listeners,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::i2gw::Host;

    fn host_group(host: Option<&str>, certificates: Vec<ResourceKey>) -> HostGroup {
        HostGroup {
            class: ControllerClass::new("cilium"),
            host: Host::from_rule(host),
            entries: vec![],
            certificates,
        }
    }

    fn names(listeners: &[GatewayListeners]) -> Vec<(&str, i32, &str)> {
        listeners
            .iter()
            .map(|l| (l.name.as_str(), l.port, l.protocol.as_str()))
            .collect()
    }

    #[test]
    fn one_http_listener_per_host() {
        let policy = TranslationPolicy::default();

        let listeners = ListenerSynthesizer::new(&policy).synthesize(
            &[
                host_group(Some("foo.example.com"), vec![]),
                host_group(None, vec![]),
            ],
            "default",
            false,
        );

        assert_eq!(
            names(&listeners),
            vec![
                ("foo-example-com-http", 80, "HTTP"),
                ("all-hosts-http", 80, "HTTP"),
            ]
        );
        assert_eq!(listeners[0].hostname.as_deref(), Some("foo.example.com"));
        assert_eq!(listeners[1].hostname, None);
        assert_eq!(listeners[0].allowed_routes, None);
    }

    #[test]
    fn identical_listeners_are_deduplicated() {
        let policy = TranslationPolicy::default();

        let listeners = ListenerSynthesizer::new(&policy).synthesize(
            &[
                host_group(Some("foo.example.com"), vec![]),
                host_group(Some("foo.example.com"), vec![]),
            ],
            "default",
            false,
        );

        assert_eq!(names(&listeners), vec![("foo-example-com-http", 80, "HTTP")]);
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let policy = TranslationPolicy::default();

        let listeners = ListenerSynthesizer::new(&policy).synthesize(
            &[
                host_group(Some("a.b"), vec![]),
                host_group(Some("a-b"), vec![]),
            ],
            "default",
            false,
        );

        assert_eq!(
            names(&listeners),
            vec![("a-b-http", 80, "HTTP"), ("a-b-http-2", 80, "HTTP")]
        );
    }

    #[test]
    fn tls_hosts_get_https_listener() {
        let policy = TranslationPolicy::default();

        let listeners = ListenerSynthesizer::new(&policy).synthesize(
            &[host_group(
                Some("foo.example.com"),
                vec![
                    ResourceKey::new("default", "foo-cert"),
                    ResourceKey::new("other", "shared-cert"),
                ],
            )],
            "default",
            false,
        );

        assert_eq!(
            names(&listeners),
            vec![
                ("foo-example-com-http", 80, "HTTP"),
                ("foo-example-com-https", 443, "HTTPS"),
            ]
        );
        assert_eq!(
            listeners[1].tls,
            Some(GatewayListenersTls {
                certificate_refs: Some(vec![
                    GatewayListenersTlsCertificateRefs {
                        name: "foo-cert".into(),
                        ..Default::default()
                    },
                    GatewayListenersTlsCertificateRefs {
                        name: "shared-cert".into(),
                        namespace: Some("other".into()),
                        ..Default::default()
                    },
                ]),
                mode: Some(GatewayListenersTlsMode::Terminate),
            })
        );
    }

    #[test]
    fn cross_namespace_classes_allow_all_namespaces() {
        let policy = TranslationPolicy::default();

        let listeners = ListenerSynthesizer::new(&policy).synthesize(
            &[host_group(Some("foo.example.com"), vec![])],
            "default",
            true,
        );

        assert_eq!(
            listeners[0]
                .allowed_routes
                .as_ref()
                .and_then(|r| r.namespaces.as_ref())
                .and_then(|n| n.from),
            Some(GatewayListenersAllowedRoutesNamespacesFrom::All)
        );
    }

    #[test]
    fn gateway_is_named_and_classed() {
        let class = ControllerClass::new("cilium");

        let gateway = GatewayBuilder::new(&class).build(
            &ResourceKey::new("default", "cilium"),
            vec![GatewayListeners {
                name: "all-hosts-http".into(),
                port: 80,
                protocol: "HTTP".into(),
                ..Default::default()
            }],
        );

        assert_eq!(gateway.metadata.name.as_deref(), Some("cilium"));
        assert_eq!(gateway.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(gateway.spec.gateway_class_name, "cilium");
        assert_eq!(gateway.spec.listeners.len(), 1);
    }
}
