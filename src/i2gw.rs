//! Generic Ingress to Gateway API translation.
//!
//! Ingresses are partitioned by controller class. Every class is translated on its own into a
//! single Gateway plus one HTTPRoute per source Ingress, and the per-class results are merged.
//! Constructs without a safe generic translation are reported as [`ValidationError`]s while
//! everything else is still emitted.

mod backend;
mod class;
mod engine;
mod field;
mod gateway;
mod host_group;
mod http_route;
mod naming;
mod options;
mod path_match;
mod resource_key;

use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::Ingress;

use crate::{
    kube::apis::networking::gateway::v1::{Gateway, HTTPRoute},
    logger,
};

pub use self::backend::translate_backend;
pub use self::class::{ControllerClass, INGRESS_CLASS_ANNOTATION};
pub use self::engine::TranslationEngine;
pub use self::field::{ErrorKind, ErrorList, FieldPath, Translated, ValidationError};
pub use self::gateway::{GatewayBuilder, ListenerSynthesizer, HTTPS_PROTOCOL, HTTP_PROTOCOL};
pub use self::host_group::{EntryPosition, Host, HostGroup, HostRouteGrouper, RouteEntry};
pub use self::http_route::HTTPRouteBuilder;
pub use self::naming::{gateway_name, host_slug, GENERATOR_ANNOTATION};
pub use self::options::{
    ImplementationSpecificOptions, PathTypeOverride, TranslationOptions, TranslationPolicy,
};
pub use self::path_match::{PathMatchTranslator, PathType};
pub use self::resource_key::{ResourceKey, DEFAULT_NAMESPACE};

/// Resources read by the discovery layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputResources {
    pub ingresses: BTreeMap<ResourceKey, Ingress>,
}

impl InputResources {
    /// A later ingress with the same `(namespace, name)` replaces the earlier one.
    pub fn from_ingresses(ingresses: impl IntoIterator<Item = Ingress>) -> Self {
        let mut resources = Self::default();

        for ingress in ingresses {
            let key = ResourceKey::from_resource(&ingress);

            if resources.ingresses.insert(key.clone(), ingress).is_some() {
                logger!(warn, "duplicate ingress {}, the later document wins", key);
            }
        }

        resources
    }
}

/// Translated Gateway API resources keyed by `(namespace, name)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayResources {
    pub gateways: BTreeMap<ResourceKey, Gateway>,
    pub http_routes: BTreeMap<ResourceKey, HTTPRoute>,
}

impl GatewayResources {
    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty() && self.http_routes.is_empty()
    }

    /// Moves `other`, the output of one controller class or provider, into `self`.
    ///
    /// When one of its Gateways already exists, `other` is skipped as a whole so none of its
    /// routes attach to a Gateway of a different class. Colliding HTTPRoutes are skipped one by
    /// one. Every skip is reported.
    pub fn merge(&mut self, other: GatewayResources, errors: &mut ErrorList) {
        if let Some((key, gateway)) = other
            .gateways
            .iter()
            .find(|(key, _)| self.gateways.contains_key(*key))
        {
            errors.push(ValidationError::invalid(
                key,
                FieldPath::new("spec").child("gatewayClassName"),
                gateway.spec.gateway_class_name.clone(),
                format!(
                    "generated Gateway {} already exists for another class, its resources are skipped",
                    key
                ),
            ));
            return;
        }

        self.gateways.extend(other.gateways);

        for (key, route) in other.http_routes {
            if self.http_routes.contains_key(&key) {
                errors.push(ValidationError::invalid(
                    &key,
                    FieldPath::new("metadata").child("name"),
                    key.name.clone(),
                    format!("generated HTTPRoute {} already exists", key),
                ));
                continue;
            }

            self.http_routes.insert(key, route);
        }
    }
}
