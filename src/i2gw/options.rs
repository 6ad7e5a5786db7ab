use std::{collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::kube::apis::networking::gateway::v1::HTTPRouteRulesMatchesPath;

/// Controller-specific translation of an `ImplementationSpecific` ingress path.
///
/// Receives the ingress path string and returns the path match to use.
pub type PathTypeOverride = Arc<dyn Fn(&str) -> HTTPRouteRulesMatchesPath + Send + Sync>;

/// Hooks a provider registers for constructs the generic translation cannot handle.
#[derive(Clone, Default)]
pub struct ImplementationSpecificOptions {
    pub path_match: Option<PathTypeOverride>,
}

impl ImplementationSpecificOptions {
    pub fn with_path_match<F>(f: F) -> Self
    where
        F: Fn(&str) -> HTTPRouteRulesMatchesPath + Send + Sync + 'static,
    {
        Self {
            path_match: Some(Arc::new(f)),
        }
    }
}

impl fmt::Debug for ImplementationSpecificOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImplementationSpecificOptions")
            .field("path_match", &self.path_match.as_ref().map(|_| "Fn"))
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TranslationPolicy {
    /// Class used for ingresses that declare neither `ingressClassName` nor the class annotation
    pub default_class: Option<String>,

    /// Namespace every Gateway is placed in. Defaults to the namespace of the first ingress of
    /// the class.
    pub gateway_namespace: Option<String>,

    /// Emit one HTTPRoute per (ingress, host) instead of one per ingress
    pub split_routes_by_host: bool,

    /// Translate controller classes on the rayon thread pool
    pub parallel: bool,

    pub http_port: i32,

    pub https_port: i32,
}

impl Default for TranslationPolicy {
    fn default() -> Self {
        Self {
            default_class: None,
            gateway_namespace: None,
            split_routes_by_host: false,
            parallel: false,
            http_port: 80,
            https_port: 443,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationOptions {
    pub policy: TranslationPolicy,

    /// Per controller class hooks
    pub implementation_specific: BTreeMap<String, ImplementationSpecificOptions>,
}

impl TranslationOptions {
    pub fn new(policy: TranslationPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_implementation_specific(
        mut self,
        class: impl Into<String>,
        options: ImplementationSpecificOptions,
    ) -> Self {
        self.implementation_specific.insert(class.into(), options);
        self
    }

    pub fn implementation_specific_for(&self, class: &str) -> ImplementationSpecificOptions {
        self.implementation_specific
            .get(class)
            .cloned()
            .unwrap_or_default()
    }
}
