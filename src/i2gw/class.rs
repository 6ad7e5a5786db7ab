use std::fmt;

use k8s_openapi::api::networking::v1::Ingress;
use serde::{Deserialize, Serialize};

pub const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

/// Identifier of the ingress controller an Ingress belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ControllerClass(String);

impl ControllerClass {
    pub fn new(class: impl Into<String>) -> Self {
        Self(class.into())
    }

    /// `spec.ingressClassName` wins over the legacy annotation. Empty values count as unset.
    pub fn from_ingress(ingress: &Ingress) -> Option<Self> {
        let from_spec = ingress
            .spec
            .as_ref()
            .and_then(|spec| spec.ingress_class_name.as_deref());

        let from_annotation = ingress
            .metadata
            .annotations
            .as_ref()
            .and_then(|annotations| annotations.get(INGRESS_CLASS_ANNOTATION))
            .map(String::as_str);

        from_spec
            .filter(|class| !class.is_empty())
            .or(from_annotation.filter(|class| !class.is_empty()))
            .map(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControllerClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
