use std::fmt;

use kube::ResourceExt;
use serde::{Deserialize, Serialize};

pub const DEFAULT_NAMESPACE: &str = "default";

/// Identifies any input or output resource by `(namespace, name)`.
///
/// The ordering is namespace first, then name, which is the order ingresses are walked in
/// and the order output collections are emitted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceKey {
    pub namespace: String,
    pub name: String,
}

impl ResourceKey {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Key of a namespaced resource. A missing namespace is treated as `default`, the same
    /// way the API server would place the object.
    pub fn from_resource<K: ResourceExt>(resource: &K) -> Self {
        Self {
            namespace: resource
                .namespace()
                .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
            name: resource.name_any(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
