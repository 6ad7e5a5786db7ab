use super::Provider;

pub const CILIUM_INGRESS_CLASS: &str = "cilium";

/// Cilium ingress controller. Everything goes through the generic translation; Cilium has no
/// custom handling of `ImplementationSpecific` paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct CiliumProvider;

impl Provider for CiliumProvider {
    fn name(&self) -> &'static str {
        "cilium"
    }

    fn ingress_classes(&self) -> &[&'static str] {
        &[CILIUM_INGRESS_CLASS]
    }
}
