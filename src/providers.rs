mod cilium;

pub use self::cilium::CiliumProvider;

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::{
    error::Error,
    i2gw::{
        ControllerClass, GatewayResources, ImplementationSpecificOptions, InputResources,
        Translated, TranslationEngine, TranslationOptions, TranslationPolicy,
    },
    logger,
};

/// An ingress controller adapter around the generic translation engine.
///
/// A provider owns a set of ingress classes and may register hooks for constructs the generic
/// translation leaves unsupported.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    fn ingress_classes(&self) -> &[&'static str];

    fn implementation_specific_options(&self) -> ImplementationSpecificOptions {
        ImplementationSpecificOptions::default()
    }

    /// Translates the ingresses whose class this provider owns.
    fn to_gateway_api(
        &self,
        resources: &InputResources,
        policy: &TranslationPolicy,
    ) -> Translated<GatewayResources> {
        let owned = InputResources {
            ingresses: resources
                .ingresses
                .iter()
                .filter(|(_, ingress)| {
                    ControllerClass::from_ingress(ingress)
                        .or_else(|| policy.default_class.as_ref().map(ControllerClass::new))
                        .is_some_and(|class| self.ingress_classes().contains(&class.as_str()))
                })
                .map(|(key, ingress)| (key.clone(), ingress.clone()))
                .collect(),
        };

        logger!(
            info,
            "provider {}: {} of {} ingresses selected",
            self.name(),
            owned.ingresses.len(),
            resources.ingresses.len()
        );

        let options = self.ingress_classes().iter().fold(
            TranslationOptions::new(policy.clone()),
            |options, class| {
                options.with_implementation_specific(*class, self.implementation_specific_options())
            },
        );

        TranslationEngine::new(options).translate(&owned)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumString, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ProviderName {
    Cilium,
}

impl ProviderName {
    pub fn provider(self) -> Box<dyn Provider> {
        match self {
            Self::Cilium => Box::new(CiliumProvider),
        }
    }
}

pub fn lookup(name: &str) -> Result<Box<dyn Provider>, Error> {
    name.parse::<ProviderName>()
        .map(ProviderName::provider)
        .map_err(|_| Error::UnknownProvider {
            name: name.to_string(),
            supported: ProviderName::iter()
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
                .join(", "),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_finds_known_provider() {
        assert_eq!(lookup("cilium").unwrap().name(), "cilium");
    }

    #[test]
    fn lookup_rejects_unknown_provider() {
        let err = lookup("traefik").err().unwrap();

        assert_eq!(
            err.to_string(),
            "unknown provider \"traefik\", supported providers: cilium"
        );
    }
}
