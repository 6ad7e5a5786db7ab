use std::collections::BTreeMap;

use k8s_openapi::api::networking::v1::Ingress;
use rayon::prelude::*;

use crate::logger;

use super::{
    naming::gateway_name, ControllerClass, ErrorList, FieldPath, GatewayBuilder,
    GatewayResources, HTTPRouteBuilder, HostRouteGrouper, InputResources, ListenerSynthesizer,
    PathMatchTranslator, ResourceKey, Translated, TranslationOptions, ValidationError,
};

/// Ingresses of one controller class, in key order.
struct ClassInput<'i> {
    class: ControllerClass,
    ingresses: Vec<(&'i ResourceKey, &'i Ingress)>,
}

/// Input split by controller class. Classes are ordered by identifier.
struct Partitioned<'i> {
    classes: Vec<ClassInput<'i>>,
    errors: ErrorList,
}

/// Translates a whole input set: partition by class, translate every class on its own,
/// merge the results.
///
/// The engine never fails. Untranslatable constructs end up in the returned error list while
/// every valid construct is still emitted. The same input always yields the same output.
#[derive(Debug, Clone, Default)]
pub struct TranslationEngine {
    options: TranslationOptions,
}

impl TranslationEngine {
    pub fn new(options: TranslationOptions) -> Self {
        Self { options }
    }

    pub fn translate(&self, input: &InputResources) -> Translated<GatewayResources> {
        let Partitioned { classes, errors } = self.partition(input);

        logger!(
            info,
            "translating {} ingresses in {} classes",
            input.ingresses.len(),
            classes.len()
        );

        let translated: Vec<_> = if self.options.policy.parallel {
            classes
                .par_iter()
                .map(|class| self.translate_class(class))
                .collect()
        } else {
            classes
                .iter()
                .map(|class| self.translate_class(class))
                .collect()
        };

        merge(errors, translated)
    }

    fn partition<'i>(&self, input: &'i InputResources) -> Partitioned<'i> {
        let mut classes: BTreeMap<ControllerClass, Vec<(&'i ResourceKey, &'i Ingress)>> =
            BTreeMap::new();
        let mut errors = ErrorList::new();

        for (key, ingress) in &input.ingresses {
            let class = ControllerClass::from_ingress(ingress).or_else(|| {
                self.options
                    .policy
                    .default_class
                    .as_ref()
                    .map(ControllerClass::new)
            });

            let Some(class) = class else {
                errors.push(ValidationError::required(
                    key,
                    FieldPath::new("spec").child("ingressClassName"),
                    "ingress class is not set and no default class is configured",
                ));
                continue;
            };

            classes.entry(class).or_default().push((key, ingress));
        }

        Partitioned {
            classes: classes
                .into_iter()
                .map(|(class, ingresses)| ClassInput { class, ingresses })
                .collect(),
            errors,
        }
    }

    fn translate_class(&self, input: &ClassInput) -> Translated<GatewayResources> {
        let ClassInput { class, ingresses } = input;
        let policy = &self.options.policy;

        let implementation_specific = self.options.implementation_specific_for(class.as_str());

        let (groups, mut errors) =
            HostRouteGrouper::new(class, PathMatchTranslator::new(&implementation_specific))
                .group(ingresses.iter().copied())
                .into_parts();

        let gateway_key = self.gateway_key(class, ingresses);

        let spans_namespaces = ingresses
            .iter()
            .any(|(key, _)| key.namespace != gateway_key.namespace);

        let listeners = ListenerSynthesizer::new(policy).synthesize(
            &groups,
            &gateway_key.namespace,
            spans_namespaces,
        );

        let mut resources = GatewayResources::default();

        if listeners.is_empty() {
            logger!(info, "class {} has no rules, no Gateway generated", class);
            return Translated::new(resources, errors);
        }

        let gateway = GatewayBuilder::new(class).build(&gateway_key, listeners);

        let (http_routes, route_errors) = HTTPRouteBuilder::new(&gateway_key, policy)
            .build(&groups)
            .into_parts();

        errors.append(route_errors);

        logger!(
            info,
            "class {}: gateway {}, {} httproutes, {} errors",
            class,
            gateway_key,
            http_routes.len(),
            errors.len()
        );

        resources.gateways.insert(gateway_key, gateway);
        resources.http_routes = http_routes;

        Translated::new(resources, errors)
    }

    fn gateway_key(
        &self,
        class: &ControllerClass,
        ingresses: &[(&ResourceKey, &Ingress)],
    ) -> ResourceKey {
        let namespace = self
            .options
            .policy
            .gateway_namespace
            .clone()
            .or_else(|| ingresses.first().map(|(key, _)| key.namespace.clone()))
            .unwrap_or_else(|| super::DEFAULT_NAMESPACE.to_string());

        ResourceKey::new(namespace, gateway_name(class.as_str()))
    }
}

fn merge(
    mut errors: ErrorList,
    translated: Vec<Translated<GatewayResources>>,
) -> Translated<GatewayResources> {
    let mut resources = GatewayResources::default();

    for class in translated {
        let (class_resources, class_errors) = class.into_parts();

        errors.append(class_errors);

        resources.merge(class_resources, &mut errors);
    }

    Translated::new(resources, errors)
}
