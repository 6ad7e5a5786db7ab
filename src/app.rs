use std::{collections::BTreeSet, io, process::ExitCode};

use anyhow::{Context as _, Result};
use k8s_openapi::api::networking::v1::Ingress;

use crate::{
    cmd::{Command, PrintArgs, SubCommand},
    config::Config,
    error::Error,
    i2gw::{
        ErrorList, GatewayResources, InputResources, Translated, TranslationEngine,
        TranslationOptions, TranslationPolicy,
    },
    input,
    kube::{KubeClient, NamespaceScope},
    logger,
    logging::Logger,
    output::{write_errors, write_resources},
    providers,
};

pub struct App;

impl App {
    pub fn run(cmd: Command) -> Result<ExitCode> {
        let config = Config::load(cmd.config_load_option()?)?;

        if cmd.logging {
            Logger::init(&config.logging)?;
        }

        logger!(info, "app start");

        match cmd.subcommand {
            SubCommand::Print(args) => print(args, config),
        }
    }
}

fn print(args: PrintArgs, config: Config) -> Result<ExitCode> {
    let ingresses = read_ingresses(&args)?;

    let input = InputResources::from_ingresses(ingresses);

    let (resources, errors) =
        translate(&input, &config.translation, &args.providers)?.into_parts();

    write_resources(&mut io::stdout().lock(), &resources, args.output)
        .context("failed to write resources")?;

    write_errors(&mut io::stderr().lock(), &errors)?;

    logger!(
        info,
        "translated {} ingresses into {} gateways and {} httproutes with {} errors",
        input.ingresses.len(),
        resources.gateways.len(),
        resources.http_routes.len(),
        errors.len()
    );

    if errors.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn read_ingresses(args: &PrintArgs) -> Result<Vec<Ingress>> {
    let scope = args.namespace_scope();

    if !args.input_files.is_empty() {
        let namespace = match &scope {
            NamespaceScope::Namespace(namespace) => Some(namespace.as_str()),
            _ => None,
        };

        return Ok(input::read_ingresses(&args.input_files, namespace)?);
    }

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let client = KubeClient::try_new(args.kubeconfig.clone(), args.context.clone()).await?;

        let ingresses = client
            .list_ingresses(&scope)
            .await
            .context("failed to list ingresses")?;

        anyhow::Ok(ingresses)
    })
}

/// Runs the selected providers and merges their output. Without providers every ingress class
/// goes through the generic engine.
pub fn translate(
    input: &InputResources,
    policy: &TranslationPolicy,
    providers: &[String],
) -> Result<Translated<GatewayResources>, Error> {
    if providers.is_empty() {
        let engine = TranslationEngine::new(TranslationOptions::new(policy.clone()));

        return Ok(engine.translate(input));
    }

    let providers = providers
        .iter()
        .map(String::as_str)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(providers::lookup)
        .collect::<Result<Vec<_>, _>>()?;

    let mut resources = GatewayResources::default();
    let mut errors = ErrorList::new();

    for provider in providers {
        let (translated, provider_errors) = provider.to_gateway_api(input, policy).into_parts();

        errors.append(provider_errors);

        resources.merge(translated, &mut errors);
    }

    Ok(Translated::new(resources, errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use crate::i2gw::ResourceKey;

    fn input() -> InputResources {
        let yaml = indoc! {
            "
            metadata:
              name: web
            spec:
              ingressClassName: cilium
              defaultBackend:
                service:
                  name: web
                  port:
                    number: 80
            ---
            metadata:
              name: api
            spec:
              ingressClassName: nginx
              defaultBackend:
                service:
                  name: api
                  port:
                    number: 80
            "
        };

        InputResources::from_ingresses(
            serde_yaml::Deserializer::from_str(yaml).map(|doc| Ingress::deserialize(doc).unwrap()),
        )
    }

    #[test]
    fn without_providers_every_class_is_translated() {
        let actual = translate(&input(), &TranslationPolicy::default(), &[]).unwrap();

        assert!(actual.errors.is_empty());
        assert_eq!(
            actual.value.gateways.keys().cloned().collect::<Vec<_>>(),
            vec![
                ResourceKey::new("default", "cilium"),
                ResourceKey::new("default", "nginx")
            ]
        );
    }

    #[test]
    fn providers_select_their_classes() {
        let actual = translate(
            &input(),
            &TranslationPolicy::default(),
            &["cilium".to_string(), "cilium".to_string()],
        )
        .unwrap();

        assert!(actual.errors.is_empty());
        assert_eq!(
            actual.value.http_routes.keys().cloned().collect::<Vec<_>>(),
            vec![ResourceKey::new("default", "web")]
        );
    }

    #[test]
    fn unknown_provider() {
        let err = translate(&input(), &TranslationPolicy::default(), &["istio".to_string()])
            .err()
            .unwrap();

        assert!(matches!(err, Error::UnknownProvider { .. }));
    }
}
