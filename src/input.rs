use std::{fs, path::Path};

use k8s_openapi::{api::networking::v1::Ingress, Resource as _};
use serde::Deserialize;
use serde_yaml::Value;

use crate::{error::Error, i2gw::DEFAULT_NAMESPACE, logger};

const LIST_KIND: &str = "List";

/// Reads every Ingress from the given manifest files.
///
/// When `namespace` is set, ingresses from other namespaces are dropped. An ingress without
/// `metadata.namespace` counts as `default`.
pub fn read_ingresses<P: AsRef<Path>>(
    paths: &[P],
    namespace: Option<&str>,
) -> Result<Vec<Ingress>, Error> {
    let mut ingresses = Vec::new();

    for path in paths {
        let path = path.as_ref();

        let text = fs::read_to_string(path)
            .map_err(|err| Error::Raw(format!("failed to read {}: {}", path.display(), err)))?;

        let parsed = parse_ingresses(&text)?;

        logger!(info, "read {} ingresses from {}", parsed.len(), path.display());

        ingresses.extend(parsed);
    }

    if let Some(namespace) = namespace {
        ingresses.retain(|ingress| {
            ingress.metadata.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE) == namespace
        });
    }

    Ok(ingresses)
}

/// Parses a multi-document YAML stream. `Ingress` documents and the ingresses inside `List`
/// documents are returned; everything else is skipped.
pub fn parse_ingresses(text: &str) -> Result<Vec<Ingress>, Error> {
    let mut ingresses = Vec::new();

    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document)?;

        collect(value, &mut ingresses)?;
    }

    Ok(ingresses)
}

fn collect(value: Value, ingresses: &mut Vec<Ingress>) -> Result<(), Error> {
    if value.is_null() {
        return Ok(());
    }

    let kind = value.get("kind").and_then(Value::as_str).unwrap_or_default();

    match kind {
        LIST_KIND => {
            if let Some(Value::Sequence(items)) = value.get("items") {
                for item in items {
                    collect(item.clone(), ingresses)?;
                }
            }
        }
        Ingress::KIND => {
            let api_version = value
                .get("apiVersion")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if api_version == Ingress::API_VERSION {
                ingresses.push(serde_yaml::from_value(value)?);
            } else {
                logger!(warn, "skipping Ingress with apiVersion {:?}", api_version);
            }
        }
        _ => {
            logger!(debug, "skipping document of kind {:?}", kind);
        }
    }

    Ok(())
}
