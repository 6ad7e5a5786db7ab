use std::io::Write;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;
use strum::Display;

use crate::{
    error::Error,
    i2gw::{ErrorList, GatewayResources},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Writes Gateways followed by HTTPRoutes, each group in `(namespace, name)` order.
pub fn write_resources<W: Write>(
    w: &mut W,
    resources: &GatewayResources,
    format: OutputFormat,
) -> Result<(), Error> {
    match format {
        OutputFormat::Yaml => write_yaml(w, resources),
        OutputFormat::Json => write_json(w, resources),
    }
}

fn write_yaml<W: Write>(w: &mut W, resources: &GatewayResources) -> Result<(), Error> {
    fn document<W: Write, T: Serialize>(w: &mut W, resource: &T) -> Result<(), Error> {
        writeln!(w, "---")?;
        w.write_all(serde_yaml::to_string(resource)?.as_bytes())?;
        Ok(())
    }

    for gateway in resources.gateways.values() {
        document(w, gateway)?;
    }

    for route in resources.http_routes.values() {
        document(w, route)?;
    }

    Ok(())
}

fn write_json<W: Write>(w: &mut W, resources: &GatewayResources) -> Result<(), Error> {
    let items = resources
        .gateways
        .values()
        .map(serde_json::to_value)
        .chain(resources.http_routes.values().map(serde_json::to_value))
        .collect::<Result<Vec<_>, _>>()?;

    let list = json!({
        "apiVersion": "v1",
        "kind": "List",
        "items": items,
    });

    serde_json::to_writer_pretty(&mut *w, &list)?;
    writeln!(w)?;

    Ok(())
}

pub fn write_errors<W: Write>(w: &mut W, errors: &ErrorList) -> Result<(), Error> {
    for error in errors {
        writeln!(w, "{}", error)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use k8s_openapi::api::networking::v1::Ingress;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;

    use crate::i2gw::{FieldPath, InputResources, ResourceKey, TranslationEngine, ValidationError};

    fn resources() -> GatewayResources {
        let ingress: Ingress = serde_yaml::from_str(indoc! {
            "
            metadata:
              name: web
              namespace: default
            spec:
              ingressClassName: cilium
              rules:
                - host: web.example.com
                  http:
                    paths:
                      - path: /
                        pathType: Prefix
                        backend:
                          service:
                            name: web
                            port:
                              number: 80
            "
        })
        .unwrap();

        TranslationEngine::default()
            .translate(&InputResources::from_ingresses([ingress]))
            .value
    }

    fn kinds_and_names(values: &[serde_json::Value]) -> Vec<(String, String)> {
        values
            .iter()
            .map(|v| {
                (
                    v["kind"].as_str().unwrap_or_default().to_string(),
                    v["metadata"]["name"].as_str().unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    #[test]
    fn yaml_gateways_then_routes() {
        let mut buf = Vec::new();

        write_resources(&mut buf, &resources(), OutputFormat::Yaml).unwrap();

        let text = String::from_utf8(buf).unwrap();

        let documents = serde_yaml::Deserializer::from_str(&text)
            .map(|doc| serde_json::Value::deserialize(doc).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(
            kinds_and_names(&documents),
            vec![
                ("Gateway".to_string(), "cilium".to_string()),
                ("HTTPRoute".to_string(), "web".to_string()),
            ]
        );
        assert_eq!(
            documents[0]["apiVersion"].as_str(),
            Some("gateway.networking.k8s.io/v1")
        );
    }

    #[test]
    fn json_list() {
        let mut buf = Vec::new();

        write_resources(&mut buf, &resources(), OutputFormat::Json).unwrap();

        let list: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(list["kind"].as_str(), Some("List"));
        assert_eq!(
            kinds_and_names(list["items"].as_array().unwrap()),
            vec![
                ("Gateway".to_string(), "cilium".to_string()),
                ("HTTPRoute".to_string(), "web".to_string()),
            ]
        );
    }

    #[test]
    fn empty_yaml_output() {
        let mut buf = Vec::new();

        write_resources(&mut buf, &GatewayResources::default(), OutputFormat::Yaml).unwrap();

        assert!(buf.is_empty());
    }

    #[test]
    fn errors_one_per_line() {
        let mut errors = ErrorList::new();
        errors.push(ValidationError::required(
            &ResourceKey::new("default", "web"),
            FieldPath::new("spec").child("ingressClassName"),
            "no ingress class",
        ));

        let mut buf = Vec::new();

        write_errors(&mut buf, &errors).unwrap();

        assert_eq!(
            String::from_utf8(buf).unwrap(),
            format!("{}\n", errors.iter().next().unwrap())
        );
    }
}
