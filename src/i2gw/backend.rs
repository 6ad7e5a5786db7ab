use k8s_openapi::api::networking::v1::IngressBackend;

use crate::kube::apis::networking::gateway::v1::HTTPRouteRulesBackendRefs;

use super::{FieldPath, ResourceKey, ValidationError};

/// Copies an ingress backend into a route backend reference. Services are not resolved.
pub fn translate_backend(
    resource: &ResourceKey,
    field: &FieldPath,
    backend: &IngressBackend,
) -> Result<HTTPRouteRulesBackendRefs, ValidationError> {
    if let Some(service) = &backend.service {
        let port_field = field.child("service").child("port");

        let Some(port) = &service.port else {
            return Err(ValidationError::required(
                resource,
                port_field,
                "service backend requires a port",
            ));
        };

        if let Some(number) = port.number {
            return Ok(HTTPRouteRulesBackendRefs {
                name: service.name.clone(),
                port: Some(number),
                ..Default::default()
            });
        }

        if let Some(name) = port.name.as_deref().filter(|name| !name.is_empty()) {
            return Err(ValidationError::not_supported(
                resource,
                port_field.child("name"),
                name,
                "named service ports are not supported, use port.number",
            ));
        }

        return Err(ValidationError::required(
            resource,
            port_field,
            "service backend requires a port number",
        ));
    }

    if let Some(reference) = &backend.resource {
        return Ok(HTTPRouteRulesBackendRefs {
            group: Some(reference.api_group.clone().unwrap_or_default()),
            kind: Some(reference.kind.clone()),
            name: reference.name.clone(),
            ..Default::default()
        });
    }

    Err(ValidationError::required(
        resource,
        field.clone(),
        "backend requires a service or a resource reference",
    ))
}
