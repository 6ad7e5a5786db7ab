use strum::{Display, EnumString};

use crate::kube::apis::networking::gateway::v1::{
    HTTPRouteRulesMatchesPath, HTTPRouteRulesMatchesPathType,
};

use super::{FieldPath, ImplementationSpecificOptions, ResourceKey, ValidationError};

const IMPLEMENTATION_SPECIFIC_DETAIL: &str = "implementationSpecific path type is not supported in generic translation, and your provider does not provide custom support to translate it";

const UNKNOWN_PATH_TYPE_DETAIL: &str =
    "unrecognized path type, supported values: \"Exact\", \"Prefix\", \"ImplementationSpecific\"";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum PathType {
    Exact,
    Prefix,
    ImplementationSpecific,
}

/// Maps one ingress path rule to a Gateway API path match.
pub struct PathMatchTranslator<'a> {
    options: &'a ImplementationSpecificOptions,
}

impl<'a> PathMatchTranslator<'a> {
    pub fn new(options: &'a ImplementationSpecificOptions) -> Self {
        Self { options }
    }

    /// `field` points at the ingress path entry (`spec.rules[i].http.paths[j]`).
    pub fn translate(
        &self,
        resource: &ResourceKey,
        field: &FieldPath,
        path: Option<&str>,
        path_type: &str,
    ) -> Result<HTTPRouteRulesMatchesPath, ValidationError> {
        let path = path.filter(|path| !path.is_empty());

        match path_type.parse::<PathType>() {
            Ok(PathType::Exact) => {
                let Some(path) = path else {
                    return Err(ValidationError::required(
                        resource,
                        field.child("path"),
                        "exact path match requires a path",
                    ));
                };

                ensure_absolute(resource, field, path)?;

                Ok(path_match(HTTPRouteRulesMatchesPathType::Exact, path))
            }
            Ok(PathType::Prefix) => {
                let path = path.unwrap_or("/");

                ensure_absolute(resource, field, path)?;

                Ok(path_match(
                    HTTPRouteRulesMatchesPathType::PathPrefix,
                    normalize_prefix(path),
                ))
            }
            Ok(PathType::ImplementationSpecific) => match &self.options.path_match {
                Some(matcher) => Ok(matcher(path.unwrap_or_default())),
                None => Err(ValidationError::invalid(
                    resource,
                    field.child("pathType"),
                    path_type,
                    IMPLEMENTATION_SPECIFIC_DETAIL,
                )),
            },
            Err(_) => Err(ValidationError::invalid(
                resource,
                field.child("pathType"),
                path_type,
                UNKNOWN_PATH_TYPE_DETAIL,
            )),
        }
    }
}

fn path_match(type_: HTTPRouteRulesMatchesPathType, value: &str) -> HTTPRouteRulesMatchesPath {
    HTTPRouteRulesMatchesPath {
        r#type: Some(type_),
        value: Some(value.to_string()),
    }
}

fn ensure_absolute(
    resource: &ResourceKey,
    field: &FieldPath,
    path: &str,
) -> Result<(), ValidationError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            resource,
            field.child("path"),
            path,
            "must be an absolute path",
        ))
    }
}

/// Ingress prefixes `/foo/` and `/foo` are equivalent; the root prefix stays `/`.
fn normalize_prefix(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');

    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::i2gw::ErrorKind;

    fn key() -> ResourceKey {
        ResourceKey::new("default", "web")
    }

    fn field() -> FieldPath {
        FieldPath::new("spec")
            .child("rules")
            .index(0)
            .child("http")
            .child("paths")
            .index(1)
    }

    #[rstest]
    #[case(Some("/foo"), "Exact", HTTPRouteRulesMatchesPathType::Exact, "/foo")]
    #[case(Some("/foo/"), "Exact", HTTPRouteRulesMatchesPathType::Exact, "/foo/")]
    #[case(Some("/foo"), "Prefix", HTTPRouteRulesMatchesPathType::PathPrefix, "/foo")]
    #[case(Some("/foo/"), "Prefix", HTTPRouteRulesMatchesPathType::PathPrefix, "/foo")]
    #[case(Some("/"), "Prefix", HTTPRouteRulesMatchesPathType::PathPrefix, "/")]
    #[case(Some("//"), "Prefix", HTTPRouteRulesMatchesPathType::PathPrefix, "/")]
    #[case(None, "Prefix", HTTPRouteRulesMatchesPathType::PathPrefix, "/")]
    fn translates_core_path_types(
        #[case] path: Option<&str>,
        #[case] path_type: &str,
        #[case] expected_type: HTTPRouteRulesMatchesPathType,
        #[case] expected_value: &str,
    ) {
        let options = ImplementationSpecificOptions::default();

        let actual = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), path, path_type)
            .unwrap();

        assert_eq!(
            actual,
            HTTPRouteRulesMatchesPath {
                r#type: Some(expected_type),
                value: Some(expected_value.to_string()),
            }
        );
    }

    #[test]
    fn implementation_specific_without_override_is_invalid() {
        let options = ImplementationSpecificOptions::default();

        let err = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), Some("/foo"), "ImplementationSpecific")
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Invalid);
        assert_eq!(
            err.field.as_str(),
            "spec.rules[0].http.paths[1].pathType"
        );
        assert_eq!(err.value.as_deref(), Some("ImplementationSpecific"));
        assert_eq!(err.detail, IMPLEMENTATION_SPECIFIC_DETAIL);
    }

    #[test]
    fn implementation_specific_uses_override() {
        let options = ImplementationSpecificOptions::with_path_match(|path| {
            HTTPRouteRulesMatchesPath {
                r#type: Some(HTTPRouteRulesMatchesPathType::RegularExpression),
                value: Some(format!("{}.*", path)),
            }
        });

        let actual = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), Some("/api"), "ImplementationSpecific")
            .unwrap();

        assert_eq!(
            actual,
            HTTPRouteRulesMatchesPath {
                r#type: Some(HTTPRouteRulesMatchesPathType::RegularExpression),
                value: Some("/api.*".to_string()),
            }
        );
    }

    #[rstest]
    #[case("Regex")]
    #[case("prefix")]
    #[case("")]
    fn unknown_path_type_is_invalid_with_its_own_detail(#[case] path_type: &str) {
        let options = ImplementationSpecificOptions::default();

        let err = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), Some("/"), path_type)
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Invalid);
        assert_eq!(err.field.as_str(), "spec.rules[0].http.paths[1].pathType");
        assert_eq!(err.detail, UNKNOWN_PATH_TYPE_DETAIL);
    }

    #[test]
    fn exact_without_path_is_required() {
        let options = ImplementationSpecificOptions::default();

        let err = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), None, "Exact")
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Required);
        assert_eq!(err.field.as_str(), "spec.rules[0].http.paths[1].path");
    }

    #[test]
    fn relative_path_is_invalid() {
        let options = ImplementationSpecificOptions::default();

        let err = PathMatchTranslator::new(&options)
            .translate(&key(), &field(), Some("foo"), "Prefix")
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Invalid);
        assert_eq!(err.field.as_str(), "spec.rules[0].http.paths[1].path");
    }
}
