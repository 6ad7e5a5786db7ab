use std::fmt;

use strum::Display;
use thiserror::Error;

use crate::logger;

use super::ResourceKey;

/// Dotted path into a source manifest, e.g. `spec.rules[0].http.paths[1].pathType`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath(String);

impl FieldPath {
    pub fn new(root: &str) -> Self {
        Self(root.to_string())
    }

    pub fn child(&self, name: &str) -> Self {
        Self(format!("{}.{}", self.0, name))
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[strum(serialize = "Invalid value")]
    Invalid,

    #[strum(serialize = "Required value")]
    Required,

    #[strum(serialize = "Unsupported value")]
    NotSupported,
}

/// A source construct that has no safe translation.
///
/// Errors are scoped to the construct that caused them and never abort the run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{resource}: {field}: {kind}{}", describe(.value, .detail))]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub resource: ResourceKey,
    pub field: FieldPath,
    pub value: Option<String>,
    pub detail: String,
}

fn describe(value: &Option<String>, detail: &str) -> String {
    let mut out = String::new();

    if let Some(value) = value {
        out.push_str(&format!(": {:?}", value));
    }

    if !detail.is_empty() {
        out.push_str(": ");
        out.push_str(detail);
    }

    out
}

impl ValidationError {
    pub fn invalid(
        resource: &ResourceKey,
        field: FieldPath,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::Invalid,
            resource: resource.clone(),
            field,
            value: Some(value.into()),
            detail: detail.into(),
        }
    }

    pub fn required(resource: &ResourceKey, field: FieldPath, detail: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Required,
            resource: resource.clone(),
            field,
            value: None,
            detail: detail.into(),
        }
    }

    pub fn not_supported(
        resource: &ResourceKey,
        field: FieldPath,
        value: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind: ErrorKind::NotSupported,
            resource: resource.clone(),
            field,
            value: Some(value.into()),
            detail: detail.into(),
        }
    }
}

/// Append-only, order-preserving collection of [`ValidationError`].
///
/// Identical errors reported by different constructs are all kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<ValidationError>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        logger!(debug, "translation error: {}", error);

        self.0.push(error);
    }

    pub fn append(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl From<Vec<ValidationError>> for ErrorList {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl IntoIterator for ErrorList {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A possibly partial value together with the errors met while producing it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translated<T> {
    pub value: T,
    pub errors: ErrorList,
}

impl<T> Translated<T> {
    pub fn new(value: T, errors: ErrorList) -> Self {
        Self { value, errors }
    }

    pub fn into_parts(self) -> (T, ErrorList) {
        (self.value, self.errors)
    }
}
