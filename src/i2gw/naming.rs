use once_cell::sync::Lazy;
use regex::Regex;

pub const GENERATOR_ANNOTATION: &str = "gateway.networking.k8s.io/generator";

static NOT_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9-]+").unwrap());

static NOT_SUBDOMAIN_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9.-]+").unwrap());

pub fn generator() -> String {
    format!("{}-{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Slug of a hostname usable inside listener and route names.
///
/// `None` is the wildcard host sentinel.
pub fn host_slug(host: Option<&str>) -> String {
    let Some(host) = host else {
        return "all-hosts".to_string();
    };

    let host = host.to_ascii_lowercase().replace('*', "wildcard");

    let slug = NOT_SLUG_CHARS.replace_all(&host, "-");

    let slug = slug.trim_matches('-');

    if slug.is_empty() {
        "all-hosts".to_string()
    } else {
        slug.to_string()
    }
}

/// Gateway name derived from a controller class.
pub fn gateway_name(class: &str) -> String {
    let class = class.to_ascii_lowercase();

    let name = NOT_SUBDOMAIN_CHARS.replace_all(&class, "-");

    let name = name.trim_matches(|c| c == '-' || c == '.');

    if name.is_empty() {
        "gateway".to_string()
    } else {
        name.to_string()
    }
}
