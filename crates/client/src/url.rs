//! Endpoint URL resolution.

use filesend_settings::ClientConfig;

/// Source of the base URL prepended to relative endpoints.
pub trait BaseUrlProvider: Send + Sync {
    fn base_url(&self) -> String;
}

impl BaseUrlProvider for String {
    fn base_url(&self) -> String {
        self.clone()
    }
}

impl BaseUrlProvider for ClientConfig {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }
}

/// Returns `true` if `s` starts with a URL scheme followed by `://`.
pub fn is_absolute_url(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Joins an endpoint onto the configured base URL.
///
/// Absolute endpoints pass through untouched, as does everything when the
/// base is empty.
pub fn resolve_url(path: &str, base: &str) -> String {
    if is_absolute_url(path) {
        return path.to_string();
    }

    if base.is_empty() {
        return path.to_string();
    }

    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}
