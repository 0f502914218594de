//! Request header and credential resolution.
//!
//! Uploads bypass the shared client's usual header pipeline, so the headers
//! it would have added are rebuilt here in three layers:
//!
//! 1. explicit caller headers;
//! 2. ambient shared headers, which override the caller's;
//! 3. a locally stored token, used only when no `Authorization` header
//!    survived the first two layers.

use std::sync::Arc;

use filesend_settings::{ClientConfig, LocalCredentialStore};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

use crate::error::UploadError;

/// Authorization schemes recognized at the start of a stored credential.
const KNOWN_SCHEMES: &[&str] = &["bearer", "basic", "token", "jwt", "digest"];

/// Read-only view of ambient headers and local credential storage.
pub trait CredentialProvider: Send + Sync {
    /// Headers the shared client attaches to every request.
    fn shared_headers(&self) -> HeaderMap {
        HeaderMap::new()
    }

    /// Value stored locally under `key`.
    fn stored_credential(&self, key: &str) -> Option<String>;
}

/// Provider with no ambient headers and an empty store.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

impl CredentialProvider for NoCredentials {
    fn stored_credential(&self, _key: &str) -> Option<String> {
        None
    }
}

/// Provider backed by configured headers and a [`LocalCredentialStore`].
#[derive(Debug, Clone)]
pub struct ConfiguredCredentials {
    headers: HeaderMap,
    store: LocalCredentialStore,
}

impl ConfiguredCredentials {
    pub fn new(headers: HeaderMap, store: LocalCredentialStore) -> Self {
        Self { headers, store }
    }

    /// Builds the provider from configuration, opening the credential store
    /// if one is configured.
    pub fn from_config(config: &ClientConfig) -> Result<Self, UploadError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| UploadError::Request(format!("invalid header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| UploadError::Request(format!("invalid value for header {name}: {e}")))?;
            headers.insert(name, value);
        }

        let store = match &config.credential_store {
            Some(path) => LocalCredentialStore::open(path)?,
            None => LocalCredentialStore::in_memory(),
        };

        Ok(Self::new(headers, store))
    }
}

impl CredentialProvider for ConfiguredCredentials {
    fn shared_headers(&self) -> HeaderMap {
        self.headers.clone()
    }

    fn stored_credential(&self, key: &str) -> Option<String> {
        self.store.get(key).map(str::to_string)
    }
}

/// Resolves the header set used by a transfer.
#[derive(Clone)]
pub struct CredentialResolver {
    provider: Arc<dyn CredentialProvider>,
    keys: Vec<String>,
}

impl CredentialResolver {
    /// Creates a resolver scanning `keys`, in order, for a fallback token.
    pub fn new(provider: Arc<dyn CredentialProvider>, keys: Vec<String>) -> Self {
        Self { provider, keys }
    }

    /// Resolver that adds nothing to the caller's headers.
    pub fn none() -> Self {
        Self::new(Arc::new(NoCredentials), Vec::new())
    }

    /// Merges explicit, ambient and fallback credentials.
    pub fn resolve_headers(&self, explicit: &HeaderMap) -> HeaderMap {
        let mut headers = explicit.clone();

        // Multi-valued ambient headers replace the caller's values as a group.
        let mut current: Option<HeaderName> = None;
        for (name, value) in self.provider.shared_headers() {
            match name {
                Some(name) => {
                    headers.insert(name.clone(), value);
                    current = Some(name);
                }
                None => {
                    if let Some(name) = &current {
                        headers.append(name.clone(), value);
                    }
                }
            }
        }

        if !headers.contains_key(AUTHORIZATION) {
            if let Some(value) = self.stored_authorization() {
                headers.insert(AUTHORIZATION, value);
            }
        }

        headers
    }

    /// First usable stored credential, as an `Authorization` value.
    fn stored_authorization(&self) -> Option<HeaderValue> {
        for key in &self.keys {
            let Some(raw) = self.provider.stored_credential(key) else {
                continue;
            };
            let token = raw.trim().trim_matches('"').trim();
            if token.is_empty() {
                continue;
            }

            match HeaderValue::from_str(&authorization_value(token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    debug!(key = %key, "using stored credential for Authorization");
                    return Some(value);
                }
                Err(_) => {
                    warn!(key = %key, "stored credential is not a valid header value");
                }
            }
        }
        None
    }
}

/// Prefixes `token` with `Bearer ` unless it already names a scheme.
pub fn authorization_value(token: &str) -> String {
    let has_scheme = token.split_once(' ').is_some_and(|(scheme, rest)| {
        !rest.trim().is_empty() && KNOWN_SCHEMES.contains(&scheme.to_ascii_lowercase().as_str())
    });

    if has_scheme {
        token.to_string()
    } else {
        format!("Bearer {token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{ACCEPT, CONTENT_TYPE};
    use std::collections::HashMap;

    /// Provider with fixed ambient headers and stored values.
    struct MockProvider {
        headers: HeaderMap,
        stored: HashMap<String, String>,
    }

    impl MockProvider {
        fn new(headers: &[(&'static str, &'static str)], stored: &[(&str, &str)]) -> Self {
            let mut map = HeaderMap::new();
            for (k, v) in headers {
                map.append(*k, HeaderValue::from_static(v));
            }
            Self {
                headers: map,
                stored: stored
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            }
        }
    }

    impl CredentialProvider for MockProvider {
        fn shared_headers(&self) -> HeaderMap {
            self.headers.clone()
        }

        fn stored_credential(&self, key: &str) -> Option<String> {
            self.stored.get(key).cloned()
        }
    }

    fn resolver(provider: MockProvider) -> CredentialResolver {
        CredentialResolver::new(
            Arc::new(provider),
            vec!["access_token".into(), "token".into()],
        )
    }

    fn explicit(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(*k, HeaderValue::from_static(v));
        }
        map
    }

    #[test]
    fn explicit_headers_pass_through() {
        let r = resolver(MockProvider::new(&[], &[]));
        let headers = r.resolve_headers(&explicit(&[("x-trace", "1")]));
        assert_eq!(headers["x-trace"], "1");
        assert!(!headers.contains_key(AUTHORIZATION));
    }

    #[test]
    fn ambient_overrides_explicit() {
        let r = resolver(MockProvider::new(
            &[("authorization", "Bearer ambient"), ("x-facility", "north")],
            &[],
        ));
        let headers = r.resolve_headers(&explicit(&[
            ("authorization", "Bearer caller"),
            ("x-facility", "south"),
            ("x-caller", "yes"),
        ]));
        assert_eq!(headers[AUTHORIZATION], "Bearer ambient");
        assert_eq!(headers["x-facility"], "north");
        assert_eq!(headers["x-caller"], "yes");
    }

    #[test]
    fn multi_valued_ambient_header_kept() {
        let r = resolver(MockProvider::new(
            &[("accept", "application/json"), ("accept", "text/plain")],
            &[],
        ));
        let headers = r.resolve_headers(&explicit(&[("accept", "*/*")]));
        let values: Vec<_> = headers.get_all(ACCEPT).iter().collect();
        assert_eq!(values, vec!["application/json", "text/plain"]);
    }

    #[test]
    fn stored_token_fills_missing_authorization() {
        let r = resolver(MockProvider::new(&[], &[("token", "abc123")]));
        let headers = r.resolve_headers(&HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer abc123");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn stored_token_key_order() {
        let r = resolver(MockProvider::new(
            &[],
            &[("token", "second"), ("access_token", "first")],
        ));
        let headers = r.resolve_headers(&HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer first");
    }

    #[test]
    fn stored_token_skips_blank_values() {
        let r = resolver(MockProvider::new(
            &[],
            &[("access_token", "  "), ("token", "\"quoted\"")],
        ));
        let headers = r.resolve_headers(&HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer quoted");
    }

    #[test]
    fn stored_token_never_overrides_existing_authorization() {
        let r = resolver(MockProvider::new(&[], &[("access_token", "stored")]));
        let headers = r.resolve_headers(&explicit(&[("authorization", "Basic dXNlcjpwYXNz")]));
        assert_eq!(headers[AUTHORIZATION], "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn content_type_is_left_to_the_transport() {
        let r = resolver(MockProvider::new(&[("content-type", "application/json")], &[]));
        let headers = r.resolve_headers(&HeaderMap::new());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn authorization_value_schemes() {
        assert_eq!(authorization_value("abc"), "Bearer abc");
        assert_eq!(authorization_value("Bearer abc"), "Bearer abc");
        assert_eq!(authorization_value("bearer abc"), "bearer abc");
        assert_eq!(authorization_value("Basic dXNlcg=="), "Basic dXNlcg==");
        assert_eq!(authorization_value("Token t"), "Token t");
        assert_eq!(authorization_value("JWT eyJ"), "JWT eyJ");
        assert_eq!(authorization_value("Custom xyz"), "Bearer Custom xyz");
        assert_eq!(authorization_value("Bearer "), "Bearer Bearer ");
    }

    #[test]
    fn none_resolver_adds_nothing() {
        let headers = CredentialResolver::none().resolve_headers(&HeaderMap::new());
        assert!(headers.is_empty());
    }

    #[test]
    fn configured_credentials_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("creds.json");
        std::fs::write(&store_path, r#"{"jwt": "eyJhbGciOi"}"#).unwrap();

        let mut config = ClientConfig {
            credential_store: Some(store_path),
            credential_keys: vec!["jwt".into()],
            ..Default::default()
        };
        config.headers.insert("X-Facility".into(), "north".into());

        let provider = ConfiguredCredentials::from_config(&config).unwrap();
        assert_eq!(provider.shared_headers()["x-facility"], "north");
        assert_eq!(provider.stored_credential("jwt").as_deref(), Some("eyJhbGciOi"));

        let r = CredentialResolver::new(Arc::new(provider), config.credential_keys.clone());
        let headers = r.resolve_headers(&HeaderMap::new());
        assert_eq!(headers[AUTHORIZATION], "Bearer eyJhbGciOi");
    }

    #[test]
    fn configured_credentials_reject_bad_header() {
        let mut config = ClientConfig::default();
        config.headers.insert("bad header".into(), "x".into());
        assert!(matches!(
            ConfiguredCredentials::from_config(&config),
            Err(UploadError::Request(_))
        ));
    }
}
