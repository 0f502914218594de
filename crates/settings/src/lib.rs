//! Client configuration and local credential storage.
//!
//! Both are read-only inputs to a transfer: the configuration supplies the
//! base URL, timeout and ambient headers, the credential store supplies the
//! token used when no `Authorization` header is otherwise present.

pub mod config;
pub mod error;
pub mod store;

pub use config::{ClientConfig, DEFAULT_CREDENTIAL_KEYS, config_path};
pub use error::SettingsError;
pub use store::LocalCredentialStore;
