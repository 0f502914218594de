//! HTTP side of a filesend transfer.
//!
//! [`FileSender::send_file`] is the entry point: it classifies the file,
//! routes it through the multipart or base64 transport, and folds every
//! outcome into a [`TransferResult`](filesend_protocol::TransferResult).
//! [`FileSender::upload_file`] is the lower-level multipart primitive that
//! reports failures as [`UploadError`].

mod base64_json;
pub mod credentials;
pub mod error;
mod multipart;
mod response;
pub mod sender;
pub mod url;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use credentials::{
    ConfiguredCredentials, CredentialProvider, CredentialResolver, NoCredentials,
    authorization_value,
};
pub use error::UploadError;
pub use response::parse_body;
pub use sender::{Endpoints, FileSender, SendOptions, UploadOptions};
pub use url::{BaseUrlProvider, is_absolute_url, resolve_url};
