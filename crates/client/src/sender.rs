//! Transfer coordinator.

use std::sync::Arc;

use filesend_protocol::{ErrorKind, MetadataBag, TransferResult};
use filesend_settings::ClientConfig;
use filesend_transfer::{FileDescriptor, ProgressCallback, Strategy, classify};
use reqwest::header::HeaderMap;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::credentials::{ConfiguredCredentials, CredentialResolver};
use crate::error::UploadError;
use crate::url::{BaseUrlProvider, resolve_url};

/// The two logical destinations of a transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Audio recordings.
    pub audio: String,
    /// Documents and images.
    pub doc: String,
}

impl Endpoints {
    pub fn new(audio: impl Into<String>, doc: impl Into<String>) -> Self {
        Self {
            audio: audio.into(),
            doc: doc.into(),
        }
    }
}

/// Options for [`FileSender::send_file`].
#[derive(Clone)]
pub struct SendOptions {
    pub endpoints: Endpoints,
    pub meta: MetadataBag,
    pub on_progress: Option<ProgressCallback>,
    pub cancellation: Option<CancellationToken>,
    /// Skip audio detection so the file is sent as an image or document.
    pub force_base64: bool,
}

impl SendOptions {
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            meta: MetadataBag::new(),
            on_progress: None,
            cancellation: None,
            force_base64: false,
        }
    }

    pub fn meta(mut self, meta: MetadataBag) -> Self {
        self.meta = meta;
        self
    }

    pub fn on_progress(mut self, cb: ProgressCallback) -> Self {
        self.on_progress = Some(cb);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn force_base64(mut self, force: bool) -> Self {
        self.force_base64 = force;
        self
    }
}

/// Options for [`FileSender::upload_file`].
#[derive(Clone)]
pub struct UploadOptions {
    pub url: String,
    /// Field carrying the file. Defaults to `"file"`.
    pub field_name: Option<String>,
    pub extra_data: MetadataBag,
    pub on_progress: Option<ProgressCallback>,
    pub cancellation: Option<CancellationToken>,
    /// Explicit headers, merged under the ambient ones.
    pub headers: HeaderMap,
}

impl UploadOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            field_name: None,
            extra_data: MetadataBag::new(),
            on_progress: None,
            cancellation: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    pub fn extra_data(mut self, data: MetadataBag) -> Self {
        self.extra_data = data;
        self
    }

    pub fn on_progress(mut self, cb: ProgressCallback) -> Self {
        self.on_progress = Some(cb);
        self
    }

    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }
}

/// Sends files to a remote API.
///
/// Cheap to clone. Concurrent transfers share the HTTP connection pool and
/// nothing else.
#[derive(Clone)]
pub struct FileSender {
    pub(crate) http: reqwest::Client,
    credentials: CredentialResolver,
    base_url: Arc<dyn BaseUrlProvider>,
}

impl FileSender {
    pub fn new(
        http: reqwest::Client,
        credentials: CredentialResolver,
        base_url: Arc<dyn BaseUrlProvider>,
    ) -> Self {
        Self {
            http,
            credentials,
            base_url,
        }
    }

    /// Builds a sender from configuration: HTTP client with the configured
    /// timeout, ambient headers, and the stored credential fallback.
    pub fn from_config(config: &ClientConfig) -> Result<Self, UploadError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(UploadError::from_reqwest)?;

        let provider = ConfiguredCredentials::from_config(config)?;
        let credentials =
            CredentialResolver::new(Arc::new(provider), config.credential_keys.clone());

        Ok(Self::new(http, credentials, Arc::new(config.clone())))
    }

    /// Final request URL for `endpoint`.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        resolve_url(endpoint, &self.base_url.base_url())
    }

    /// Header set for a request with the given explicit headers.
    pub fn resolve_headers(&self, explicit: &HeaderMap) -> HeaderMap {
        self.credentials.resolve_headers(explicit)
    }

    /// Sends `file` with the strategy its type calls for.
    ///
    /// Audio goes multipart to `endpoints.audio`, documents multipart to
    /// `endpoints.doc`, images as base64 JSON to `endpoints.doc`. Every
    /// failure is returned in the result.
    pub async fn send_file(&self, file: &FileDescriptor, opts: SendOptions) -> TransferResult {
        let strategy = classify(file, opts.force_base64);
        debug!(file = %file.name, strategy = %strategy, "classified file");

        let SendOptions {
            endpoints,
            meta,
            on_progress,
            cancellation,
            ..
        } = opts;
        let field = strategy.default_field();

        let result = match strategy {
            Strategy::Audio => {
                self.send_multipart(
                    file,
                    &endpoints.audio,
                    &meta,
                    field,
                    on_progress,
                    cancellation.as_ref(),
                )
                .await
            }
            Strategy::Document => {
                self.send_multipart(
                    file,
                    &endpoints.doc,
                    &meta,
                    field,
                    on_progress,
                    cancellation.as_ref(),
                )
                .await
            }
            Strategy::Image => {
                self.send_base64_json(file, &endpoints.doc, &meta, field, cancellation.as_ref())
                    .await
            }
        };

        match &result.error {
            None => info!(
                file = %file.name,
                strategy = %strategy,
                status = result.http_status,
                file_ref = result.file_ref.as_deref(),
                "file sent"
            ),
            Some(e) if e.kind == ErrorKind::Aborted => {
                debug!(file = %file.name, strategy = %strategy, "transfer aborted")
            }
            Some(e) => warn!(
                file = %file.name,
                strategy = %strategy,
                kind = ?e.kind,
                status = e.status,
                error = %e.message,
                "file transfer failed"
            ),
        }

        result
    }
}
