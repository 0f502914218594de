//! Buffered base64 JSON transport for images.

use filesend_protocol::{Base64FilePart, MetadataBag, TransferResult};
use filesend_transfer::{FileDescriptor, base64_payload, resolve_field_name, strip_data_url_prefix};
use reqwest::header::HeaderMap;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::UploadError;
use crate::response::{read_response, with_cancellation};
use crate::sender::FileSender;

impl FileSender {
    /// Reads `file` fully, embeds it base64-encoded in a JSON copy of
    /// `meta` and POSTs it. No progress is reported.
    pub async fn send_base64_json(
        &self,
        file: &FileDescriptor,
        endpoint: &str,
        meta: &MetadataBag,
        field_name_hint: &str,
        cancellation: Option<&CancellationToken>,
    ) -> TransferResult {
        match self
            .post_base64_json(file, endpoint, meta, field_name_hint, cancellation)
            .await
        {
            Ok((status, body)) => TransferResult::success(status, body),
            Err(e) => TransferResult::failure(e.into()),
        }
    }

    async fn post_base64_json(
        &self,
        file: &FileDescriptor,
        endpoint: &str,
        meta: &MetadataBag,
        field_name_hint: &str,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(u16, Value), UploadError> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(UploadError::Aborted);
        }

        let encoded = with_cancellation(cancellation, file.content.read_base64()).await??;
        let part = Base64FilePart {
            filename: file.name.clone(),
            content_base64: strip_data_url_prefix(&encoded).to_string(),
            content_type: file.mime_type.clone(),
        };

        let field = resolve_field_name(meta, field_name_hint);
        let payload = base64_payload(meta, &field, part)?;

        let url = self.resolve_url(endpoint);
        debug!(url = %url, field = %field, file = %file.name, "sending base64 upload");

        let request = self
            .http
            .post(&url)
            .headers(self.resolve_headers(&HeaderMap::new()))
            .json(&payload);
        with_cancellation(cancellation, async move {
            let resp = request.send().await.map_err(UploadError::from_reqwest)?;
            read_response(resp).await
        })
        .await?
    }
}
