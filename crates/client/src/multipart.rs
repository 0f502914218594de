//! Streamed `multipart/form-data` transport for audio and documents.

use filesend_protocol::{MetadataBag, TransferResult};
use filesend_transfer::{
    FileDescriptor, ProgressCallback, ProgressReporter, form_fields, resolve_field_name,
    track_progress,
};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Body;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::UploadError;
use crate::response::{read_response, with_cancellation};
use crate::sender::{FileSender, UploadOptions};

const FALLBACK_MIME: &str = "application/octet-stream";

impl FileSender {
    /// Uploads `file` as multipart form data and returns the parsed body.
    ///
    /// The file goes in `opts.field_name` (default `"file"`); every
    /// non-null entry of `opts.extra_data` becomes a text field.
    pub async fn upload_file(
        &self,
        file: &FileDescriptor,
        opts: UploadOptions,
    ) -> Result<Value, UploadError> {
        let field = opts
            .field_name
            .unwrap_or_else(|| filesend_protocol::constants::DEFAULT_UPLOAD_FIELD.to_string());

        let (_, body) = self
            .post_multipart(
                file,
                &opts.url,
                &field,
                &opts.extra_data,
                &opts.headers,
                opts.on_progress,
                opts.cancellation.as_ref(),
            )
            .await?;
        Ok(body)
    }

    /// Multipart transport used by the coordinator.
    ///
    /// The field is the metadata key aliasing the file, or
    /// `field_name_hint` when there is none.
    pub async fn send_multipart(
        &self,
        file: &FileDescriptor,
        endpoint: &str,
        meta: &MetadataBag,
        field_name_hint: &str,
        on_progress: Option<ProgressCallback>,
        cancellation: Option<&CancellationToken>,
    ) -> TransferResult {
        let field = resolve_field_name(meta, field_name_hint);
        match self
            .post_multipart(
                file,
                endpoint,
                &field,
                meta,
                &HeaderMap::new(),
                on_progress,
                cancellation,
            )
            .await
        {
            Ok((status, body)) => TransferResult::success(status, body),
            Err(e) => TransferResult::failure(e.into()),
        }
    }

    #[allow(clippy::too_many_arguments)]
    async fn post_multipart(
        &self,
        file: &FileDescriptor,
        endpoint: &str,
        field: &str,
        meta: &MetadataBag,
        explicit_headers: &HeaderMap,
        on_progress: Option<ProgressCallback>,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(u16, Value), UploadError> {
        if cancellation.is_some_and(CancellationToken::is_cancelled) {
            return Err(UploadError::Aborted);
        }

        let url = self.resolve_url(endpoint);

        // The form sets its own boundary.
        let mut headers = self.resolve_headers(explicit_headers);
        headers.remove(CONTENT_TYPE);
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        }

        let mut stream = file.content.stream().await?;
        if let Some(cb) = on_progress {
            stream = track_progress(stream, ProgressReporter::new(cb, file.size_bytes));
        }

        let mime = if file.mime_type.trim().is_empty() {
            FALLBACK_MIME
        } else {
            file.mime_type.as_str()
        };
        let part = Part::stream_with_length(Body::wrap_stream(stream), file.size_bytes)
            .file_name(file.name.clone())
            .mime_str(mime)
            .map_err(UploadError::from_reqwest)?;

        let mut form = Form::new();
        let fields = form_fields(meta, field);
        let extra_count = fields.len();
        for (name, value) in fields {
            form = form.text(name, value);
        }
        form = form.part(field.to_string(), part);

        debug!(
            url = %url,
            field = %field,
            file = %file.name,
            size = file.size_bytes,
            extra_fields = extra_count,
            "sending multipart upload"
        );

        let request = self.http.post(&url).headers(headers).multipart(form);
        with_cancellation(cancellation, async move {
            let resp = request.send().await.map_err(UploadError::from_reqwest)?;
            read_response(resp).await
        })
        .await?
    }
}
