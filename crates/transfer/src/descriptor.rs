use std::io;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;

use crate::source::{ByteSource, DataUrlSource, FileSource, MemorySource};

const OCTET_STREAM: &str = "application/octet-stream";

/// A file selected for transfer.
///
/// Cloning is cheap; the content is shared, not copied.
#[derive(Debug, Clone)]
pub struct FileDescriptor {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub content: Arc<dyn ByteSource>,
}

impl FileDescriptor {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        content: Arc<dyn ByteSource>,
    ) -> Self {
        Self {
            name: name.into(),
            size_bytes,
            mime_type: mime_type.into(),
            content,
        }
    }

    /// In-memory file.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        let source = MemorySource::new(data);
        let size = source.len() as u64;
        Self::new(name, mime_type, size, Arc::new(source))
    }

    /// File on disk. Size comes from metadata, MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = detect_content_type(&name).unwrap_or(OCTET_STREAM);

        Ok(Self::new(
            name,
            mime_type,
            meta.len(),
            Arc::new(FileSource::new(path)),
        ))
    }

    /// File held as a base64 `data:` URL. MIME type comes from the URL,
    /// falling back to the name's extension.
    pub fn from_data_url(name: impl Into<String>, url: impl Into<String>) -> io::Result<Self> {
        let name = name.into();
        let source = DataUrlSource::new(url)?;
        let mime_type = source
            .mime_type()
            .or_else(|| detect_content_type(&name))
            .unwrap_or(OCTET_STREAM)
            .to_string();
        let size = base64_decoded_len(crate::strip_data_url_prefix(source.url()));
        Ok(Self::new(name, mime_type, size, Arc::new(source)))
    }

    /// Lowercase extension of the file name, without the dot.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }
}

/// Length of the data a padded base64 payload decodes to.
fn base64_decoded_len(encoded: &str) -> u64 {
    let trimmed = encoded.trim_end();
    let padding = trimmed.bytes().rev().take_while(|b| *b == b'=').count();
    ((trimmed.len() / 4) * 3).saturating_sub(padding) as u64
}

/// Text after the last `.` of the name. Dot-files like `.mp3` count.
pub(crate) fn extension_of(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .map(str::to_lowercase)
}

/// Detects MIME content type from a file name extension.
pub fn detect_content_type(name: &str) -> Option<&'static str> {
    match extension_of(name).as_deref() {
        Some("png") => Some("image/png"),
        Some("jpg" | "jpeg") => Some("image/jpeg"),
        Some("webp") => Some("image/webp"),
        Some("gif") => Some("image/gif"),
        Some("bmp") => Some("image/bmp"),
        Some("tif" | "tiff") => Some("image/tiff"),
        Some("heic") => Some("image/heic"),
        Some("svg") => Some("image/svg+xml"),
        Some("mp3") => Some("audio/mpeg"),
        Some("wav") => Some("audio/wav"),
        Some("ogg" | "oga" | "opus") => Some("audio/ogg"),
        Some("m4a") => Some("audio/mp4"),
        Some("aac") => Some("audio/aac"),
        Some("flac") => Some("audio/flac"),
        Some("weba") => Some("audio/webm"),
        Some("amr") => Some("audio/amr"),
        Some("pdf") => Some("application/pdf"),
        Some("doc") => Some("application/msword"),
        Some("docx") => {
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        Some("txt") => Some("text/plain"),
        Some("rtf") => Some("application/rtf"),
        Some("odt") => Some("application/vnd.oasis.opendocument.text"),
        _ => None,
    }
}
