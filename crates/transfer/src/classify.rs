use std::fmt;

use filesend_protocol::constants::{AUDIO_FIELD, BASE64_FIELD, DOCUMENT_FIELD};

use crate::descriptor::{FileDescriptor, extension_of};

/// Extensions treated as audio regardless of MIME type.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "ogg", "oga", "opus", "m4a", "aac", "flac", "wma", "weba", "amr",
];

/// Extensions treated as images regardless of MIME type.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "heic", "heif", "svg",
];

/// How a file travels to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Multipart upload to the audio endpoint.
    Audio,
    /// Multipart upload to the document endpoint.
    Document,
    /// Base64 JSON upload to the document endpoint.
    Image,
}

impl Strategy {
    /// Field that carries the file when the caller names none.
    pub fn default_field(self) -> &'static str {
        match self {
            Strategy::Audio => AUDIO_FIELD,
            Strategy::Document => DOCUMENT_FIELD,
            Strategy::Image => BASE64_FIELD,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Audio => "audio",
            Strategy::Document => "document",
            Strategy::Image => "image",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the transfer strategy for a file.
///
/// Audio wins over everything unless `force_base64` is set, in which case
/// the audio check is skipped and only the image/document split applies.
pub fn classify(file: &FileDescriptor, force_base64: bool) -> Strategy {
    classify_parts(&file.name, &file.mime_type, force_base64)
}

fn classify_parts(name: &str, mime_type: &str, force_base64: bool) -> Strategy {
    let ext = extension_of(name).unwrap_or_default();
    let mime = mime_type.trim().to_lowercase();

    if !force_base64 && (mime.starts_with("audio/") || AUDIO_EXTENSIONS.contains(&ext.as_str())) {
        return Strategy::Audio;
    }

    if mime.starts_with("image/") || IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        return Strategy::Image;
    }

    Strategy::Document
}
