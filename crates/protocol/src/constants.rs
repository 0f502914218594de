//! Field names used on the wire.

/// Multipart field carrying an audio recording when the caller names none.
pub const AUDIO_FIELD: &str = "recorded_call";

/// Multipart field carrying a document when the caller names none.
pub const DOCUMENT_FIELD: &str = "letter_document";

/// JSON field carrying a base64-encoded image when the caller names none.
pub const BASE64_FIELD: &str = "file";

/// Default field for the generic `upload_file` primitive.
pub const DEFAULT_UPLOAD_FIELD: &str = "file";

/// Server-assigned identifier, preferred over every other reference field.
pub const FILE_IDENTIFIER_KEY: &str = "file_identifier";
