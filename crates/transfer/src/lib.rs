//! Local side of a file transfer.
//!
//! Describes the file being sent ([`FileDescriptor`] over a [`ByteSource`]),
//! decides how it travels ([`classify`] into a [`Strategy`]), lays out the
//! request fields around it, and turns byte counts into progress
//! percentages.

mod classify;
mod descriptor;
mod fields;
mod progress;
mod source;

pub use classify::{AUDIO_EXTENSIONS, IMAGE_EXTENSIONS, Strategy, classify};
pub use descriptor::{FileDescriptor, detect_content_type};
pub use fields::{base64_payload, form_fields, resolve_field_name};
pub use progress::{ProgressCallback, ProgressReporter, percent, track_progress};
pub use source::{
    ByteSource, ByteStream, DataUrlSource, FileSource, MemorySource, SourceFuture,
    strip_data_url_prefix,
};

/// Chunk size used when streaming in-memory content: 64 KiB.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;
