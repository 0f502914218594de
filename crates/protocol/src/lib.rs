//! Wire-level data model shared by every filesend transfer.
//!
//! Holds the caller-facing types (`MetadataBag`, `TransferResult`,
//! `ErrorInfo`), the JSON shape of a base64-encoded file part, and the
//! response normalizer that turns a heterogeneous server reply into a
//! single file reference.

pub mod constants;
pub mod metadata;
pub mod normalize;
pub mod types;

// Re-export primary types for convenience.
pub use metadata::{MetaValue, MetadataBag};
pub use normalize::extract_file_ref;
pub use types::{Base64FilePart, ErrorInfo, ErrorKind, TransferResult};
