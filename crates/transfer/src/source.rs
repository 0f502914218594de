//! Where file bytes come from.
//!
//! A [`ByteSource`] can be streamed (multipart uploads) or read in full
//! (base64 uploads). Each transfer opens it at most once.

use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use futures_util::Stream;
use tokio_util::io::ReaderStream;

use crate::DEFAULT_CHUNK_SIZE;

/// Stream of content chunks.
pub type ByteStream = Pin<Box<dyn Stream<Item = io::Result<Bytes>> + Send + Sync>>;

/// Boxed future returned by [`ByteSource`] methods.
pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = io::Result<T>> + Send + 'a>>;

/// Readable file content.
pub trait ByteSource: Send + Sync + fmt::Debug {
    /// Opens the content as a stream of chunks.
    fn stream(&self) -> SourceFuture<'_, ByteStream>;

    /// Reads the whole content into memory.
    fn read_all(&self) -> SourceFuture<'_, Vec<u8>>;

    /// Reads the whole content base64-encoded.
    ///
    /// Implementations may return a `data:<mime>;base64,` URL; callers strip
    /// the prefix with [`strip_data_url_prefix`].
    fn read_base64(&self) -> SourceFuture<'_, String> {
        Box::pin(async move {
            let data = self.read_all().await?;
            Ok(STANDARD.encode(data))
        })
    }
}

/// A file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ByteSource for FileSource {
    fn stream(&self) -> SourceFuture<'_, ByteStream> {
        Box::pin(async move {
            let file = tokio::fs::File::open(&self.path).await?;
            let stream: ByteStream = Box::pin(ReaderStream::with_capacity(file, DEFAULT_CHUNK_SIZE));
            Ok(stream)
        })
    }

    fn read_all(&self) -> SourceFuture<'_, Vec<u8>> {
        Box::pin(async move { tokio::fs::read(&self.path).await })
    }
}

/// Content already held in memory.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Bytes,
    chunk_size: usize,
}

impl MemorySource {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Sets the size of streamed chunks. Zero is treated as one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn stream(&self) -> SourceFuture<'_, ByteStream> {
        let len = self.data.len();
        let chunks: Vec<io::Result<Bytes>> = (0..len)
            .step_by(self.chunk_size)
            .map(|start| Ok(self.data.slice(start..(start + self.chunk_size).min(len))))
            .collect();
        Box::pin(async move {
            let stream: ByteStream = Box::pin(futures_util::stream::iter(chunks));
            Ok(stream)
        })
    }

    fn read_all(&self) -> SourceFuture<'_, Vec<u8>> {
        let data = self.data.to_vec();
        Box::pin(async move { Ok(data) })
    }
}

/// Content held as a `data:<mime>;base64,<payload>` URL, e.g. a captured
/// canvas or camera frame.
#[derive(Debug, Clone)]
pub struct DataUrlSource {
    url: String,
}

impl DataUrlSource {
    /// Wraps a data URL. Fails unless it is base64-encoded.
    pub fn new(url: impl Into<String>) -> io::Result<Self> {
        let url = url.into();
        if !url.starts_with("data:") || strip_data_url_prefix(&url).len() == url.len() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "not a base64 data URL",
            ));
        }
        Ok(Self { url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// MIME type declared by the URL, if any.
    pub fn mime_type(&self) -> Option<&str> {
        let header = self.url.strip_prefix("data:")?.split(',').next()?;
        let mime = header.split(';').next()?;
        (!mime.is_empty()).then_some(mime)
    }

    fn decode(&self) -> io::Result<Vec<u8>> {
        STANDARD
            .decode(strip_data_url_prefix(&self.url))
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl ByteSource for DataUrlSource {
    fn stream(&self) -> SourceFuture<'_, ByteStream> {
        Box::pin(async move {
            let data = Bytes::from(self.decode()?);
            let stream: ByteStream = Box::pin(futures_util::stream::iter([Ok::<_, io::Error>(data)]));
            Ok(stream)
        })
    }

    fn read_all(&self) -> SourceFuture<'_, Vec<u8>> {
        Box::pin(async move { self.decode() })
    }

    fn read_base64(&self) -> SourceFuture<'_, String> {
        let url = self.url.clone();
        Box::pin(async move { Ok(url) })
    }
}

/// Drops a leading `data:<mime>;base64,` from an encoded payload.
pub fn strip_data_url_prefix(encoded: &str) -> &str {
    if !encoded.starts_with("data:") {
        return encoded;
    }
    match encoded.find(";base64,") {
        Some(pos) => &encoded[pos + ";base64,".len()..],
        None => encoded,
    }
}
