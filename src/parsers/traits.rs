//! Chunk source abstraction and extractor error types.
//!
//! A [`ChunkSource`] supplies raw bytes in caller-controlled chunks; the
//! streaming extractor never assumes chunk boundaries align with JSON
//! token or object boundaries.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Default read size for file-backed sources (64KB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Errors that can occur while pulling chunks or locating the target array.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// The named array key was never found before the source was exhausted.
    #[error("could not find a \"{key}\" array in {source_name}")]
    MissingArray { key: String, source_name: String },

    /// The underlying byte source failed while being read.
    #[error("IO error reading {source_name}: {message}")]
    Io { source_name: String, message: String },
}

/// An incremental source of byte chunks, owned by the caller and consumed
/// exactly once by the extractor.
pub trait ChunkSource {
    /// Pull the next chunk, or `None` once the source is exhausted.
    ///
    /// The returned slice is only valid until the next call. Chunk
    /// boundaries are arbitrary and carry no structural meaning.
    fn next_chunk(&mut self) -> Result<Option<&[u8]>, ExtractError>;

    /// Label used in progress and error messages.
    fn name(&self) -> &str;
}

/// File-backed chunk source reading fixed-size chunks.
#[derive(Debug)]
pub struct FileChunkSource {
    file: File,
    buf: Vec<u8>,
    name: String,
}

impl FileChunkSource {
    /// Open a file with the default chunk size.
    pub fn open(path: &Path) -> Result<Self, ExtractError> {
        Self::with_chunk_size(path, DEFAULT_CHUNK_SIZE)
    }

    /// Open a file with an explicit chunk size (clamped to at least 1KB).
    pub fn with_chunk_size(path: &Path, chunk_size: usize) -> Result<Self, ExtractError> {
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let file = File::open(path).map_err(|e| ExtractError::Io {
            source_name: name.clone(),
            message: e.to_string(),
        })?;
        Ok(Self {
            file,
            buf: vec![0; chunk_size.max(1024)],
            name,
        })
    }
}

impl ChunkSource for FileChunkSource {
    fn next_chunk(&mut self) -> Result<Option<&[u8]>, ExtractError> {
        loop {
            match self.file.read(&mut self.buf) {
                Ok(0) => return Ok(None),
                Ok(n) => return Ok(Some(&self.buf[..n])),
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(ExtractError::Io {
                        source_name: self.name.clone(),
                        message: e.to_string(),
                    })
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// In-memory chunk source with a configurable fragmentation size.
///
/// Used by tests and benches to exercise arbitrary chunk boundaries,
/// including pathological 1-byte fragmentation.
#[derive(Debug, Clone)]
pub struct MemoryChunkSource {
    data: Vec<u8>,
    pos: usize,
    chunk_size: usize,
    name: String,
}

impl MemoryChunkSource {
    /// Wrap a byte buffer, yielding it in one chunk.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        let data = data.into();
        let chunk_size = data.len().max(1);
        Self {
            data,
            pos: 0,
            chunk_size,
            name: "<memory>".to_string(),
        }
    }

    /// Set the chunk size used to fragment the buffer (minimum 1).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Set the label used in progress and error messages.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

impl ChunkSource for MemoryChunkSource {
    fn next_chunk(&mut self) -> Result<Option<&[u8]>, ExtractError> {
        if self.pos >= self.data.len() {
            return Ok(None);
        }
        let end = self.pos.saturating_add(self.chunk_size).min(self.data.len());
        let chunk = &self.data[self.pos..end];
        self.pos = end;
        Ok(Some(chunk))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
