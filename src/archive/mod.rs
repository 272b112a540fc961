//! Archive decoding for bundled pipeline uploads.
//!
//! Both decoders turn a fully buffered archive into an ordered list of
//! [`ArchiveEntry`] values, skipping directories. They share the
//! [`ArchiveDecoder`] contract so the ingestion pipeline can treat them
//! uniformly.
//!
//! # Sub-modules
//!
//! - [`tarball`] - gzip-compressed tar decoding.
//! - [`zipfile`] - zip decoding.

pub mod tarball;
pub mod zipfile;

use crate::error::Result;
use std::fmt;

pub use self::tarball::TarballDecoder;
pub use self::zipfile::ZipDecoder;

/// The archive formats understood by the decoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveKind {
    /// A gzip-compressed tar stream.
    Tarball,
    /// A zip archive.
    Zip,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tarball => f.write_str("tarball"),
            Self::Zip => f.write_str("zip"),
        }
    }
}

/// One file decoded from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    name: String,
    content: Vec<u8>,
}

impl ArchiveEntry {
    /// Create an entry from its in-archive path and content.
    #[must_use]
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Return the entry's path inside the archive.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Return the final path component, ignoring any directory prefix.
    ///
    /// ```
    /// use pipeline_ingest::archive::ArchiveEntry;
    ///
    /// let entry = ArchiveEntry::new("bundle/nested/pipeline.yaml", "x");
    /// assert_eq!(entry.base_name(), "pipeline.yaml");
    /// ```
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// Return the entry's content.
    #[must_use]
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    /// Consume the entry and return its content.
    #[must_use]
    pub fn into_content(self) -> Vec<u8> {
        self.content
    }
}

/// Decodes one archive format into its file entries.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveDecoder {
    /// The format this decoder handles.
    fn kind(&self) -> ArchiveKind;

    /// Return true when `bytes` start with this format's framing signature.
    fn sniff(&self, bytes: &[u8]) -> bool;

    /// Decode `bytes` into file entries in archive order.
    ///
    /// # Errors
    ///
    /// Returns the format's corruption error (`InvalidTarball` or
    /// `InvalidZip`) when framing cannot be parsed,
    /// [`crate::error::IngestError::EmptyArchive`] when no files are found,
    /// and [`crate::error::IngestError::TooLarge`] when the expanded content
    /// exceeds the decoder's budget.
    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>>;
}
