//! Error types for pipeline ingestion.
//!
//! Every failure carries a stable [`ErrorKind`] so callers can branch on the
//! cause without parsing messages, and a message naming the offending input
//! (file name, archive kind, or limit).

use crate::archive::ArchiveKind;
use thiserror::Error;

/// Machine-distinguishable category of an [`IngestError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input exceeded its byte budget.
    TooLarge,
    /// Neither the extension nor the content identified a known format.
    UnsupportedFormat,
    /// Gzip or tar framing is corrupt.
    InvalidTarball,
    /// Zip framing is corrupt.
    InvalidZip,
    /// The archive decoded but held no files.
    EmptyArchive,
    /// A multi-file archive has no `pipeline.yaml`.
    MissingPipelineYaml,
    /// The selected manifest has no content.
    EmptyManifest,
    /// A percent-encoded name could not be decoded.
    InvalidFormat,
    /// A derived name exceeded the maximum length.
    NameTooLong,
    /// A derived name is empty or uses disallowed characters.
    InvalidName,
    /// The byte source failed while being read.
    Io,
}

/// Errors that can occur while ingesting a pipeline upload.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upload, or an archive's expanded content, exceeded its budget.
    #[error("file size too large; maximum supported size: {limit} bytes")]
    TooLarge {
        /// The byte limit that was exceeded.
        limit: u64,
    },

    /// The file could not be recognised as YAML, JSON, a tarball or a zip.
    #[error(
        "unexpected pipeline file format for \"{file_name}\"; supported formats are .zip, .tar.gz or YAML/JSON"
    )]
    UnsupportedFormat {
        /// The declared file name of the upload.
        file_name: String,
    },

    /// Gzip or tar framing could not be parsed.
    #[error("not a valid tarball file: {reason}")]
    InvalidTarball {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The zip central directory or an entry could not be parsed.
    #[error("not a valid zip file: {reason}")]
    InvalidZip {
        /// Description of the decoding failure.
        reason: String,
    },

    /// The archive decoded but contained no file entries.
    #[error("the {kind} contains no files")]
    EmptyArchive {
        /// Which archive format was decoded.
        kind: ArchiveKind,
    },

    /// A multi-file archive did not contain a `pipeline.yaml` entry.
    #[error("expecting a pipeline.yaml file inside the {kind}")]
    MissingPipelineYaml {
        /// Which archive format was decoded.
        kind: ArchiveKind,
    },

    /// The selected manifest is zero bytes long.
    #[error("pipeline manifest \"{name}\" is empty")]
    EmptyManifest {
        /// Entry or file name of the empty manifest.
        name: String,
    },

    /// The override name contained a malformed percent-escape.
    #[error("pipeline name \"{value}\" has invalid format: {reason}")]
    InvalidFormat {
        /// The raw override string.
        value: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The derived name is longer than allowed.
    #[error("pipeline name too long; supported maximum length is {limit}")]
    NameTooLong {
        /// Maximum number of characters.
        limit: usize,
    },

    /// The derived name is empty or contains a disallowed character.
    #[error("invalid pipeline name \"{value}\": {reason}")]
    InvalidName {
        /// The rejected name.
        value: String,
        /// Description of the constraint violated.
        reason: String,
    },

    /// Reading the upload failed.
    #[error("failed to read pipeline file: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Return the stable category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TooLarge { .. } => ErrorKind::TooLarge,
            Self::UnsupportedFormat { .. } => ErrorKind::UnsupportedFormat,
            Self::InvalidTarball { .. } => ErrorKind::InvalidTarball,
            Self::InvalidZip { .. } => ErrorKind::InvalidZip,
            Self::EmptyArchive { .. } => ErrorKind::EmptyArchive,
            Self::MissingPipelineYaml { .. } => ErrorKind::MissingPipelineYaml,
            Self::EmptyManifest { .. } => ErrorKind::EmptyManifest,
            Self::InvalidFormat { .. } => ErrorKind::InvalidFormat,
            Self::NameTooLong { .. } => ErrorKind::NameTooLong,
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid_tarball(reason: impl std::fmt::Display) -> Self {
        Self::InvalidTarball {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_zip(reason: impl std::fmt::Display) -> Self {
        Self::InvalidZip {
            reason: reason.to_string(),
        }
    }
}

/// Result type alias using [`IngestError`].
pub type Result<T> = std::result::Result<T, IngestError>;
