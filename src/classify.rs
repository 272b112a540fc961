//! Format classification and the candidate interpreters used for routing.
//!
//! The declared file name is only a hint: uploads often arrive under a
//! packaging-convention suffix, so every [`Interpreter`] can also recognise
//! its own framing from the bytes. The ingestion pipeline walks an ordered
//! list of interpreters instead of branching on format tags.

use crate::archive::{ArchiveDecoder, ArchiveKind};
use crate::error::{IngestError, Result};
use crate::select::select_manifest;
use serde::Deserialize;
use std::fmt;

/// Suffixes routed straight to the literal manifest path.
const MANIFEST_SUFFIXES: [&str; 3] = [".yaml", ".yml", ".json"];

/// Suffixes routed to the tarball decoder.
const TARBALL_SUFFIXES: [&str; 2] = [".tar.gz", ".tgz"];

/// Suffixes routed to the zip decoder.
const ZIP_SUFFIXES: [&str; 1] = [".zip"];

/// The format implied by an upload's declared file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclaredFormat {
    /// A raw YAML or JSON manifest.
    YamlJson,
    /// A gzip-compressed tarball.
    TarGz,
    /// A zip archive.
    Zip,
    /// A generic, custom or missing suffix.
    Unknown,
}

/// Classify `file_name` by its suffix, case-sensitively.
///
/// ```
/// use pipeline_ingest::classify::{DeclaredFormat, classify};
///
/// assert_eq!(classify("pipeline.yaml"), DeclaredFormat::YamlJson);
/// assert_eq!(classify("bundle.tgz"), DeclaredFormat::TarGz);
/// assert_eq!(classify("bundle.ai-hub-package"), DeclaredFormat::Unknown);
/// ```
#[must_use]
pub fn classify(file_name: &str) -> DeclaredFormat {
    let has_suffix = |suffixes: &[&str]| suffixes.iter().any(|s| file_name.ends_with(s));
    if has_suffix(&MANIFEST_SUFFIXES) {
        DeclaredFormat::YamlJson
    } else if has_suffix(&ZIP_SUFFIXES) {
        DeclaredFormat::Zip
    } else if has_suffix(&TARBALL_SUFFIXES) {
        DeclaredFormat::TarGz
    } else {
        DeclaredFormat::Unknown
    }
}

/// Return the recognised suffix of `file_name`, if any.
pub(crate) fn known_suffix(file_name: &str) -> Option<&'static str> {
    MANIFEST_SUFFIXES
        .iter()
        .chain(TARBALL_SUFFIXES.iter())
        .chain(ZIP_SUFFIXES.iter())
        .find(|suffix| file_name.ends_with(*suffix))
        .copied()
}

/// How the canonical manifest was obtained from the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestSource {
    /// The upload itself was the manifest.
    Literal,
    /// The manifest was selected from an archive.
    Archive(ArchiveKind),
}

impl fmt::Display for ManifestSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal manifest"),
            Self::Archive(kind) => write!(f, "{kind}"),
        }
    }
}

/// An interpreter that can be shared across concurrent ingestions.
pub type BoxedInterpreter = Box<dyn Interpreter + Send + Sync>;

/// One candidate way of turning upload bytes into a manifest.
#[cfg_attr(test, mockall::automock)]
pub trait Interpreter {
    /// Describe what this interpreter produces.
    fn source(&self) -> ManifestSource;

    /// Return true when a declared file name of this format belongs to us.
    fn claims(&self, declared: DeclaredFormat) -> bool;

    /// Return true when `bytes` structurally look like our format.
    fn recognises(&self, bytes: &[u8]) -> bool;

    /// Produce the canonical manifest from `bytes`.
    ///
    /// # Errors
    ///
    /// Returns the decode or selection error for this format.
    fn interpret(&self, bytes: &[u8]) -> Result<Vec<u8>>;
}

/// Interprets an archive by decoding it and selecting its manifest.
#[derive(Debug, Clone)]
pub struct ArchiveInterpreter<D> {
    decoder: D,
    declared: DeclaredFormat,
}

impl<D: ArchiveDecoder> ArchiveInterpreter<D> {
    /// Route uploads declared as `declared` (and sniffed ones) to `decoder`.
    #[must_use]
    pub const fn new(decoder: D, declared: DeclaredFormat) -> Self {
        Self { decoder, declared }
    }
}

impl<D: ArchiveDecoder> Interpreter for ArchiveInterpreter<D> {
    fn source(&self) -> ManifestSource {
        ManifestSource::Archive(self.decoder.kind())
    }

    fn claims(&self, declared: DeclaredFormat) -> bool {
        declared == self.declared
    }

    fn recognises(&self, bytes: &[u8]) -> bool {
        self.decoder.sniff(bytes)
    }

    fn interpret(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let entries = self.decoder.decode(bytes)?;
        select_manifest(entries, self.decoder.kind())
    }
}

/// Treats the upload itself as the manifest.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralInterpreter;

impl Interpreter for LiteralInterpreter {
    fn source(&self) -> ManifestSource {
        ManifestSource::Literal
    }

    fn claims(&self, declared: DeclaredFormat) -> bool {
        declared == DeclaredFormat::YamlJson
    }

    fn recognises(&self, bytes: &[u8]) -> bool {
        looks_like_manifest(bytes)
    }

    fn interpret(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        if bytes.is_empty() {
            return Err(IngestError::EmptyManifest {
                name: "upload".to_owned(),
            });
        }
        Ok(bytes.to_vec())
    }
}

/// Return true when `bytes` are UTF-8 YAML (or JSON) whose documents are all
/// mappings or sequences.
///
/// Bare scalars are rejected: nearly any text parses as a YAML string.
fn looks_like_manifest(bytes: &[u8]) -> bool {
    if std::str::from_utf8(bytes).is_err() {
        return false;
    }

    let mut documents = 0_usize;
    for document in serde_yaml::Deserializer::from_slice(bytes) {
        match serde_yaml::Value::deserialize(document) {
            Ok(serde_yaml::Value::Mapping(_) | serde_yaml::Value::Sequence(_)) => documents += 1,
            Ok(serde_yaml::Value::Null) => {}
            Ok(_) | Err(_) => return false,
        }
    }
    documents > 0
}
