//! Top-level ingestion: bounded read, routing, decoding and selection.
//!
//! [`PipelineIngestor`] owns the ordered interpreter list. A declared suffix
//! that an interpreter claims is authoritative; otherwise the interpreters
//! are tried by content in priority order (tarball, zip, literal manifest).

use crate::archive::{TarballDecoder, ZipDecoder};
use crate::classify::{
    ArchiveInterpreter, BoxedInterpreter, DeclaredFormat, Interpreter, LiteralInterpreter,
    ManifestSource, classify,
};
use crate::config::IngestConfig;
use crate::error::{IngestError, Result};
use crate::name::{derive_pipeline_name_with_limit, pipeline_name_from_file_name};
use crate::reader::read_bounded;
use log::debug;
use std::io::Read;

/// An uploaded pipeline source, as received from the transport layer.
#[derive(Debug)]
pub struct PipelineUpload<'a, R> {
    /// The declared file name; may be empty or generic.
    pub file_name: &'a str,
    /// The upload's bytes.
    pub source: R,
    /// Optional caller-supplied name, possibly percent-encoded.
    pub name_override: Option<&'a str>,
}

/// The result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedPipeline {
    /// The validated display name.
    pub name: String,
    /// The canonical manifest bytes.
    pub manifest: Vec<u8>,
    /// Where the manifest came from.
    pub source: ManifestSource,
}

/// Turns uploads into canonical manifests according to an [`IngestConfig`].
pub struct PipelineIngestor {
    config: IngestConfig,
    interpreters: Vec<BoxedInterpreter>,
}

impl PipelineIngestor {
    /// Build an ingestor with the standard interpreters.
    #[must_use]
    pub fn new(config: IngestConfig) -> Self {
        let interpreters: Vec<BoxedInterpreter> = vec![
            Box::new(ArchiveInterpreter::new(
                TarballDecoder::new(config.max_expanded_bytes),
                DeclaredFormat::TarGz,
            )),
            Box::new(ArchiveInterpreter::new(
                ZipDecoder::new(config.max_expanded_bytes),
                DeclaredFormat::Zip,
            )),
            Box::new(LiteralInterpreter),
        ];
        Self::with_interpreters(config, interpreters)
    }

    /// Build an ingestor with a custom, ordered interpreter list.
    #[must_use]
    pub const fn with_interpreters(
        config: IngestConfig,
        interpreters: Vec<BoxedInterpreter>,
    ) -> Self {
        Self {
            config,
            interpreters,
        }
    }

    /// Return the active configuration.
    #[must_use]
    pub const fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Read `source` within the upload budget and extract its manifest.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::TooLarge`] before any decoding when the upload
    /// is over budget, [`IngestError::UnsupportedFormat`] when no
    /// interpreter recognises it, or the chosen interpreter's error.
    pub fn read_manifest<R: Read>(
        &self,
        file_name: &str,
        source: R,
    ) -> Result<(Vec<u8>, ManifestSource)> {
        let bytes = read_bounded(source, self.config.max_upload_bytes)?;
        self.interpret(file_name, &bytes)
    }

    /// Extract the manifest from already buffered `bytes`.
    ///
    /// Candidates are attempted in the order given by [`Self::candidates`];
    /// the first success wins. When every candidate fails, the error from the
    /// first attempt is returned.
    ///
    /// # Errors
    ///
    /// See [`Self::read_manifest`].
    pub fn interpret(&self, file_name: &str, bytes: &[u8]) -> Result<(Vec<u8>, ManifestSource)> {
        let mut first_error = None;
        for interpreter in self.candidates(file_name, bytes) {
            match interpreter.interpret(bytes) {
                Ok(manifest) => return Ok((manifest, interpreter.source())),
                Err(err) => {
                    debug!("{file_name}: {} rejected the upload: {err}", interpreter.source());
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        Err(first_error.unwrap_or_else(|| IngestError::UnsupportedFormat {
            file_name: file_name.to_owned(),
        }))
    }

    /// Ingest an upload: extract its manifest and derive its name.
    ///
    /// The name comes from `name_override` when set and non-empty, and from
    /// the file name with its format suffix removed otherwise.
    ///
    /// # Errors
    ///
    /// Returns any manifest error from [`Self::read_manifest`] or naming
    /// error from [`crate::name::derive_pipeline_name_with_limit`].
    pub fn ingest<R: Read>(&self, upload: PipelineUpload<'_, R>) -> Result<IngestedPipeline> {
        let (manifest, source) = self.read_manifest(upload.file_name, upload.source)?;
        let name = derive_pipeline_name_with_limit(
            upload.name_override.unwrap_or(""),
            pipeline_name_from_file_name(upload.file_name),
            self.config.max_name_length,
        )?;
        debug!("ingested pipeline {name:?} from {source}");
        Ok(IngestedPipeline {
            name,
            manifest,
            source,
        })
    }

    /// Order the interpreters worth attempting for `bytes`.
    ///
    /// The interpreter claiming the declared suffix goes first when it also
    /// recognises the content, or when nothing else does. Otherwise it yields
    /// to the interpreters that recognise the content and is attempted last.
    fn candidates(&self, file_name: &str, bytes: &[u8]) -> Vec<&dyn Interpreter> {
        let declared = classify(file_name);
        let mut claimant: Option<&dyn Interpreter> = None;
        let mut recognised: Vec<&dyn Interpreter> = Vec::new();
        for boxed in &self.interpreters {
            if claimant.is_none() && boxed.claims(declared) {
                claimant = Some(&**boxed);
            } else if boxed.recognises(bytes) {
                recognised.push(&**boxed);
            }
        }

        match claimant {
            Some(interpreter) if recognised.is_empty() || interpreter.recognises(bytes) => {
                debug!("{file_name}: declared {declared:?}, trying {} first", interpreter.source());
                recognised.insert(0, interpreter);
            }
            Some(interpreter) => {
                debug!(
                    "{file_name}: content does not match declared {declared:?}, trying {} last",
                    interpreter.source()
                );
                recognised.push(interpreter);
            }
            None => debug!("{file_name}: {} interpreter(s) recognise the content", recognised.len()),
        }
        recognised
    }
}

impl Default for PipelineIngestor {
    fn default() -> Self {
        Self::new(IngestConfig::default())
    }
}

/// Extract the canonical manifest from an upload of at most `max_bytes`.
///
/// # Examples
///
/// ```
/// use pipeline_ingest::ingest::read_pipeline_file;
///
/// let manifest = read_pipeline_file("hello.yaml", "name: hello\n".as_bytes(), 1024)
///     .expect("manifest");
/// assert_eq!(manifest, b"name: hello\n");
/// ```
///
/// # Errors
///
/// See [`PipelineIngestor::read_manifest`].
pub fn read_pipeline_file<R: Read>(file_name: &str, source: R, max_bytes: u64) -> Result<Vec<u8>> {
    let config = IngestConfig {
        max_upload_bytes: max_bytes,
        ..IngestConfig::default()
    };
    PipelineIngestor::new(config)
        .read_manifest(file_name, source)
        .map(|(manifest, _)| manifest)
}
