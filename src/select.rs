//! Manifest selection from decoded archive entries.
//!
//! A single-file archive is trusted whatever the file is called. Once an
//! archive bundles several files, only an entry whose base name is exactly
//! [`PIPELINE_MANIFEST_NAME`] is accepted, at any depth.

use crate::archive::{ArchiveEntry, ArchiveKind};
use crate::error::{IngestError, Result};
use log::{debug, warn};

/// The entry name that marks the authoritative manifest in a bundle.
pub const PIPELINE_MANIFEST_NAME: &str = "pipeline.yaml";

/// Pick the canonical manifest from `entries`.
///
/// When several entries are named `pipeline.yaml`, the first in archive
/// order wins.
///
/// # Examples
///
/// ```
/// use pipeline_ingest::archive::{ArchiveEntry, ArchiveKind};
/// use pipeline_ingest::select::select_manifest;
///
/// let entries = vec![
///     ArchiveEntry::new("component.yaml", "component"),
///     ArchiveEntry::new("bundle/pipeline.yaml", "pipeline"),
/// ];
/// let manifest = select_manifest(entries, ArchiveKind::Zip).expect("selected");
/// assert_eq!(manifest, b"pipeline");
/// ```
///
/// # Errors
///
/// Returns [`IngestError::EmptyArchive`] for no entries,
/// [`IngestError::MissingPipelineYaml`] when a multi-entry archive lacks a
/// `pipeline.yaml`, and [`IngestError::EmptyManifest`] when the chosen entry
/// has no content.
pub fn select_manifest(entries: Vec<ArchiveEntry>, kind: ArchiveKind) -> Result<Vec<u8>> {
    let selected = match entries.len() {
        0 => return Err(IngestError::EmptyArchive { kind }),
        1 => entries.into_iter().next(),
        count => pick_pipeline_yaml(entries, count),
    }
    .ok_or(IngestError::MissingPipelineYaml { kind })?;

    debug!("selected {} from {kind}", selected.name());
    if selected.content().is_empty() {
        return Err(IngestError::EmptyManifest {
            name: selected.name().to_owned(),
        });
    }
    Ok(selected.into_content())
}

fn pick_pipeline_yaml(entries: Vec<ArchiveEntry>, count: usize) -> Option<ArchiveEntry> {
    let mut matches = entries
        .into_iter()
        .filter(|entry| entry.base_name() == PIPELINE_MANIFEST_NAME);
    let first = matches.next()?;

    let duplicates = matches.count();
    if duplicates > 0 {
        warn!(
            "{duplicates} further {PIPELINE_MANIFEST_NAME} entries among {count} files ignored; using {}",
            first.name()
        );
    }
    Some(first)
}
