//! Gzip-compressed tarball decoding.
//!
//! The gzip layer is inflated into memory first, bounded by the decoder's
//! expansion budget, and the tar stream is then walked entry by entry.
//! Concatenated gzip members are inflated as one stream.

use super::{ArchiveDecoder, ArchiveEntry, ArchiveKind};
use crate::error::{IngestError, Result};
use flate2::read::MultiGzDecoder;
use log::trace;
use std::io::Read;

/// The two-byte gzip member signature.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoder for `.tar.gz` / `.tgz` uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TarballDecoder {
    max_expanded_bytes: u64,
}

impl TarballDecoder {
    /// Create a decoder that refuses to inflate more than `max_expanded_bytes`.
    #[must_use]
    pub const fn new(max_expanded_bytes: u64) -> Self {
        Self { max_expanded_bytes }
    }

    fn inflate(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        let mut inflated = Vec::new();
        MultiGzDecoder::new(bytes)
            .take(self.max_expanded_bytes.saturating_add(1))
            .read_to_end(&mut inflated)
            .map_err(IngestError::invalid_tarball)?;

        if u64::try_from(inflated.len()).unwrap_or(u64::MAX) > self.max_expanded_bytes {
            return Err(IngestError::TooLarge {
                limit: self.max_expanded_bytes,
            });
        }
        Ok(inflated)
    }
}

impl ArchiveDecoder for TarballDecoder {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Tarball
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(&GZIP_MAGIC)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let inflated = self.inflate(bytes)?;
        let mut archive = tar::Archive::new(inflated.as_slice());
        let mut entries = Vec::new();

        for entry_result in archive.entries().map_err(IngestError::invalid_tarball)? {
            let mut entry = entry_result.map_err(IngestError::invalid_tarball)?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let name = entry
                .path()
                .map_err(IngestError::invalid_tarball)?
                .to_string_lossy()
                .into_owned();
            let declared = entry.size();
            let mut content = Vec::new();
            entry
                .read_to_end(&mut content)
                .map_err(IngestError::invalid_tarball)?;

            if u64::try_from(content.len()).unwrap_or(u64::MAX) != declared {
                return Err(IngestError::invalid_tarball(format_args!(
                    "entry {name} is truncated ({} of {declared} bytes)",
                    content.len()
                )));
            }

            trace!("tarball entry {name}: {declared} bytes");
            entries.push(ArchiveEntry::new(name, content));
        }

        if entries.is_empty() {
            return Err(IngestError::EmptyArchive {
                kind: ArchiveKind::Tarball,
            });
        }
        Ok(entries)
    }
}
