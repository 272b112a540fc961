//! Zip archive decoding.

use super::{ArchiveDecoder, ArchiveEntry, ArchiveKind};
use crate::error::{IngestError, Result};
use log::trace;
use std::io::{Cursor, Read};

/// Local file header signature, found at the start of a non-empty archive.
const LOCAL_HEADER_MAGIC: &[u8] = b"PK\x03\x04";

/// End-of-central-directory signature, found at the start of an empty archive.
const EMPTY_ARCHIVE_MAGIC: &[u8] = b"PK\x05\x06";

/// Decoder for `.zip` uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipDecoder {
    max_expanded_bytes: u64,
}

impl ZipDecoder {
    /// Create a decoder that refuses to inflate more than `max_expanded_bytes`
    /// across all entries.
    #[must_use]
    pub const fn new(max_expanded_bytes: u64) -> Self {
        Self { max_expanded_bytes }
    }
}

impl ArchiveDecoder for ZipDecoder {
    fn kind(&self) -> ArchiveKind {
        ArchiveKind::Zip
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        bytes.starts_with(LOCAL_HEADER_MAGIC) || bytes.starts_with(EMPTY_ARCHIVE_MAGIC)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<ArchiveEntry>> {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes)).map_err(IngestError::invalid_zip)?;
        let mut entries = Vec::new();
        let mut remaining = self.max_expanded_bytes;

        for index in 0..archive.len() {
            let mut file = archive.by_index(index).map_err(IngestError::invalid_zip)?;
            if file.is_dir() {
                continue;
            }

            let name = file.name().to_owned();
            let mut content = Vec::new();
            file.by_ref()
                .take(remaining.saturating_add(1))
                .read_to_end(&mut content)
                .map_err(IngestError::invalid_zip)?;

            let read = u64::try_from(content.len()).unwrap_or(u64::MAX);
            if read > remaining {
                return Err(IngestError::TooLarge {
                    limit: self.max_expanded_bytes,
                });
            }
            remaining -= read;

            trace!("zip entry {name}: {read} bytes");
            entries.push(ArchiveEntry::new(name, content));
        }

        if entries.is_empty() {
            return Err(IngestError::EmptyArchive {
                kind: ArchiveKind::Zip,
            });
        }
        Ok(entries)
    }
}
