//! Size-bounded reading of untrusted uploads.
//!
//! The reader never buffers more than one byte past the limit, whatever the
//! source claims about its own length.

use crate::error::{IngestError, Result};
use log::trace;
use std::io::Read;

/// Read `source` to the end, failing once more than `max_bytes` are seen.
///
/// At most `max_bytes + 1` bytes are pulled from `source`; the extra byte is
/// only there to detect overflow.
///
/// # Examples
///
/// ```
/// use pipeline_ingest::reader::read_bounded;
///
/// let bytes = read_bounded("12345".as_bytes(), 5).expect("within limit");
/// assert_eq!(bytes, b"12345");
/// assert!(read_bounded("12345".as_bytes(), 4).is_err());
/// ```
///
/// # Errors
///
/// Returns [`IngestError::TooLarge`] when the source holds more than
/// `max_bytes` bytes, or [`IngestError::Io`] if reading fails.
pub fn read_bounded<R: Read>(source: R, max_bytes: u64) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    source
        .take(max_bytes.saturating_add(1))
        .read_to_end(&mut buffer)?;

    let read = u64::try_from(buffer.len()).unwrap_or(u64::MAX);
    trace!("read_bounded: read {read} bytes (limit {max_bytes})");
    if read > max_bytes {
        return Err(IngestError::TooLarge { limit: max_bytes });
    }
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use std::io::Cursor;

    /// A source that never ends, to prove the reader stops on its own.
    struct Endless;

    impl Read for Endless {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            buf.fill(b'x');
            Ok(buf.len())
        }
    }

    struct Failing;

    impl Read for Failing {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn returns_bytes_at_exact_limit() {
        let bytes = read_bounded(Cursor::new(b"12345"), 5).expect("read");
        assert_eq!(bytes, b"12345");
    }

    #[rstest]
    #[case::one_over(4)]
    #[case::far_over(0)]
    fn rejects_bytes_over_limit(#[case] limit: u64) {
        let err = read_bounded(Cursor::new(b"12345"), limit).expect_err("too large");
        assert_eq!(err.kind(), ErrorKind::TooLarge);
        assert!(err.to_string().contains(&limit.to_string()));
    }

    #[test]
    fn empty_source_is_empty_buffer() {
        let bytes = read_bounded(std::io::empty(), 10).expect("read");
        assert!(bytes.is_empty());
    }

    #[test]
    fn stops_on_endless_source() {
        let err = read_bounded(Endless, 1024).expect_err("too large");
        assert!(matches!(err, IngestError::TooLarge { limit: 1024 }));
    }

    #[test]
    fn surfaces_source_failure() {
        let err = read_bounded(Failing, 10).expect_err("io");
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
