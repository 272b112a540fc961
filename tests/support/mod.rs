//! Shared test support for the ingestion suites.
//!
//! Exposes in-memory archive builders and [`kind::StepErrorKind`], which
//! parses error-kind names supplied by behaviour-driven steps.

pub mod kind;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Deterministic manifest content for an entry called `name`.
pub fn manifest_for(name: &str) -> Vec<u8> {
    format!("# {name}\npipelineInfo:\n  name: {name}\nroot:\n  dag: {{}}\n").into_bytes()
}

/// Build a `.tar.gz` whose entries are `names`, each holding
/// [`manifest_for`] its own name.
pub fn tarball_of(names: &[&str]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for name in names {
        let content = manifest_for(name);
        let mut header = tar::Header::new_gnu();
        header.set_entry_type(tar::EntryType::Regular);
        header.set_size(u64::try_from(content.len()).expect("size"));
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, content.as_slice())
            .expect("append");
    }
    gzip(&builder.into_inner().expect("tar finish"))
}

/// Build a zip whose entries are `names`, each holding [`manifest_for`] its
/// own name.
pub fn zip_of(names: &[&str]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for name in names {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .expect("start file");
        writer.write_all(&manifest_for(name)).expect("zip write");
    }
    writer.finish().expect("zip finish").into_inner()
}

/// Gzip-compress `bytes`.
fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// A gzip stream whose tar header fails its checksum.
pub fn corrupt_tarball() -> Vec<u8> {
    gzip(&[b'x'; 512])
}

/// A zip whose end-of-central-directory record has been cut off.
pub fn corrupt_zip() -> Vec<u8> {
    let mut bytes = zip_of(&["pipeline.yaml"]);
    bytes.truncate(bytes.len() - 10);
    bytes
}
