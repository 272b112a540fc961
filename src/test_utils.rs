//! In-memory archive builders shared by unit tests.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;

/// Gzip-compress `bytes` without any tar framing.
pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

/// Build an uncompressed tar stream holding `files` in the given order.
pub fn tar_stream(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, content) in files {
        append_file(&mut builder, name, content);
    }
    builder.into_inner().expect("tar finish")
}

/// Build a `.tar.gz` holding `files` in the given order.
pub fn tar_gz(files: &[(&str, &[u8])]) -> Vec<u8> {
    gzip(&tar_stream(files))
}

/// Build a `.tar.gz` holding a directory entry followed by `files`.
pub fn tar_gz_with_dir(dir: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Directory);
    header.set_size(0);
    header.set_mode(0o755);
    builder
        .append_data(&mut header, dir, std::io::empty())
        .expect("append dir");
    for (name, content) in files {
        append_file(&mut builder, name, content);
    }
    gzip(&builder.into_inner().expect("tar finish"))
}

fn append_file(builder: &mut tar::Builder<Vec<u8>>, name: &str, content: &[u8]) {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(u64::try_from(content.len()).expect("size"));
    header.set_mode(0o644);
    builder
        .append_data(&mut header, name, content)
        .expect("append file");
}

/// Build a zip archive holding `files` in the given order.
pub fn zip_bytes(files: &[(&str, &[u8])]) -> Vec<u8> {
    zip_with_dir("", files)
}

/// Build a zip archive holding a directory entry (when `dir` is non-empty)
/// followed by `files`.
pub fn zip_with_dir(dir: &str, files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    if !dir.is_empty() {
        writer.add_directory(dir, options).expect("add dir");
    }
    for (name, content) in files {
        writer.start_file(*name, options).expect("start file");
        writer.write_all(content).expect("zip write");
    }
    writer.finish().expect("zip finish").into_inner()
}
