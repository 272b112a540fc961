//! Pipeline source ingestion.
//!
//! Turns an uploaded pipeline source (a raw YAML/JSON manifest, a
//! gzip-compressed tarball, or a zip archive) into exactly one canonical
//! manifest byte stream, and derives a validated display name for it.
//!
//! # Modules
//!
//! - [`archive`] - Tarball and zip decoding into ordered entries
//! - [`classify`] - Suffix classification and candidate interpreters
//! - [`config`] - Ingestion limits loaded from TOML
//! - [`error`] - Error taxonomy with stable kinds
//! - [`ingest`] - Orchestration of read, routing, decoding and selection
//! - [`name`] - Pipeline name derivation and validation
//! - [`reader`] - Size-bounded reading of untrusted uploads
//! - [`select`] - Manifest selection from archive entries
//!
//! # Examples
//!
//! ```
//! use pipeline_ingest::ingest::read_pipeline_file;
//! use pipeline_ingest::name::derive_pipeline_name;
//!
//! let manifest = read_pipeline_file("hello.json", "{\"a\": 1}".as_bytes(), 1024)
//!     .expect("manifest");
//! assert_eq!(manifest, b"{\"a\": 1}");
//! assert_eq!(derive_pipeline_name("", "hello").expect("name"), "hello");
//! ```

pub mod archive;
pub mod classify;
pub mod cli;
pub mod config;
pub mod error;
pub mod ingest;
pub mod name;
pub mod reader;
pub mod select;

#[cfg(test)]
mod test_utils;

pub use config::IngestConfig;
pub use error::{ErrorKind, IngestError};
pub use ingest::{IngestedPipeline, PipelineIngestor, PipelineUpload, read_pipeline_file};
pub use name::derive_pipeline_name;
