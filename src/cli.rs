//! CLI argument definitions for `pipeline-ingest`.
//!
//! Kept separate from the entrypoint so the binary stays focused on
//! orchestration.

use camino::Utf8PathBuf;
use clap::Parser;

/// Extract the canonical pipeline manifest from an uploaded pipeline source.
#[derive(Parser, Debug, Clone)]
#[command(name = "pipeline-ingest")]
#[command(version, about)]
#[command(long_about = concat!(
    "Extract the canonical pipeline manifest from an uploaded pipeline source.\n\n",
    "FILE may be a YAML or JSON manifest, a gzip-compressed tarball, or a zip ",
    "archive. Archives holding a single file yield that file; archives holding ",
    "several files must contain a pipeline.yaml at any depth. Unrecognised ",
    "suffixes are resolved by inspecting the content.",
))]
pub struct Cli {
    /// The pipeline source to ingest.
    #[arg(value_name = "FILE")]
    pub file: Utf8PathBuf,

    /// Pipeline name override; may be percent-encoded.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// TOML file with ingestion limits.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Maximum upload size in bytes; overrides the configuration file.
    #[arg(long, value_name = "BYTES")]
    pub max_bytes: Option<u64>,

    /// Write the manifest here instead of stdout.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Suppress the summary on stderr (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}
