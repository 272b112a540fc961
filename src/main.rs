//! `pipeline-ingest` CLI entrypoint.
//!
//! Reads a pipeline source from disk, extracts its canonical manifest and
//! writes it to stdout or a file. The derived pipeline name is reported on
//! stderr.

use clap::Parser;
use pipeline_ingest::cli::Cli;
use pipeline_ingest::config::{ConfigError, IngestConfig};
use pipeline_ingest::error::IngestError;
use pipeline_ingest::ingest::{PipelineIngestor, PipelineUpload};
use std::io::Write;
use thiserror::Error;

/// Failures surfaced by the CLI.
#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("failed to write manifest: {0}")]
    Write(#[source] std::io::Error),
}

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if let Err(err) = run(&cli, &mut stderr) {
        write_stderr_line(&mut stderr, format_args!("error: {err}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<(), CliError> {
    let mut config = cli.config.as_ref().map_or_else(
        || Ok(IngestConfig::default()),
        |path| IngestConfig::load(path.as_std_path()),
    )?;
    if let Some(max_bytes) = cli.max_bytes {
        config.max_upload_bytes = max_bytes;
    }

    let file = std::fs::File::open(&cli.file).map_err(|source| CliError::Open {
        path: cli.file.to_string(),
        source,
    })?;
    let file_name = cli.file.file_name().unwrap_or(cli.file.as_str());

    let pipeline = PipelineIngestor::new(config).ingest(PipelineUpload {
        file_name,
        source: file,
        name_override: cli.name.as_deref(),
    })?;

    cli.output
        .as_ref()
        .map_or_else(
            || std::io::stdout().lock().write_all(&pipeline.manifest),
            |path| std::fs::write(path, &pipeline.manifest),
        )
        .map_err(CliError::Write)?;

    if !cli.quiet {
        write_stderr_line(
            stderr,
            format_args!(
                "Ingested pipeline \"{}\" ({} bytes, from {})",
                pipeline.name,
                pipeline.manifest.len(),
                pipeline.source
            ),
        );
    }
    Ok(())
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort reporting; ignore write failures.
    }
}
