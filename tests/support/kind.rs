use pipeline_ingest::ErrorKind;
use std::str::FromStr;

/// Wrapper for error-kind names supplied via behaviour-driven test steps.
#[derive(Clone, Copy, Debug)]
pub struct StepErrorKind(ErrorKind);

impl FromStr for StepErrorKind {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let raw = input
            .trim()
            .trim_matches(|candidate| matches!(candidate, '"' | '\''));

        let kind = match raw {
            "TooLarge" => ErrorKind::TooLarge,
            "UnsupportedFormat" => ErrorKind::UnsupportedFormat,
            "InvalidTarball" => ErrorKind::InvalidTarball,
            "InvalidZip" => ErrorKind::InvalidZip,
            "EmptyArchive" => ErrorKind::EmptyArchive,
            "MissingPipelineYaml" => ErrorKind::MissingPipelineYaml,
            "EmptyManifest" => ErrorKind::EmptyManifest,
            "InvalidFormat" => ErrorKind::InvalidFormat,
            "NameTooLong" => ErrorKind::NameTooLong,
            "InvalidName" => ErrorKind::InvalidName,
            "Io" => ErrorKind::Io,
            other => return Err(format!("unknown error kind {other:?}")),
        };
        Ok(Self(kind))
    }
}

impl StepErrorKind {
    /// Consumes the step value, yielding the parsed kind.
    pub const fn into_inner(self) -> ErrorKind {
        self.0
    }
}
