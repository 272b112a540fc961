//! Display-name derivation for ingested pipelines.
//!
//! A caller-supplied override (typically a percent-encoded query parameter)
//! wins over the uploaded file's name. Either way the result is checked
//! against [`DEFAULT_MAX_NAME_LENGTH`] and the allowed character set, and
//! otherwise returned untouched.

use crate::classify::known_suffix;
use crate::error::{IngestError, Result};

/// Maximum pipeline name length, in characters.
pub const DEFAULT_MAX_NAME_LENGTH: usize = 100;

/// Derive a pipeline name using [`DEFAULT_MAX_NAME_LENGTH`].
///
/// # Examples
///
/// ```
/// use pipeline_ingest::name::derive_pipeline_name;
///
/// assert_eq!(derive_pipeline_name("pipeline%20one", "file one").expect("name"), "pipeline one");
/// assert_eq!(derive_pipeline_name("", "file one").expect("name"), "file one");
/// ```
///
/// # Errors
///
/// See [`derive_pipeline_name_with_limit`].
pub fn derive_pipeline_name(override_name: &str, fallback: &str) -> Result<String> {
    derive_pipeline_name_with_limit(override_name, fallback, DEFAULT_MAX_NAME_LENGTH)
}

/// Derive a pipeline name, allowing at most `max_length` characters.
///
/// A non-empty `override_name` is query-unescaped (`%XX` escapes and `+` for
/// space); otherwise `fallback` is used verbatim.
///
/// # Errors
///
/// Returns [`IngestError::InvalidFormat`] for a malformed escape,
/// [`IngestError::NameTooLong`] past `max_length`, and
/// [`IngestError::InvalidName`] for an empty name or a disallowed character.
pub fn derive_pipeline_name_with_limit(
    override_name: &str,
    fallback: &str,
    max_length: usize,
) -> Result<String> {
    let name = if override_name.is_empty() {
        fallback.to_owned()
    } else {
        query_unescape(override_name)?
    };

    if name.chars().count() > max_length {
        return Err(IngestError::NameTooLong { limit: max_length });
    }
    validate_characters(&name)?;
    Ok(name)
}

/// Derive the fallback name from an uploaded file name.
///
/// Drops any directory prefix and the format suffix (`.tar.gz`, `.zip`,
/// `.yaml`, ...); for unrecognised suffixes only the last `.ext` is removed.
///
/// ```
/// use pipeline_ingest::name::pipeline_name_from_file_name;
///
/// assert_eq!(pipeline_name_from_file_name("uploads/arguments.tar.gz"), "arguments");
/// assert_eq!(pipeline_name_from_file_name("bundle.ai-hub-package"), "bundle");
/// assert_eq!(pipeline_name_from_file_name("pipeline"), "pipeline");
/// ```
#[must_use]
pub fn pipeline_name_from_file_name(file_name: &str) -> &str {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    if let Some(stem) = known_suffix(base).and_then(|suffix| base.strip_suffix(suffix)) {
        return stem;
    }
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    }
}

/// Decode `value` the way a URL query component is decoded.
fn query_unescape(value: &str) -> Result<String> {
    let invalid = |reason: String| IngestError::InvalidFormat {
        value: value.to_owned(),
        reason,
    };

    let mut rest = value;
    while let Some(at) = rest.find('%') {
        let escape = rest.get(at + 1..at + 3).unwrap_or("");
        if escape.len() != 2 || !escape.chars().all(|c| c.is_ascii_hexdigit()) {
            let context = rest.get(at..).unwrap_or("");
            return Err(invalid(format!("malformed escape at \"{context}\"")));
        }
        rest = rest.get(at + 3..).unwrap_or("");
    }

    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| invalid(format!("decoded name is not UTF-8: {e}")))
}

fn validate_characters(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(IngestError::InvalidName {
            value: String::new(),
            reason: "name must not be empty".to_owned(),
        });
    }
    if let Some(bad) = name.chars().find(|c| !is_allowed(*c)) {
        return Err(IngestError::InvalidName {
            value: name.to_owned(),
            reason: format!("character {bad:?} is not allowed"),
        });
    }
    Ok(())
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;

    #[test]
    fn override_is_percent_decoded() {
        let name = derive_pipeline_name("pipeline%20one", "file one").expect("name");
        assert_eq!(name, "pipeline one");
    }

    #[test]
    fn empty_override_falls_back_to_file_name() {
        let name = derive_pipeline_name("", "file one").expect("name");
        assert_eq!(name, "file one");
    }

    #[rstest]
    #[case::bad_escape("pipeline!$%one")]
    #[case::trailing_percent("pipeline%")]
    #[case::short_escape("pipeline%2")]
    fn malformed_escape_is_invalid_format(#[case] value: &str) {
        let err = derive_pipeline_name(value, "file one").expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
        assert!(err.to_string().contains("invalid format"));
    }

    #[test]
    fn non_utf8_escape_is_invalid_format() {
        let err = derive_pipeline_name("%ff%fe", "file").expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    }

    #[test]
    fn plus_decodes_to_space() {
        let name = derive_pipeline_name("my+pipeline", "file").expect("name");
        assert_eq!(name, "my pipeline");
    }

    #[test]
    fn long_fallback_is_rejected() {
        let fallback = format!("this is a l{}g name", "o".repeat(104));
        assert_eq!(fallback.chars().count(), 121);
        let err = derive_pipeline_name("", &fallback).expect_err("too long");
        assert!(matches!(err, IngestError::NameTooLong { limit: 100 }));
        assert!(err.to_string().contains("name too long"));
    }

    #[rstest]
    #[case::at_limit(100, true)]
    #[case::over_limit(101, false)]
    fn length_limit_is_inclusive(#[case] length: usize, #[case] accepted: bool) {
        let name = "a".repeat(length);
        assert_eq!(derive_pipeline_name("", &name).is_ok(), accepted);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert_eq!(derive_pipeline_name("", &name).expect("name"), name);
    }

    #[test]
    fn custom_limit_is_respected() {
        let err = derive_pipeline_name_with_limit("", "abcdef", 5).expect_err("too long");
        assert!(matches!(err, IngestError::NameTooLong { limit: 5 }));
    }

    #[rstest]
    #[case::empty("")]
    #[case::control("bad\tname")]
    #[case::reserved("a/b")]
    fn disallowed_names_are_invalid(#[case] fallback: &str) {
        let err = derive_pipeline_name("", fallback).expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::InvalidName);
    }

    #[test]
    fn case_and_whitespace_are_preserved() {
        let name = derive_pipeline_name("", "  My Pipeline_v1.2 ").expect("name");
        assert_eq!(name, "  My Pipeline_v1.2 ");
    }

    #[rstest]
    #[case::yaml("arguments-parameters.yaml", "arguments-parameters")]
    #[case::tarball("arguments.tar.gz", "arguments")]
    #[case::tgz("dir/arguments.tgz", "arguments")]
    #[case::custom("pipeline_plus_component.ai-hub-package", "pipeline_plus_component")]
    #[case::dotfile(".hidden", ".hidden")]
    #[case::bare("pipeline", "pipeline")]
    fn file_name_stem(#[case] file_name: &str, #[case] expected: &str) {
        assert_eq!(pipeline_name_from_file_name(file_name), expected);
    }
}
