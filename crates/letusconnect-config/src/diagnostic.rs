// SPDX-FileCopyrightText: 2026 LetUsConnect Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment extraction failures become [`ConfigError`]s that miette renders
//! with the offending line highlighted, a "did you mean" hint for typos and,
//! for secrets, the environment variable that can supply them.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity score to suggest a correction.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// A single configuration problem.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key the table does not define (every section denies unknown fields).
    #[error("unknown configuration key `{key}`")]
    #[diagnostic(
        code(letusconnect::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        suggestion: Option<String>,
        /// Comma-separated keys the table accepts.
        valid_keys: String,
        #[label("this key is not recognized")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A configuration value has the wrong type.
    #[error("invalid type for key `{key}`: {detail}")]
    #[diagnostic(
        code(letusconnect::config::invalid_type),
        help("expected {expected}")
    )]
    InvalidType {
        key: String,
        detail: String,
        expected: String,
        #[label("wrong type here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A required configuration key is missing.
    #[error("missing required key `{key}`")]
    #[diagnostic(
        code(letusconnect::config::missing_key),
        help("{}", format_missing_key_help(key, env.as_deref()))
    )]
    MissingKey {
        /// The missing key name, dotted by section.
        key: String,
        /// Conventional environment variable that can supply it.
        env: Option<String>,
    },

    /// A validation error for a config value.
    #[error("validation error: {message}")]
    #[diagnostic(code(letusconnect::config::validation))]
    Validation {
        message: String,
    },

    /// Anything figment reports that has no dedicated variant.
    #[error("configuration error: {0}")]
    #[diagnostic(code(letusconnect::config::other))]
    Other(String),
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? Valid keys: {valid_keys}"),
        None => format!("valid keys: {valid_keys}"),
    }
}

fn format_missing_key_help(key: &str, env: Option<&str>) -> String {
    let (section, field) = key.split_once('.').unwrap_or(("", key));
    let file_hint = if section.is_empty() {
        format!("add `{field} = <value>` to letusconnect.toml")
    } else {
        format!("add `{field} = <value>` under [{section}] in letusconnect.toml")
    };
    match env {
        Some(var) => format!("{file_hint}, or set {var}"),
        None => file_hint,
    }
}

/// Translate every error figment collected into a [`ConfigError`].
///
/// `toml_sources` pairs each file path that was read with its content, so
/// unknown keys can be pointed at in the file they came from.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let located = locate_key(&error, field, toml_sources);
                ConfigError::UnknownKey {
                    key: field.clone(),
                    suggestion: suggest_key(field, expected),
                    valid_keys: expected.join(", "),
                    span: located.as_ref().map(|(span, _)| *span),
                    src: located.map(|(_, src)| src),
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: field.to_string(),
                env: None,
            },
            Kind::InvalidType(actual, expected) => {
                let origin = error
                    .metadata
                    .as_ref()
                    .map(|m| format!(" (from {})", m.name))
                    .unwrap_or_default();
                ConfigError::InvalidType {
                    key: error.path.join("."),
                    detail: format!("found {actual}, expected {expected}{origin}"),
                    expected: expected.to_string(),
                    span: None,
                    src: None,
                }
            }
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Span of `field` in the TOML file the error originated from, if that file
/// is among `sources`.
fn locate_key(
    error: &figment::Error,
    field: &str,
    sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let figment::Source::File(path) = error.metadata.as_ref()?.source.as_ref()? else {
        return None;
    };
    let path = path.display().to_string();
    let (name, content) = sources.iter().find(|(p, _)| *p == path)?;
    let offset = find_key_offset(content, &error.path, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(name, content.clone()),
    ))
}

/// Byte offset of `field` used as a key inside table `[path[0]]`, or at the
/// top level when `path` is empty. Keys in other tables are not matched.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let mut in_table = path.is_empty();
    let mut line_start = 0;

    for line in content.split_inclusive('\n') {
        let start = line_start;
        line_start += line.len();

        let trimmed = line.trim_start();
        if trimmed.starts_with('[') {
            let header = trimmed.trim_end();
            in_table = path.first().is_some_and(|table| header == format!("[{table}]"));
            continue;
        }
        if !in_table {
            continue;
        }
        let is_key = trimmed
            .strip_prefix(field)
            .is_some_and(|rest| rest.trim_start().starts_with('='));
        if is_key {
            return Some(start + line.len() - trimmed.len());
        }
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if any clears
/// [`SUGGESTION_THRESHOLD`].
pub fn suggest_key(unknown: &str, valid_keys: &[&str]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key), *key))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Print each error to stderr as a miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = miette::GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("error: {error}"),
        }
    }
}
