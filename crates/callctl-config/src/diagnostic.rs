// SPDX-FileCopyrightText: 2026 Callctl Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration diagnostics.
//!
//! Figment errors are mapped onto [`ConfigError`], a miette diagnostic that
//! points at the offending key in the TOML file and suggests the closest
//! valid key for typos.

#![allow(unused_assignments)] // triggered by miette's Diagnostic derive

use miette::{Diagnostic, GraphicalReportHandler, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.75;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("unknown key `{key}` in {}", section_label(.section))]
    #[diagnostic(
        code(callctl::config::unknown_key),
        help("{}", unknown_key_help(suggestion.as_deref(), valid_keys))
    )]
    UnknownKey {
        key: String,
        /// Dotted section path, empty for the top level.
        section: String,
        suggestion: Option<String>,
        valid_keys: String,
        #[label("not a callctl setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(code(callctl::config::invalid_type), help("`{key}` takes {expected}"))]
    InvalidType {
        key: String,
        found: String,
        expected: String,
    },

    #[error("missing required key `{key}`")]
    #[diagnostic(code(callctl::config::missing_key))]
    MissingKey { key: String },

    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(callctl::config::validation),
        help("run `callctl config` to print the effective settings")
    )]
    Validation { message: String },

    #[error("{0}")]
    #[diagnostic(code(callctl::config::other))]
    Other(String),
}

fn section_label(section: &str) -> String {
    if section.is_empty() {
        "the top level".to_string()
    } else {
        format!("[{section}]")
    }
}

fn unknown_key_help(suggestion: Option<&str>, valid_keys: &str) -> String {
    match suggestion {
        Some(s) => format!("did you mean `{s}`? accepted keys: {valid_keys}"),
        None => format!("accepted keys: {valid_keys}"),
    }
}

/// Maps every error figment collected onto a [`ConfigError`].
///
/// `toml_sources` holds `(path, content)` for each file that was merged, so
/// unknown keys can be underlined in place.
pub fn figment_to_config_errors(
    err: figment::Error,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    use figment::error::Kind;

    err.into_iter()
        .map(|error| match &error.kind {
            Kind::UnknownField(field, expected) => {
                let section = section_path(&error.path, field);
                let located = locate(&error, section, field, toml_sources);
                let (span, src) = match located {
                    Some((span, src)) => (Some(span), Some(src)),
                    None => (None, None),
                };
                ConfigError::UnknownKey {
                    key: field.clone(),
                    section: section.join("."),
                    suggestion: suggest_key(field, &expected[..]),
                    valid_keys: expected.join(", "),
                    span,
                    src,
                }
            }
            Kind::MissingField(field) => ConfigError::MissingKey {
                key: error
                    .path
                    .iter()
                    .map(String::as_str)
                    .chain([field.as_ref()])
                    .collect::<Vec<_>>()
                    .join("."),
            },
            Kind::InvalidType(actual, expected) => ConfigError::InvalidType {
                key: error.path.join("."),
                found: actual.to_string(),
                expected: expected.clone(),
            },
            _ => ConfigError::Other(error.to_string()),
        })
        .collect()
}

/// Figment sometimes includes the offending field as the last path element.
fn section_path<'a>(path: &'a [String], field: &str) -> &'a [String] {
    match path.split_last() {
        Some((last, parent)) if last == field => parent,
        _ => path,
    }
}

fn locate(
    error: &figment::error::Error,
    section: &[String],
    field: &str,
    toml_sources: &[(String, String)],
) -> Option<(SourceSpan, NamedSource<String>)> {
    let from_file = error
        .metadata
        .as_ref()
        .and_then(|m| m.source.as_ref())
        .and_then(|source| match source {
            figment::Source::File(path) => {
                let path = path.display().to_string();
                toml_sources.iter().find(|(p, _)| *p == path)
            }
            _ => None,
        });

    // Inline strings have no file path; use the only source when there is one.
    let (path, content) = from_file.or(match toml_sources {
        [only] => Some(only),
        _ => None,
    })?;

    let offset = find_key_offset(content, section, field)?;
    Some((
        SourceSpan::new(offset.into(), field.len()),
        NamedSource::new(path, content.clone()),
    ))
}

/// Byte offset of the `field` assignment inside the table named by `path`.
///
/// An empty `path` means keys before the first table header. Headers are
/// compared by their full dotted name, so `[queue]` never matches keys of
/// `[queue.publishers]`.
pub fn find_key_offset(content: &str, path: &[String], field: &str) -> Option<usize> {
    let wanted = path.join(".");
    let mut current = String::new();
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if let Some(header) = trimmed.strip_prefix('[') {
            current = header
                .split(']')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
            continue;
        }
        if current != wanted {
            continue;
        }

        let Some(rest) = trimmed.strip_prefix(field) else {
            continue;
        };
        if rest.trim_start().starts_with('=') {
            return Some(start + (line.len() - trimmed.len()));
        }
    }

    None
}

/// Closest valid key by Jaro-Winkler similarity, if close enough.
pub fn suggest_key<S: AsRef<str>>(unknown: &str, valid_keys: &[S]) -> Option<String> {
    valid_keys
        .iter()
        .map(|key| (strsim::jaro_winkler(unknown, key.as_ref()), key.as_ref()))
        .filter(|(score, _)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, key)| key.to_string())
}

/// Prints every error to stderr as a graphical miette report.
pub fn render_errors(errors: &[ConfigError]) {
    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut report = String::new();
        match handler.render_report(&mut report, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{report}"),
            Err(_) => eprintln!("config error: {error}"),
        }
    }
}
