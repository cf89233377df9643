//! Error types for covid-compare.

use std::{fmt, path::PathBuf};
use thiserror::Error;

/// The wrapper for the error kind, with an optional hint.
#[derive(Debug)]
pub struct CompareError {
    kind: CompareErrorKind,
    hint: Option<String>,
}

/// All types of errors than can occur while comparing two locations.
#[derive(Error, Debug)]
pub enum CompareErrorKind {
    #[error("Could not read dataset at {path}: {source}")]
    DatasetUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Expected input in 'county, state' format, got '{input}'")]
    ParseError { input: String },

    #[error("No record found for {query}")]
    NotFound { query: String },

    #[error("Found {count} records for {query}, expected exactly one")]
    AmbiguousMatch { query: String, count: usize },

    #[error("Dataset is missing expected column '{column}'")]
    MissingColumn { column: String },

    #[error("Invalid value '{value}' in column '{column}' for {query}")]
    InvalidData {
        column: String,
        value: String,
        query: String,
    },

    #[error("Invalid granularity: {input}. Valid options: counties, states, countries")]
    InvalidGranularity { input: String },

    #[error("Both locations must be {expected} queries")]
    MixedGranularity { expected: String },

    #[error("Config file not found at: {path}")]
    ConfigFileNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    ConfigError(#[from] figment::Error),

    #[error("Chart generation error: {0}")]
    ChartGenerationError(#[from] charming::EchartsError),

    #[error("Progress bar template error: {0}")]
    ProgressBarError(#[from] indicatif::style::TemplateError),
}

impl CompareError {
    /// Attaches a hint to the error
    pub fn with_hint(mut self, hint: Option<impl Into<String>>) -> Self {
        if let Some(hint) = hint {
            self.hint = Some(hint.into());
        }
        self
    }

    pub fn kind(&self) -> &CompareErrorKind {
        &self.kind
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}

impl fmt::Display for CompareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint_text) = &self.hint {
            write!(f, " ({hint_text})")?;
        }

        Ok(())
    }
}

impl std::error::Error for CompareError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Convert Error into CompareErrorKind
impl<E> From<E> for CompareError
where
    CompareErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        CompareError {
            kind: CompareErrorKind::from(error),
            hint: None,
        }
    }
}

/// A convenient result type for covid-compare
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_appends_hint() {
        let error = CompareError::from(CompareErrorKind::NotFound {
            query: "Atlantis".into(),
        })
        .with_hint(Some("Names must match the dataset exactly"));

        assert_eq!(
            error.to_string(),
            "No record found for Atlantis (Names must match the dataset exactly)"
        );
    }

    #[test]
    fn test_display_without_hint() {
        let error = CompareError::from(CompareErrorKind::ParseError {
            input: "Union".into(),
        });

        assert_eq!(
            error.to_string(),
            "Expected input in 'county, state' format, got 'Union'"
        );
        assert!(error.hint().is_none());
    }
}
