// Error types for schema extraction and document validation

use brewxml_tree::Span;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort schema extraction. No registry is produced.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema description is not well-formed XML.
    #[error("Schema parse error: {0}")]
    Parse(#[from] brewxml_tree::Error),

    /// The schema file could not be read.
    #[error("Failed to read schema {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SchemaError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SchemaError::Parse(_) => "X-2-1",
            SchemaError::Io { .. } => "X-2-2",
        }
    }
}

/// Result type for schema extraction
pub type SchemaResult<T> = Result<T, SchemaError>;

/// A document that could not be parsed at all. Validation stops before any
/// field is checked.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("XML Parse Error: {source}")]
pub struct DocumentParseError {
    #[from]
    pub source: brewxml_tree::Error,
}

impl DocumentParseError {
    pub fn error_code(&self) -> &'static str {
        "X-3-1"
    }

    pub fn span(&self) -> Option<Span> {
        self.source.span()
    }
}

/// Why a single text value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValueError {
    #[error("Expected integer, got '{value}'")]
    ExpectedInteger { value: String },

    #[error("Expected float, got '{value}'")]
    ExpectedFloat { value: String },

    #[error("Expected boolean (true/false/1/0), got '{value}'")]
    ExpectedBoolean { value: String },

    #[error("Expected ISO date (YYYY-MM-DD), got '{value}'")]
    ExpectedDate { value: String },

    #[error("Value '{value}' not in allowed list: [{}]", .allowed.join(", "))]
    NotInEnum { value: String, allowed: Vec<String> },

    #[error("Expected fixed value '{expected}', got '{value}'")]
    FixedMismatch { expected: String, value: String },
}

/// Structured validation error kinds
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ValidationErrorKind {
    /// A required field has no matching child element.
    MissingRequiredField { field: String },

    /// A field's text failed its value check.
    InvalidValue {
        field: String,
        value: String,
        reason: ValueError,
    },
}

impl ValidationErrorKind {
    /// Get the error code for this error kind
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationErrorKind::MissingRequiredField { .. } => "X-3-2",
            ValidationErrorKind::InvalidValue { .. } => "X-3-3",
        }
    }
}

/// A recoverable problem found in a document.
///
/// Displays as one of:
///
/// - `Missing required field: /RECIPES/RECIPE/NAME`
/// - `Invalid value at /HOP/ALPHA: Expected float, got 'abc'`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    #[serde(flatten)]
    pub kind: ValidationErrorKind,

    /// Path of the offending field, ending in the field name.
    pub path: ElementPath,

    /// Span of the element the error is reported against: the record for
    /// a missing field, the field element for a bad value.
    pub span: Option<Span>,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, path: ElementPath) -> Self {
        Self {
            kind,
            path,
            span: None,
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ValidationErrorKind::MissingRequiredField { .. } => {
                write!(f, "Missing required field: {}", self.path)
            }
            ValidationErrorKind::InvalidValue { reason, .. } => {
                write!(f, "Invalid value at {}: {}", self.path, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Slash-delimited chain of element tags, e.g. `/RECIPES/RECIPE/STYLE`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementPath {
    segments: Vec<String>,
}

impl ElementPath {
    pub fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Push a segment onto the path
    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    /// Pop the last segment from the path
    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    /// A copy of this path extended by one segment.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }
        Ok(())
    }
}

impl Serialize for ElementPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<S: Into<String>> FromIterator<S> for ElementPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_path_display() {
        let mut path = ElementPath::new();
        assert_eq!(path.to_string(), "");

        path.push("RECIPES");
        assert_eq!(path.to_string(), "/RECIPES");

        let child = path.child("RECIPE");
        assert_eq!(child.to_string(), "/RECIPES/RECIPE");
        assert_eq!(path.len(), 1);

        assert_eq!(path.pop().as_deref(), Some("RECIPES"));
        assert!(path.is_empty());
    }

    #[test]
    fn test_missing_field_display() {
        let error = ValidationError::new(
            ValidationErrorKind::MissingRequiredField {
                field: "NAME".to_string(),
            },
            ["HOP", "NAME"].into_iter().collect(),
        );
        assert_eq!(error.to_string(), "Missing required field: /HOP/NAME");
        assert_eq!(error.error_code(), "X-3-2");
    }

    #[test]
    fn test_invalid_value_display() {
        let error = ValidationError::new(
            ValidationErrorKind::InvalidValue {
                field: "ALPHA".to_string(),
                value: "abc".to_string(),
                reason: ValueError::ExpectedFloat {
                    value: "abc".to_string(),
                },
            },
            ["HOP", "ALPHA"].into_iter().collect(),
        );
        assert_eq!(
            error.to_string(),
            "Invalid value at /HOP/ALPHA: Expected float, got 'abc'"
        );
    }

    #[test]
    fn test_enum_reason_lists_allowed_values() {
        let reason = ValueError::NotInEnum {
            value: "Cider".to_string(),
            allowed: vec!["Ale".to_string(), "Lager".to_string(), "Mead".to_string()],
        };
        assert_eq!(
            reason.to_string(),
            "Value 'Cider' not in allowed list: [Ale, Lager, Mead]"
        );
    }

    #[test]
    fn test_document_parse_error_display() {
        let error = DocumentParseError::from(brewxml_tree::Error::EmptyDocument);
        assert_eq!(
            error.to_string(),
            "XML Parse Error: Empty XML document: no root element found"
        );
    }

    #[test]
    fn test_validation_error_serializes_with_path_string() {
        let error = ValidationError::new(
            ValidationErrorKind::MissingRequiredField {
                field: "NAME".to_string(),
            },
            ["HOP", "NAME"].into_iter().collect(),
        )
        .with_span(Span::new(0, 5));

        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "MissingRequiredField",
                "data": { "field": "NAME" },
                "path": "/HOP/NAME",
                "span": { "start": 0, "end": 5 }
            })
        );
    }
}
