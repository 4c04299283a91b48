//! Error types for XML tree parsing.

use crate::Span;
use std::fmt;

/// Result type alias for brewxml-tree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// XML syntax error reported by quick-xml.
    XmlSyntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Input ended while an element was still open.
    UnexpectedEof { expected: String, span: Option<Span> },

    /// End tag does not close the innermost open element.
    MismatchedEndTag {
        expected: String,
        found: String,
        span: Option<Span>,
    },

    /// Structurally invalid XML that quick-xml let through.
    InvalidStructure { message: String, span: Option<Span> },

    /// No root element.
    EmptyDocument,

    /// More than one top-level element.
    MultipleRoots { span: Option<Span> },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::XmlSyntax { message, position } => {
                write!(f, "XML syntax error: {}", message)?;
                if let Some(pos) = position {
                    write!(f, " at byte {}", pos)?;
                }
                Ok(())
            }
            Error::UnexpectedEof { expected, .. } => {
                write!(f, "Unexpected end of input, expected {}", expected)
            }
            Error::MismatchedEndTag {
                expected, found, ..
            } => {
                write!(
                    f,
                    "Mismatched end tag: expected </{}>, found </{}>",
                    expected, found
                )
            }
            Error::InvalidStructure { message, .. } => {
                write!(f, "Invalid XML structure: {}", message)
            }
            Error::EmptyDocument => {
                write!(f, "Empty XML document: no root element found")
            }
            Error::MultipleRoots { .. } => {
                write!(f, "Invalid XML: multiple root elements")
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Stable error code for this error, `X-1-*`.
    pub fn code(&self) -> &'static str {
        match self {
            Error::XmlSyntax { .. } => "X-1-1",
            Error::UnexpectedEof { .. } => "X-1-2",
            Error::MismatchedEndTag { .. } => "X-1-3",
            Error::InvalidStructure { .. } => "X-1-4",
            Error::EmptyDocument => "X-1-5",
            Error::MultipleRoots { .. } => "X-1-6",
        }
    }

    /// Short title, suitable as a report heading.
    pub fn title(&self) -> &'static str {
        match self {
            Error::XmlSyntax { .. } => "XML Syntax Error",
            Error::UnexpectedEof { .. } => "Unexpected End of XML Input",
            Error::MismatchedEndTag { .. } => "Mismatched XML End Tag",
            Error::InvalidStructure { .. } => "Invalid XML Structure",
            Error::EmptyDocument => "Empty XML Document",
            Error::MultipleRoots { .. } => "Multiple XML Root Elements",
        }
    }

    /// Where in the source the error was detected, when known.
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::XmlSyntax { position, .. } => position.map(|p| Span::point(p as usize)),
            Error::UnexpectedEof { span, .. }
            | Error::MismatchedEndTag { span, .. }
            | Error::InvalidStructure { span, .. }
            | Error::MultipleRoots { span } => *span,
            Error::EmptyDocument => None,
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlSyntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlSyntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}
