//! Span-tracked XML document trees.
//!
//! This crate wraps [`quick-xml`] to build a tree of [`XmlElement`]s where
//! each element and attribute remembers the byte range it came from. Element
//! and attribute names are split into a local name and an optional namespace
//! prefix, so consumers can match tags without caring how a document chose
//! to qualify them.
//!
//! # Example
//!
//! ```rust
//! use brewxml_tree::parse;
//!
//! let doc = parse(r#"<bx:RECIPES xmlns:bx="urn:beerxml">
//!   <bx:RECIPE><bx:NAME>Pale Ale</bx:NAME></bx:RECIPE>
//! </bx:RECIPES>"#).unwrap();
//!
//! assert_eq!(doc.root.name, "RECIPES");
//! assert_eq!(doc.root.prefix.as_deref(), Some("bx"));
//!
//! let recipe = doc.root.find_child("RECIPE").unwrap();
//! assert_eq!(recipe.find_child("NAME").unwrap().text_content(), "Pale Ale");
//! ```
//!
//! # Spans
//!
//! Every element records its [`Span`]; [`Span::line_col`] turns an offset
//! back into a 1-based line and column for messages:
//!
//! ```rust
//! use brewxml_tree::parse;
//!
//! let content = "<root>\n  <child/>\n</root>";
//! let doc = parse(content).unwrap();
//! let child = doc.root.find_child("child").unwrap();
//! assert_eq!(child.span.line_col(content), (2, 3));
//! ```

pub mod error;
pub mod parser;
pub mod span;
pub mod types;

// Re-export main types
pub use error::{Error, Result};
pub use parser::parse;
pub use span::Span;
pub use types::{XmlAttribute, XmlChild, XmlChildren, XmlDocument, XmlElement};
