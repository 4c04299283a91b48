//! Type registry extraction and document validation for BeerXML-style
//! schemas.
//!
//! The crate has two halves:
//!
//! - [`extract`] compiles an XSD-like schema description into an immutable
//!   [`TypeRegistry`] mapping record type names to their [`FieldSet`]s.
//! - [`validate`] walks a document tree against a registry and collects
//!   every missing required field and malformed value it finds.
//!
//! A registry has no ties to any document, so one registry can check any
//! number of documents, from any number of threads.
//!
//! # Example
//!
//! ```rust
//! use brewxml_schema::{extract, validate_str};
//!
//! let registry = extract(r#"
//! <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:complexType name="hopType">
//!     <xs:all>
//!       <xs:element name="NAME" type="xs:string"/>
//!       <xs:element name="ALPHA" type="xs:decimal"/>
//!     </xs:all>
//!   </xs:complexType>
//! </xs:schema>"#).unwrap();
//!
//! let errors = validate_str("<HOP><ALPHA>abc</ALPHA></HOP>", &registry);
//! assert_eq!(errors, vec![
//!     "Missing required field: /HOP/NAME".to_string(),
//!     "Invalid value at /HOP/ALPHA: Expected float, got 'abc'".to_string(),
//! ]);
//! ```

pub mod docs;
pub mod error;
pub mod extract;
pub mod types;
pub mod validator;
pub mod values;

pub use docs::{DocOptions, render_markdown};
pub use error::{
    DocumentParseError, ElementPath, SchemaError, SchemaResult, ValidationError,
    ValidationErrorKind, ValueError,
};
pub use extract::{SchemaExtractor, extract, extract_file};
pub use types::{FieldDefinition, FieldSet, TypeKind, TypeRegistry, TypeRegistryBuilder};
pub use validator::{Validator, check_document, validate, validate_str};
pub use values::validate_value;
