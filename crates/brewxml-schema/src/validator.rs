//! Validation engine: walks a document tree against a [`TypeRegistry`].
//!
//! Each element is matched to a record type by its hint (the type the
//! parent's field declared, or the element's own tag at the top) and then by
//! its normalized tag. Elements that match nothing, or match a type with no
//! fields, are wrappers: they report nothing themselves and every child is
//! visited in turn.
//!
//! The walk uses an explicit work stack, so arbitrarily deep documents do
//! not exhaust the call stack. Errors come out in depth-first document
//! order: an element's missing fields first, then for each child its value
//! error followed by everything found inside it.

use crate::error::{DocumentParseError, ElementPath, ValidationError, ValidationErrorKind};
use crate::types::{FieldSet, TypeRegistry};
use crate::values::{check_fixed, validate_value};
use brewxml_tree::{XmlDocument, XmlElement};

/// Validate a parsed document, collecting every error.
pub fn validate(document: &XmlDocument, registry: &TypeRegistry) -> Vec<ValidationError> {
    Validator::new(registry).validate(document)
}

/// Parse and validate, returning display strings. An empty list means the
/// document is valid.
///
/// A document that is not well-formed yields exactly one string,
/// `XML Parse Error: <message>`.
pub fn validate_str(content: &str, registry: &TypeRegistry) -> Vec<String> {
    match check_document(content, registry) {
        Ok(errors) => errors.iter().map(ToString::to_string).collect(),
        Err(err) => vec![err.to_string()],
    }
}

/// Parse and validate, keeping the parse failure typed.
pub fn check_document(
    content: &str,
    registry: &TypeRegistry,
) -> Result<Vec<ValidationError>, DocumentParseError> {
    let document = brewxml_tree::parse(content)?;
    Ok(validate(&document, registry))
}

/// Pending work on the traversal stack.
enum Work<'a> {
    /// Match `element` and check its fields. `parent` is the path of the
    /// enclosing element.
    Visit {
        element: &'a XmlElement,
        hint: &'a str,
        parent: ElementPath,
    },

    /// An error whose place in the output order is after the work above it.
    Report(ValidationError),
}

/// Validates documents against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r TypeRegistry,

    /// Also compare values with their field's `fixed` attribute. Off by
    /// default.
    fixed_values: bool,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r TypeRegistry) -> Self {
        Self {
            registry,
            fixed_values: false,
        }
    }

    /// Report values that differ from a declared `fixed` value.
    pub fn with_fixed_values(mut self, enabled: bool) -> Self {
        self.fixed_values = enabled;
        self
    }

    pub fn validate(&self, document: &XmlDocument) -> Vec<ValidationError> {
        self.validate_element(&document.root)
    }

    /// Validate a subtree as if it were a document root.
    pub fn validate_element(&self, root: &XmlElement) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut stack = vec![Work::Visit {
            element: root,
            hint: root.name.as_str(),
            parent: ElementPath::new(),
        }];

        while let Some(work) = stack.pop() {
            match work {
                Work::Report(error) => errors.push(error),
                Work::Visit {
                    element,
                    hint,
                    parent,
                } => {
                    let path = parent.child(element.name.as_str());
                    match self.match_type(element, hint) {
                        Some(fields) => {
                            self.check_record(element, fields, &path, &mut errors, &mut stack)
                        }
                        None => {
                            tracing::trace!(path = %path, "no record type; descending as wrapper");
                            // Reverse so the first child is popped first
                            for child in element.child_elements().rev() {
                                stack.push(Work::Visit {
                                    element: child,
                                    hint: child.name.as_str(),
                                    parent: path.clone(),
                                });
                            }
                        }
                    }
                }
            }
        }

        errors
    }

    /// The non-empty field set `element` should be checked against.
    fn match_type(&self, element: &XmlElement, hint: &str) -> Option<&'r FieldSet> {
        if let Some(fields) = self.registry.get(hint).filter(|f| !f.is_empty()) {
            tracing::trace!(tag = %element.name, type_name = %hint, "matched by hint");
            return Some(fields);
        }
        let (name, fields) = self.registry.resolve_tag(&element.name)?;
        if fields.is_empty() {
            return None;
        }
        tracing::trace!(tag = %element.name, type_name = %name, "matched by tag");
        Some(fields)
    }

    fn check_record<'a>(
        &self,
        element: &'a XmlElement,
        fields: &'a FieldSet,
        path: &ElementPath,
        errors: &mut Vec<ValidationError>,
        stack: &mut Vec<Work<'a>>,
    ) {
        for (name, field) in fields {
            if field.required && element.find_child(name).is_none() {
                errors.push(
                    ValidationError::new(
                        ValidationErrorKind::MissingRequiredField {
                            field: name.clone(),
                        },
                        path.child(name.as_str()),
                    )
                    .with_span(element.span),
                );
            }
        }

        for child in element.child_elements().rev() {
            let Some(field) = fields.get(&child.name) else {
                continue;
            };

            if let Some(nested) = field.nested_type() {
                stack.push(Work::Visit {
                    element: child,
                    hint: nested,
                    parent: path.clone(),
                });
            }

            // Whitespace-only text is still checked, as the empty string
            let text = child.leading_text();
            if text.is_empty() {
                continue;
            }
            let value = text.trim();
            let checked = validate_value(value, field).and_then(|()| {
                if self.fixed_values {
                    check_fixed(value, field)
                } else {
                    Ok(())
                }
            });
            if let Err(reason) = checked {
                stack.push(Work::Report(
                    ValidationError::new(
                        ValidationErrorKind::InvalidValue {
                            field: child.name.clone(),
                            value: value.to_string(),
                            reason,
                        },
                        path.child(child.name.as_str()),
                    )
                    .with_span(child.span),
                ));
            }
        }
    }
}
