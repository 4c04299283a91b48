//! Core types for span-tracked XML trees.

use crate::Span;

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct XmlDocument {
    /// The root element of the document.
    pub root: XmlElement,

    /// Span of the entire document.
    pub span: Span,
}

/// An XML element with source spans.
#[derive(Debug, Clone)]
pub struct XmlElement {
    /// The local name of the element (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any (e.g., "bx" in `<bx:HOP>`).
    pub prefix: Option<String>,

    /// Span of the element name inside the start tag.
    pub name_span: Span,

    /// Attributes of this element.
    pub attributes: Vec<XmlAttribute>,

    /// Child content of this element.
    pub children: XmlChildren,

    /// Span of the entire element, from the start tag to the end tag.
    pub span: Span,
}

/// An XML attribute.
#[derive(Debug, Clone)]
pub struct XmlAttribute {
    /// The local name of the attribute (without namespace prefix).
    pub name: String,

    /// Namespace prefix, if any.
    pub prefix: Option<String>,

    /// The attribute value (after unescaping XML entities).
    pub value: String,

    /// Span from the attribute name through the closing quote of its value.
    pub span: Span,
}

/// Children of an XML element.
///
/// Whitespace-only text that sits between child elements is dropped while
/// building the tree, so record-style elements end up as `Elements`.
#[derive(Debug, Clone)]
pub enum XmlChildren {
    /// Element contains only child elements.
    Elements(Vec<XmlElement>),

    /// Element contains only text content.
    Text {
        /// The text content (after unescaping XML entities).
        content: String,
        span: Span,
    },

    /// Element contains text and elements interleaved.
    Mixed(Vec<XmlChild>),

    /// Element is empty (no content).
    Empty,
}

/// A single child in mixed content.
#[derive(Debug, Clone)]
pub enum XmlChild {
    Element(XmlElement),
    Text { content: String, span: Span },
}

impl XmlDocument {
    pub fn new(root: XmlElement, span: Span) -> Self {
        Self { root, span }
    }
}

#[cfg(test)]
impl XmlElement {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>, prefix: Option<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            prefix,
            name_span: span,
            attributes: Vec::new(),
            children: XmlChildren::Empty,
            span,
        }
    }

    /// Replace the content of this element with child elements.
    pub fn with_elements(mut self, children: Vec<XmlElement>) -> Self {
        self.children = if children.is_empty() {
            XmlChildren::Empty
        } else {
            XmlChildren::Elements(children)
        };
        self
    }

    /// Replace the content of this element with text.
    pub fn with_text(mut self, content: impl Into<String>) -> Self {
        let span = self.span;
        self.children = XmlChildren::Text {
            content: content.into(),
            span,
        };
        self
    }

    /// Add an attribute to this element.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let span = self.span;
        self.attributes.push(XmlAttribute {
            name: name.into(),
            prefix: None,
            value: value.into(),
            span,
        });
        self
    }
}

impl XmlElement {
    /// The name as written in the source, `prefix:name` or `name`.
    pub fn qualified_name(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.name),
            None => self.name.clone(),
        }
    }

    /// Get an attribute value by local name.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name && a.prefix.is_none())
            .or_else(|| self.attributes.iter().find(|a| a.name == name))
            .map(|a| a.value.as_str())
    }

    /// Check if this element has child elements.
    pub fn has_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Check if this element has no content at all.
    pub fn is_empty(&self) -> bool {
        matches!(&self.children, XmlChildren::Empty)
    }

    /// Iterate over child elements in document order, skipping text.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &XmlElement> + '_ {
        let (elements, mixed): (&[XmlElement], &[XmlChild]) = match &self.children {
            XmlChildren::Elements(elements) => (elements.as_slice(), &[]),
            XmlChildren::Mixed(children) => (&[], children.as_slice()),
            _ => (&[], &[]),
        };
        elements.iter().chain(mixed.iter().filter_map(|c| match c {
            XmlChild::Element(e) => Some(e),
            XmlChild::Text { .. } => None,
        }))
    }

    /// First child element with the given local name.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// All child elements with the given local name.
    pub fn get_children(&self, name: &str) -> Vec<&XmlElement> {
        self.child_elements().filter(|e| e.name == name).collect()
    }

    /// Concatenation of this element's direct text nodes.
    ///
    /// Text inside child elements is not included.
    pub fn text_content(&self) -> String {
        match &self.children {
            XmlChildren::Text { content, .. } => content.clone(),
            XmlChildren::Mixed(children) => children
                .iter()
                .filter_map(|c| match c {
                    XmlChild::Text { content, .. } => Some(content.as_str()),
                    XmlChild::Element(_) => None,
                })
                .collect(),
            _ => String::new(),
        }
    }

    /// Text that comes before the first child element.
    ///
    /// For text-only elements this is the whole content. Whitespace-only
    /// runs next to child elements are not kept by the parser, so they read
    /// as empty here.
    pub fn leading_text(&self) -> String {
        match &self.children {
            XmlChildren::Text { content, .. } => content.clone(),
            XmlChildren::Mixed(children) => children
                .iter()
                .map_while(|c| match c {
                    XmlChild::Text { content, .. } => Some(content.as_str()),
                    XmlChild::Element(_) => None,
                })
                .collect(),
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_get_attribute() {
        let element = XmlElement::new("element", None, Span::default())
            .with_attribute("name", "NAME")
            .with_attribute("type", "xs:string");

        assert_eq!(element.get_attribute("name"), Some("NAME"));
        assert_eq!(element.get_attribute("type"), Some("xs:string"));
        assert_eq!(element.get_attribute("minOccurs"), None);
    }

    #[test]
    fn test_unprefixed_attribute_preferred() {
        let mut element = XmlElement::new("schema", None, Span::default());
        element.attributes.push(XmlAttribute {
            name: "lang".to_string(),
            prefix: Some("xml".to_string()),
            value: "en".to_string(),
            span: Span::default(),
        });
        element.attributes.push(XmlAttribute {
            name: "lang".to_string(),
            prefix: None,
            value: "de".to_string(),
            span: Span::default(),
        });

        assert_eq!(element.get_attribute("lang"), Some("de"));
    }

    #[test]
    fn test_element_children() {
        let parent = XmlElement::new("HOPS", None, Span::default()).with_elements(vec![
            XmlElement::new("HOP", None, Span::default()),
            XmlElement::new("HOP", None, Span::default()),
            XmlElement::new("NOTES", None, Span::default()),
        ]);

        assert!(parent.has_elements());
        assert_eq!(parent.get_children("HOP").len(), 2);
        assert_eq!(parent.find_child("NOTES").map(|e| e.name.as_str()), Some("NOTES"));
        assert!(parent.find_child("MISC").is_none());
        assert_eq!(parent.text_content(), "");
    }

    #[test]
    fn test_empty_children_collapse_to_empty() {
        let element = XmlElement::new("HOPS", None, Span::default()).with_elements(vec![]);
        assert!(element.is_empty());
        assert!(!element.has_elements());
    }

    #[test]
    fn test_element_text() {
        let element = XmlElement::new("NAME", None, Span::default()).with_text("Cascade");

        assert!(!element.has_elements());
        assert_eq!(element.text_content(), "Cascade");
    }

    #[test]
    fn test_mixed_text_content_skips_elements() {
        let mut element = XmlElement::new("NOTES", None, Span::default());
        element.children = XmlChildren::Mixed(vec![
            XmlChild::Text {
                content: "Dry ".to_string(),
                span: Span::default(),
            },
            XmlChild::Element(XmlElement::new("B", None, Span::default()).with_text("hop")),
            XmlChild::Text {
                content: "late".to_string(),
                span: Span::default(),
            },
        ]);

        assert_eq!(element.text_content(), "Dry late");
        assert_eq!(element.leading_text(), "Dry ");
        assert_eq!(element.child_elements().count(), 1);
    }

    #[test]
    fn test_leading_text() {
        let text = XmlElement::new("ALPHA", None, Span::default()).with_text("  ");
        assert_eq!(text.leading_text(), "  ");

        let mut starts_with_element = XmlElement::new("NOTES", None, Span::default());
        starts_with_element.children = XmlChildren::Mixed(vec![
            XmlChild::Element(XmlElement::new("B", None, Span::default()).with_text("hop")),
            XmlChild::Text {
                content: "late".to_string(),
                span: Span::default(),
            },
        ]);
        assert_eq!(starts_with_element.leading_text(), "");

        let wrapper = XmlElement::new("HOPS", None, Span::default())
            .with_elements(vec![XmlElement::new("HOP", None, Span::default())]);
        assert_eq!(wrapper.leading_text(), "");
        assert_eq!(XmlElement::new("NAME", None, Span::default()).leading_text(), "");
    }

    #[test]
    fn test_qualified_name() {
        let element = XmlElement::new("HOP", Some("bx".to_string()), Span::default());
        assert_eq!(element.qualified_name(), "bx:HOP");
        let plain = XmlElement::new("HOP", None, Span::default());
        assert_eq!(plain.qualified_name(), "HOP");
    }
}
