//! XML parser that builds [`XmlDocument`] trees.

use crate::{Error, Result, Span, XmlAttribute, XmlChild, XmlChildren, XmlDocument, XmlElement};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, producing an [`XmlDocument`].
///
/// The tree is built with an explicit stack of open elements, so nesting
/// depth is bounded by memory rather than by the call stack.
///
/// # Example
///
/// ```rust
/// use brewxml_tree::parse;
///
/// let doc = parse("<HOPS><HOP/></HOPS>").unwrap();
/// assert_eq!(doc.root.name, "HOPS");
/// assert_eq!(doc.root.get_children("HOP").len(), 1);
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed: syntax errors, unclosed or
/// mismatched tags, no root element, or more than one root element.
pub fn parse(content: &str) -> Result<XmlDocument> {
    XmlParser::new(content).parse()
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The source content being parsed.
    source: &'a str,

    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,
}

/// A node being constructed during parsing.
struct BuildNode {
    name: String,
    prefix: Option<String>,
    name_span: Span,
    attributes: Vec<XmlAttribute>,

    /// Byte offset where this element started (the `<` character).
    start_offset: usize,

    /// Child elements and text accumulated so far.
    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            source,
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        let mut root: Option<XmlElement> = None;

        loop {
            // Capture position before reading the event
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(&e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(&e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(&e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(&e, event_start);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        // Check for unclosed elements
        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", qualified(&node.prefix, &node.name)),
                span: Some(node.name_span),
            });
        }

        let root = root.ok_or(Error::EmptyDocument)?;
        Ok(XmlDocument::new(root, Span::new(0, self.source.len())))
    }

    /// Hand a finished element to its parent, or make it the root.
    fn attach(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::MultipleRoots {
                span: Some(element.span),
            }),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<()> {
        let (name, prefix) = split_name(e.name().as_ref());
        let name_span = name_span(e, event_start);
        let attributes = self.parse_attributes(e, event_start)?;

        self.stack.push(BuildNode {
            name,
            prefix,
            name_span,
            attributes,
            start_offset: event_start,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<XmlElement> {
        let (end_name, end_prefix) = split_name(e.name().as_ref());

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", qualified(&end_prefix, &end_name)),
            span: None,
        })?;

        if node.name != end_name || node.prefix != end_prefix {
            return Err(Error::MismatchedEndTag {
                expected: qualified(&node.prefix, &node.name),
                found: qualified(&end_prefix, &end_name),
                span: Some(node.name_span),
            });
        }

        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name: node.name,
            prefix: node.prefix,
            name_span: node.name_span,
            attributes: node.attributes,
            children: finalize_children(node.children),
            span: Span::new(node.start_offset, end_offset),
        })
    }

    fn handle_empty(&mut self, e: &BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let (name, prefix) = split_name(e.name().as_ref());
        let attributes = self.parse_attributes(e, event_start)?;
        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name,
            prefix,
            name_span: name_span(e, event_start),
            attributes,
            children: XmlChildren::Empty,
            span: Span::new(event_start, end_offset),
        })
    }

    fn handle_text(&mut self, e: &BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(event_start as u64),
        })?;
        let span = Span::new(event_start, self.reader.buffer_position() as usize);

        match self.stack.last_mut() {
            Some(node) => {
                node.children.push(XmlChild::Text {
                    content: text.into_owned(),
                    span,
                });
                Ok(())
            }
            None if text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}').is_empty() => {
                Ok(())
            }
            None => Err(Error::InvalidStructure {
                message: "Text content outside of the root element".to_string(),
                span: Some(span),
            }),
        }
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>, event_start: usize) {
        let span = Span::new(event_start, self.reader.buffer_position() as usize);
        if let Some(node) = self.stack.last_mut() {
            node.children.push(XmlChild::Text {
                content: String::from_utf8_lossy(e.as_ref()).into_owned(),
                span,
            });
        }
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let tag_str = String::from_utf8_lossy(e.as_ref());
        // Attributes follow the element name; `e` excludes the leading '<'
        let mut search_from = e.name().as_ref().len();
        let mut attributes = Vec::new();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = attr.key.as_ref();
            let (name, prefix) = split_name(key);

            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(tag_start as u64),
            })?;

            let span = attribute_span(&tag_str, search_from, &String::from_utf8_lossy(key))
                .map_or(Span::point(tag_start), |(start, end)| {
                    search_from = end;
                    Span::new(tag_start + 1 + start, tag_start + 1 + end)
                });

            attributes.push(XmlAttribute {
                name,
                prefix,
                value: value.into_owned(),
                span,
            });
        }

        Ok(attributes)
    }
}

/// Split a raw `prefix:local` name.
fn split_name(raw: &[u8]) -> (String, Option<String>) {
    let full = String::from_utf8_lossy(raw);
    match full.split_once(':') {
        Some((prefix, local)) => (local.to_string(), Some(prefix.to_string())),
        None => (full.into_owned(), None),
    }
}

fn qualified(prefix: &Option<String>, name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, name),
        None => name.to_string(),
    }
}

fn name_span(e: &BytesStart<'_>, event_start: usize) -> Span {
    let name_start = event_start + 1; // Skip '<'
    Span::new(name_start, name_start + e.name().as_ref().len())
}

/// Locate `key="value"` inside the raw tag text, starting at `from`.
///
/// Returns tag-relative offsets from the start of the key through the
/// closing quote.
fn attribute_span(tag: &str, from: usize, key: &str) -> Option<(usize, usize)> {
    let area = tag.get(from..)?;
    let rel = area.find(key)?;
    let start = from + rel;
    let after_key = &tag[start + key.len()..];
    let eq = after_key.find('=')?;
    let after_eq = &after_key[eq + 1..];
    let quote_rel = after_eq.find(['"', '\''])?;
    let quote = after_eq[quote_rel..].chars().next()?;
    let value_rel = after_eq[quote_rel + 1..].find(quote)?;
    let end = start + key.len() + eq + 1 + quote_rel + 1 + value_rel + 1;
    Some((start, end))
}

/// Collapse accumulated children into the tightest [`XmlChildren`] form.
///
/// Whitespace-only text is dropped when the element has child elements.
fn finalize_children(children: Vec<XmlChild>) -> XmlChildren {
    let has_elements = children.iter().any(|c| matches!(c, XmlChild::Element(_)));

    if has_elements {
        let kept: Vec<XmlChild> = children
            .into_iter()
            .filter(|c| match c {
                XmlChild::Text { content, .. } => !content.trim().is_empty(),
                XmlChild::Element(_) => true,
            })
            .collect();

        if kept.iter().all(|c| matches!(c, XmlChild::Element(_))) {
            let elements = kept
                .into_iter()
                .filter_map(|c| match c {
                    XmlChild::Element(e) => Some(e),
                    XmlChild::Text { .. } => None,
                })
                .collect();
            XmlChildren::Elements(elements)
        } else {
            XmlChildren::Mixed(kept)
        }
    } else {
        // Only text (possibly split by CDATA sections or entities)
        let mut content = String::new();
        let mut span: Option<Span> = None;
        for child in children {
            if let XmlChild::Text { content: text, span: s } = child {
                content.push_str(&text);
                span = Some(match span {
                    Some(prev) => Span::new(prev.start, s.end),
                    None => s,
                });
            }
        }
        match span {
            Some(span) => XmlChildren::Text { content, span },
            None => XmlChildren::Empty,
        }
    }
}
