//! Source snippets for located errors, rendered with ariadne.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use brewxml_tree::Span;

/// One error, ready for any output format.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,

    /// Slash-delimited element path, when the error has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// 1-based line and column of the error's start.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    #[serde(skip)]
    pub span: Option<Span>,
}

impl Diagnostic {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
            line: None,
            column: None,
            span: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach a span, resolving its line and column against `content`.
    pub fn with_span(mut self, span: Option<Span>, content: &str) -> Self {
        if let Some(span) = span {
            let (line, column) = span.line_col(content);
            self.line = Some(line);
            self.column = Some(column);
        }
        self.span = span;
        self
    }
}

/// Render `diagnostic` against the file it came from. Returns `None` when
/// the diagnostic has no span or rendering fails.
pub fn render_snippet(
    diagnostic: &Diagnostic,
    file_name: &str,
    content: &str,
    color: bool,
) -> Option<String> {
    let span = diagnostic.span?;

    // ariadne counts characters, spans count bytes
    let start = char_offset(content, span.start);
    let end = char_offset(content, span.end).max(start);

    let mut output = Vec::new();
    Report::build(ReportKind::Error, file_name.to_string(), start)
        .with_config(Config::default().with_color(color))
        .with_code(diagnostic.code)
        .with_message(&diagnostic.message)
        .with_label(
            Label::new((file_name.to_string(), start..end))
                .with_message(label_for(diagnostic))
                .with_color(Color::Red),
        )
        .finish()
        .write((file_name.to_string(), Source::from(content)), &mut output)
        .ok()?;

    String::from_utf8(output).ok()
}

fn label_for(diagnostic: &Diagnostic) -> &str {
    match diagnostic.code {
        "X-3-2" => "record is missing this field",
        "X-3-3" => "invalid value",
        _ => "here",
    }
}

fn char_offset(content: &str, byte_offset: usize) -> usize {
    let mut offset = byte_offset.min(content.len());
    while !content.is_char_boundary(offset) {
        offset -= 1;
    }
    content[..offset].chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offset_counts_characters() {
        assert_eq!(char_offset("abc", 2), 2);
        assert_eq!(char_offset("é<a/>", 2), 1);
        assert_eq!(char_offset("abc", 99), 3);
    }

    #[test]
    fn test_with_span_resolves_line_and_column() {
        let content = "<HOP>\n  <ALPHA>x</ALPHA>\n</HOP>";
        let diagnostic = Diagnostic::new("X-3-3", "bad").with_span(Some(Span::new(8, 24)), content);
        assert_eq!(diagnostic.line, Some(2));
        assert_eq!(diagnostic.column, Some(3));
    }

    #[test]
    fn test_render_snippet_includes_code_and_message() {
        let content = "<HOP>\n  <ALPHA>abc</ALPHA>\n</HOP>";
        let diagnostic = Diagnostic::new(
            "X-3-3",
            "Invalid value at /HOP/ALPHA: Expected float, got 'abc'",
        )
        .with_span(Some(Span::new(8, 26)), content);

        let snippet = render_snippet(&diagnostic, "hop.xml", content, false).unwrap();
        assert!(snippet.contains("X-3-3"), "{snippet}");
        assert!(snippet.contains("Expected float, got 'abc'"), "{snippet}");
        assert!(snippet.contains("hop.xml"), "{snippet}");
    }

    #[test]
    fn test_render_snippet_needs_a_span() {
        let diagnostic = Diagnostic::new("X-3-1", "XML Parse Error: boom");
        assert!(render_snippet(&diagnostic, "a.xml", "<a/>", false).is_none());
    }
}
