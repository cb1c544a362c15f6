//! Core content types.

/// One structural unit of rendered model output.
///
/// Text fields hold the raw line text; inline formatting is applied when the
/// node is laid out (see [`super::format_inline`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentNode {
    /// Heading with level 1-3
    Heading { level: u8, text: String },
    /// A contiguous run of bullet items
    ListBlock { items: Vec<String> },
    /// Answer / mark scheme callout
    AnswerBlock { text: String },
    /// Any other non-blank line
    Paragraph { text: String },
}

impl ContentNode {
    /// Short kind name, used in debug logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Heading { .. } => "heading",
            Self::ListBlock { .. } => "list",
            Self::AnswerBlock { .. } => "answer",
            Self::Paragraph { .. } => "paragraph",
        }
    }
}

/// A laid-out piece of generated content, ready for display.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Original model output
    pub(super) source: String,
    /// Structural nodes derived from `source`
    pub(super) nodes: Vec<ContentNode>,
    /// Wrapped display lines
    pub(super) lines: Vec<RenderedLine>,
    /// Column width the lines were wrapped to
    pub(super) width: u16,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Get the source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the structural nodes.
    pub fn nodes(&self) -> &[ContentNode] {
        &self.nodes
    }

    /// True when the source produced no nodes at all.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get all rendered lines.
    pub fn lines(&self) -> &[RenderedLine] {
        &self.lines
    }

    /// Get the total number of rendered lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Width the document was last laid out for.
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Get visible lines for rendering.
    ///
    /// Returns lines from `offset` to `offset + count`.
    pub fn visible_lines(&self, offset: usize, count: usize) -> Vec<&RenderedLine> {
        self.lines.iter().skip(offset).take(count).collect()
    }

    /// Get a specific rendered line by index.
    pub fn line_at(&self, index: usize) -> Option<&RenderedLine> {
        self.lines.get(index)
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    content: String,
    line_type: LineType,
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line without inline styling.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line from inline spans.
    pub fn from_spans(line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        let content = spans.iter().map(InlineSpan::text).collect();
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub strong: bool,
    pub emphasis: bool,
}

impl InlineStyle {
    pub const PLAIN: Self = Self {
        strong: false,
        emphasis: false,
    };
    pub const STRONG: Self = Self {
        strong: true,
        emphasis: false,
    };
}

/// A styled inline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text.into(), InlineStyle::PLAIN)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }

    pub(super) fn push(&mut self, ch: char) {
        self.text.push(ch);
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with level (1-3)
    Heading(u8),
    /// Bullet list item (first row or continuation)
    ListItem,
    /// The "Answer:" label row of an answer callout
    AnswerLabel,
    /// Answer callout body
    Answer,
    /// Spacer row
    Empty,
}
