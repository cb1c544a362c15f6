//! Lay content nodes out as wrapped, styled display lines.

use unicode_width::UnicodeWidthStr;

use super::parser::{format_inline, render};
use super::types::{ContentNode, Document, InlineSpan, InlineStyle, LineType, RenderedLine};

/// Gutter drawn in front of every answer callout row.
pub const ANSWER_GUTTER: &str = "▌ ";
const BULLET: &str = "• ";
const BULLET_CONTINUATION: &str = "  ";

impl Document {
    /// Render `source` and lay it out for a column width.
    ///
    /// # Example
    ///
    /// ```
    /// use revise::content::Document;
    ///
    /// let doc = Document::from_text("# Cells\n\nEukaryotic cells have a nucleus.", 80);
    /// assert_eq!(doc.nodes().len(), 2);
    /// assert_eq!(doc.line_count(), 3); // heading + spacer + paragraph
    /// ```
    pub fn from_text(source: &str, width: u16) -> Self {
        let _scope = crate::perf::scope("content.from_text");
        let nodes = render(source);
        let lines = layout(&nodes, usize::from(width.max(1)));
        if crate::perf::is_debug_log_enabled() {
            let kinds: Vec<&str> = nodes.iter().map(ContentNode::kind).collect();
            crate::perf::log_event(
                "content.layout",
                format!(
                    "nodes={} [{}] lines={} width={width} bytes={}",
                    nodes.len(),
                    kinds.join(","),
                    lines.len(),
                    source.len()
                ),
            );
        }
        Self {
            source: source.to_string(),
            nodes,
            lines,
            width,
        }
    }

    /// Re-wrap the existing nodes for a new width.
    pub fn relayout(&mut self, width: u16) {
        if width == self.width {
            return;
        }
        self.lines = layout(&self.nodes, usize::from(width.max(1)));
        self.width = width;
    }
}

/// Lay out nodes into display lines wrapped at `width` columns.
pub fn layout(nodes: &[ContentNode], width: usize) -> Vec<RenderedLine> {
    let mut lines = Vec::new();

    for node in nodes {
        match node {
            ContentNode::Heading { level, text } => {
                if !lines.is_empty() {
                    ensure_trailing_empty_lines(&mut lines, 1);
                }
                push_wrapped(
                    &mut lines,
                    &format_inline(text),
                    width,
                    ("", ""),
                    LineType::Heading(*level),
                );
            }
            ContentNode::ListBlock { items } => {
                for item in items {
                    push_wrapped(
                        &mut lines,
                        &format_inline(item),
                        width,
                        (BULLET, BULLET_CONTINUATION),
                        LineType::ListItem,
                    );
                }
            }
            ContentNode::AnswerBlock { text } => {
                lines.push(RenderedLine::from_spans(
                    LineType::AnswerLabel,
                    vec![
                        InlineSpan::plain(ANSWER_GUTTER),
                        InlineSpan::new("Answer:".to_string(), InlineStyle::STRONG),
                    ],
                ));
                push_wrapped(
                    &mut lines,
                    &format_inline(text),
                    width,
                    (ANSWER_GUTTER, ANSWER_GUTTER),
                    LineType::Answer,
                );
            }
            ContentNode::Paragraph { text } => {
                push_wrapped(
                    &mut lines,
                    &format_inline(text),
                    width,
                    ("", ""),
                    LineType::Paragraph,
                );
            }
        }
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }

    while lines
        .last()
        .is_some_and(|line| *line.line_type() == LineType::Empty)
    {
        lines.pop();
    }
    lines
}

fn push_wrapped(
    lines: &mut Vec<RenderedLine>,
    spans: &[InlineSpan],
    width: usize,
    (prefix_first, prefix_next): (&str, &str),
    line_type: LineType,
) {
    for row in wrap_spans(spans, width, prefix_first, prefix_next) {
        lines.push(RenderedLine::from_spans(line_type, row));
    }
}

fn ensure_trailing_empty_lines(lines: &mut Vec<RenderedLine>, count: usize) {
    let trailing = lines
        .iter()
        .rev()
        .take_while(|line| *line.line_type() == LineType::Empty)
        .count();
    for _ in trailing..count {
        lines.push(RenderedLine::new(String::new(), LineType::Empty));
    }
}

/// Word-wrap styled spans, prefixing the first and following rows.
///
/// Words longer than the available width keep a row of their own rather than
/// being split mid-word.
fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens: Vec<InlineSpan> = spans.iter().flat_map(split_inline_tokens).collect();

    let mut rows: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let prefix_spans = |prefix: &str| usize::from(!prefix.is_empty());
    let start_row = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = 0;
        if !prefix.is_empty() {
            current.push(InlineSpan::plain(prefix));
            *current_len = prefix.width();
        }
    };

    start_row(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            let keep = prefix_spans(if rows.is_empty() { prefix_first } else { prefix_next });
            trim_trailing_whitespace(&mut current, keep);
            rows.push(std::mem::take(&mut current));
            start_row(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        if token_is_ws && !has_word {
            // Drop leading whitespace at row starts.
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    rows.push(current);
    rows
}

fn trim_trailing_whitespace(row: &mut Vec<InlineSpan>, keep: usize) {
    while row.len() > keep
        && row
            .last()
            .is_some_and(|span| span.text().chars().all(char::is_whitespace))
    {
        row.pop();
    }
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}
