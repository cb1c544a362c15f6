//! Line scanner for the markdown subset produced by the model.
//!
//! Recognized line prefixes (after trimming): `#`, `##`, `###`, `* `, `- `
//! and `ANSWER:`. Everything else is a paragraph.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::types::{ContentNode, InlineSpan, InlineStyle};

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));

const ANSWER_PREFIX: &str = "ANSWER:";

/// Classification of a single trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Heading(u8, &'a str),
    ListItem(&'a str),
    Answer(&'a str),
    Paragraph(&'a str),
    Blank,
}

/// Convert model output into an ordered sequence of content nodes.
///
/// Never fails: unrecognized lines become paragraphs. Contiguous list lines
/// collapse into one [`ContentNode::ListBlock`]; blank lines do not end a list.
///
/// # Example
///
/// ```
/// use revise::content::{ContentNode, render};
///
/// let nodes = render("* a\n* b\n## Next");
/// assert_eq!(
///     nodes,
///     vec![
///         ContentNode::ListBlock { items: vec!["a".into(), "b".into()] },
///         ContentNode::Heading { level: 2, text: "Next".into() },
///     ]
/// );
/// ```
pub fn render(text: &str) -> Vec<ContentNode> {
    let mut nodes = Vec::new();
    let mut pending_items: Vec<String> = Vec::new();

    for raw in text.split('\n') {
        match classify(trim_line(raw)) {
            LineKind::Heading(level, rest) => {
                flush_list(&mut pending_items, &mut nodes);
                nodes.push(ContentNode::Heading {
                    level,
                    text: rest.trim_start().to_string(),
                });
            }
            LineKind::ListItem(item) => pending_items.push(item.to_string()),
            LineKind::Answer(rest) => {
                flush_list(&mut pending_items, &mut nodes);
                nodes.push(ContentNode::AnswerBlock {
                    text: rest.trim_start().to_string(),
                });
            }
            LineKind::Paragraph(line) => {
                flush_list(&mut pending_items, &mut nodes);
                nodes.push(ContentNode::Paragraph {
                    text: line.to_string(),
                });
            }
            LineKind::Blank => {}
        }
    }

    flush_list(&mut pending_items, &mut nodes);
    nodes
}

/// Apply bold then italic formatting to a raw text line.
///
/// `**x**` runs are resolved first; the italic pass then pairs the asterisks
/// that remain, so italics can nest inside bold text without eating its
/// delimiters. Unpaired asterisks stay literal.
pub fn format_inline(text: &str) -> Vec<InlineSpan> {
    let mut plain = String::with_capacity(text.len());
    let mut bold: Vec<Range<usize>> = Vec::new();
    let mut last = 0;
    for caps in BOLD.captures_iter(text) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        plain.push_str(&text[last..whole.start()]);
        let start = plain.len();
        plain.push_str(inner.as_str());
        bold.push(start..plain.len());
        last = whole.end();
    }
    plain.push_str(&text[last..]);

    let mut italic: Vec<Range<usize>> = Vec::new();
    let mut delimiters: Vec<usize> = Vec::new();
    for caps in ITALIC.captures_iter(&plain) {
        let (Some(whole), Some(inner)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        delimiters.push(whole.start());
        delimiters.push(whole.end() - 1);
        italic.push(inner.range());
    }

    let mut spans: Vec<InlineSpan> = Vec::new();
    for (idx, ch) in plain.char_indices() {
        if delimiters.binary_search(&idx).is_ok() {
            continue;
        }
        let style = InlineStyle {
            strong: bold.iter().any(|r| r.contains(&idx)),
            emphasis: italic.iter().any(|r| r.contains(&idx)),
        };
        match spans.last_mut() {
            Some(span) if span.style() == style => span.push(ch),
            _ => spans.push(InlineSpan::new(ch.to_string(), style)),
        }
    }
    spans
}

fn trim_line(raw: &str) -> &str {
    raw.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}

fn classify(line: &str) -> LineKind<'_> {
    if let Some(rest) = line.strip_prefix("###") {
        return LineKind::Heading(3, rest);
    }
    if let Some(rest) = line.strip_prefix("##") {
        return LineKind::Heading(2, rest);
    }
    if let Some(rest) = line.strip_prefix('#') {
        return LineKind::Heading(1, rest);
    }
    if let Some(item) = line.strip_prefix("* ").or_else(|| line.strip_prefix("- ")) {
        return LineKind::ListItem(item);
    }
    // "- " loses its space to trimming; keep it as an empty item.
    if line == "*" || line == "-" {
        return LineKind::ListItem("");
    }
    if let Some(rest) = line.strip_prefix(ANSWER_PREFIX) {
        return LineKind::Answer(rest);
    }
    if line.is_empty() {
        LineKind::Blank
    } else {
        LineKind::Paragraph(line)
    }
}

fn flush_list(pending_items: &mut Vec<String>, nodes: &mut Vec<ContentNode>) {
    if pending_items.is_empty() {
        return;
    }
    nodes.push(ContentNode::ListBlock {
        items: std::mem::take(pending_items),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, text: &str) -> ContentNode {
        ContentNode::Heading {
            level,
            text: text.to_string(),
        }
    }

    fn paragraph(text: &str) -> ContentNode {
        ContentNode::Paragraph {
            text: text.to_string(),
        }
    }

    fn list(items: &[&str]) -> ContentNode {
        ContentNode::ListBlock {
            items: items.iter().map(ToString::to_string).collect(),
        }
    }

    fn span(text: &str, strong: bool, emphasis: bool) -> InlineSpan {
        InlineSpan::new(text.to_string(), InlineStyle { strong, emphasis })
    }

    #[test]
    fn test_render_empty_input() {
        assert!(render("").is_empty());
    }

    #[test]
    fn test_render_blank_lines_only() {
        assert!(render("\n   \n\t\n").is_empty());
    }

    #[test]
    fn test_render_heading_levels() {
        let nodes = render("# One\n## Two\n### Three");
        assert_eq!(
            nodes,
            vec![heading(1, "One"), heading(2, "Two"), heading(3, "Three")]
        );
    }

    #[test]
    fn test_render_heading_strips_marker_space() {
        assert_eq!(render("# Title"), vec![heading(1, "Title")]);
    }

    #[test]
    fn test_render_heading_without_space() {
        assert_eq!(render("##Enzymes"), vec![heading(2, "Enzymes")]);
    }

    #[test]
    fn test_render_four_hashes_is_level_three_with_literal_hash() {
        assert_eq!(render("#### Deep"), vec![heading(3, "# Deep")]);
    }

    #[test]
    fn test_render_indented_heading_is_trimmed() {
        assert_eq!(render("   ## Cells   "), vec![heading(2, "Cells")]);
    }

    #[test]
    fn test_render_list_flushed_before_heading() {
        assert_eq!(
            render("* a\n* b\n## Next"),
            vec![list(&["a", "b"]), heading(2, "Next")]
        );
    }

    #[test]
    fn test_render_mixed_markers_share_one_list() {
        assert_eq!(render("* a\n- b\n* c"), vec![list(&["a", "b", "c"])]);
    }

    #[test]
    fn test_render_blank_line_does_not_split_list() {
        assert_eq!(render("- a\n\n- b"), vec![list(&["a", "b"])]);
    }

    #[test]
    fn test_render_paragraph_splits_list() {
        assert_eq!(
            render("- a\ntext\n- b"),
            vec![list(&["a"]), paragraph("text"), list(&["b"])]
        );
    }

    #[test]
    fn test_render_trailing_list_is_flushed() {
        assert_eq!(
            render("Intro\n* one\n* two"),
            vec![paragraph("Intro"), list(&["one", "two"])]
        );
    }

    #[test]
    fn test_render_marker_only_item_is_kept() {
        assert_eq!(render("- \n- b"), vec![list(&["", "b"])]);
        assert_eq!(render("* a\n*"), vec![list(&["a", ""])]);
    }

    #[test]
    fn test_render_dash_without_space_is_paragraph() {
        assert_eq!(render("-a"), vec![paragraph("-a")]);
    }

    #[test]
    fn test_render_bold_line_is_paragraph_not_list() {
        assert_eq!(render("**Key**"), vec![paragraph("**Key**")]);
    }

    #[test]
    fn test_render_answer_strips_prefix() {
        assert_eq!(
            render("ANSWER: 42"),
            vec![ContentNode::AnswerBlock {
                text: "42".to_string()
            }]
        );
    }

    #[test]
    fn test_render_answer_flushes_list() {
        let nodes = render("* step one\nANSWER: done");
        assert_eq!(
            nodes,
            vec![
                list(&["step one"]),
                ContentNode::AnswerBlock {
                    text: "done".to_string()
                }
            ]
        );
    }

    #[test]
    fn test_render_lowercase_answer_is_paragraph() {
        assert_eq!(render("answer: no"), vec![paragraph("answer: no")]);
    }

    #[test]
    fn test_render_heading_wins_over_list_marker() {
        assert_eq!(render("## * not a list"), vec![heading(2, "* not a list")]);
    }

    #[test]
    fn test_render_crlf_input() {
        assert_eq!(
            render("# A\r\n* b\r\n"),
            vec![heading(1, "A"), list(&["b"])]
        );
    }

    #[test]
    fn test_render_unknown_markdown_passes_through() {
        assert_eq!(
            render("> quote\n1. first\n`code`"),
            vec![paragraph("> quote"), paragraph("1. first"), paragraph("`code`")]
        );
    }

    #[test]
    fn test_render_question_sheet() {
        let text = "## Questions\n\n**1.** Describe the structure of DNA. (3 marks)\nANSWER: Double helix of *two* polynucleotide strands.\n\n* Mark 1\n* Mark 2";
        let nodes = render(text);
        assert_eq!(nodes.len(), 4);
        assert_eq!(nodes[0], heading(2, "Questions"));
        assert!(matches!(nodes[1], ContentNode::Paragraph { .. }));
        assert!(matches!(nodes[2], ContentNode::AnswerBlock { .. }));
        assert_eq!(nodes[3], list(&["Mark 1", "Mark 2"]));
    }

    #[test]
    fn test_format_inline_plain() {
        assert_eq!(format_inline("plain text"), vec![span("plain text", false, false)]);
    }

    #[test]
    fn test_format_inline_empty() {
        assert!(format_inline("").is_empty());
    }

    #[test]
    fn test_format_inline_bold_and_italic() {
        assert_eq!(
            format_inline("**bold** and *italic*"),
            vec![
                span("bold", true, false),
                span(" and ", false, false),
                span("italic", false, true),
            ]
        );
    }

    #[test]
    fn test_format_inline_italic_nested_in_bold() {
        assert_eq!(
            format_inline("**x*y*z**"),
            vec![
                span("x", true, false),
                span("y", true, true),
                span("z", true, false),
            ]
        );
    }

    #[test]
    fn test_format_inline_bold_nested_in_italic() {
        assert_eq!(
            format_inline("*a **b** c*"),
            vec![
                span("a ", false, true),
                span("b", true, true),
                span(" c", false, true),
            ]
        );
    }

    #[test]
    fn test_format_inline_is_non_greedy() {
        assert_eq!(
            format_inline("**a** b **c**"),
            vec![
                span("a", true, false),
                span(" b ", false, false),
                span("c", true, false),
            ]
        );
    }

    #[test]
    fn test_format_inline_unmatched_asterisk_is_literal() {
        assert_eq!(format_inline("2 * 3"), vec![span("2 * 3", false, false)]);
    }

    #[test]
    fn test_format_inline_triple_asterisk() {
        // Bold needs four delimiters; the italic pass pairs the first two.
        assert_eq!(format_inline("***"), vec![span("*", false, false)]);
    }

    #[test]
    fn test_format_inline_keeps_markup_literal() {
        assert_eq!(
            format_inline("<script>alert(1)</script>"),
            vec![span("<script>alert(1)</script>", false, false)]
        );
    }

    #[test]
    fn test_format_inline_multibyte_text() {
        assert_eq!(
            format_inline("**β-glucose** → *α*"),
            vec![
                span("β-glucose", true, false),
                span(" → ", false, false),
                span("α", false, true),
            ]
        );
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn render_never_exceeds_line_count(text in "[#*\\-A-Za-z :\n]{0,200}") {
                let nodes = render(&text);
                prop_assert!(nodes.len() <= text.split('\n').count());
            }

            #[test]
            fn render_is_deterministic(text in "\\PC{0,200}") {
                prop_assert_eq!(render(&text), render(&text));
            }

            #[test]
            fn format_inline_never_gains_text(text in "[a-z* ]{0,80}") {
                let joined: String = format_inline(&text).iter().map(InlineSpan::text).collect();
                prop_assert!(joined.len() <= text.len());
                prop_assert_eq!(
                    joined.chars().filter(|c| *c != '*').collect::<String>(),
                    text.chars().filter(|c| *c != '*').collect::<String>()
                );
            }

            #[test]
            fn list_items_preserve_order(items in proptest::collection::vec("[a-z]{1,8}", 1..10)) {
                let text = items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n");
                prop_assert_eq!(render(&text), vec![ContentNode::ListBlock { items }]);
            }
        }
    }
}
