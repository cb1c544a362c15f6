use revise::content::{ContentNode, Document, LineType, render};
use revise::generator::{ContentGenerator, FixtureGenerator, RevisionMode};
use revise::ui::print::write_document;

const QUESTIONS: &str = include_str!("fixtures/questions.md");

#[test]
fn test_fixture_renders_expected_structure() {
    let nodes = render(QUESTIONS);
    let answers = nodes
        .iter()
        .filter(|node| matches!(node, ContentNode::AnswerBlock { .. }))
        .count();
    assert_eq!(answers, 3);
    assert_eq!(
        nodes.first(),
        Some(&ContentNode::Heading {
            level: 2,
            text: "Exam-style Questions: Cells".to_string()
        })
    );
    let list = nodes
        .iter()
        .find_map(|node| match node {
            ContentNode::ListBlock { items } => Some(items),
            _ => None,
        })
        .expect("fixture has a list");
    assert_eq!(list.len(), 4);
    assert_eq!(list[3], "");
}

#[test]
fn test_fixture_layout_respects_width() {
    for width in [30u16, 60, 100] {
        let doc = Document::from_text(QUESTIONS, width);
        for line in doc.lines() {
            let cols = unicode_width::UnicodeWidthStr::width(line.content());
            assert!(cols <= usize::from(width), "{:?} at {width}", line.content());
        }
    }
}

#[test]
fn test_fixture_generator_to_printed_text() {
    let generator = FixtureGenerator::new(QUESTIONS);
    let text = generator
        .generate("Cells", RevisionMode::Questions, "")
        .unwrap();
    let doc = Document::from_text(&text, 80);
    assert!(
        doc.lines()
            .iter()
            .any(|line| *line.line_type() == LineType::AnswerLabel)
    );

    let mut out = Vec::new();
    write_document(&mut out, &doc, false).unwrap();
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("Describe the function of the rough endoplasmic reticulum."));
    assert!(printed.contains("▌ Answer:"));
    assert!(!printed.contains("**"));
    assert!(!printed.contains("ANSWER:"));
}

#[test]
fn test_render_is_deterministic() {
    assert_eq!(render(QUESTIONS), render(QUESTIONS));
}
