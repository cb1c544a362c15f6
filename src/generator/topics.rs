//! AQA A-Level Biology topic list.

/// Syllabus topics in course order. The first is the default.
pub const BIOLOGY_TOPICS: [&str; 8] = [
    "Biological molecules",
    "Cells",
    "Organisms exchange substances with their environment",
    "Genetic information, variation and relationships between organisms",
    "Energy transfers in and between organisms",
    "Organisms respond to changes in their internal and external environments",
    "Genetics, populations, evolution and ecosystems",
    "The control of gene expression",
];

/// Resolve a `--topic` value to an index into [`BIOLOGY_TOPICS`].
///
/// Accepts a 1-based number, an exact name (case-insensitive), or a unique
/// case-insensitive substring.
pub fn find_topic(query: &str) -> Option<usize> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Ok(number) = query.parse::<usize>() {
        return (1..=BIOLOGY_TOPICS.len())
            .contains(&number)
            .then(|| number - 1);
    }

    let needle = query.to_lowercase();
    if let Some(index) = BIOLOGY_TOPICS
        .iter()
        .position(|topic| topic.to_lowercase() == needle)
    {
        return Some(index);
    }

    let mut matches = BIOLOGY_TOPICS
        .iter()
        .enumerate()
        .filter(|(_, topic)| topic.to_lowercase().contains(&needle))
        .map(|(index, _)| index);
    let first = matches.next()?;
    matches.next().is_none().then_some(first)
}
