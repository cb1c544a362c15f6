//! Prompt templates sent to the model.

use super::{GenerateError, RevisionMode};

const SYSTEM_INSTRUCTION: &str = "\
You are an expert AQA A-Level Biology tutor. \
Your explanations are clear, concise, and precisely tailored to the AQA specification. \
You must use markdown for formatting to structure your response effectively. \
Use headings (e.g., ##), subheadings (e.g., ###), bullet points (e.g., * or -), \
and bold text (e.g., **key term**) to make the information easy to digest. \
When generating questions, provide a detailed mark scheme or answer on a new line, \
prefixed with 'ANSWER:'.";

/// Fixed tutor persona and formatting rules.
pub const fn system_instruction() -> &'static str {
    SYSTEM_INSTRUCTION
}

/// Build the user prompt for one request.
///
/// # Errors
///
/// Returns [`GenerateError::InvalidRequest`] when the topic is blank, or when
/// `mode` is [`RevisionMode::Explain`] and `detail` is blank.
pub fn user_prompt(topic: &str, mode: RevisionMode, detail: &str) -> Result<String, GenerateError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(GenerateError::InvalidRequest("no topic selected".to_string()));
    }

    let prompt = match mode {
        RevisionMode::Summary => format!(
            "Provide a detailed summary of the key concepts for the AQA A-Level Biology topic: \
             \"{topic}\". Focus on the most important information for revision. Ensure the \
             content is accurate and directly relevant to the AQA syllabus."
        ),
        RevisionMode::Questions => format!(
            "Generate 5 challenging exam-style questions for the AQA A-Level Biology topic: \
             \"{topic}\". Include a mix of short-answer (1-3 marks) and longer-answer questions \
             (4-6 marks). For each question, provide a detailed answer or mark scheme \
             immediately following it."
        ),
        RevisionMode::Explain => {
            let concept = detail.trim();
            if concept.is_empty() {
                return Err(GenerateError::InvalidRequest(
                    "a concept to explain is required".to_string(),
                ));
            }
            format!(
                "Explain the concept of \"{concept}\" within the context of the AQA A-Level \
                 Biology topic: \"{topic}\". Break down the concept into simple, \
                 easy-to-understand parts. Use analogies if helpful."
            )
        }
    };
    Ok(prompt)
}
