//! Role-tagged transcripts and the collected-response log
//!
//! Both structures are append-only for the life of one run; nothing here
//! is persisted.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Marker a surveyor reply uses to end a conversation.
pub const END_SENTINEL: &str = "END SURVEY";

/// Returns true if the text contains the end-of-survey marker.
pub fn is_end_sentinel(text: &str) -> bool {
    text.to_uppercase().contains(END_SENTINEL)
}

/// Who produced a transcript turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Surveyor,
    Respondent,
}

impl Speaker {
    /// Label used when rendering transcripts for evaluation.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Surveyor => "Survey Generator",
            Speaker::Respondent => "Respondent",
        }
    }
}

/// A single role-tagged turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub content: String,
}

/// Ordered turns produced during one simulated conversation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_question(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            speaker: Speaker::Surveyor,
            content: content.into(),
        });
    }

    pub fn push_answer(&mut self, content: impl Into<String>) {
        self.turns.push(Turn {
            speaker: Speaker::Respondent,
            content: content.into(),
        });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Number of surveyor questions asked so far.
    pub fn question_count(&self) -> usize {
        self.turns
            .iter()
            .filter(|t| t.speaker == Speaker::Surveyor)
            .count()
    }

    /// Renders the transcript as "label: content" lines.
    pub fn render(&self) -> String {
        self.turns
            .iter()
            .map(|t| format!("{}: {}", t.speaker.label(), t.content))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Renders a batch of conversations with numbered separators.
pub fn render_batch(transcripts: &[Transcript]) -> String {
    let mut rendered = String::new();
    for (i, transcript) in transcripts.iter().enumerate() {
        let _ = write!(
            rendered,
            "\n--- Conversation {} ---\n{}\n",
            i + 1,
            transcript.render()
        );
    }
    rendered
}

/// Answers collected from the surveyed user in chat mode
#[derive(Debug, Clone, Default)]
pub struct ResponseLog {
    responses: Vec<String>,
}

impl ResponseLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, response: impl Into<String>) {
        self.responses.push(response.into());
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Renders the responses as a numbered list for the analyst.
    pub fn render_numbered(&self) -> String {
        let mut rendered = String::new();
        for (i, response) in self.responses.iter().enumerate() {
            let _ = writeln!(rendered, "{}. {}", i + 1, response);
        }
        rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel_detection() {
        assert!(is_end_sentinel("END SURVEY"));
        assert!(is_end_sentinel("Thanks for your time. end survey."));
        assert!(is_end_sentinel("That concludes it. End Survey!"));
        assert!(!is_end_sentinel("Would you end the survey early?"));
    }

    #[test]
    fn test_transcript_render() {
        let mut transcript = Transcript::new();
        transcript.push_question("How often do you ride the bus?");
        transcript.push_answer("Twice a week.");
        assert_eq!(
            transcript.render(),
            "Survey Generator: How often do you ride the bus?\nRespondent: Twice a week."
        );
    }

    #[test]
    fn test_question_count_ignores_answers() {
        let mut transcript = Transcript::new();
        transcript.push_question("q1");
        transcript.push_answer("a1");
        transcript.push_question("q2");
        assert_eq!(transcript.question_count(), 2);
        assert_eq!(transcript.turns().len(), 3);
    }

    #[test]
    fn test_render_batch_separators() {
        let mut first = Transcript::new();
        first.push_question("q");
        let second = Transcript::new();
        let rendered = render_batch(&[first, second]);
        assert!(rendered.contains("--- Conversation 1 ---"));
        assert!(rendered.contains("--- Conversation 2 ---"));
        assert!(rendered.contains("Survey Generator: q"));
    }

    #[test]
    fn test_response_log_numbering() {
        let mut log = ResponseLog::new();
        log.push("first");
        log.push("second");
        assert_eq!(log.render_numbered(), "1. first\n2. second\n");
        assert_eq!(log.len(), 2);
    }
}
