//! Guided setup: the five fixed questions and the resulting brief

/// Setup questions asked before a guided interview, in order.
pub const SETUP_QUESTIONS: [&str; 5] = [
    "Who is your target audience for this survey?",
    "How much time do you think respondents should spend on the survey?",
    "What topic or domain do you want the survey to focus on?",
    "What kind of insights or outcomes do you hope to achieve from the survey?",
    "What specific questions would you like me to ask?",
];

/// Operator answers to the setup questions.
#[derive(Debug, Clone)]
pub struct SurveyBrief {
    pub audience: String,
    pub duration_minutes: String,
    pub topic: String,
    pub goals: String,
    /// Specific questions to interleave, split from the fifth answer.
    pub seed_questions: Vec<String>,
}

impl SurveyBrief {
    /// Builds a brief from the five answers, in the order of [`SETUP_QUESTIONS`].
    pub fn from_answers(answers: [String; 5]) -> Self {
        let [audience, duration_minutes, topic, goals, questions] = answers;
        Self {
            audience,
            duration_minutes,
            topic,
            goals,
            seed_questions: parse_seed_questions(&questions),
        }
    }
}

/// Splits a `;`-separated list of questions, dropping empty entries.
pub fn parse_seed_questions(input: &str) -> Vec<String> {
    input
        .split(';')
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_questions() {
        let questions = parse_seed_questions("How often?; What brand? ;;  ");
        assert_eq!(questions, vec!["How often?", "What brand?"]);
    }

    #[test]
    fn test_parse_seed_questions_empty_input() {
        assert!(parse_seed_questions("").is_empty());
        assert!(parse_seed_questions("   ").is_empty());
    }

    #[test]
    fn test_from_answers() {
        let brief = SurveyBrief::from_answers([
            "commuters".to_string(),
            "5".to_string(),
            "transit apps".to_string(),
            "feature priorities".to_string(),
            "Do you pay for transit?; Which app?".to_string(),
        ]);
        assert_eq!(brief.audience, "commuters");
        assert_eq!(brief.topic, "transit apps");
        assert_eq!(brief.seed_questions.len(), 2);
    }
}
