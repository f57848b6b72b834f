//! Grading result types.

use serde::{Deserialize, Serialize};

use crate::scoring::Tier;

/// The verdict for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionVerdict {
    /// Question id, as authored.
    pub id: String,
    /// 1-based display number.
    pub number: usize,
    /// Whether the response was correct.
    pub is_correct: bool,
    /// Whether the question carries explanation text.
    pub has_explanation: bool,
    /// The explanation text, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// The outcome of grading one response snapshot against one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// The quiz that was graded.
    pub quiz_id: String,
    /// One entry per question, in quiz order.
    pub per_question: Vec<QuestionVerdict>,
    /// Number of correct answers.
    pub score: usize,
    /// Number of questions.
    pub total: usize,
    /// `round(100 * score / total)`, halves rounded up.
    pub percentage: u8,
    /// Qualitative bucket for `percentage`.
    pub tier: Tier,
}

impl GradeResult {
    /// Verdicts that carry an explanation, in quiz order.
    pub fn explanations(&self) -> impl Iterator<Item = &QuestionVerdict> {
        self.per_question.iter().filter(|v| v.has_explanation)
    }

    /// Returns true if every question was answered correctly.
    pub fn is_perfect(&self) -> bool {
        self.score == self.total
    }

    /// Look up the verdict for a question id.
    pub fn verdict(&self, id: &str) -> Option<&QuestionVerdict> {
        self.per_question.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(
        id: &str,
        number: usize,
        is_correct: bool,
        explanation: Option<&str>,
    ) -> QuestionVerdict {
        QuestionVerdict {
            id: id.into(),
            number,
            is_correct,
            has_explanation: explanation.is_some(),
            explanation: explanation.map(str::to_string),
        }
    }

    fn result() -> GradeResult {
        GradeResult {
            quiz_id: "r".into(),
            per_question: vec![
                verdict("a", 1, true, None),
                verdict("b", 2, false, Some("because")),
            ],
            score: 1,
            total: 2,
            percentage: 50,
            tier: Tier::Average,
        }
    }

    #[test]
    fn explanations_and_lookup() {
        let result = result();
        let ids: Vec<&str> = result.explanations().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
        assert_eq!(result.verdict("b").map(|v| v.number), Some(2));
        assert!(result.verdict("z").is_none());
        assert!(!result.is_perfect());
    }

    #[test]
    fn serializes_without_missing_explanations() {
        let json = serde_json::to_value(result()).unwrap();
        assert_eq!(json["tier"], "average");
        assert!(json["per_question"][0].get("explanation").is_none());
        assert_eq!(json["per_question"][1]["explanation"], "because");
    }
}
