//! Core data model types for quizgrade.
//!
//! Question definitions are authored ahead of time and never mutated while
//! grading. The expected answer is a closed tagged enum so every question
//! type is matched exhaustively by the engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The closed set of supported question types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    Numeric,
    FreeText,
    SingleChoice,
    MultipleChoice,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::Numeric => write!(f, "numeric"),
            QuestionType::FreeText => write!(f, "free-text"),
            QuestionType::SingleChoice => write!(f, "single-choice"),
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "numeric" | "number" => Ok(QuestionType::Numeric),
            "free-text" | "free_text" | "text" => Ok(QuestionType::FreeText),
            "single-choice" | "single_choice" | "single" => Ok(QuestionType::SingleChoice),
            "multiple-choice" | "multiple_choice" | "multiple" => {
                Ok(QuestionType::MultipleChoice)
            }
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Type-dependent expected-answer payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Expected {
    /// Correct when the answer lies within `tolerance` of `target`, inclusive.
    Numeric { target: f64, tolerance: f64 },
    /// Correct when the trimmed answer equals the trimmed target.
    FreeText {
        target: String,
        case_sensitive: bool,
    },
    /// Correct when exactly this choice index is selected.
    SingleChoice { target: usize },
    /// Correct when the selected indices equal this set exactly.
    MultipleChoice { targets: BTreeSet<usize> },
}

impl Expected {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Expected::Numeric { .. } => QuestionType::Numeric,
            Expected::FreeText { .. } => QuestionType::FreeText,
            Expected::SingleChoice { .. } => QuestionType::SingleChoice,
            Expected::MultipleChoice { .. } => QuestionType::MultipleChoice,
        }
    }
}

/// A single authored question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    /// Identifier, unique within its quiz.
    pub id: String,
    /// Question text shown to the user.
    #[serde(default)]
    pub prompt: String,
    /// Choice labels; the position of a label is its choice index.
    #[serde(default)]
    pub options: Vec<String>,
    /// What counts as a correct answer.
    pub expected: Expected,
    /// Text shown after grading, whether or not the answer was correct.
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionDefinition {
    pub fn question_type(&self) -> QuestionType {
        self.expected.question_type()
    }

    /// The explanation text, if one was authored and is not blank.
    pub fn explanation(&self) -> Option<&str> {
        self.explanation
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

/// A named, ordered set of questions. Order determines display numbering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDefinition {
    /// Unique identifier for this quiz.
    pub id: String,
    /// Human-readable title.
    pub title: String,
    /// Description of this quiz.
    #[serde(default)]
    pub description: String,
    /// The questions, in display order.
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
}

impl QuizDefinition {
    /// Number of questions in the quiz.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by id.
    pub fn question(&self, id: &str) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Derive a display title from a quiz id: `quiz1_python_basics` becomes
/// `Quiz1 Python Basics`.
pub fn default_title(quiz_id: &str) -> String {
    quiz_id
        .replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
