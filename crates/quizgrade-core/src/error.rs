//! Quiz error types.
//!
//! Grading and lookup return these directly. File loading wraps them in
//! `anyhow::Error`, so callers can still downcast to classify a failure.

use thiserror::Error;

/// Errors raised while looking up, loading, or grading a quiz.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuizError {
    /// The requested quiz id is not registered in the store.
    #[error("quiz not found: {0}")]
    QuizNotFound(String),

    /// The quiz cannot be graded as defined (e.g. it has no questions).
    #[error("invalid quiz definition '{quiz_id}': {reason}")]
    InvalidQuizDefinition { quiz_id: String, reason: String },

    /// A question declares a type outside the supported set.
    #[error("unknown question type '{type_name}' for question {question_id}")]
    UnknownQuestionType {
        question_id: String,
        type_name: String,
    },

    /// The authored expected answer is missing or malformed.
    #[error("invalid answer for question {question_id}: {reason}")]
    InvalidAnswer { question_id: String, reason: String },
}

impl QuizError {
    /// Returns `true` if this error comes from the authored quiz content
    /// rather than from the caller's request.
    pub fn is_authoring_error(&self) -> bool {
        !matches!(self, QuizError::QuizNotFound(_))
    }
}
