//! The grading engine.
//!
//! [`grade`] maps a quiz definition and a response snapshot to a
//! [`GradeResult`]. It has no side effects beyond logging and keeps no state
//! between calls, so grading the same input twice yields equal results.

use crate::error::QuizError;
use crate::model::{Expected, QuizDefinition};
use crate::results::{GradeResult, QuestionVerdict};
use crate::scoring::{percentage, Tier};
use crate::snapshot::{Response, ResponseSnapshot};

/// Rounding allowance on numeric tolerance bands, in units of machine
/// epsilon relative to the compared magnitudes. Covers the error of one
/// subtraction, so 0.4 against 0.3 ± 0.1 stays on the boundary.
const TOLERANCE_ULPS: f64 = 4.0;

/// Grade a response snapshot against a quiz.
///
/// Every question yields one verdict, in quiz order. Questions missing from
/// the snapshot, or answered with a response of the wrong kind, are
/// incorrect. Response ids the quiz does not define are ignored.
///
/// Fails with [`QuizError::InvalidQuizDefinition`] if the quiz has no
/// questions.
pub fn grade(
    quiz: &QuizDefinition,
    responses: &ResponseSnapshot,
) -> Result<GradeResult, QuizError> {
    if quiz.questions.is_empty() {
        return Err(QuizError::InvalidQuizDefinition {
            quiz_id: quiz.id.clone(),
            reason: "quiz has no questions".into(),
        });
    }

    let per_question: Vec<QuestionVerdict> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let is_correct = is_correct(&question.expected, responses.get(&question.id));
            let explanation = question.explanation().map(str::to_string);
            tracing::debug!(
                quiz = %quiz.id,
                question = %question.id,
                kind = %question.question_type(),
                is_correct,
                "graded question"
            );
            QuestionVerdict {
                id: question.id.clone(),
                number: index + 1,
                is_correct,
                has_explanation: explanation.is_some(),
                explanation,
            }
        })
        .collect();

    let total = per_question.len();
    let score = per_question.iter().filter(|v| v.is_correct).count();
    let percentage = percentage(score, total);
    let tier = Tier::from_percentage(percentage);

    tracing::info!(
        quiz = %quiz.id,
        score,
        total,
        percentage,
        %tier,
        "graded quiz"
    );

    Ok(GradeResult {
        quiz_id: quiz.id.clone(),
        per_question,
        score,
        total,
        percentage,
        tier,
    })
}

/// Decide whether `response` satisfies `expected`.
///
/// A missing response, an unanswered one, or one whose kind does not match
/// the question is never correct.
pub fn is_correct(expected: &Expected, response: Option<&Response>) -> bool {
    match expected {
        Expected::Numeric { target, tolerance } => match response {
            Some(Response::Numeric(Some(value))) => within_tolerance(*value, *target, *tolerance),
            _ => false,
        },
        Expected::FreeText {
            target,
            case_sensitive,
        } => match response {
            Some(Response::FreeText(text)) => text_matches(text, target, *case_sensitive),
            _ => false,
        },
        Expected::SingleChoice { target } => match response {
            Some(Response::SingleChoice(Some(choice))) => choice == target,
            _ => false,
        },
        Expected::MultipleChoice { targets } => match response {
            Some(Response::MultipleChoice(selected)) => !selected.is_empty() && selected == targets,
            _ => false,
        },
    }
}

fn within_tolerance(value: f64, target: f64, tolerance: f64) -> bool {
    if !value.is_finite() {
        return false;
    }
    let scale = value.abs().max(target.abs());
    (value - target).abs() <= tolerance + TOLERANCE_ULPS * f64::EPSILON * scale
}

fn text_matches(answer: &str, target: &str, case_sensitive: bool) -> bool {
    let answer = answer.trim();
    if answer.is_empty() {
        return false;
    }
    let target = target.trim();
    if case_sensitive {
        answer == target
    } else {
        answer.to_lowercase() == target.to_lowercase()
    }
}
