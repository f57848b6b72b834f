//! Response snapshots.
//!
//! A snapshot is the user's answers at the moment grading is requested. It
//! is built fresh for every grading call and never retained by the engine.
//! [`ResponseSnapshot::from_form`] turns raw form values (as an input
//! provider reads them from widgets) into typed responses.

use std::collections::{BTreeSet, HashMap};

use serde::Deserialize;

use crate::model::{QuestionType, QuizDefinition};

/// A user's typed answer to one question.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// Parsed number, or `None` if the field was empty or not numeric.
    Numeric(Option<f64>),
    /// Raw text, possibly empty.
    FreeText(String),
    /// The selected choice, or `None` if nothing was selected.
    SingleChoice(Option<usize>),
    /// The selected choices, possibly empty.
    MultipleChoice(BTreeSet<usize>),
}

impl Response {
    pub fn question_type(&self) -> QuestionType {
        match self {
            Response::Numeric(_) => QuestionType::Numeric,
            Response::FreeText(_) => QuestionType::FreeText,
            Response::SingleChoice(_) => QuestionType::SingleChoice,
            Response::MultipleChoice(_) => QuestionType::MultipleChoice,
        }
    }

    /// Returns true if this response holds no usable answer.
    pub fn is_unanswered(&self) -> bool {
        match self {
            Response::Numeric(value) => value.is_none(),
            Response::FreeText(text) => text.trim().is_empty(),
            Response::SingleChoice(choice) => choice.is_none(),
            Response::MultipleChoice(choices) => choices.is_empty(),
        }
    }
}

/// Mapping from question id to the user's response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseSnapshot {
    responses: HashMap<String, Response>,
}

impl ResponseSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a response, replacing any earlier one for the same id.
    pub fn insert(&mut self, question_id: impl Into<String>, response: Response) {
        self.responses.insert(question_id.into(), response);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, question_id: impl Into<String>, response: Response) -> Self {
        self.insert(question_id, response);
        self
    }

    pub fn get(&self, question_id: &str) -> Option<&Response> {
        self.responses.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Question ids present in the snapshot, in no particular order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.responses.keys().map(String::as_str)
    }

    /// Build a snapshot from raw form values.
    ///
    /// Each value is interpreted according to the type of the question with
    /// the same id. Ids the quiz does not define are skipped. Values that
    /// cannot be read as an answer (an empty or non-numeric number field, a
    /// radio group with several checked entries) become unanswered.
    pub fn from_form(quiz: &QuizDefinition, form: &FormInput) -> Self {
        let mut snapshot = Self::new();
        for (id, value) in form {
            let Some(question) = quiz.question(id) else {
                tracing::debug!(
                    "ignoring response for unknown question '{id}' in quiz {}",
                    quiz.id
                );
                continue;
            };
            snapshot.insert(id.clone(), value.to_response(question.question_type()));
        }
        snapshot
    }
}

impl<K: Into<String>> FromIterator<(K, Response)> for ResponseSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, Response)>>(iter: I) -> Self {
        Self {
            responses: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Raw form values keyed by question id.
pub type FormInput = HashMap<String, FormValue>;

/// A raw value as read from an input widget.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    /// Nothing entered or checked.
    Empty,
    Number(f64),
    Text(String),
    /// Every checked entry of a checkbox or radio group.
    Many(Vec<FormScalar>),
}

/// One checked entry of a choice group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormScalar {
    Number(f64),
    Text(String),
}

impl FormScalar {
    fn as_index(&self) -> Option<usize> {
        match self {
            FormScalar::Number(n) => index_from_f64(*n),
            FormScalar::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl FormValue {
    /// Interpret this raw value as a response to a question of `kind`.
    pub fn to_response(&self, kind: QuestionType) -> Response {
        match kind {
            QuestionType::Numeric => Response::Numeric(match self {
                FormValue::Number(n) => Some(*n),
                FormValue::Text(s) => s.trim().parse::<f64>().ok(),
                FormValue::Empty | FormValue::Many(_) => None,
            }),
            QuestionType::FreeText => Response::FreeText(match self {
                FormValue::Text(s) => s.clone(),
                FormValue::Number(n) => n.to_string(),
                FormValue::Empty | FormValue::Many(_) => String::new(),
            }),
            QuestionType::SingleChoice => Response::SingleChoice(match self {
                FormValue::Number(n) => index_from_f64(*n),
                FormValue::Text(s) => s.trim().parse().ok(),
                FormValue::Many(items) if items.len() == 1 => items[0].as_index(),
                FormValue::Many(_) | FormValue::Empty => None,
            }),
            QuestionType::MultipleChoice => Response::MultipleChoice(match self {
                FormValue::Many(items) => items.iter().filter_map(FormScalar::as_index).collect(),
                FormValue::Number(n) => index_from_f64(*n).into_iter().collect(),
                FormValue::Text(s) => s.trim().parse::<usize>().ok().into_iter().collect(),
                FormValue::Empty => BTreeSet::new(),
            }),
        }
    }
}

fn index_from_f64(n: f64) -> Option<usize> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0).then_some(n as usize)
}
