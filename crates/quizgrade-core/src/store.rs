//! Quiz definition store.
//!
//! A registry of quiz definitions keyed by quiz id. It is populated once by
//! a loader and then only read; grading borrows definitions from it.

use std::collections::HashMap;

use crate::error::QuizError;
use crate::model::QuizDefinition;

/// Read-only registry of quiz definitions.
#[derive(Debug, Clone, Default)]
pub struct QuizStore {
    quizzes: HashMap<String, QuizDefinition>,
}

impl QuizStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded quizzes. A later quiz replaces an earlier
    /// one with the same id.
    pub fn from_quizzes(quizzes: impl IntoIterator<Item = QuizDefinition>) -> Self {
        let mut store = Self::new();
        for quiz in quizzes {
            store.insert(quiz);
        }
        tracing::info!("quiz store populated with {} quizzes", store.len());
        store
    }

    /// Register a quiz, returning the definition it replaced, if any.
    pub fn insert(&mut self, quiz: QuizDefinition) -> Option<QuizDefinition> {
        let previous = self.quizzes.insert(quiz.id.clone(), quiz);
        if let Some(prev) = &previous {
            tracing::warn!("quiz '{}' was defined more than once, keeping the last", prev.id);
        }
        previous
    }

    /// Look up a quiz by id.
    pub fn get(&self, quiz_id: &str) -> Result<&QuizDefinition, QuizError> {
        self.quizzes
            .get(quiz_id)
            .ok_or_else(|| QuizError::QuizNotFound(quiz_id.to_string()))
    }

    pub fn contains(&self, quiz_id: &str) -> bool {
        self.quizzes.contains_key(quiz_id)
    }

    /// All registered quiz ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.quizzes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// All quizzes, sorted by id.
    pub fn quizzes(&self) -> Vec<&QuizDefinition> {
        let mut quizzes: Vec<&QuizDefinition> = self.quizzes.values().collect();
        quizzes.sort_by(|a, b| a.id.cmp(&b.id));
        quizzes
    }

    pub fn len(&self) -> usize {
        self.quizzes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quizzes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz(id: &str, title: &str) -> QuizDefinition {
        QuizDefinition {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            questions: vec![],
        }
    }

    #[test]
    fn get_registered_quiz() {
        let store = QuizStore::from_quizzes([quiz("b", "B"), quiz("a", "A")]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("a").unwrap().title, "A");
        assert_eq!(store.ids(), vec!["a", "b"]);
    }

    #[test]
    fn missing_quiz_is_not_found() {
        let store = QuizStore::new();
        assert_eq!(
            store.get("nope").unwrap_err(),
            QuizError::QuizNotFound("nope".into())
        );
    }

    #[test]
    fn later_definition_replaces_earlier() {
        let mut store = QuizStore::new();
        assert!(store.insert(quiz("a", "First")).is_none());
        let replaced = store.insert(quiz("a", "Second")).unwrap();
        assert_eq!(replaced.title, "First");
        assert_eq!(store.get("a").unwrap().title, "Second");
        assert_eq!(store.len(), 1);
    }
}
