//! Quiz set parser.
//!
//! Loads quiz definitions from TOML quiz set files and from JSON page data
//! (an object mapping quiz id to `{ "questions": [...] }`), validates them,
//! and writes definitions back out as TOML.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::model::{default_title, Expected, QuestionDefinition, QuestionType, QuizDefinition};
use crate::store::QuizStore;

/// Intermediate TOML structure for quiz set files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlQuizHeader {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    description: String,
}

/// One quiz inside JSON page data.
#[derive(Debug, Deserialize)]
struct JsonQuiz {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    questions: Vec<RawQuestion>,
}

/// A question as authored, before its answer is checked against its type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct RawQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "question", skip_serializing_if = "String::is_empty")]
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<RawAnswer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub answers: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub case_sensitive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The `answer` key accepts a number, a string, or a list of indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawAnswer {
    Index(u64),
    Number(f64),
    Text(String),
    List(Vec<usize>),
}

impl RawQuestion {
    /// Check the authored answer against the declared type and build the
    /// question definition. Missing ids default to `{quiz_id}_{index}`.
    pub(crate) fn into_definition(
        self,
        quiz_id: &str,
        index: usize,
    ) -> Result<QuestionDefinition, QuizError> {
        let id = self
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| format!("{quiz_id}_{index}"));

        let kind: QuestionType = self
            .kind
            .parse()
            .map_err(|_: String| QuizError::UnknownQuestionType {
                question_id: id.clone(),
                type_name: self.kind.clone(),
            })?;

        let invalid = |reason: String| QuizError::InvalidAnswer {
            question_id: id.clone(),
            reason,
        };

        let expected = match kind {
            QuestionType::Numeric => {
                let target = match &self.answer {
                    Some(RawAnswer::Index(n)) => *n as f64,
                    Some(RawAnswer::Number(n)) => *n,
                    Some(RawAnswer::Text(s)) => s
                        .trim()
                        .parse::<f64>()
                        .map_err(|_| invalid(format!("'{s}' is not a number")))?,
                    Some(RawAnswer::List(_)) => {
                        return Err(invalid("expected a single number".into()))
                    }
                    None => return Err(invalid("missing answer".into())),
                };
                if !target.is_finite() {
                    return Err(invalid("answer must be a finite number".into()));
                }
                let tolerance = self.tolerance.unwrap_or(0.0);
                if !tolerance.is_finite() || tolerance < 0.0 {
                    return Err(invalid(format!(
                        "tolerance must be a non-negative number, got {tolerance}"
                    )));
                }
                Expected::Numeric { target, tolerance }
            }
            QuestionType::FreeText => {
                let target = match &self.answer {
                    Some(RawAnswer::Text(s)) => s.clone(),
                    Some(RawAnswer::Index(n)) => n.to_string(),
                    Some(RawAnswer::Number(n)) => n.to_string(),
                    Some(RawAnswer::List(_)) => {
                        return Err(invalid("expected a single text answer".into()))
                    }
                    None => return Err(invalid("missing answer".into())),
                };
                Expected::FreeText {
                    target,
                    case_sensitive: self.case_sensitive,
                }
            }
            QuestionType::SingleChoice => {
                let target = match &self.answer {
                    Some(answer) => single_index(answer).ok_or_else(|| {
                        invalid("expected a single non-negative choice index".into())
                    })?,
                    None => return Err(invalid("missing answer".into())),
                };
                Expected::SingleChoice { target }
            }
            QuestionType::MultipleChoice => {
                let targets: BTreeSet<usize> = if !self.answers.is_empty() {
                    self.answers.iter().copied().collect()
                } else {
                    match &self.answer {
                        Some(RawAnswer::List(items)) => items.iter().copied().collect(),
                        Some(RawAnswer::Text(s)) => parse_index_list(s)
                            .ok_or_else(|| invalid(format!("'{s}' is not a list of indices")))?,
                        Some(answer) => BTreeSet::from([single_index(answer)
                            .ok_or_else(|| invalid("expected choice indices".into()))?]),
                        None => return Err(invalid("missing answer".into())),
                    }
                };
                if targets.is_empty() {
                    return Err(invalid("expected at least one correct choice index".into()));
                }
                Expected::MultipleChoice { targets }
            }
        };

        Ok(QuestionDefinition {
            id,
            prompt: self.prompt,
            options: self.options,
            expected,
            explanation: self.explanation.filter(|e| !e.trim().is_empty()),
        })
    }
}

impl From<&QuestionDefinition> for RawQuestion {
    fn from(question: &QuestionDefinition) -> Self {
        let mut raw = RawQuestion {
            id: Some(question.id.clone()),
            kind: question.question_type().to_string(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            explanation: question.explanation().map(str::to_string),
            ..Default::default()
        };
        match &question.expected {
            Expected::Numeric { target, tolerance } => {
                raw.answer = Some(RawAnswer::Number(*target));
                raw.tolerance = (*tolerance != 0.0).then_some(*tolerance);
            }
            Expected::FreeText {
                target,
                case_sensitive,
            } => {
                raw.answer = Some(RawAnswer::Text(target.clone()));
                raw.case_sensitive = *case_sensitive;
            }
            Expected::SingleChoice { target } => {
                raw.answer = Some(RawAnswer::Index(*target as u64));
            }
            Expected::MultipleChoice { targets } => {
                raw.answers = targets.iter().copied().collect();
            }
        }
        raw
    }
}

fn single_index(answer: &RawAnswer) -> Option<usize> {
    match answer {
        RawAnswer::Index(n) => usize::try_from(*n).ok(),
        RawAnswer::Number(n) => {
            (n.is_finite() && *n >= 0.0 && n.fract() == 0.0).then_some(*n as usize)
        }
        RawAnswer::Text(s) => s.trim().parse().ok(),
        RawAnswer::List(items) if items.len() == 1 => Some(items[0]),
        RawAnswer::List(_) => None,
    }
}

/// Parse `"0, 2"` into `{0, 2}`. Returns `None` if any entry is not an index.
fn parse_index_list(s: &str) -> Option<BTreeSet<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<usize>().ok())
        .collect()
}

pub(crate) fn build_quiz(
    id: String,
    title: Option<String>,
    description: String,
    questions: Vec<RawQuestion>,
) -> Result<QuizDefinition, QuizError> {
    let questions = questions
        .into_iter()
        .enumerate()
        .map(|(index, q)| q.into_definition(&id, index))
        .collect::<Result<Vec<_>, _>>()?;

    let title = title
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(|| default_title(&id));

    Ok(QuizDefinition {
        id,
        title,
        description,
        questions,
    })
}

/// Parse a TOML quiz set string (useful for testing).
pub fn parse_quiz_toml_str(content: &str, source_path: &Path) -> Result<QuizDefinition> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let quiz = build_quiz(
        parsed.quiz.id,
        parsed.quiz.title,
        parsed.quiz.description,
        parsed.questions,
    )
    .with_context(|| format!("invalid quiz set: {}", source_path.display()))?;
    Ok(quiz)
}

/// Parse JSON page data into quiz definitions, ordered by quiz id.
pub fn parse_quiz_json_str(content: &str, source_path: &Path) -> Result<Vec<QuizDefinition>> {
    let parsed: BTreeMap<String, JsonQuiz> = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    parsed
        .into_iter()
        .map(|(id, quiz)| {
            build_quiz(id, quiz.title, quiz.description, quiz.questions)
                .with_context(|| format!("invalid quiz data: {}", source_path.display()))
        })
        .collect()
}

/// Load every quiz defined in one file, dispatching on its extension.
pub fn parse_quiz_file(path: &Path) -> Result<Vec<QuizDefinition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz set file: {}", path.display()))?;

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_quiz_json_str(&content, path),
        _ => Ok(vec![parse_quiz_toml_str(&content, path)?]),
    }
}

/// Recursively load all `.toml` and `.json` quiz set files from a directory.
///
/// Any file that fails to parse fails the whole load.
pub fn load_quiz_directory(dir: &Path) -> Result<Vec<QuizDefinition>> {
    let mut quizzes = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            quizzes.extend(load_quiz_directory(&path)?);
        } else if path
            .extension()
            .is_some_and(|ext| ext == "toml" || ext == "json")
        {
            let loaded = parse_quiz_file(&path)?;
            tracing::debug!("loaded {} quiz(zes) from {}", loaded.len(), path.display());
            quizzes.extend(loaded);
        }
    }

    Ok(quizzes)
}

/// Load a quiz set file or directory.
pub fn load_quizzes(path: &Path) -> Result<Vec<QuizDefinition>> {
    if path.is_dir() {
        load_quiz_directory(path)
    } else {
        parse_quiz_file(path)
    }
}

/// Load a quiz set file or directory into a store.
pub fn load_quiz_store(path: &Path) -> Result<QuizStore> {
    Ok(QuizStore::from_quizzes(load_quizzes(path)?))
}

/// Serialize a quiz definition as a TOML quiz set.
pub fn to_toml_string(quiz: &QuizDefinition) -> Result<String> {
    let file = TomlQuizFile {
        quiz: TomlQuizHeader {
            id: quiz.id.clone(),
            title: Some(quiz.title.clone()),
            description: quiz.description.clone(),
        },
        questions: quiz.questions.iter().map(RawQuestion::from).collect(),
    };
    toml::to_string_pretty(&file)
        .with_context(|| format!("failed to serialize quiz: {}", quiz.id))
}

/// A warning from quiz validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a quiz for common authoring issues.
pub fn validate_quiz(quiz: &QuizDefinition) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if quiz.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "quiz has no questions and cannot be graded".into(),
        });
    }

    // Duplicate ids make responses ambiguous
    let mut seen_ids = HashSet::new();
    for question in &quiz.questions {
        if !seen_ids.insert(&question.id) {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message: format!("duplicate question ID: {}", question.id),
            });
        }
    }

    for question in &quiz.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(question.id.clone()),
                message,
            })
        };

        if question.prompt.trim().is_empty() {
            warn("prompt is empty".into());
        }

        let option_count = question.options.len();
        match &question.expected {
            Expected::Numeric { .. } => {}
            Expected::FreeText { target, .. } => {
                if target.trim().is_empty() {
                    warn("free-text answer is empty and can never be matched".into());
                }
            }
            Expected::SingleChoice { target } => {
                if option_count == 0 {
                    warn("single-choice question has no options".into());
                } else if *target >= option_count {
                    warn(format!(
                        "answer index {target} is out of range for {option_count} options"
                    ));
                }
            }
            Expected::MultipleChoice { targets } => {
                if targets.is_empty() {
                    warn("multiple-choice question has no correct answers".into());
                }
                if option_count == 0 {
                    warn("multiple-choice question has no options".into());
                } else if let Some(bad) = targets.iter().find(|&&t| t >= option_count) {
                    warn(format!(
                        "answer index {bad} is out of range for {option_count} options"
                    ));
                }
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[quiz]
id = "quiz1_python_basics"
title = "Quiz 1: Python basics"
description = "Self-assessment on Python fundamentals"

[[questions]]
id = "len"
type = "numeric"
prompt = "What does `len([1, 2, 3])` return?"
answer = 3

[[questions]]
id = "pi"
type = "number"
prompt = "Give pi to two decimals."
answer = 3.14
tolerance = 0.01
explanation = "pi is roughly 3.14159."

[[questions]]
id = "keyword"
type = "text"
prompt = "Which keyword defines a function?"
answer = "def"
case_sensitive = true

[[questions]]
id = "mutable"
type = "single"
prompt = "Which type is mutable?"
options = ["tuple", "list", "str"]
answer = 1

[[questions]]
id = "numbers"
type = "multiple"
prompt = "Which are numeric types?"
options = ["int", "str", "float"]
answers = [0, 2]
"#;

    fn parse(toml: &str) -> Result<QuizDefinition> {
        parse_quiz_toml_str(toml, &PathBuf::from("test.toml"))
    }

    #[test]
    fn parse_valid_toml() {
        let quiz = parse(VALID_TOML).unwrap();
        assert_eq!(quiz.id, "quiz1_python_basics");
        assert_eq!(quiz.title, "Quiz 1: Python basics");
        assert_eq!(quiz.questions.len(), 5);
        assert_eq!(
            quiz.questions[0].expected,
            Expected::Numeric {
                target: 3.0,
                tolerance: 0.0
            }
        );
        assert_eq!(
            quiz.questions[1].expected,
            Expected::Numeric {
                target: 3.14,
                tolerance: 0.01
            }
        );
        assert_eq!(
            quiz.questions[2].expected,
            Expected::FreeText {
                target: "def".into(),
                case_sensitive: true
            }
        );
        assert_eq!(
            quiz.questions[3].expected,
            Expected::SingleChoice { target: 1 }
        );
        assert_eq!(
            quiz.questions[4].expected,
            Expected::MultipleChoice {
                targets: BTreeSet::from([0, 2])
            }
        );
        assert_eq!(quiz.questions[1].explanation(), Some("pi is roughly 3.14159."));
        assert!(validate_quiz(&quiz).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[quiz]
id = "r_basics"

[[questions]]
type = "text"
question = "Assignment operator in R?"
answer = "<-"

[[questions]]
type = "multiple"
prompt = "Pick vectors"
options = ["c(1, 2)", "list()", "1:3"]
answer = "0, 2"
"#;
        let quiz = parse(toml).unwrap();
        assert_eq!(quiz.title, "R Basics");
        assert_eq!(quiz.questions[0].id, "r_basics_0");
        assert_eq!(quiz.questions[0].prompt, "Assignment operator in R?");
        assert_eq!(quiz.questions[1].id, "r_basics_1");
        assert_eq!(
            quiz.questions[1].expected,
            Expected::MultipleChoice {
                targets: BTreeSet::from([0, 2])
            }
        );
        assert_eq!(
            quiz.questions[0].expected,
            Expected::FreeText {
                target: "<-".into(),
                case_sensitive: false
            }
        );
    }

    #[test]
    fn unknown_question_type_fails_loudly() {
        let toml = r#"
[quiz]
id = "bad"

[[questions]]
id = "essay1"
type = "essay"
answer = "anything"
"#;
        let err = parse(toml).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QuizError>(),
            Some(&QuizError::UnknownQuestionType {
                question_id: "essay1".into(),
                type_name: "essay".into(),
            })
        );
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        let toml = r#"
[quiz]
id = "bad"

[[questions]]
id = "n"
type = "numeric"
answer = 1
tolerance = -0.5
"#;
        let err = parse(toml).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<QuizError>(),
            Some(QuizError::InvalidAnswer { question_id, .. }) if question_id == "n"
        ));
    }

    #[test]
    fn malformed_answers_are_rejected() {
        let missing = r#"
[quiz]
id = "bad"

[[questions]]
id = "s"
type = "single"
"#;
        assert!(parse(missing).is_err());

        let fractional = r#"
[quiz]
id = "bad"

[[questions]]
id = "s"
type = "single"
answer = 1.5
"#;
        assert!(parse(fractional).is_err());

        let not_a_number = r#"
[quiz]
id = "bad"

[[questions]]
id = "n"
type = "numeric"
answer = "ten"
"#;
        assert!(parse(not_a_number).is_err());
    }

    #[test]
    fn multiple_choice_needs_a_correct_answer() {
        for answer in ["", "answer = \"\"", "answer = []", "answers = []"] {
            let toml = format!(
                "[quiz]\nid = \"bad\"\n\n[[questions]]\nid = \"m\"\ntype = \"multiple\"\noptions = [\"a\", \"b\"]\n{answer}\n"
            );
            let err = parse(&toml).unwrap_err();
            assert!(
                matches!(
                    err.downcast_ref::<QuizError>(),
                    Some(QuizError::InvalidAnswer { question_id, .. }) if question_id == "m"
                ),
                "accepted {answer:?}"
            );
        }
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        assert!(parse(bad).is_err());
    }

    #[test]
    fn parse_page_data_json() {
        let json = r#"{
  "quiz2_data_structures": {
    "questions": [
      {"id": "quiz2_data_structures_0", "type": "number", "answer": 4.0, "tolerance": 0},
      {"id": "quiz2_data_structures_1", "type": "text", "answer": "dict", "case_sensitive": false,
       "explanation": "Dictionaries map keys to values."},
      {"id": "quiz2_data_structures_2", "type": "single", "answer": 0},
      {"id": "quiz2_data_structures_3", "type": "multiple", "answers": [1, 2]}
    ]
  },
  "quiz1_python_basics": {
    "questions": [
      {"type": "single", "answer": 2}
    ]
  }
}"#;
        let quizzes = parse_quiz_json_str(json, &PathBuf::from("quiz.json")).unwrap();
        assert_eq!(quizzes.len(), 2);
        assert_eq!(quizzes[0].id, "quiz1_python_basics");
        assert_eq!(quizzes[0].questions[0].id, "quiz1_python_basics_0");
        assert_eq!(quizzes[1].questions.len(), 4);
        assert_eq!(
            quizzes[1].questions[0].expected,
            Expected::Numeric {
                target: 4.0,
                tolerance: 0.0
            }
        );
        assert_eq!(
            quizzes[1].questions[3].expected,
            Expected::MultipleChoice {
                targets: BTreeSet::from([1, 2])
            }
        );
    }

    #[test]
    fn validate_reports_authoring_issues() {
        let toml = r#"
[quiz]
id = "issues"

[[questions]]
id = "same"
type = "single"
prompt = "First"
options = ["a", "b"]
answer = 5

[[questions]]
id = "same"
type = "multiple"
prompt = ""
answers = [0]
"#;
        let mut quiz = parse(toml).unwrap();
        quiz.questions[1].expected = Expected::MultipleChoice {
            targets: BTreeSet::new(),
        };
        let warnings = validate_quiz(&quiz);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("out of range")));
        assert!(messages.iter().any(|m| m.contains("prompt is empty")));
        assert!(messages.iter().any(|m| m.contains("no correct answers")));
        assert!(messages.iter().any(|m| m.contains("no options")));
    }

    #[test]
    fn validate_empty_quiz() {
        let quiz = parse("[quiz]\nid = \"empty\"\n").unwrap();
        let warnings = validate_quiz(&quiz);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("no questions"));
    }

    #[test]
    fn toml_output_parses_back() {
        let quiz = parse(VALID_TOML).unwrap();
        let written = to_toml_string(&quiz).unwrap();
        let reparsed = parse(&written).unwrap();
        assert_eq!(reparsed, quiz);
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("basics.toml"), VALID_TOML).unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(
            dir.path().join("nested/page.json"),
            r#"{"extra": {"questions": [{"type": "single", "answer": 0}]}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let store = load_quiz_store(dir.path()).unwrap();
        assert_eq!(store.ids(), vec!["extra", "quiz1_python_basics"]);
    }

    #[test]
    fn load_directory_fails_on_bad_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("good.toml"), VALID_TOML).unwrap();
        std::fs::write(
            dir.path().join("bad.toml"),
            "[quiz]\nid = \"bad\"\n[[questions]]\ntype = \"essay\"\n",
        )
        .unwrap();

        let err = load_quiz_directory(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("unknown question type"));
    }
}
