//! Issue-form import.
//!
//! Questions can be authored as issue-form markdown: a body made of
//! `### Header` sections (`Quiz ID`, `Question type`, `Question`, `Options`,
//! `Answer`, `Tolerance`, `Case sensitive`, `Explanation`). Each issue holds
//! one question; questions are grouped into quizzes by their quiz id and
//! ordered by issue number.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::model::QuizDefinition;
use crate::parser::{build_quiz, RawAnswer, RawQuestion};

/// Section contents that mean "left blank" in an issue form.
const EMPTY_MARKERS: [&str; 3] = ["no response", "_no response_", "none"];

/// An issue as loaded from a tracker export or a local markdown file.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub body: String,
}

/// The fields of one issue-form question.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueQuestion {
    pub quiz_id: String,
    /// Type name as written, e.g. `number` from `number (numeric answer)`.
    pub kind: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub tolerance: Option<f64>,
    pub case_sensitive: bool,
    pub explanation: String,
}

impl IssueQuestion {
    /// Returns true if the issue carries enough to be a quiz question.
    pub fn is_complete(&self) -> bool {
        !self.quiz_id.is_empty() && !self.question.is_empty() && !self.kind.is_empty()
    }

    fn into_raw(self) -> RawQuestion {
        RawQuestion {
            id: None,
            kind: self.kind,
            prompt: self.question,
            options: self.options,
            answer: (!self.answer.is_empty()).then_some(RawAnswer::Text(self.answer)),
            answers: vec![],
            tolerance: self.tolerance,
            case_sensitive: self.case_sensitive,
            explanation: (!self.explanation.is_empty()).then_some(self.explanation),
        }
    }
}

/// Parse an issue-form body into its question fields.
///
/// Unknown sections are ignored. Fails only if the tolerance section is not
/// a number.
pub fn parse_issue_body(body: &str) -> Result<IssueQuestion> {
    let mut question = IssueQuestion::default();
    let body = body.replace("\r\n", "\n");

    for section in body.split("\n### ") {
        let section = section.trim().trim_start_matches('#').trim_start();
        let Some((header, content)) = section.split_once('\n') else {
            continue;
        };
        let header = header.trim().to_lowercase();
        let mut content = content.trim();
        if EMPTY_MARKERS.contains(&content.to_lowercase().as_str()) {
            content = "";
        }

        if header.contains("quiz id") {
            question.quiz_id = content.to_string();
        } else if header.contains("question type") {
            question.kind = content
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .next()
                .unwrap_or_default()
                .to_string();
        } else if header.contains("question") && !header.contains("type") {
            question.question = content.to_string();
        } else if header.contains("options") {
            question.options = content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect();
        } else if header.contains("answer") && !header.contains("case") {
            question.answer = content.to_string();
        } else if header.contains("tolerance") {
            question.tolerance = if content.is_empty() {
                None
            } else {
                Some(
                    content
                        .parse::<f64>()
                        .with_context(|| format!("tolerance is not a number: '{content}'"))?,
                )
            };
        } else if header.contains("case sensitive") {
            question.case_sensitive = content.eq_ignore_ascii_case("true");
        } else if header.contains("explanation") {
            question.explanation = content.to_string();
        }
    }

    Ok(question)
}

/// Group issue-form questions into quizzes.
///
/// Issues whose body cannot be parsed, or that lack a quiz id, question
/// text, or type, are skipped. Within a
/// quiz, questions are ordered by issue number and given ids
/// `{quiz_id}_{index}`. Quizzes are returned ordered by id. A question with
/// an unsupported type or a malformed answer fails the import.
pub fn build_quizzes(issues: &[Issue]) -> Result<Vec<QuizDefinition>> {
    let mut grouped: BTreeMap<String, Vec<(u64, IssueQuestion)>> = BTreeMap::new();

    for issue in issues {
        if issue.body.trim().is_empty() {
            continue;
        }
        let question = match parse_issue_body(&issue.body) {
            Ok(question) => question,
            Err(e) => {
                tracing::warn!("failed to parse issue #{}, skipping: {e:#}", issue.number);
                continue;
            }
        };
        if !question.is_complete() {
            tracing::debug!("issue #{} is not a quiz question, skipping", issue.number);
            continue;
        }
        tracing::debug!("adding issue #{} to quiz {}", issue.number, question.quiz_id);
        grouped
            .entry(question.quiz_id.clone())
            .or_default()
            .push((issue.number, question));
    }

    grouped
        .into_iter()
        .map(|(quiz_id, mut questions)| {
            questions.sort_by_key(|(number, _)| *number);
            let raw = questions.into_iter().map(|(_, q)| q.into_raw()).collect();
            build_quiz(quiz_id.clone(), None, String::new(), raw)
                .with_context(|| format!("invalid question in quiz {quiz_id}"))
        })
        .collect()
}

/// Load issues from `*.md` files in a directory.
///
/// The issue number is the numeric filename prefix before the first `_`
/// (`12_loops.md` is issue 12); files without one get number 0.
pub fn load_issue_directory(dir: &Path) -> Result<Vec<Issue>> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut issues = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let path = entry?.path();
        if !path.is_file() || !path.extension().is_some_and(|ext| ext == "md") {
            continue;
        }
        let body = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read issue file: {}", path.display()))?;
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let number = title
            .split('_')
            .next()
            .and_then(|prefix| prefix.parse().ok())
            .unwrap_or(0);
        issues.push(Issue {
            number,
            title,
            body,
        });
    }

    issues.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.title.cmp(&b.title)));
    Ok(issues)
}
