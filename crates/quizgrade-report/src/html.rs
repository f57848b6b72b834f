//! HTML rendering.
//!
//! Produces the result box and explanation list for a graded quiz, either as
//! fragments for an existing page or as a self-contained HTML file with all
//! CSS inlined.

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use quizgrade_core::model::QuizDefinition;
use quizgrade_core::results::GradeResult;

use crate::message::{result_message, score_line, tier_class, tier_icon};

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`([^`]+)`").expect("inline code pattern is valid"));
static STRONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("strong pattern is valid"));
static EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*]+)\*").expect("emphasis pattern is valid"));

/// Escape `text`, then render its inline markdown: `` `code` ``,
/// `**strong**` and `*emphasis*`.
fn render_inline(text: &str) -> String {
    let escaped = html_escape(text);
    let html = INLINE_CODE.replace_all(&escaped, "<code>$1</code>");
    let html = STRONG.replace_all(&html, "<strong>$1</strong>");
    EMPHASIS.replace_all(&html, "<em>$1</em>").into_owned()
}

/// Render the score box: tier icon, score line, and message.
pub fn render_result_box(result: &GradeResult) -> String {
    format!(
        "<div class=\"result-box {}\">\n  <span class=\"result-emoji\">{}</span>\n  <span class=\"result-score\">{}</span>\n  <span class=\"result-message\">{}</span>\n</div>\n",
        tier_class(result.tier),
        tier_icon(result.tier),
        score_line(result.score, result.total, result.percentage),
        html_escape(result_message(result.percentage)),
    )
}

/// Render the explanation list, or `None` if no question has an explanation.
pub fn render_explanations(result: &GradeResult) -> Option<String> {
    let mut items = result.explanations().peekable();
    items.peek()?;

    let mut html = String::from("<h4>Explanations</h4>\n");
    for verdict in items {
        let (icon, class) = if verdict.is_correct {
            ("✓", "expl-correct")
        } else {
            ("✗", "expl-incorrect")
        };
        html.push_str(&format!(
            "<div class=\"explanation-item {class}\">\n  <strong>{icon} Question {} :</strong> {}\n</div>\n",
            verdict.number,
            render_inline(verdict.explanation.as_deref().unwrap_or_default()),
        ));
    }
    Some(html)
}

/// Generate a standalone HTML page for one graded quiz.
pub fn generate_html(
    quiz: &QuizDefinition,
    result: &GradeResult,
    show_explanations: bool,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizgrade: {}</title>\n",
        html_escape(&quiz.title)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&quiz.title)));
    if !quiz.description.is_empty() {
        html.push_str(&format!(
            "<p class=\"meta\">{}</p>\n",
            html_escape(&quiz.description)
        ));
    }
    html.push_str("</header>\n");

    html.push_str(&format!(
        "<section class=\"quiz-result\" id=\"result-{}\">\n",
        html_escape(&quiz.id)
    ));
    html.push_str(&render_result_box(result));
    html.push_str("</section>\n");

    // Per-question verdicts
    html.push_str("<section class=\"questions\">\n");
    html.push_str("<table>\n");
    html.push_str("<thead><tr><th>#</th><th>Question</th><th>Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for verdict in &result.per_question {
        let question = quiz.question(&verdict.id);
        let prompt = question
            .map(|q| q.prompt.as_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(verdict.id.as_str());
        let mut cell = render_inline(prompt);
        if let Some(q) = question.filter(|q| !q.options.is_empty()) {
            cell.push_str("<ul class=\"options\">");
            for option in &q.options {
                cell.push_str(&format!("<li>{}</li>", render_inline(option)));
            }
            cell.push_str("</ul>");
        }
        let (class, text) = if verdict.is_correct {
            ("correct", "Correct")
        } else {
            ("incorrect", "Incorrect")
        };
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{cell}</td><td>{text}</td></tr>\n",
            verdict.number,
        ));
    }
    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    if show_explanations {
        if let Some(explanations) = render_explanations(result) {
            html.push_str(&format!(
                "<section class=\"quiz-explanations\" id=\"explanations-{}\">\n",
                html_escape(&quiz.id)
            ));
            html.push_str(&explanations);
            html.push_str("</section>\n");
        }
    }

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(result).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(
    quiz: &QuizDefinition,
    result: &GradeResult,
    show_explanations: bool,
    path: &Path,
) -> Result<()> {
    let html = generate_html(quiz, result, show_explanations);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; --mid: #fef9c3; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; --mid: #713f12; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
.meta { color: #6b7280; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.correct, .expl-correct { background: var(--pass); }
.incorrect, .expl-incorrect { background: var(--fail); }
.result-box { display: flex; gap: 1rem; align-items: center; padding: 1rem; border-radius: 8px; }
.result-excellent, .result-good { background: var(--pass); }
.result-average { background: var(--mid); }
.result-poor { background: var(--fail); }
.result-emoji { font-size: 2rem; }
.result-score { font-weight: bold; }
.options { margin: 0.25rem 0 0; padding-left: 1.25rem; }
.explanation-item { padding: 0.5rem 1rem; margin: 0.5rem 0; border-radius: 6px; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizgrade_core::engine::grade;
    use quizgrade_core::model::{Expected, QuestionDefinition};
    use quizgrade_core::snapshot::{Response, ResponseSnapshot};

    fn make_quiz() -> QuizDefinition {
        QuizDefinition {
            id: "html-quiz".into(),
            title: "Operators <basics>".into(),
            description: "Self check".into(),
            questions: vec![
                QuestionDefinition {
                    id: "cmp".into(),
                    prompt: "Is `1 < 2`?".into(),
                    options: vec!["yes".into(), "no".into()],
                    expected: Expected::SingleChoice { target: 0 },
                    explanation: Some("1 is less than 2 & that's \"true\".".into()),
                },
                QuestionDefinition {
                    id: "pow".into(),
                    prompt: "2 ** 3?".into(),
                    options: vec![],
                    expected: Expected::Numeric {
                        target: 8.0,
                        tolerance: 0.0,
                    },
                    explanation: None,
                },
            ],
        }
    }

    fn make_result(quiz: &QuizDefinition) -> GradeResult {
        let responses = ResponseSnapshot::new().with("cmp", Response::SingleChoice(Some(1)));
        grade(quiz, &responses).unwrap()
    }

    #[test]
    fn result_box_shows_score_and_tier() {
        let quiz = make_quiz();
        let html = render_result_box(&make_result(&quiz));
        assert!(html.contains("result-poor"));
        assert!(html.contains("Score: 0/2 (0%)"));
        assert!(html.contains("Review the material and try again!"));
    }

    #[test]
    fn explanations_are_escaped_and_marked() {
        let quiz = make_quiz();
        let html = render_explanations(&make_result(&quiz)).unwrap();
        assert!(html.contains("expl-incorrect"));
        assert!(html.contains("✗ Question 1"));
        assert!(html.contains("&amp; that&#x27;s &quot;true&quot;"));
        assert!(!html.contains("Question 2"));
    }

    #[test]
    fn no_explanations_section_without_explanations() {
        let mut quiz = make_quiz();
        quiz.questions[0].explanation = None;
        assert!(render_explanations(&make_result(&quiz)).is_none());
    }

    #[test]
    fn html_report_contains_required_elements() {
        let quiz = make_quiz();
        let result = make_result(&quiz);
        let html = generate_html(&quiz, &result, true);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Operators &lt;basics&gt;"));
        assert!(html.contains("id=\"explanations-html-quiz\""));
        assert!(html.contains("Is <code>1 &lt; 2</code>?"));
        assert!(html.contains("<ul class=\"options\"><li>yes</li><li>no</li></ul>"));

        let hidden = generate_html(&quiz, &result, false);
        assert!(!hidden.contains("id=\"explanations-html-quiz\""));
        assert!(!hidden.contains("✗ Question 1"));
    }

    #[test]
    fn inline_markdown_is_rendered_after_escaping() {
        assert_eq!(
            render_inline("Use `a<b` for **strict** and *loose* order"),
            "Use <code>a&lt;b</code> for <strong>strict</strong> and <em>loose</em> order"
        );
        assert_eq!(render_inline("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(render_inline("<script>"), "&lt;script&gt;");
    }

    #[test]
    fn explanations_render_inline_markdown() {
        let mut quiz = make_quiz();
        quiz.questions[0].explanation = Some("`<` means **less than**".into());
        let html = render_explanations(&make_result(&quiz)).unwrap();
        assert!(html.contains("<code>&lt;</code> means <strong>less than</strong>"));
    }

    #[test]
    fn html_report_write_to_file() {
        let quiz = make_quiz();
        let result = make_result(&quiz);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/report.html");

        write_html_report(&quiz, &result, true, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("result-box"));
    }
}
