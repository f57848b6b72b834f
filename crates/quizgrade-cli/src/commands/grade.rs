//! The `quizgrade grade` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use quizgrade_core::engine;
use quizgrade_core::model::QuizDefinition;
use quizgrade_core::parser;
use quizgrade_core::results::GradeResult;
use quizgrade_core::snapshot::{FormInput, ResponseSnapshot};
use quizgrade_core::store::QuizStore;
use quizgrade_report::html::generate_html;
use quizgrade_report::message::{result_message, score_line, tier_icon};

use crate::config::{load_config_from, OutputFormat};

pub struct GradeArgs {
    pub responses: PathBuf,
    pub quiz_set: Option<PathBuf>,
    pub quiz: Option<String>,
    pub format: Option<String>,
    pub output: Option<PathBuf>,
    pub no_explanations: bool,
    pub config: Option<PathBuf>,
}

pub fn execute(args: GradeArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let format = match &args.format {
        Some(f) => f.parse::<OutputFormat>()?,
        None => config.default_format,
    };
    let show_explanations = config.show_explanations && !args.no_explanations;

    let quiz_set = args.quiz_set.unwrap_or(config.quiz_dir);
    let store = parser::load_quiz_store(&quiz_set)?;
    let quiz = select_quiz(&store, args.quiz.as_deref(), &quiz_set)?;

    let form = read_responses(&args.responses)?;
    let snapshot = ResponseSnapshot::from_form(quiz, &form);
    let result = engine::grade(quiz, &snapshot)?;

    let rendered = match format {
        OutputFormat::Text => render_text(quiz, &result, show_explanations),
        OutputFormat::Json => serde_json::to_string_pretty(&result)?,
        OutputFormat::Html => generate_html(quiz, &result, show_explanations),
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, rendered)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            eprintln!("Result written to: {}", path.display());
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Pick the quiz to grade; `--quiz` may be left out when the set holds one quiz.
fn select_quiz<'a>(
    store: &'a QuizStore,
    quiz_id: Option<&str>,
    quiz_set: &Path,
) -> Result<&'a QuizDefinition> {
    if let Some(id) = quiz_id {
        return Ok(store.get(id)?);
    }
    let quizzes = store.quizzes();
    match quizzes.as_slice() {
        [] => anyhow::bail!("no quizzes found in {}", quiz_set.display()),
        [only] => Ok(*only),
        _ => anyhow::bail!(
            "quiz set holds several quizzes, pass --quiz with one of: {}",
            store.ids().join(", ")
        ),
    }
}

fn read_responses(path: &Path) -> Result<FormInput> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read responses: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse responses: {}", path.display()))
}

fn render_text(quiz: &QuizDefinition, result: &GradeResult, show_explanations: bool) -> String {
    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Result"]);
    for verdict in &result.per_question {
        table.add_row(vec![
            Cell::new(verdict.number),
            Cell::new(&verdict.id),
            Cell::new(if verdict.is_correct { "correct" } else { "incorrect" }),
        ]);
    }

    let mut out = format!("Quiz: {} [{}]\n{table}\n", quiz.title, quiz.id);
    out.push_str(&format!(
        "{} {}\n{}\n",
        tier_icon(result.tier),
        score_line(result.score, result.total, result.percentage),
        result_message(result.percentage)
    ));

    if show_explanations {
        let mut explanations = result.explanations().peekable();
        if explanations.peek().is_some() {
            out.push_str("\nExplanations:\n");
            for verdict in explanations {
                let mark = if verdict.is_correct { "✓" } else { "✗" };
                out.push_str(&format!(
                    "  {mark} Question {}: {}\n",
                    verdict.number,
                    verdict.explanation.as_deref().unwrap_or_default()
                ));
            }
        }
    }

    out
}
