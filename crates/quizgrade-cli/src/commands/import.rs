//! The `quizgrade import` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgrade_core::{issue, parser};

pub fn execute(issues_dir: PathBuf, output: PathBuf) -> Result<()> {
    let issues = issue::load_issue_directory(&issues_dir)?;
    let quizzes = issue::build_quizzes(&issues)?;

    if quizzes.is_empty() {
        println!(
            "No quiz questions found in {} issue file(s).",
            issues.len()
        );
        return Ok(());
    }

    std::fs::create_dir_all(&output)
        .with_context(|| format!("failed to create output directory: {}", output.display()))?;

    for quiz in &quizzes {
        let path = output.join(format!("{}.toml", quiz.id));
        std::fs::write(&path, parser::to_toml_string(quiz)?)
            .with_context(|| format!("failed to write quiz set: {}", path.display()))?;
        println!(
            "Imported {} ({} questions) -> {}",
            quiz.id,
            quiz.len(),
            path.display()
        );

        for w in parser::validate_quiz(quiz) {
            let prefix = w
                .question_id
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
    }

    Ok(())
}
