//! The `quizgrade validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizgrade_core::parser;

pub fn execute(quiz_set_path: PathBuf) -> Result<()> {
    let quizzes = parser::load_quizzes(&quiz_set_path)?;
    anyhow::ensure!(
        !quizzes.is_empty(),
        "no quiz sets found in {}",
        quiz_set_path.display()
    );

    let mut total_warnings = 0;

    for quiz in &quizzes {
        println!(
            "Quiz: {} [{}] ({} questions)",
            quiz.title,
            quiz.id,
            quiz.len()
        );

        let warnings = parser::validate_quiz(quiz);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All quiz sets valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
