//! The `quizgrade list` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use quizgrade_core::parser;

use crate::config::load_config_from;

pub fn execute(quiz_set: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    let quiz_set = match quiz_set {
        Some(path) => path,
        None => load_config_from(config_path.as_deref())?.quiz_dir,
    };
    let store = parser::load_quiz_store(&quiz_set)?;

    if store.is_empty() {
        println!("No quizzes found in {}.", quiz_set.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Quiz", "Title", "Questions"]);
    for quiz in store.quizzes() {
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(&quiz.title),
            Cell::new(quiz.len()),
        ]);
    }
    println!("{table}");

    Ok(())
}
