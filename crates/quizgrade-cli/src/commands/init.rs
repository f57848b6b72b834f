//! The `quizgrade init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("quizgrade.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("quiz-sets")?;
    write_if_missing(Path::new("quiz-sets/example.toml"), EXAMPLE_QUIZ_SET)?;

    std::fs::create_dir_all("responses")?;
    write_if_missing(Path::new("responses/example.json"), EXAMPLE_RESPONSES)?;

    println!("\nNext steps:");
    println!("  1. Run: quizgrade validate --quiz-set quiz-sets/example.toml");
    println!("  2. Run: quizgrade grade --responses responses/example.json");

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgrade configuration

quiz_dir = "./quiz-sets"
default_format = "text"
show_explanations = true
"#;

const EXAMPLE_QUIZ_SET: &str = r#"[quiz]
id = "example"
title = "Example Quiz"
description = "A short quiz covering every question type"

[[questions]]
id = "sum"
type = "numeric"
prompt = "What is 7 + 3?"
answer = 10
explanation = "7 + 3 = 10."

[[questions]]
id = "pi"
type = "numeric"
prompt = "Give pi to two decimal places."
answer = 3.14
tolerance = 0.005

[[questions]]
id = "capital"
type = "free-text"
prompt = "What is the capital of France?"
answer = "Paris"
explanation = "Paris has been the capital since 987."

[[questions]]
id = "planet"
type = "single-choice"
prompt = "Which planet is closest to the sun?"
options = ["Venus", "Mercury", "Mars"]
answer = 1

[[questions]]
id = "primes"
type = "multiple-choice"
prompt = "Which of these numbers are prime?"
options = ["2", "4", "5", "9"]
answers = [0, 2]
explanation = "2 and 5 have no divisors other than 1 and themselves."
"#;

const EXAMPLE_RESPONSES: &str = r#"{
  "sum": 10,
  "pi": "3.14159",
  "capital": "  paris ",
  "planet": 0,
  "primes": [0, 2]
}
"#;
