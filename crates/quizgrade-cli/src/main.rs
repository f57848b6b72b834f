//! quizgrade CLI: grade quiz responses against authored quiz sets.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "quizgrade", version, about = "Quiz grading engine and checker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a responses file against a quiz
    Grade {
        /// JSON file mapping question ids to submitted values
        #[arg(long)]
        responses: PathBuf,

        /// Path to a quiz set file or directory (default: config quiz_dir)
        #[arg(long)]
        quiz_set: Option<PathBuf>,

        /// Quiz id (optional when the set holds a single quiz)
        #[arg(long)]
        quiz: Option<String>,

        /// Output format: text, json, html
        #[arg(long)]
        format: Option<String>,

        /// Write output to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Leave explanations out of the output
        #[arg(long)]
        no_explanations: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate quiz set files
    Validate {
        /// Path to quiz set file or directory
        #[arg(long)]
        quiz_set: PathBuf,
    },

    /// List quizzes in a quiz set
    List {
        /// Path to quiz set file or directory (default: config quiz_dir)
        #[arg(long)]
        quiz_set: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Convert issue-form markdown files into TOML quiz sets
    Import {
        /// Directory of issue markdown files
        #[arg(long)]
        issues: PathBuf,

        /// Directory to write quiz sets into
        #[arg(long, default_value = "./quiz-sets")]
        output: PathBuf,
    },

    /// Create starter config, example quiz set, and example responses
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizgrade=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            responses,
            quiz_set,
            quiz,
            format,
            output,
            no_explanations,
            config,
        } => commands::grade::execute(commands::grade::GradeArgs {
            responses,
            quiz_set,
            quiz,
            format,
            output,
            no_explanations,
            config,
        }),
        Commands::Validate { quiz_set } => commands::validate::execute(quiz_set),
        Commands::List { quiz_set, config } => commands::list::execute(quiz_set, config),
        Commands::Import { issues, output } => commands::import::execute(issues, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
