//! CLI configuration.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// How `grade` renders a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Html,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "html" => Ok(Self::Html),
            other => anyhow::bail!("unknown format '{other}' (expected text, json, or html)"),
        }
    }
}

/// Top-level quizgrade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizgradeConfig {
    /// Quiz set file or directory used when `--quiz-set` is not given.
    #[serde(default = "default_quiz_dir")]
    pub quiz_dir: PathBuf,
    #[serde(default)]
    pub default_format: OutputFormat,
    #[serde(default = "default_show_explanations")]
    pub show_explanations: bool,
}

fn default_quiz_dir() -> PathBuf {
    PathBuf::from("./quiz-sets")
}
fn default_show_explanations() -> bool {
    true
}

impl Default for QuizgradeConfig {
    fn default() -> Self {
        Self {
            quiz_dir: default_quiz_dir(),
            default_format: OutputFormat::default(),
            show_explanations: default_show_explanations(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    let mut cursor = 0;
    while let Some(offset) = result[cursor..].find("${") {
        let start = cursor + offset;
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let var_name = &result[start + 2..start + end];
        let value = std::env::var(var_name).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
        // Substituted text is not expanded again.
        cursor = start + value.len();
    }
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `quizgrade.toml` in the current directory
/// 2. `~/.config/quizgrade/config.toml`
///
/// `QUIZGRADE_QUIZ_DIR` overrides `quiz_dir`.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizgradeConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from("quizgrade.toml");
            if local.exists() {
                Some(local)
            } else {
                dirs_path()
                    .map(|dir| dir.join("config.toml"))
                    .filter(|global| global.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => QuizgradeConfig::default(),
    };

    if let Ok(dir) = std::env::var("QUIZGRADE_QUIZ_DIR") {
        config.quiz_dir = PathBuf::from(dir);
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<QuizgradeConfig> {
    let mut config: QuizgradeConfig = toml::from_str(content)?;
    config.quiz_dir = PathBuf::from(resolve_env_vars(&config.quiz_dir.to_string_lossy()));
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizgrade"))
}
