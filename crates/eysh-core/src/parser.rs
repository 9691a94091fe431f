//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Question, QuestionBank, Topic};

/// Intermediate TOML structure for parsing question bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "default_subject")]
    subject: String,
}

fn default_subject() -> String {
    "math".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: String,
    topic: String,
    content: String,
    #[serde(default)]
    subject: Option<String>,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    #[serde(default)]
    options: Vec<String>,
    correct_answer: usize,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
}

fn default_difficulty() -> u8 {
    2
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank`.
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let subject = parsed.bank.subject;
    let questions = parsed
        .questions
        .into_iter()
        .map(|q| Question {
            id: q.id,
            subject: q.subject.unwrap_or_else(|| subject.clone()),
            topic: q.topic.trim().to_lowercase(),
            difficulty: q.difficulty,
            content: q.content,
            options: q.options,
            correct_answer: q.correct_answer,
            explanation: q.explanation,
            tags: q.tags,
        })
        .collect();

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        questions,
    })
}

/// Recursively load all `.toml` question banks from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<_>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// Load a bank from a file, or merge every bank found under a directory.
pub fn load_bank_path(path: &Path) -> Result<QuestionBank> {
    if path.is_dir() {
        let banks = load_bank_directory(path)?;
        if banks.is_empty() {
            anyhow::bail!("no question banks found in {}", path.display());
        }
        Ok(QuestionBank::merged(&path.display().to_string(), banks))
    } else {
        parse_question_bank(path)
    }
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question ID (if applicable).
    pub question_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.questions.is_empty() {
        warnings.push(ValidationWarning {
            question_id: None,
            message: "bank has no questions".into(),
        });
    }

    let mut seen_ids = HashSet::new();
    for q in &bank.questions {
        let mut warn = |message: String| {
            warnings.push(ValidationWarning {
                question_id: Some(q.id.clone()),
                message,
            })
        };

        if !seen_ids.insert(q.id.as_str()) {
            warn(format!("duplicate question ID: {}", q.id));
        }
        if q.correct_answer >= q.options.len() {
            warn(format!(
                "correct_answer {} is outside the {} options",
                q.correct_answer,
                q.options.len()
            ));
        }
        if !(1..=10).contains(&q.difficulty) {
            warn(format!("difficulty {} is outside 1-10", q.difficulty));
        }
        if q.topic.parse::<Topic>().is_err() {
            warn(format!("unknown topic: {}", q.topic));
        }
        if q.content.trim().is_empty() {
            warn("content is empty".into());
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "diagnostic"
name = "Diagnostic test"
description = "Placement questions"

[[questions]]
id = "alg-1"
topic = "algebra"
difficulty = 2
content = "Solve 2x + 3 = 7"
options = ["1", "2", "3", "4"]
correct_answer = 1
explanation = "2x = 4"
tags = ["linear"]

[[questions]]
id = "geo-1"
topic = "Geometry"
difficulty = 4
content = "Sum of the interior angles of a triangle?"
options = ["90", "180", "270", "360"]
correct_answer = 1
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("bank.toml")).unwrap();
        assert_eq!(bank.id, "diagnostic");
        assert_eq!(bank.questions.len(), 2);
        assert_eq!(bank.questions[0].subject, "math");
        assert_eq!(bank.questions[0].tags, vec!["linear"]);
        assert_eq!(bank.questions[1].topic, "geometry");
        assert!(validate_question_bank(&bank).is_empty());
    }

    #[test]
    fn parse_missing_optional_fields() {
        let toml = r#"
[bank]
id = "minimal"
name = "Minimal"

[[questions]]
id = "q1"
topic = "vectors"
content = "Length of (3, 4)?"
correct_answer = 0
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("bank.toml")).unwrap();
        assert_eq!(bank.questions[0].difficulty, 2);
        assert!(bank.questions[0].explanation.is_none());
    }

    #[test]
    fn validate_reports_each_problem() {
        let toml = r#"
[bank]
id = "broken"
name = "Broken"

[[questions]]
id = "same"
topic = "algebra"
content = "ok"
options = ["a", "b"]
correct_answer = 0

[[questions]]
id = "same"
topic = "chemistry"
difficulty = 12
content = "  "
options = ["a", "b"]
correct_answer = 2
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("bank.toml")).unwrap();
        let warnings = validate_question_bank(&bank);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert_eq!(warnings.len(), 5, "{messages:?}");
        assert!(messages.iter().any(|m| m.contains("duplicate")));
        assert!(messages.iter().any(|m| m.contains("outside the 2 options")));
        assert!(messages.iter().any(|m| m.contains("outside 1-10")));
        assert!(messages.iter().any(|m| m.contains("unknown topic")));
        assert!(messages.iter().any(|m| m.contains("content is empty")));
    }

    #[test]
    fn validate_empty_bank() {
        let bank = parse_question_bank_str(
            "[bank]\nid = \"e\"\nname = \"Empty\"\n",
            &PathBuf::from("bank.toml"),
        )
        .unwrap();
        let warnings = validate_question_bank(&bank);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].question_id.is_none());
    }

    #[test]
    fn parse_malformed_toml() {
        let result = parse_question_bank_str("[bank\nid =", &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.toml"), VALID_TOML).unwrap();
        std::fs::write(dir.path().join("b.toml"), "not toml [").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);

        let merged = load_bank_path(dir.path()).unwrap();
        assert_eq!(merged.questions.len(), 2);
        assert!(merged.questions.iter().any(|q| q.id == "geo-1"));
    }

    #[test]
    fn load_directory_rejects_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_bank_directory(file.path()).is_err());
    }
}
