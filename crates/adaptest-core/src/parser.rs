//! TOML question bank parser.
//!
//! Loads question banks from TOML files and directories, validates them,
//! and writes banks back out (used by `adaptest fetch`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Question, RawQuestion};
use crate::pool::{QuestionPool, SOFT_MIN_QUESTIONS};

/// A question bank file: header metadata plus the two question subsets.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pool: QuestionPool,
}

/// Intermediate TOML structure for bank files.
#[derive(Debug, Serialize, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    main: Vec<RawQuestion>,
    #[serde(default)]
    buffer: Vec<RawQuestion>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

/// Parse a single TOML file into a `QuestionBank`.
pub fn parse_question_bank(path: &Path) -> Result<QuestionBank> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question bank: {}", path.display()))?;

    parse_question_bank_str(&content, path)
}

/// Parse a TOML string into a `QuestionBank` (useful for testing).
pub fn parse_question_bank_str(content: &str, source_path: &Path) -> Result<QuestionBank> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let main = convert_subset(parsed.main, "main")?;
    let buffer = convert_subset(parsed.buffer, "buffer")?;

    Ok(QuestionBank {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        pool: QuestionPool::new(main, buffer),
    })
}

fn convert_subset(raw: Vec<RawQuestion>, subset: &str) -> Result<Vec<Question>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| {
            Question::try_from(r).with_context(|| format!("invalid question {subset}[{i}]"))
        })
        .collect()
}

/// Serialize a bank back to TOML and write it to `path`.
pub fn write_question_bank(path: &Path, bank: &QuestionBank) -> Result<()> {
    let file = TomlBankFile {
        bank: TomlBankHeader {
            id: bank.id.clone(),
            name: bank.name.clone(),
            description: bank.description.clone(),
        },
        main: subset_to_raw(&bank.pool, 0, bank.pool.main_len()),
        buffer: subset_to_raw(&bank.pool, bank.pool.main_len(), bank.pool.len()),
    };

    let content = toml::to_string_pretty(&file).context("failed to serialize question bank")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)
        .with_context(|| format!("failed to write question bank to {}", path.display()))?;
    Ok(())
}

fn subset_to_raw(pool: &QuestionPool, start: usize, end: usize) -> Vec<RawQuestion> {
    (start..end)
        .filter_map(|i| pool.get(i))
        .cloned()
        .map(RawQuestion::from)
        .collect()
}

/// Recursively load all `.toml` bank files from a directory.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<QuestionBank>> {
    let mut banks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            banks.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_question_bank(&path) {
                Ok(bank) => banks.push(bank),
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }
    }

    Ok(banks)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question location (e.g. "main[3]"), if applicable.
    pub location: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a bank for common issues. These are warnings, not errors: the
/// hard invariants are already enforced by `Question` construction.
pub fn validate_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    // A session draws 10 questions; below the soft minimum the adaptive
    // selection has too little to choose from.
    if bank.pool.len() < SOFT_MIN_QUESTIONS {
        warnings.push(ValidationWarning {
            location: None,
            message: format!(
                "bank has {} questions, fewer than the recommended minimum of {}",
                bank.pool.len(),
                SOFT_MIN_QUESTIONS
            ),
        });
    }

    // Duplicate prompts usually mean a copy-paste mistake.
    let mut seen_prompts = std::collections::HashSet::new();
    for (i, q) in bank.pool.iter().enumerate() {
        if !seen_prompts.insert(q.prompt()) {
            warnings.push(ValidationWarning {
                location: Some(location_of(bank, i)),
                message: format!("duplicate prompt: {}", q.prompt()),
            });
        }
    }

    // The main subset is expected to sit in the medium difficulty band;
    // outliers belong in the buffer.
    for i in 0..bank.pool.main_len() {
        if let Some(q) = bank.pool.get(i) {
            if !(0.3..=0.7).contains(&q.difficulty()) {
                warnings.push(ValidationWarning {
                    location: Some(format!("main[{i}]")),
                    message: format!(
                        "main-subset difficulty {:.2} outside the 0.3-0.7 band",
                        q.difficulty()
                    ),
                });
            }
        }
    }

    warnings
}

fn location_of(bank: &QuestionBank, index: usize) -> String {
    if index < bank.pool.main_len() {
        format!("main[{index}]")
    } else {
        format!("buffer[{}]", index - bank.pool.main_len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const VALID_TOML: &str = r#"
[bank]
id = "bio-101"
name = "Biology Basics"
description = "Cell biology fundamentals"

[[main]]
prompt = "Which organelle produces ATP?"
answer = "A"
difficulty = 0.4
explanation = "Mitochondria are the powerhouse of the cell."
topic = "Cells"

[main.options]
A = "mitochondria"
B = "nucleus"
C = "ribosome"
D = "membrane"

[[main]]
prompt = "Where does transcription happen?"
answer = "B"
difficulty = 0.6
topic = "Genetics"

[main.options]
A = "cytoplasm"
B = "nucleus"
C = "membrane"
D = "lysosome"

[[buffer]]
prompt = "What does DNA stand for?"
answer = "C"
difficulty = 0.2
topic = "Genetics"

[buffer.options]
A = "dinucleic acid"
B = "duo-nucleic acid"
C = "deoxyribonucleic acid"
D = "dernucleic acid"
"#;

    #[test]
    fn parse_valid_toml() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        assert_eq!(bank.id, "bio-101");
        assert_eq!(bank.name, "Biology Basics");
        assert_eq!(bank.pool.main_len(), 2);
        assert_eq!(bank.pool.buffer_len(), 1);
        assert_eq!(bank.pool.get(2).unwrap().answer(), "C");
    }

    #[test]
    fn parse_missing_optional_fields() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        // Second main question has no explanation; topic still parses.
        let q = bank.pool.get(1).unwrap();
        assert_eq!(q.explanation(), "");
        assert_eq!(q.topic(), "Genetics");
    }

    #[test]
    fn parse_rejects_invalid_answer_label() {
        let toml = r#"
[bank]
id = "bad"
name = "Bad"

[[main]]
prompt = "Pick one"
answer = "Z"
difficulty = 0.5

[main.options]
A = "first"
B = "second"
"#;
        let err = parse_question_bank_str(toml, &PathBuf::from("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("main[0]"));
    }

    #[test]
    fn parse_malformed_toml() {
        let bad = "this is not [valid toml }{";
        let result = parse_question_bank_str(bad, &PathBuf::from("bad.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn validate_small_bank_warns() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("recommended minimum")));
    }

    #[test]
    fn validate_duplicate_prompts() {
        let toml = r#"
[bank]
id = "dupes"
name = "Dupes"

[[main]]
prompt = "Same question"
answer = "A"
difficulty = 0.5

[main.options]
A = "first"
B = "second"

[[main]]
prompt = "Same question"
answer = "B"
difficulty = 0.5

[main.options]
A = "first"
B = "second"
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("duplicate")));
    }

    #[test]
    fn validate_main_difficulty_band() {
        let toml = r#"
[bank]
id = "off-band"
name = "Off Band"

[[main]]
prompt = "Too hard for the main subset"
answer = "A"
difficulty = 0.9

[main.options]
A = "first"
B = "second"
"#;
        let bank = parse_question_bank_str(toml, &PathBuf::from("test.toml")).unwrap();
        let warnings = validate_bank(&bank);
        assert!(warnings.iter().any(|w| w.message.contains("0.3-0.7")));
        assert_eq!(warnings.iter().flat_map(|w| &w.location).next().map(String::as_str), Some("main[0]"));
    }

    #[test]
    fn write_and_reparse_roundtrip() {
        let bank = parse_question_bank_str(VALID_TOML, &PathBuf::from("test.toml")).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");

        write_question_bank(&path, &bank).unwrap();
        let reparsed = parse_question_bank(&path).unwrap();

        assert_eq!(reparsed.id, bank.id);
        assert_eq!(reparsed.pool, bank.pool);
    }

    #[test]
    fn load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("bank.toml");
        std::fs::write(&file_path, VALID_TOML).unwrap();

        let banks = load_bank_directory(dir.path()).unwrap();
        assert_eq!(banks.len(), 1);
        assert_eq!(banks[0].id, "bio-101");
    }
}
