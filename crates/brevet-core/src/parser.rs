//! TOML question bank parser.
//!
//! Loads bank files and directories, and validates them.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::QuestionBank;
use crate::evaluator::normalize;
use crate::model::{Exercise, ExerciseKind, Subject};

/// Intermediate TOML structure for parsing bank files.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    bank: TomlBankHeader,
    #[serde(default)]
    exercises: Vec<TomlExercise>,
}

#[derive(Debug, Deserialize)]
struct TomlBankHeader {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlExercise {
    id: String,
    subject: String,
    kind: String,
    question: String,
    #[serde(default)]
    choices: Option<Vec<String>>,
    #[serde(default)]
    correct_index: Option<usize>,
    #[serde(default)]
    acceptable_answers: Option<Vec<String>>,
    #[serde(default)]
    placeholder: Option<String>,
    #[serde(default)]
    explanation: String,
}

/// One parsed bank file.
#[derive(Debug, Clone)]
pub struct BankFile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub exercises: Vec<Exercise>,
}

/// Parse a single TOML file into a [`BankFile`].
pub fn parse_bank(path: &Path) -> Result<BankFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read bank file: {}", path.display()))?;

    parse_bank_str(&content, path)
}

/// Parse a TOML string into a [`BankFile`] (useful for testing).
pub fn parse_bank_str(content: &str, source_path: &Path) -> Result<BankFile> {
    let parsed: TomlBankFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let exercises = parsed
        .exercises
        .into_iter()
        .map(|e| {
            let id = e.id;
            let subject: Subject = e
                .subject
                .parse()
                .with_context(|| format!("exercise {id}"))?;

            let kind = match e.kind.as_str() {
                "multiple_choice" | "qcm" => ExerciseKind::MultipleChoice {
                    choices: e
                        .choices
                        .with_context(|| format!("exercise {id}: multiple_choice needs `choices`"))?,
                    correct_index: e.correct_index.with_context(|| {
                        format!("exercise {id}: multiple_choice needs `correct_index`")
                    })?,
                },
                "short_answer" | "rc" => ExerciseKind::ShortAnswer {
                    acceptable_answers: e.acceptable_answers.with_context(|| {
                        format!("exercise {id}: short_answer needs `acceptable_answers`")
                    })?,
                    placeholder: e.placeholder,
                },
                other => anyhow::bail!("exercise {id}: unknown kind '{other}'"),
            };

            Ok(Exercise {
                id,
                subject,
                question: e.question,
                kind,
                explanation: e.explanation,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BankFile {
        id: parsed.bank.id,
        name: parsed.bank.name,
        description: parsed.bank.description,
        exercises,
    })
}

/// Recursively load all `.toml` bank files from a directory, in path order.
pub fn load_bank_directory(dir: &Path) -> Result<Vec<BankFile>> {
    let mut files = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut paths = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    paths.sort();

    for path in paths {
        if path.is_dir() {
            files.extend(load_bank_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_bank(&path) {
                Ok(file) => files.push(file),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(files)
}

/// Load a file or directory of bank files into one [`QuestionBank`].
pub fn load_bank(path: &Path) -> Result<QuestionBank> {
    let files = if path.is_dir() {
        load_bank_directory(path)?
    } else {
        vec![parse_bank(path)?]
    };

    let name = match files.as_slice() {
        [single] => single.name.clone(),
        many => format!("{} ({} files)", path.display(), many.len()),
    };
    let exercises: Vec<Exercise> = files.into_iter().flat_map(|f| f.exercises).collect();
    let bank = QuestionBank::new(name, exercises)
        .with_context(|| format!("invalid question bank: {}", path.display()))?;
    tracing::info!(bank = bank.name(), exercises = bank.len(), "loaded question bank");
    Ok(bank)
}

/// A warning from bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The exercise ID (if applicable).
    pub exercise_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Check a list of exercises for common authoring issues.
///
/// `per_subject` is the exam's per-subject draw; subjects with fewer
/// exercises are flagged.
pub fn validate_exercises(exercises: &[Exercise], per_subject: usize) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let warn = |id: &str, message: String| ValidationWarning {
        exercise_id: Some(id.to_string()),
        message,
    };

    let mut seen_ids = HashSet::new();
    for ex in exercises {
        if !seen_ids.insert(ex.id.as_str()) {
            warnings.push(warn(&ex.id, format!("duplicate exercise ID: {}", ex.id)));
        }
    }

    for ex in exercises {
        if ex.question.trim().is_empty() {
            warnings.push(warn(&ex.id, "question is empty".into()));
        }
        if ex.explanation.trim().is_empty() {
            warnings.push(warn(&ex.id, "explanation is empty".into()));
        }
        if let Err(e) = ex.check() {
            warnings.push(warn(&ex.id, e.to_string()));
        }

        match &ex.kind {
            ExerciseKind::MultipleChoice { choices, .. } => {
                let mut seen = HashSet::new();
                for choice in choices {
                    if !seen.insert(normalize(choice)) {
                        warnings.push(warn(&ex.id, format!("duplicate choice: {choice}")));
                    }
                }
            }
            ExerciseKind::ShortAnswer {
                acceptable_answers, ..
            } => {
                let mut seen = HashSet::new();
                for answer in acceptable_answers {
                    if !seen.insert(normalize(answer)) {
                        warnings.push(warn(
                            &ex.id,
                            format!("acceptable answer repeats after normalization: {answer}"),
                        ));
                    }
                }
            }
        }
    }

    let mut per_subject_count: HashMap<Subject, usize> = HashMap::new();
    for ex in exercises {
        *per_subject_count.entry(ex.subject).or_default() += 1;
    }
    for subject in Subject::ALL {
        let count = per_subject_count.get(&subject).copied().unwrap_or(0);
        if count < per_subject {
            warnings.push(ValidationWarning {
                exercise_id: None,
                message: format!(
                    "subject {subject} has {count} exercise(s), exams draw {per_subject}"
                ),
            });
        }
    }

    warnings
}
