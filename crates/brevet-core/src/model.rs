//! Core data model types for brevet-lab.
//!
//! These are the types shared by the bank, the evaluator, the answer store
//! and the exam session: subjects, exercises and submitted answers.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// The fixed set of DNB subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Subject {
    #[serde(rename = "francais")]
    French,
    #[serde(rename = "maths")]
    Math,
    #[serde(rename = "hgeo")]
    HistoryGeoCivics,
    #[serde(rename = "sciences")]
    Science,
}

impl Subject {
    /// All subjects in canonical order.
    pub const ALL: [Subject; 4] = [
        Subject::French,
        Subject::Math,
        Subject::HistoryGeoCivics,
        Subject::Science,
    ];

    /// Stable key used in bank files and storage keys.
    pub fn key(self) -> &'static str {
        match self {
            Subject::French => "francais",
            Subject::Math => "maths",
            Subject::HistoryGeoCivics => "hgeo",
            Subject::Science => "sciences",
        }
    }

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            Subject::French => "Français",
            Subject::Math => "Maths",
            Subject::HistoryGeoCivics => "Histoire-Géo-EMC",
            Subject::Science => "Sciences",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Subject {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "francais" | "français" | "french" => Ok(Subject::French),
            "maths" | "math" => Ok(Subject::Math),
            "hgeo" | "history" | "histoire" => Ok(Subject::HistoryGeoCivics),
            "sciences" | "science" => Ok(Subject::Science),
            other => Err(QuizError::UnknownSubject(other.to_string())),
        }
    }
}

/// A single question unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Unique identifier across the whole bank.
    pub id: String,
    /// Subject this exercise belongs to.
    pub subject: Subject,
    /// Question text.
    pub question: String,
    /// Variant-specific answer data.
    #[serde(flatten)]
    pub kind: ExerciseKind,
    /// Explanation shown once the exercise has been answered.
    #[serde(default)]
    pub explanation: String,
}

/// The two exercise variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExerciseKind {
    MultipleChoice {
        choices: Vec<String>,
        correct_index: usize,
    },
    ShortAnswer {
        acceptable_answers: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
    },
}

impl Exercise {
    pub fn is_multiple_choice(&self) -> bool {
        matches!(self.kind, ExerciseKind::MultipleChoice { .. })
    }

    /// Check the structural invariants a bank relies on.
    pub fn check(&self) -> Result<(), QuizError> {
        let invalid = |reason: String| QuizError::InvalidExercise {
            id: self.id.clone(),
            reason,
        };
        if self.id.trim().is_empty() {
            return Err(invalid("id is empty".into()));
        }
        match &self.kind {
            ExerciseKind::MultipleChoice {
                choices,
                correct_index,
            } => {
                if choices.len() < 2 {
                    return Err(invalid(format!(
                        "needs at least 2 choices, got {}",
                        choices.len()
                    )));
                }
                if *correct_index >= choices.len() {
                    return Err(invalid(format!(
                        "correct_index {correct_index} out of range for {} choices",
                        choices.len()
                    )));
                }
            }
            ExerciseKind::ShortAnswer {
                acceptable_answers, ..
            } => {
                if acceptable_answers.iter().all(|a| a.trim().is_empty()) {
                    return Err(invalid("no acceptable answers".into()));
                }
            }
        }
        Ok(())
    }
}

/// A submitted answer: a choice index or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Choice(usize),
    Text(String),
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Choice(i) => write!(f, "{}", choice_letter(*i)),
            AnswerValue::Text(s) => f.write_str(s),
        }
    }
}

/// Letter shown next to a choice index (`0` → `A`). Indices past `Z` fall back
/// to their 1-based number.
pub fn choice_letter(index: usize) -> String {
    if index < 26 {
        char::from(b'A' + index as u8).to_string()
    } else {
        (index + 1).to_string()
    }
}

/// Mapping of exercise id to the last submitted answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord {
    entries: BTreeMap<String, AnswerValue>,
}

impl AnswerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the answer for `exercise_id`.
    pub fn insert(&mut self, exercise_id: impl Into<String>, value: AnswerValue) {
        self.entries.insert(exercise_id.into(), value);
    }

    pub fn get(&self, exercise_id: &str) -> Option<&AnswerValue> {
        self.entries.get(exercise_id)
    }

    pub fn contains(&self, exercise_id: &str) -> bool {
        self.entries.contains_key(exercise_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
