//! Answer evaluation.
//!
//! Everything here is pure and total: any submission, including none at all,
//! maps to a verdict without failing.

use serde::{Deserialize, Serialize};

use crate::model::{AnswerValue, Exercise, ExerciseKind};

/// Normalize a short answer for comparison: trim surrounding whitespace and
/// lower-case. Accents and punctuation are kept as-is.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Whether `submitted` is a correct answer to `exercise`.
///
/// An absent answer, an answer of the wrong kind, or a choice index outside
/// the exercise's choices is never correct.
pub fn is_correct(exercise: &Exercise, submitted: Option<&AnswerValue>) -> bool {
    match (&exercise.kind, submitted) {
        (ExerciseKind::MultipleChoice { correct_index, .. }, Some(AnswerValue::Choice(i))) => {
            i == correct_index
        }
        (
            ExerciseKind::ShortAnswer {
                acceptable_answers, ..
            },
            Some(AnswerValue::Text(text)),
        ) => {
            let typed = normalize(text);
            acceptable_answers.iter().any(|a| normalize(a) == typed)
        }
        _ => false,
    }
}

/// The canonical correct answer of an exercise, for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectedAnswer {
    /// The correct choice of a multiple-choice exercise.
    Choice { index: usize, text: String },
    /// Every accepted short answer.
    Accepted { answers: Vec<String> },
}

impl std::fmt::Display for ExpectedAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedAnswer::Choice { index, text } => {
                write!(f, "{}. {}", crate::model::choice_letter(*index), text)
            }
            ExpectedAnswer::Accepted { answers } => f.write_str(&answers.join(", ")),
        }
    }
}

pub fn expected_answer(exercise: &Exercise) -> ExpectedAnswer {
    match &exercise.kind {
        ExerciseKind::MultipleChoice {
            choices,
            correct_index,
        } => ExpectedAnswer::Choice {
            index: *correct_index,
            text: choices.get(*correct_index).cloned().unwrap_or_default(),
        },
        ExerciseKind::ShortAnswer {
            acceptable_answers, ..
        } => ExpectedAnswer::Accepted {
            answers: acceptable_answers.clone(),
        },
    }
}

/// Feedback for one submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub exercise_id: String,
    pub correct: bool,
    pub expected: ExpectedAnswer,
    pub explanation: String,
}

impl Correction {
    pub fn new(exercise: &Exercise, submitted: Option<&AnswerValue>) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            correct: is_correct(exercise, submitted),
            expected: expected_answer(exercise),
            explanation: exercise.explanation.clone(),
        }
    }
}
