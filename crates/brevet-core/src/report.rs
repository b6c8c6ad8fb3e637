//! Exam review reports with JSON persistence.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::evaluator::{expected_answer, is_correct, ExpectedAnswer};
use crate::model::{AnswerRecord, AnswerValue, Exercise, ExerciseKind, Subject};
use crate::session::ExamState;
use crate::statistics::{per_subject_scores, percent, SubjectScore};

/// Placeholder shown for an unanswered question.
pub const NO_ANSWER: &str = "no answer";

/// A complete exam review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Session state at review time.
    pub state: ExamState,
    /// Correct answers.
    pub score: usize,
    /// Questions on the paper.
    pub total: usize,
    /// Questions with a recorded answer.
    pub answered: usize,
    /// Seconds left on the countdown.
    pub remaining_secs: u32,
    pub per_subject: Vec<SubjectScore>,
    /// One entry per paper question, in paper order.
    pub questions: Vec<QuestionReview>,
}

/// Review of one exam question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReview {
    /// 1-based position on the paper.
    pub number: usize,
    pub exercise_id: String,
    pub subject: Subject,
    pub question: String,
    pub submitted: Option<AnswerValue>,
    /// The submitted answer as shown to the student: the choice letter and
    /// text for a multiple-choice question, [`NO_ANSWER`] when unanswered.
    pub submitted_text: String,
    pub correct: bool,
    pub expected: ExpectedAnswer,
    pub explanation: String,
}

impl QuestionReview {
    fn new(number: usize, exercise: &Exercise, submitted: Option<&AnswerValue>) -> Self {
        Self {
            number,
            exercise_id: exercise.id.clone(),
            subject: exercise.subject,
            question: exercise.question.clone(),
            submitted: submitted.cloned(),
            submitted_text: submitted_text(exercise, submitted),
            correct: is_correct(exercise, submitted),
            expected: expected_answer(exercise),
            explanation: exercise.explanation.clone(),
        }
    }
}

fn submitted_text(exercise: &Exercise, submitted: Option<&AnswerValue>) -> String {
    let Some(value) = submitted else {
        return NO_ANSWER.to_string();
    };
    match (value, &exercise.kind) {
        (AnswerValue::Choice(i), ExerciseKind::MultipleChoice { choices, .. }) => {
            match choices.get(*i) {
                Some(text) => format!("{value}. {text}"),
                None => value.to_string(),
            }
        }
        _ => value.to_string(),
    }
}

impl ExamReport {
    /// Build a review of `paper` against `answers`.
    pub fn new(
        state: ExamState,
        paper: &[Exercise],
        answers: &AnswerRecord,
        remaining_secs: u32,
    ) -> Self {
        let questions: Vec<QuestionReview> = paper
            .iter()
            .enumerate()
            .map(|(i, e)| QuestionReview::new(i + 1, e, answers.get(&e.id)))
            .collect();

        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state,
            score: questions.iter().filter(|q| q.correct).count(),
            total: questions.len(),
            answered: questions.iter().filter(|q| q.submitted.is_some()).count(),
            remaining_secs,
            per_subject: per_subject_scores(paper, answers),
            questions,
        }
    }

    /// Score as a rounded percentage of the paper.
    pub fn percent(&self) -> u32 {
        percent(self.score, self.total)
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }
}
