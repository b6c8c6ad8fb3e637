//! Practice-mode answer tracking, one record per subject.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::error::{QuizError, Result};
use crate::evaluator::{is_correct, Correction};
use crate::model::{AnswerRecord, AnswerValue, Exercise, Subject};
use crate::statistics::percent;
use crate::storage::{answers_key, load_or, persist, KeyValueStore};

/// Answered vs. total exercises of one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
}

impl Progress {
    /// `round(100 * answered / total)`, 0 for an empty subject.
    pub fn percent(&self) -> u32 {
        percent(self.answered, self.total)
    }
}

/// Per-subject answer records, persisted under `answers:<subject>`.
///
/// A record is loaded from storage the first time its subject is touched and
/// written back in full after every mutation.
pub struct AnswerStore {
    bank: Arc<QuestionBank>,
    storage: Arc<dyn KeyValueStore>,
    records: HashMap<Subject, AnswerRecord>,
}

impl AnswerStore {
    pub fn new(bank: Arc<QuestionBank>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            bank,
            storage,
            records: HashMap::new(),
        }
    }

    fn record(&mut self, subject: Subject) -> &mut AnswerRecord {
        let storage = &self.storage;
        self.records
            .entry(subject)
            .or_insert_with(|| load_or(storage.as_ref(), &answers_key(subject), AnswerRecord::new()))
    }

    fn find(&self, subject: Subject, exercise_id: &str) -> Result<&Exercise> {
        self.bank
            .exercises(subject)?
            .iter()
            .find(|e| e.id == exercise_id)
            .ok_or_else(|| QuizError::NotFound(exercise_id.to_string()))
    }

    /// The answer record of `subject`, loading it on first access.
    pub fn open(&mut self, subject: Subject) -> Result<&AnswerRecord> {
        self.bank.exercises(subject)?;
        Ok(self.record(subject))
    }

    /// Record `value` for `exercise_id` and persist the subject's record.
    ///
    /// Any value is accepted; correctness is decided on read.
    pub fn submit(&mut self, subject: Subject, exercise_id: &str, value: AnswerValue) -> Result<()> {
        self.find(subject, exercise_id)?;
        tracing::debug!(%subject, exercise_id, answer = %value, "practice answer submitted");

        let record = self.record(subject);
        record.insert(exercise_id, value);
        let snapshot = record.clone();
        persist(self.storage.as_ref(), &answers_key(subject), &snapshot);
        Ok(())
    }

    /// Forget every answer of `subject` and persist the empty record.
    pub fn reset(&mut self, subject: Subject) {
        self.record(subject).clear();
        persist(self.storage.as_ref(), &answers_key(subject), &AnswerRecord::new());
        tracing::info!(%subject, "practice answers reset");
    }

    /// Last submission for an exercise.
    pub fn answer(&mut self, subject: Subject, exercise_id: &str) -> Option<AnswerValue> {
        self.record(subject).get(exercise_id).cloned()
    }

    /// Feedback for the last submission, `None` while unanswered.
    pub fn check(&mut self, subject: Subject, exercise_id: &str) -> Result<Option<Correction>> {
        let exercise = self.find(subject, exercise_id)?.clone();
        let answer = self.answer(subject, exercise_id);
        Ok(answer.map(|a| Correction::new(&exercise, Some(&a))))
    }

    /// Answered (attempted, not necessarily correct) vs. total exercises.
    ///
    /// Stored ids that are no longer in the bank are not counted.
    pub fn progress(&mut self, subject: Subject) -> Progress {
        let bank = Arc::clone(&self.bank);
        let exercises = bank.subject_exercises(subject);
        let record = self.record(subject);
        let answered = exercises.iter().filter(|e| record.contains(&e.id)).count();
        Progress {
            answered,
            total: exercises.len(),
        }
    }

    /// Number of exercises of `subject` whose last answer is correct.
    pub fn correct_count(&mut self, subject: Subject) -> usize {
        let bank = Arc::clone(&self.bank);
        let record = self.record(subject);
        bank.subject_exercises(subject)
            .iter()
            .filter(|e| is_correct(e, record.get(&e.id)))
            .count()
    }
}
