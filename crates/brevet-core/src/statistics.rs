//! Percentages and per-subject exam scores.

use serde::{Deserialize, Serialize};

use crate::evaluator::is_correct;
use crate::model::{AnswerRecord, Exercise, Subject};

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let scaled = (200 * part as u64 + whole as u64) / (2 * whole as u64);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Exam score restricted to one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectScore {
    pub subject: Subject,
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

impl SubjectScore {
    pub fn percent(&self) -> u32 {
        percent(self.correct, self.total)
    }
}

/// Number of exercises in `paper` answered correctly in `answers`.
pub fn score(paper: &[Exercise], answers: &AnswerRecord) -> usize {
    paper
        .iter()
        .filter(|e| is_correct(e, answers.get(&e.id)))
        .count()
}

/// Per-subject breakdown of a paper, in canonical subject order. Subjects
/// absent from the paper are omitted.
pub fn per_subject_scores(paper: &[Exercise], answers: &AnswerRecord) -> Vec<SubjectScore> {
    Subject::ALL
        .into_iter()
        .filter_map(|subject| {
            let items: Vec<&Exercise> = paper.iter().filter(|e| e.subject == subject).collect();
            if items.is_empty() {
                return None;
            }
            Some(SubjectScore {
                subject,
                correct: items
                    .iter()
                    .filter(|e| is_correct(e, answers.get(&e.id)))
                    .count(),
                answered: items.iter().filter(|e| answers.contains(&e.id)).count(),
                total: items.len(),
            })
        })
        .collect()
}
