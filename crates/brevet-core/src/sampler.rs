//! Random exam paper construction.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::QuestionBank;
use crate::model::{Exercise, Subject};

/// Draw an exam paper from `bank`.
///
/// For each subject (canonical order), a shuffled copy of its exercises is cut
/// to `min(per_subject, size)`; the picks are concatenated and shuffled once
/// more to interleave subjects. Sampling is without replacement, so ids never
/// repeat. The bank is left untouched.
pub fn build_paper<R: Rng + ?Sized>(
    bank: &QuestionBank,
    per_subject: usize,
    rng: &mut R,
) -> Vec<Exercise> {
    let mut paper = Vec::new();
    for subject in Subject::ALL {
        let mut pool: Vec<Exercise> = bank.subject_exercises(subject).to_vec();
        pool.shuffle(rng);
        pool.truncate(per_subject);
        paper.extend(pool);
    }
    paper.shuffle(rng);
    tracing::debug!(questions = paper.len(), per_subject, "built exam paper");
    paper
}
