//! The question bank: an immutable catalog of exercises grouped by subject.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{QuizError, Result};
use crate::model::{Exercise, Subject};
use crate::parser;

/// Source of the embedded DNB bank.
pub const BUILTIN_BANK: &str = include_str!("../banks/dnb.toml");

/// Read-only exercises grouped by subject.
///
/// Order within a subject follows insertion order and defines navigation.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    name: String,
    by_subject: HashMap<Subject, Vec<Exercise>>,
    index: HashMap<String, (Subject, usize)>,
}

impl QuestionBank {
    /// Build a bank, rejecting duplicate ids and structurally invalid exercises.
    pub fn new(name: impl Into<String>, exercises: Vec<Exercise>) -> Result<Self> {
        let mut by_subject: HashMap<Subject, Vec<Exercise>> = HashMap::new();
        let mut index = HashMap::new();

        for exercise in exercises {
            exercise.check()?;
            let list = by_subject.entry(exercise.subject).or_default();
            if index
                .insert(exercise.id.clone(), (exercise.subject, list.len()))
                .is_some()
            {
                return Err(QuizError::DuplicateId(exercise.id));
            }
            list.push(exercise);
        }

        Ok(Self {
            name: name.into(),
            by_subject,
            index,
        })
    }

    /// The embedded DNB bank.
    pub fn builtin() -> anyhow::Result<Self> {
        let file = parser::parse_bank_str(BUILTIN_BANK, Path::new("builtin:dnb.toml"))?;
        Ok(Self::new(file.name, file.exercises)?)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Exercises of `subject` in navigation order.
    ///
    /// A subject without exercises is a configuration error.
    pub fn exercises(&self, subject: Subject) -> Result<&[Exercise]> {
        match self.by_subject.get(&subject) {
            Some(list) if !list.is_empty() => Ok(list),
            _ => Err(QuizError::EmptySubject(subject)),
        }
    }

    /// Exercises of `subject`, empty when there are none.
    pub fn subject_exercises(&self, subject: Subject) -> &[Exercise] {
        self.by_subject
            .get(&subject)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Look up an exercise by id.
    pub fn exercise(&self, id: &str) -> Result<&Exercise> {
        self.index
            .get(id)
            .and_then(|(subject, pos)| self.by_subject.get(subject)?.get(*pos))
            .ok_or_else(|| QuizError::NotFound(id.to_string()))
    }

    /// Subjects with at least one exercise, in canonical order.
    pub fn subjects(&self) -> Vec<Subject> {
        Subject::ALL
            .into_iter()
            .filter(|s| !self.subject_exercises(*s).is_empty())
            .collect()
    }

    /// Total number of exercises.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All exercises, subject by subject in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &Exercise> {
        Subject::ALL
            .into_iter()
            .flat_map(move |s| self.subject_exercises(s).iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ExerciseKind;

    fn mc(id: &str, subject: Subject) -> Exercise {
        Exercise {
            id: id.into(),
            subject,
            question: format!("question {id}"),
            kind: ExerciseKind::MultipleChoice {
                choices: vec!["a".into(), "b".into()],
                correct_index: 0,
            },
            explanation: String::new(),
        }
    }

    #[test]
    fn builtin_bank_has_three_per_subject() {
        let bank = QuestionBank::builtin().unwrap();
        assert_eq!(bank.len(), 12);
        for subject in Subject::ALL {
            assert_eq!(bank.exercises(subject).unwrap().len(), 3, "{subject}");
        }
        let ids: Vec<_> = bank
            .exercises(Subject::Math)
            .unwrap()
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, ["ma1", "ma2", "ma3"]);
    }

    #[test]
    fn lookup_by_id() {
        let bank = QuestionBank::builtin().unwrap();
        let ex = bank.exercise("sc3").unwrap();
        assert_eq!(ex.subject, Subject::Science);
        assert!(matches!(
            bank.exercise("zz9"),
            Err(QuizError::NotFound(id)) if id == "zz9"
        ));
    }

    #[test]
    fn duplicate_ids_across_subjects_rejected() {
        let result = QuestionBank::new(
            "dupes",
            vec![mc("q1", Subject::French), mc("q1", Subject::Math)],
        );
        assert!(matches!(result, Err(QuizError::DuplicateId(id)) if id == "q1"));
    }

    #[test]
    fn empty_subject_is_an_error() {
        let bank = QuestionBank::new("partial", vec![mc("q1", Subject::French)]).unwrap();
        assert!(matches!(
            bank.exercises(Subject::Science),
            Err(QuizError::EmptySubject(Subject::Science))
        ));
        assert!(bank.subject_exercises(Subject::Science).is_empty());
        assert_eq!(bank.subjects(), vec![Subject::French]);
    }

    #[test]
    fn invalid_exercise_rejected() {
        let mut broken = mc("q1", Subject::French);
        broken.kind = ExerciseKind::MultipleChoice {
            choices: vec!["a".into(), "b".into()],
            correct_index: 5,
        };
        assert!(matches!(
            QuestionBank::new("broken", vec![broken]),
            Err(QuizError::InvalidExercise { .. })
        ));
    }

    #[test]
    fn iter_follows_canonical_subject_order() {
        let bank = QuestionBank::new(
            "order",
            vec![
                mc("s1", Subject::Science),
                mc("f1", Subject::French),
                mc("f2", Subject::French),
            ],
        )
        .unwrap();
        let ids: Vec<_> = bank.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["f1", "f2", "s1"]);
    }
}
