//! Subcommand implementations and the state they share.

pub mod answer;
pub mod exam;
pub mod init;
pub mod practice;
pub mod progress;
pub mod reset;
pub mod subjects;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::Args;

use brevet_core::answers::AnswerStore;
use brevet_core::bank::QuestionBank;
use brevet_core::config::{load_config_from, BrevetConfig};
use brevet_core::evaluator::Correction;
use brevet_core::model::{choice_letter, AnswerValue, Exercise, ExerciseKind};
use brevet_core::parser;
use brevet_core::session::ExamSession;
use brevet_core::storage::{FileStore, KeyValueStore};

/// Options accepted by every subcommand.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// State file (overrides config and BREVET_STATE_FILE)
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Question bank file or directory (overrides config)
    #[arg(long, global = true)]
    pub bank: Option<PathBuf>,
}

/// Resolved configuration, bank and storage for one invocation.
pub struct Context {
    pub config: BrevetConfig,
    pub bank: Arc<QuestionBank>,
    pub storage: Arc<dyn KeyValueStore>,
}

impl Context {
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let mut config = load_config_from(args.config.as_deref())?;
        if let Some(state) = &args.state {
            config.state_file = state.clone();
        }
        if let Some(bank) = &args.bank {
            config.bank = Some(bank.clone());
        }
        config.validate()?;

        let bank = load_bank(config.bank.as_deref())?;
        let storage = FileStore::open(&config.state_file);
        tracing::debug!(state = %config.state_file.display(), "using state file");

        Ok(Self {
            config,
            bank: Arc::new(bank),
            storage: Arc::new(storage),
        })
    }

    pub fn answer_store(&self) -> AnswerStore {
        AnswerStore::new(Arc::clone(&self.bank), Arc::clone(&self.storage))
    }

    pub fn exam_session(&self) -> ExamSession {
        ExamSession::restore(
            Arc::clone(&self.bank),
            Arc::clone(&self.storage),
            self.config.exam.clone(),
        )
    }
}

/// The bank at `path`, or the built-in one.
pub fn load_bank(path: Option<&Path>) -> Result<QuestionBank> {
    match path {
        Some(path) => parser::load_bank(path),
        None => QuestionBank::builtin(),
    }
}

/// Interpret user input for `exercise`.
///
/// Multiple-choice questions take a letter (`b`) or a 1-based number (`2`);
/// anything else is kept as text and will not be judged correct.
pub fn parse_answer(exercise: &Exercise, input: &str) -> AnswerValue {
    let input = input.trim();
    if exercise.is_multiple_choice() {
        let mut chars = input.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_alphabetic() {
                let index = (c.to_ascii_uppercase() as u8 - b'A') as usize;
                return AnswerValue::Choice(index);
            }
        }
        if let Ok(n) = input.parse::<usize>() {
            if n >= 1 {
                return AnswerValue::Choice(n - 1);
            }
        }
    }
    AnswerValue::Text(input.to_string())
}

/// Print a question with its choices or answer hint.
pub fn print_exercise(exercise: &Exercise) {
    println!("{}", exercise.question);
    match &exercise.kind {
        ExerciseKind::MultipleChoice { choices, .. } => {
            for (i, choice) in choices.iter().enumerate() {
                println!("  {}. {choice}", choice_letter(i));
            }
        }
        ExerciseKind::ShortAnswer { placeholder, .. } => {
            if let Some(hint) = placeholder {
                println!("  ({hint})");
            }
        }
    }
}

/// Print the verdict, expected answer and explanation of a correction.
pub fn print_correction(correction: &Correction) {
    if correction.correct {
        println!("Correct!");
    } else {
        println!("Incorrect. Expected: {}", correction.expected);
    }
    if !correction.explanation.is_empty() {
        println!("  {}", correction.explanation);
    }
}

/// Print `prompt` without a newline and flush stdout.
pub fn prompt(prompt: &str) {
    use std::io::Write;

    print!("{prompt}");
    let _ = std::io::stdout().flush();
}
