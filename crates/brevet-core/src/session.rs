//! Timed mock-exam session.
//!
//! `idle → running → done`. `start()` is accepted from idle or done and
//! refused while running. While running, a one-second countdown owned by the session
//! decrements `remaining_secs`; it is dropped the moment the session leaves
//! running, so no tick can arrive afterwards.
//!
//! Timeout policy: when the countdown reaches zero and
//! [`ExamConfig::auto_submit_on_timeout`] is set (the default), the session
//! stops itself. Otherwise it stays running at `00:00` until [`ExamSession::stop`].

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use crate::bank::QuestionBank;
use crate::error::{QuizError, Result};
use crate::model::{AnswerRecord, AnswerValue, Exercise};
use crate::report::ExamReport;
use crate::sampler::build_paper;
use crate::statistics;
use crate::storage::{
    load_or, persist, KeyValueStore, EXAM_ANSWERS_KEY, EXAM_PAPER_KEY, EXAM_STATE_KEY,
    EXAM_TIMER_KEY,
};

/// Default exam length: 25 minutes.
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;
/// Default number of questions drawn per subject.
pub const DEFAULT_PER_SUBJECT: usize = 3;

const TICK: Duration = Duration::from_secs(1);

/// Lifecycle state of an exam session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExamState {
    #[default]
    Idle,
    Running,
    Done,
}

impl std::fmt::Display for ExamState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExamState::Idle => write!(f, "idle"),
            ExamState::Running => write!(f, "running"),
            ExamState::Done => write!(f, "done"),
        }
    }
}

/// Exam parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Countdown length in seconds.
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
    /// Questions drawn per subject.
    #[serde(default = "default_per_subject")]
    pub per_subject: usize,
    /// Stop the exam automatically when the countdown reaches zero.
    #[serde(default = "default_true")]
    pub auto_submit_on_timeout: bool,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_SECS
}

fn default_per_subject() -> usize {
    DEFAULT_PER_SUBJECT
}

fn default_true() -> bool {
    true
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_duration(),
            per_subject: default_per_subject(),
            auto_submit_on_timeout: true,
        }
    }
}

/// Format seconds as `mm:ss`.
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn new_countdown() -> Interval {
    let mut countdown = interval_at(Instant::now() + TICK, TICK);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Burst);
    countdown
}

/// A mock exam: paper, answers, countdown and state.
pub struct ExamSession {
    bank: Arc<QuestionBank>,
    storage: Arc<dyn KeyValueStore>,
    config: ExamConfig,
    state: ExamState,
    remaining_secs: u32,
    paper: Vec<Exercise>,
    answers: AnswerRecord,
    countdown: Option<Interval>,
}

impl ExamSession {
    /// A fresh idle session. Nothing is read from storage.
    pub fn new(bank: Arc<QuestionBank>, storage: Arc<dyn KeyValueStore>, config: ExamConfig) -> Self {
        let remaining_secs = config.duration_secs;
        Self {
            bank,
            storage,
            config,
            state: ExamState::Idle,
            remaining_secs,
            paper: Vec::new(),
            answers: AnswerRecord::new(),
            countdown: None,
        }
    }

    /// Resume the session persisted in `storage`.
    ///
    /// Malformed values fall back to an idle state, the configured duration,
    /// an empty paper and no answers. A running session is resumed with its
    /// countdown re-armed.
    pub fn restore(
        bank: Arc<QuestionBank>,
        storage: Arc<dyn KeyValueStore>,
        config: ExamConfig,
    ) -> Self {
        let store = storage.as_ref();
        let mut state = load_or(store, EXAM_STATE_KEY, ExamState::Idle);
        let remaining_secs = load_or(store, EXAM_TIMER_KEY, config.duration_secs);
        let paper: Vec<Exercise> = load_or(store, EXAM_PAPER_KEY, Vec::new());
        let answers = load_or(store, EXAM_ANSWERS_KEY, AnswerRecord::new());

        if state != ExamState::Idle && paper.is_empty() {
            tracing::warn!(%state, "stored exam has no paper, starting idle");
            state = ExamState::Idle;
        }

        let mut session = Self {
            bank,
            storage,
            config,
            state,
            remaining_secs,
            paper,
            answers,
            countdown: None,
        };

        if session.state == ExamState::Running {
            if session.remaining_secs == 0 && session.config.auto_submit_on_timeout {
                session.finish();
            } else {
                session.arm();
            }
        }
        tracing::debug!(state = %session.state, remaining = session.remaining_secs, "exam restored");
        session
    }

    pub fn state(&self) -> ExamState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ExamState::Running
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn paper(&self) -> &[Exercise] {
        &self.paper
    }

    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Number of paper questions with a recorded answer.
    pub fn answered_count(&self) -> usize {
        self.paper
            .iter()
            .filter(|e| self.answers.contains(&e.id))
            .count()
    }

    /// Questions answered correctly. Unanswered questions never count.
    pub fn score(&self) -> usize {
        statistics::score(&self.paper, &self.answers)
    }

    /// Per-question breakdown of the current paper.
    pub fn review(&self) -> ExamReport {
        ExamReport::new(self.state, &self.paper, &self.answers, self.remaining_secs)
    }

    /// Start a new exam with the thread-local RNG.
    pub fn start(&mut self) -> Result<()> {
        self.start_with_rng(&mut rand::rng())
    }

    /// Start a new exam, drawing the paper from `rng`.
    ///
    /// Clears previous answers, resets the countdown and enters running.
    /// Fails with [`QuizError::StillRunning`] if an exam is in progress.
    pub fn start_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        if self.state == ExamState::Running {
            return Err(QuizError::StillRunning);
        }
        let paper = build_paper(&self.bank, self.config.per_subject, rng);
        if paper.is_empty() {
            return Err(QuizError::EmptyPaper);
        }

        self.paper = paper;
        self.answers.clear();
        self.remaining_secs = self.config.duration_secs;
        self.state = ExamState::Running;
        self.arm();

        persist(self.storage.as_ref(), EXAM_PAPER_KEY, &self.paper);
        persist(self.storage.as_ref(), EXAM_ANSWERS_KEY, &self.answers);
        persist(self.storage.as_ref(), EXAM_TIMER_KEY, &self.remaining_secs);
        persist(self.storage.as_ref(), EXAM_STATE_KEY, &self.state);
        tracing::info!(
            questions = self.paper.len(),
            duration = self.remaining_secs,
            "exam started"
        );
        Ok(())
    }

    /// Record an answer for a paper question, replacing any earlier one.
    pub fn submit(&mut self, exercise_id: &str, value: AnswerValue) -> Result<()> {
        if self.state != ExamState::Running {
            return Err(QuizError::NotRunning);
        }
        if !self.paper.iter().any(|e| e.id == exercise_id) {
            return Err(QuizError::NotFound(exercise_id.to_string()));
        }
        tracing::debug!(exercise_id, answer = %value, "exam answer submitted");
        self.answers.insert(exercise_id, value);
        persist(self.storage.as_ref(), EXAM_ANSWERS_KEY, &self.answers);
        Ok(())
    }

    /// End the running exam.
    pub fn stop(&mut self) -> Result<()> {
        if self.state != ExamState::Running {
            return Err(QuizError::NotRunning);
        }
        self.finish();
        Ok(())
    }

    /// Leave the done state for idle. A no-op when already idle.
    pub fn dismiss(&mut self) -> Result<()> {
        match self.state {
            ExamState::Running => Err(QuizError::StillRunning),
            ExamState::Idle => Ok(()),
            ExamState::Done => {
                self.state = ExamState::Idle;
                persist(self.storage.as_ref(), EXAM_STATE_KEY, &self.state);
                Ok(())
            }
        }
    }

    /// Apply one elapsed second. Has no effect unless running.
    ///
    /// Returns the remaining seconds.
    pub fn tick(&mut self) -> u32 {
        if self.state != ExamState::Running {
            return self.remaining_secs;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        persist(self.storage.as_ref(), EXAM_TIMER_KEY, &self.remaining_secs);

        if self.remaining_secs == 0 && self.config.auto_submit_on_timeout {
            tracing::info!("exam time is up");
            self.finish();
        }
        self.remaining_secs
    }

    /// Wait for the next countdown tick and apply it.
    ///
    /// Never resolves while the session is not running, which makes it safe to
    /// poll from a `select!` loop alongside user input.
    pub async fn wait_tick(&mut self) -> u32 {
        if self.state != ExamState::Running {
            self.countdown = None;
            return std::future::pending().await;
        }
        self.countdown
            .get_or_insert_with(new_countdown)
            .tick()
            .await;
        self.tick()
    }

    fn arm(&mut self) {
        // Interval creation needs a runtime; outside one it is armed on the
        // first `wait_tick`.
        self.countdown = tokio::runtime::Handle::try_current()
            .ok()
            .map(|_| new_countdown());
    }

    fn finish(&mut self) {
        self.countdown = None;
        self.state = ExamState::Done;
        persist(self.storage.as_ref(), EXAM_STATE_KEY, &self.state);
        tracing::info!(
            score = self.score(),
            total = self.paper.len(),
            "exam finished"
        );
    }
}
