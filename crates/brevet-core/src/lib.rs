//! brevet-core — Question bank, answer checking, practice records and timed
//! mock exams for the DNB.
//!
//! Everything that outlives a process goes through the
//! [`KeyValueStore`](storage::KeyValueStore) seam; randomness comes from an
//! injected [`rand::Rng`]. The exam countdown is owned by
//! [`ExamSession`](session::ExamSession) and driven by `tokio::time`.

pub mod answers;
pub mod bank;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod report;
pub mod sampler;
pub mod session;
pub mod statistics;
pub mod storage;

pub use error::{QuizError, Result};
