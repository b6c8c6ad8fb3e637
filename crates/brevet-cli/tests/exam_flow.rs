//! End-to-end mock exam through the CLI.
//!
//! A seeded exam is started with closed stdin (which leaves it running and
//! persisted), answered correctly via `exam resume`, then inspected with
//! `status`, `review` and `dismiss`.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use brevet_core::model::{choice_letter, Exercise, ExerciseKind};

fn brevet(dir: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("brevet").unwrap();
    cmd.current_dir(dir.path())
        .env("HOME", dir.path())
        .env_remove("BREVET_STATE_FILE")
        .env_remove("RUST_LOG")
        .arg("--state")
        .arg(dir.path().join("state.json"));
    cmd
}

fn read_state(dir: &TempDir) -> serde_json::Value {
    let content = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn stored_paper(dir: &TempDir) -> Vec<Exercise> {
    serde_json::from_value(read_state(dir)["exam:paper"].clone()).unwrap()
}

fn correct_input(exercise: &Exercise) -> String {
    match &exercise.kind {
        ExerciseKind::MultipleChoice { correct_index, .. } => choice_letter(*correct_index),
        ExerciseKind::ShortAnswer {
            acceptable_answers, ..
        } => acceptable_answers[0].clone(),
    }
}

#[test]
fn full_exam_round_trip() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["exam", "start", "--seed", "7"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exam started: 12 questions, 25:00 on the clock."))
        .stdout(predicate::str::contains("brevet exam resume"));

    let state = read_state(&dir);
    assert_eq!(state["exam:state"], "running");
    assert_eq!(state["exam:answers"], serde_json::json!({}));

    let paper = stored_paper(&dir);
    assert_eq!(paper.len(), 12);

    let mut input = String::new();
    for (i, exercise) in paper.iter().enumerate() {
        input.push_str(&format!("{} {}\n", i + 1, correct_input(exercise)));
    }
    input.push_str("stop\n");

    brevet(&dir)
        .args(["exam", "resume"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming exam: 0/12 answered"))
        .stdout(predicate::str::contains("Saved answer for question 12."))
        .stdout(predicate::str::contains("Score: 12 / 12 (100%)"));

    brevet(&dir)
        .args(["exam", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("State: done"))
        .stdout(predicate::str::contains("Answered: 12/12"))
        .stdout(predicate::str::contains("Score: 12 / 12"));

    let review_path = dir.path().join("review.json");
    brevet(&dir)
        .args(["exam", "review", "--output"])
        .arg(&review_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("[WRONG]").not());

    let review: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&review_path).unwrap()).unwrap();
    assert_eq!(review["score"], 12);
    assert_eq!(review["total"], 12);
    assert_eq!(review["questions"].as_array().unwrap().len(), 12);

    brevet(&dir)
        .args(["exam", "dismiss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("State: idle"));

    brevet(&dir)
        .args(["exam", "resume"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no exam in progress"));
}

#[test]
fn stopping_without_answers_scores_zero() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["exam", "start", "--seed", "3"])
        .write_stdin("quit\n")
        .assert()
        .success();

    brevet(&dir)
        .args(["exam", "start"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already running"));

    brevet(&dir)
        .args(["exam", "review"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Expected:").not())
        .stderr(predicate::str::contains("exam is still running"));

    brevet(&dir)
        .args(["exam", "stop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Score: 0 / 12 (0%)"))
        .stdout(predicate::str::contains("Your answer: no answer").count(12));

    assert_eq!(read_state(&dir)["exam:state"], "done");

    brevet(&dir)
        .args(["exam", "stop"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exam is not running"));
}

#[test]
fn answers_can_be_revised_and_shown() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["exam", "start", "--seed", "11"])
        .write_stdin("1 zzz\n1\n13 a\nhello\ntime\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your answer: zzz"))
        .stdout(predicate::str::contains("Unrecognized input.").count(2))
        .stdout(predicate::str::contains("left."));

    let paper = stored_paper(&dir);
    let first = &paper[0];
    let input = format!("1 {}\nstop\n", correct_input(first));

    brevet(&dir)
        .args(["exam", "resume"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming exam: 1/12 answered"))
        .stdout(predicate::str::contains("Score: 1 / 12"));
}

#[test]
fn status_and_review_when_idle() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["exam", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("State: idle"));

    brevet(&dir)
        .args(["exam", "review"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no exam to review"));

    brevet(&dir)
        .args(["exam", "dismiss"])
        .assert()
        .success()
        .stdout(predicate::str::contains("State: idle"));
}
