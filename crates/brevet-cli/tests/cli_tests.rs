//! CLI integration tests using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `brevet` command isolated in `dir`: no user config, state under `dir`.
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

#[test]
fn help_output() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("DNB practice and timed mock exams"));
}

#[test]
fn version_output() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("brevet"));
}

#[test]
fn subjects_lists_builtin_counts() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .arg("subjects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Brevet des collèges (12 exercises)"))
        .stdout(predicate::str::contains("No exercises for").not())
        .stdout(predicate::str::contains("francais"))
        .stdout(predicate::str::contains("Histoire-Géo-EMC"));
}

#[test]
fn answer_checks_and_persists() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["answer", "--subject", "maths", "--id", "ma2", " X=8 "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"))
        .stdout(predicate::str::contains("Maths: 1/3 answered (33%)"));

    brevet(&dir)
        .args(["answer", "--subject", "maths", "--id", "ma1", "a"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Incorrect. Expected: B."));

    let state = read_state(&dir);
    assert_eq!(state["answers:maths"]["ma2"], " X=8 ");
    assert_eq!(state["answers:maths"]["ma1"], 0);
}

#[test]
fn answer_rejects_unknown_exercise() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .args(["answer", "--subject", "maths", "--id", "fr1", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn unknown_subject_is_rejected() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .args(["progress", "--subject", "latin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown subject"));
}

#[test]
fn progress_and_reset() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["answer", "--subject", "sciences", "--id", "sc1", "c"])
        .assert()
        .success();

    brevet(&dir)
        .args(["progress", "--subject", "sciences"])
        .assert()
        .success()
        .stdout(predicate::str::contains("33%"));

    brevet(&dir)
        .args(["reset", "--subject", "sciences"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared practice answers for Sciences"));

    brevet(&dir)
        .arg("progress")
        .assert()
        .success()
        .stdout(predicate::str::contains("33%").not());

    let state = read_state(&dir);
    assert_eq!(state["answers:sciences"], serde_json::json!({}));
}

#[test]
fn practice_session_over_stdin() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .args(["practice", "--subject", "maths"])
        .write_stdin("b\n:next\n 8 \n:progress\n:prev\n:prev\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("[1/3] ma1"))
        .stdout(predicate::str::contains("[2/3] ma2"))
        .stdout(predicate::str::contains("Progress: 2/3 (67%)"))
        .stdout(predicate::str::contains("Your answer: B"))
        .stdout(predicate::str::contains("This is the first exercise."));

    brevet(&dir)
        .args(["practice", "--subject", "maths"])
        .write_stdin(":reset\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Progress: 0/3 (0%)"));
}

#[test]
fn validate_builtin_bank() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Exercices courts de Français"))
        .stdout(predicate::str::contains(
            "All banks valid (12 exercises, 8 multiple choice).",
        ));
}

#[test]
fn subjects_flags_uncovered_subjects() {
    let dir = TempDir::new().unwrap();
    let bank = dir.path().join("maths.toml");
    std::fs::write(
        &bank,
        r#"[bank]
id = "maths"
name = "Maths only"

[[exercises]]
id = "m1"
subject = "maths"
kind = "short_answer"
question = "2 + 2 ?"
acceptable_answers = ["4"]
explanation = "Quatre."
"#,
    )
    .unwrap();

    brevet(&dir)
        .arg("--bank")
        .arg(&bank)
        .arg("subjects")
        .assert()
        .success()
        .stdout(predicate::str::contains("Maths only (1 exercises)"))
        .stdout(predicate::str::contains(
            "No exercises for: Français, Histoire-Géo-EMC, Sciences",
        ));
}

#[test]
fn validate_nonexistent_file() {
    let dir = TempDir::new().unwrap();
    brevet(&dir)
        .args(["validate", "--bank", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_reports_duplicates_as_fatal() {
    let dir = TempDir::new().unwrap();
    let banks = dir.path().join("banks");
    std::fs::create_dir_all(&banks).unwrap();
    let exercise = r#"
[[exercises]]
id = "dup"
subject = "maths"
kind = "short_answer"
question = "1 + 1 ?"
acceptable_answers = ["2"]
explanation = "Deux."
"#;
    std::fs::write(banks.join("a.toml"), format!("[bank]\nid = \"a\"\nname = \"A\"\n{exercise}")).unwrap();
    std::fs::write(banks.join("b.toml"), format!("[bank]\nid = \"b\"\nname = \"B\"\n{exercise}")).unwrap();

    brevet(&dir)
        .args(["validate", "--bank"])
        .arg(&banks)
        .assert()
        .failure()
        .stdout(predicate::str::contains("[dup] WARNING"))
        .stderr(predicate::str::contains("duplicate exercise id: dup"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    brevet(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created brevet.toml"))
        .stdout(predicate::str::contains("Created banks/example.toml"));

    assert!(dir.path().join("brevet.toml").exists());
    assert!(dir.path().join("banks/example.toml").exists());

    brevet(&dir)
        .args(["validate", "--bank", "banks/example.toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Example bank (4 exercises)"))
        .stdout(predicate::str::contains("4 warning(s) found."));

    brevet(&dir)
        .args(["--bank", "banks", "answer", "--subject", "maths", "--id", "ex-ma1", "56"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Correct!"));
}

#[test]
fn init_skips_existing() {
    let dir = TempDir::new().unwrap();

    brevet(&dir).arg("init").assert().success();

    brevet(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("brevet.toml"), "[exam]\nper_subject = 0\n").unwrap();

    brevet(&dir)
        .arg("subjects")
        .assert()
        .failure()
        .stderr(predicate::str::contains("per_subject"));
}
