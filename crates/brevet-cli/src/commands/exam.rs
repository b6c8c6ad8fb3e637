//! The `brevet exam` commands.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};

use brevet_core::report::ExamReport;
use brevet_core::session::{format_clock, ExamSession, ExamState};
use brevet_core::QuizError;

use super::{parse_answer, print_exercise, prompt, Context, GlobalArgs};

const HELP: &str = "Commands: <n> <answer>, <n> (show question), list, time, stop, quit";

/// Draw a new paper and run the exam interactively.
pub async fn start(args: &GlobalArgs, seed: Option<u64>) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut session = ctx.exam_session();
    if session.is_running() {
        anyhow::bail!(
            "an exam is already running ({} left); use `brevet exam resume` or `brevet exam stop`",
            format_clock(session.remaining_secs())
        );
    }

    match seed {
        Some(seed) => session.start_with_rng(&mut StdRng::seed_from_u64(seed))?,
        None => session.start()?,
    }
    println!(
        "Exam started: {} questions, {} on the clock.",
        session.paper().len(),
        format_clock(session.remaining_secs())
    );
    println!("{HELP}");
    print_paper(&session);

    run(&mut session).await
}

/// Continue a persisted exam.
pub async fn resume(args: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut session = ctx.exam_session();
    match session.state() {
        ExamState::Idle => anyhow::bail!("no exam in progress; use `brevet exam start`"),
        ExamState::Done => {
            println!("The exam is over.");
            print_results(&session.review());
            Ok(())
        }
        ExamState::Running => {
            println!(
                "Resuming exam: {}/{} answered, {} left.",
                session.answered_count(),
                session.paper().len(),
                format_clock(session.remaining_secs())
            );
            println!("{HELP}");
            print_paper(&session);
            run(&mut session).await
        }
    }
}

pub fn stop(args: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut session = ctx.exam_session();
    session.stop()?;
    print_results(&session.review());
    Ok(())
}

pub fn status(args: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(args)?;
    let session = ctx.exam_session();

    println!("State: {}", session.state());
    if session.state() == ExamState::Idle {
        return Ok(());
    }
    println!("Time left: {}", format_clock(session.remaining_secs()));
    println!(
        "Answered: {}/{}",
        session.answered_count(),
        session.paper().len()
    );
    if session.state() == ExamState::Done {
        println!("Score: {} / {}", session.score(), session.paper().len());
    }
    Ok(())
}

pub fn review(args: &GlobalArgs, output: Option<PathBuf>) -> Result<()> {
    let ctx = Context::load(args)?;
    let session = ctx.exam_session();
    if session.is_running() {
        return Err(QuizError::StillRunning)
            .context("corrections are shown once the exam is stopped");
    }
    if session.paper().is_empty() {
        anyhow::bail!("no exam to review; use `brevet exam start`");
    }

    let report = session.review();
    print_results(&report);

    if let Some(path) = output {
        report.save_json(&path)?;
        println!("Review saved to {}", path.display());
    }
    Ok(())
}

pub fn dismiss(args: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut session = ctx.exam_session();
    session.dismiss()?;
    println!("State: {}", session.state());
    Ok(())
}

enum Flow {
    Continue,
    Finished,
    Leave,
}

async fn run(session: &mut ExamSession) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timeout_announced = false;
    prompt("> ");

    loop {
        tokio::select! {
            remaining = session.wait_tick() => {
                if !session.is_running() {
                    println!();
                    println!("Time is up!");
                    print_results(&session.review());
                    return Ok(());
                }
                if remaining == 0 && !timeout_announced {
                    timeout_announced = true;
                    println!();
                    println!("Time is up! Type `stop` to hand in your paper.");
                    prompt("> ");
                } else if remaining > 0 && remaining % 300 == 0 {
                    println!();
                    println!("{} left.", format_clock(remaining));
                    prompt("> ");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    println!();
                    leave(session);
                    return Ok(());
                };
                match handle(session, &line)? {
                    Flow::Continue => prompt("> "),
                    Flow::Finished => return Ok(()),
                    Flow::Leave => {
                        leave(session);
                        return Ok(());
                    }
                }
            }
        }
    }
}

fn handle(session: &mut ExamSession, line: &str) -> Result<Flow> {
    let line = line.trim();
    match line {
        "" => {}
        "help" => println!("{HELP}"),
        "list" => print_paper(session),
        "time" => println!("{} left.", format_clock(session.remaining_secs())),
        "stop" => {
            session.stop()?;
            print_results(&session.review());
            return Ok(Flow::Finished);
        }
        "quit" => return Ok(Flow::Leave),
        _ => {
            let (number, answer) = match line.split_once(char::is_whitespace) {
                Some((number, answer)) => (number, Some(answer)),
                None => (line, None),
            };
            let Some(index) = number
                .parse::<usize>()
                .ok()
                .filter(|n| (1..=session.paper().len()).contains(n))
                .map(|n| n - 1)
            else {
                println!("Unrecognized input. {HELP}");
                return Ok(Flow::Continue);
            };

            let exercise = session.paper()[index].clone();
            match answer {
                Some(answer) => {
                    session.submit(&exercise.id, parse_answer(&exercise, answer))?;
                    println!(
                        "Saved answer for question {}. ({}/{} answered)",
                        index + 1,
                        session.answered_count(),
                        session.paper().len()
                    );
                }
                None => {
                    println!("{}. [{}]", index + 1, exercise.subject.label());
                    print_exercise(&exercise);
                    if let Some(previous) = session.answers().get(&exercise.id) {
                        println!("Your answer: {previous}");
                    }
                }
            }
        }
    }
    Ok(Flow::Continue)
}

fn leave(session: &ExamSession) {
    if session.is_running() {
        println!(
            "Exam saved with {} left. Run `brevet exam resume` to continue.",
            format_clock(session.remaining_secs())
        );
    }
}

fn print_paper(session: &ExamSession) {
    for (i, exercise) in session.paper().iter().enumerate() {
        let mark = if session.answers().contains(&exercise.id) {
            "x"
        } else {
            " "
        };
        println!("\n{}. [{mark}] [{}]", i + 1, exercise.subject.label());
        print_exercise(exercise);
    }
    println!();
}

fn print_results(report: &ExamReport) {
    println!(
        "Score: {} / {} ({}%)",
        report.score,
        report.total,
        report.percent()
    );

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Correct", "Answered", "Questions"]);
    for s in &report.per_subject {
        table.add_row(vec![
            Cell::new(s.subject.label()),
            Cell::new(s.correct),
            Cell::new(s.answered),
            Cell::new(s.total),
        ]);
    }
    println!("{table}");

    for q in &report.questions {
        let verdict = if q.correct { "OK" } else { "WRONG" };
        println!("\n{}. [{verdict}] {}", q.number, q.question);
        println!("   Your answer: {}", q.submitted_text);
        println!("   Expected: {}", q.expected);
        if !q.explanation.is_empty() {
            println!("   {}", q.explanation);
        }
    }
}
