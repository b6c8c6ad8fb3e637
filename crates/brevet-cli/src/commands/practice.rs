//! The `brevet practice` command: step through one subject's exercises.

use std::io::BufRead;

use anyhow::Result;

use brevet_core::answers::AnswerStore;
use brevet_core::model::{Exercise, Subject};

use super::{parse_answer, print_correction, print_exercise, prompt, Context, GlobalArgs};

const HELP: &str = "Type your answer (a letter for multiple choice), or :next, :prev, :reset, :progress, :quit";

pub fn execute(args: &GlobalArgs, subject: Subject) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut store = ctx.answer_store();
    let exercises = ctx.bank.exercises(subject)?.to_vec();
    store.open(subject)?;

    println!("{} ({} exercises)", subject.label(), exercises.len());
    println!("{HELP}");

    let mut index = 0;
    show(&mut store, subject, &exercises, index);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        match line.trim() {
            ":quit" | ":q" => break,
            ":next" | ":n" => {
                if index + 1 < exercises.len() {
                    index += 1;
                    show(&mut store, subject, &exercises, index);
                } else {
                    println!("This is the last exercise.");
                    prompt("> ");
                }
            }
            ":prev" | ":p" => {
                if index > 0 {
                    index -= 1;
                    show(&mut store, subject, &exercises, index);
                } else {
                    println!("This is the first exercise.");
                    prompt("> ");
                }
            }
            ":reset" => {
                store.reset(subject);
                println!("Answers cleared.");
                print_progress(&mut store, subject);
                prompt("> ");
            }
            ":progress" => {
                print_progress(&mut store, subject);
                prompt("> ");
            }
            ":help" | ":h" => {
                println!("{HELP}");
                prompt("> ");
            }
            "" => show(&mut store, subject, &exercises, index),
            input => {
                let exercise = &exercises[index];
                store.submit(subject, &exercise.id, parse_answer(exercise, input))?;
                if let Some(correction) = store.check(subject, &exercise.id)? {
                    print_correction(&correction);
                }
                print_progress(&mut store, subject);
                prompt("> ");
            }
        }
    }
    println!();

    Ok(())
}

fn show(store: &mut AnswerStore, subject: Subject, exercises: &[Exercise], index: usize) {
    let exercise = &exercises[index];
    println!();
    println!("[{}/{}] {}", index + 1, exercises.len(), exercise.id);
    print_exercise(exercise);
    if let Some(previous) = store.answer(subject, &exercise.id) {
        println!("Your answer: {previous}");
    }
    prompt("> ");
}

fn print_progress(store: &mut AnswerStore, subject: Subject) {
    let progress = store.progress(subject);
    println!(
        "Progress: {}/{} ({}%)",
        progress.answered,
        progress.total,
        progress.percent()
    );
}
