//! The `brevet answer` command.

use anyhow::{Context as _, Result};

use brevet_core::model::Subject;

use super::{parse_answer, print_correction, Context, GlobalArgs};

pub fn execute(args: &GlobalArgs, subject: Subject, id: String, value: String) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut store = ctx.answer_store();

    let exercise = ctx
        .bank
        .exercises(subject)?
        .iter()
        .find(|e| e.id == id)
        .with_context(|| format!("no exercise {id} in {}", subject.label()))?;

    let answer = parse_answer(exercise, &value);
    store.submit(subject, &id, answer)?;

    if let Some(correction) = store.check(subject, &id)? {
        print_correction(&correction);
    }

    let progress = store.progress(subject);
    println!(
        "{}: {}/{} answered ({}%)",
        subject.label(),
        progress.answered,
        progress.total,
        progress.percent()
    );

    Ok(())
}
