//! The `brevet subjects` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use brevet_core::model::Subject;

use super::{Context, GlobalArgs};

pub fn execute(args: &GlobalArgs) -> Result<()> {
    let ctx = Context::load(args)?;

    println!("Bank: {} ({} exercises)", ctx.bank.name(), ctx.bank.len());

    let mut table = Table::new();
    table.set_header(vec!["Key", "Subject", "Exercises"]);
    for subject in Subject::ALL {
        table.add_row(vec![
            Cell::new(subject.key()),
            Cell::new(subject.label()),
            Cell::new(ctx.bank.subject_exercises(subject).len()),
        ]);
    }
    println!("{table}");

    let covered = ctx.bank.subjects();
    let missing: Vec<&str> = Subject::ALL
        .into_iter()
        .filter(|s| !covered.contains(s))
        .map(Subject::label)
        .collect();
    if !missing.is_empty() {
        println!("No exercises for: {}", missing.join(", "));
    }

    Ok(())
}
