//! The `brevet progress` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use brevet_core::model::Subject;

use super::{Context, GlobalArgs};

pub fn execute(args: &GlobalArgs, subject: Option<Subject>) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut store = ctx.answer_store();

    let subjects: Vec<Subject> = match subject {
        Some(subject) => vec![subject],
        None => Subject::ALL.to_vec(),
    };

    let mut table = Table::new();
    table.set_header(vec!["Subject", "Answered", "Total", "Progress", "Correct"]);
    for subject in subjects {
        let progress = store.progress(subject);
        table.add_row(vec![
            Cell::new(subject.label()),
            Cell::new(progress.answered),
            Cell::new(progress.total),
            Cell::new(format!("{}%", progress.percent())),
            Cell::new(store.correct_count(subject)),
        ]);
    }
    println!("{table}");

    Ok(())
}
