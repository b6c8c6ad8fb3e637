//! The `brevet reset` command.

use anyhow::Result;

use brevet_core::model::Subject;

use super::{Context, GlobalArgs};

pub fn execute(args: &GlobalArgs, subject: Subject) -> Result<()> {
    let ctx = Context::load(args)?;
    let mut store = ctx.answer_store();
    store.open(subject)?;
    store.reset(subject);
    println!("Cleared practice answers for {}.", subject.label());
    Ok(())
}
