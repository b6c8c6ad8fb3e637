//! The `brevet validate` command.

use std::path::Path;

use anyhow::{Context as _, Result};

use brevet_core::bank::{QuestionBank, BUILTIN_BANK};
use brevet_core::config::load_config_from;
use brevet_core::parser;

use super::GlobalArgs;

pub fn execute(args: &GlobalArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;
    let per_subject = config.exam.per_subject;

    let files = match args.bank.as_ref().or(config.bank.as_ref()) {
        Some(path) if path.is_dir() => parser::load_bank_directory(path)?,
        Some(path) => vec![parser::parse_bank(path)?],
        None => vec![parser::parse_bank_str(BUILTIN_BANK, Path::new("dnb.toml"))?],
    };

    for file in &files {
        println!("Bank: {} ({} exercises)", file.name, file.exercises.len());
        if !file.description.is_empty() {
            println!("  {}", file.description);
        }
    }

    let exercises: Vec<_> = files
        .iter()
        .flat_map(|f| f.exercises.iter().cloned())
        .collect();

    let warnings = parser::validate_exercises(&exercises, per_subject);
    for w in &warnings {
        let prefix = w
            .exercise_id
            .as_ref()
            .map(|id| format!("  [{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }
    let total_warnings = warnings.len();

    let bank = QuestionBank::new("validate", exercises).context("bank is not usable")?;

    if total_warnings == 0 {
        let choices = bank.iter().filter(|e| e.is_multiple_choice()).count();
        println!(
            "All banks valid ({} exercises, {choices} multiple choice).",
            bank.len()
        );
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
