//! The `brevet init` command.

use anyhow::Result;

use brevet_core::config::STARTER_CONFIG;

pub fn execute() -> Result<()> {
    if std::path::Path::new("brevet.toml").exists() {
        println!("brevet.toml already exists, skipping.");
    } else {
        std::fs::write("brevet.toml", STARTER_CONFIG)?;
        println!("Created brevet.toml");
    }

    std::fs::create_dir_all("banks")?;
    let example_path = std::path::Path::new("banks/example.toml");
    if example_path.exists() {
        println!("banks/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_BANK)?;
        println!("Created banks/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Add exercises to banks/example.toml");
    println!("  2. Run: brevet validate --bank banks/example.toml");
    println!("  3. Run: brevet --bank banks practice --subject maths");

    Ok(())
}

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example bank"
description = "One exercise per subject to get started"

[[exercises]]
id = "ex-fr1"
subject = "francais"
kind = "multiple_choice"
question = "Quelle est la nature du mot « rapidement » ?"
choices = ["Adjectif", "Adverbe", "Nom", "Verbe"]
correct_index = 1
explanation = "Les mots en -ment formés sur un adjectif sont des adverbes."

[[exercises]]
id = "ex-ma1"
subject = "maths"
kind = "short_answer"
question = "Calcule 7 × 8."
placeholder = "Un nombre"
acceptable_answers = ["56"]
explanation = "7 × 8 = 56."

[[exercises]]
id = "ex-hg1"
subject = "hgeo"
kind = "multiple_choice"
question = "En quelle année a eu lieu la prise de la Bastille ?"
choices = ["1789", "1815", "1848", "1914"]
correct_index = 0
explanation = "Le 14 juillet 1789, début de la Révolution française."

[[exercises]]
id = "ex-sc1"
subject = "sciences"
kind = "short_answer"
question = "Quelle est la formule chimique de l'eau ?"
acceptable_answers = ["H2O", "H₂O"]
explanation = "Deux atomes d'hydrogène et un atome d'oxygène."
"#;
