//! brevet CLI — practice DNB exercises by subject and sit timed mock exams.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use brevet_core::model::Subject;

mod commands;

use commands::GlobalArgs;

#[derive(Parser)]
#[command(name = "brevet", version, about = "DNB practice and timed mock exams")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List subjects and their exercise counts
    Subjects,

    /// Practice one subject interactively
    Practice {
        /// Subject key (francais, maths, hgeo, sciences)
        #[arg(long)]
        subject: Subject,
    },

    /// Submit one practice answer and print the correction
    Answer {
        /// Subject key
        #[arg(long)]
        subject: Subject,

        /// Exercise id (e.g. "ma2")
        #[arg(long)]
        id: String,

        /// Answer: a choice letter (A, B, ...) or free text
        value: String,
    },

    /// Show practice progress
    Progress {
        /// Restrict to one subject
        #[arg(long)]
        subject: Option<Subject>,
    },

    /// Clear the practice answers of a subject
    Reset {
        /// Subject key
        #[arg(long)]
        subject: Subject,
    },

    /// Timed mock exam
    #[command(subcommand)]
    Exam(ExamCommand),

    /// Validate the question bank (built-in, configured, or --bank)
    Validate,

    /// Create starter config and example bank
    Init,
}

#[derive(Subcommand)]
enum ExamCommand {
    /// Draw a new paper and start the countdown
    Start {
        /// Seed for a reproducible paper
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Continue the persisted exam
    Resume,

    /// Stop the running exam and show the results
    Stop,

    /// Show the exam state and remaining time
    Status,

    /// Show the per-question correction
    Review {
        /// Also write the review as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Leave a finished exam
    Dismiss,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "brevet_core=warn,brevet=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Subjects => commands::subjects::execute(&global),
        Commands::Practice { subject } => commands::practice::execute(&global, subject),
        Commands::Answer { subject, id, value } => {
            commands::answer::execute(&global, subject, id, value)
        }
        Commands::Progress { subject } => commands::progress::execute(&global, subject),
        Commands::Reset { subject } => commands::reset::execute(&global, subject),
        Commands::Exam(exam) => match exam {
            ExamCommand::Start { seed } => commands::exam::start(&global, seed).await,
            ExamCommand::Resume => commands::exam::resume(&global).await,
            ExamCommand::Stop => commands::exam::stop(&global),
            ExamCommand::Status => commands::exam::status(&global),
            ExamCommand::Review { output } => commands::exam::review(&global, output),
            ExamCommand::Dismiss => commands::exam::dismiss(&global),
        },
        Commands::Validate => commands::validate::execute(&global),
        Commands::Init => commands::init::execute(),
    };

    // A blocking stdin read may still be pending after an exam times out;
    // exit without waiting for it.
    let code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    };
    process::exit(code);
}
