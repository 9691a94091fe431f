//! eysh CLI: operator interface to the adaptive learning engine.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod session;

#[derive(Parser)]
#[command(name = "eysh", version, about = "Adaptive exam-preparation engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a diagnostic test and estimate level and weak topics
    Assess {
        /// Session JSON with `results` or `answers`
        #[arg(long)]
        session: PathBuf,

        /// Question bank .toml file or directory, needed to grade `answers`
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Build a personalized study roadmap
    Roadmap {
        /// Session JSON with `results` or `answers`
        #[arg(long)]
        session: PathBuf,

        /// Question bank .toml file or directory, needed to grade `answers`
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Student profile JSON
        #[arg(long)]
        student: Option<PathBuf>,

        /// Mentor list JSON, ranked into the report when given
        #[arg(long)]
        mentors: Option<PathBuf>,

        /// Weeks until the exam
        #[arg(long)]
        weeks: Option<u32>,

        /// Target exam score
        #[arg(long)]
        target_score: Option<u32>,

        /// Language for goals and topic names: mn, en
        #[arg(long)]
        locale: Option<String>,

        /// Output directory
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: json, html, markdown, all
        #[arg(long, default_value = "json")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Mark a roadmap week completed
    Progress {
        /// Roadmap or study report JSON, rewritten in place
        #[arg(long)]
        roadmap: PathBuf,

        /// Week number to mark completed
        #[arg(long)]
        week: u32,
    },

    /// Rank mentors for a student
    Mentors {
        /// Student profile JSON
        #[arg(long)]
        student: PathBuf,

        /// Mentor list JSON
        #[arg(long)]
        mentors: PathBuf,

        /// Only mentors teaching this subject
        #[arg(long)]
        subject: Option<String>,

        /// Number of mentors to show
        #[arg(long, default_value = "5")]
        top: usize,
    },

    /// Compare two assessments of the same student
    Compare {
        /// Baseline study report or outcome JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current study report or outcome JSON
        #[arg(long)]
        current: PathBuf,

        /// Exit code 1 if the level dropped
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Aggregate statistics over a directory of study reports
    Cohort {
        /// Directory of study report JSON files
        #[arg(long)]
        dir: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Show which pretrained models are available
    Models {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and example question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eysh=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Assess {
            session,
            bank,
            format,
            config,
        } => commands::assess::execute(session, bank, format, config).await,
        Commands::Roadmap {
            session,
            bank,
            student,
            mentors,
            weeks,
            target_score,
            locale,
            output,
            format,
            config,
        } => {
            commands::roadmap::execute(commands::roadmap::RoadmapArgs {
                session,
                bank,
                student,
                mentors,
                weeks,
                target_score,
                locale,
                output,
                format,
                config,
            })
            .await
        }
        Commands::Progress { roadmap, week } => commands::progress::execute(roadmap, week),
        Commands::Mentors {
            student,
            mentors,
            subject,
            top,
        } => commands::mentors::execute(student, mentors, subject, top),
        Commands::Compare {
            baseline,
            current,
            fail_on_regression,
            format,
        } => commands::compare::execute(baseline, current, fail_on_regression, format),
        Commands::Cohort { dir, format } => commands::cohort::execute(dir, format),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Models { config } => commands::models::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
