//! Labmark - lab submission grading CLI
//!
//! The `labmark` command drives the verification pipeline against live
//! services. Credentials and endpoints come from the environment
//! (`GITHUB_TOKEN`, `GOOGLE_SHEETS_TOKEN`, optional `*_API_URL`
//! overrides), loaded once at startup.
//!
//! ## Commands
//!
//! - `register`: record a student's hosting username in the gradebook
//! - `grade`: verify a submission and record its verdict

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use labmark_core::{GradeOutcome, GradePipeline, Student, YamlCourseStore};
use labmark_hosting::GithubClient;
use labmark_sheets::GoogleSheetsClient;

#[derive(Parser)]
#[command(name = "labmark")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Automated grading of student lab submissions", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding YAML course descriptors
    #[arg(long, global = true, env = "COURSES_DIR", default_value = "courses")]
    courses_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a student's hosting username in the gradebook
    Register {
        /// Course id
        #[arg(long)]
        course: String,

        /// Group worksheet title
        #[arg(long)]
        group: String,

        /// Family name as recorded in the gradebook
        #[arg(long)]
        surname: String,

        /// Given name
        #[arg(long)]
        name: String,

        /// Patronymic, if the student has one
        #[arg(long, default_value = "")]
        patronymic: String,

        /// Hosting-service username to record
        #[arg(long)]
        github: String,
    },

    /// Verify a submission and record its verdict
    Grade {
        /// Course id
        #[arg(long)]
        course: String,

        /// Group worksheet title
        #[arg(long)]
        group: String,

        /// Lab identifier with an embedded number, e.g. "LB2"
        #[arg(long)]
        lab: String,

        /// Hosting-service username of the submitter
        #[arg(long)]
        github: String,
    },
}

fn build_pipeline(courses_dir: PathBuf) -> GradePipeline {
    GradePipeline::new(
        Arc::new(YamlCourseStore::new(courses_dir)),
        Arc::new(GithubClient::from_env()),
        Arc::new(GoogleSheetsClient::from_env()),
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let pipeline = build_pipeline(cli.courses_dir);

    match cli.command {
        Commands::Register {
            course,
            group,
            surname,
            name,
            patronymic,
            github,
        } => {
            let student = Student {
                surname,
                name,
                patronymic,
                github,
            };
            let outcome = pipeline
                .register(&course, &group, &student)
                .await
                .context("registration failed")?;
            println!(
                "{}",
                serde_json::to_string_pretty(&json!({
                    "status": outcome,
                    "message": outcome.message(),
                }))?
            );
        }

        Commands::Grade {
            course,
            group,
            lab,
            github,
        } => {
            let outcome = pipeline
                .grade(&course, &group, &lab, &github)
                .await
                .context("grading failed")?;
            let body = match outcome {
                GradeOutcome::Updated(report) => json!({
                    "status": "updated",
                    "result": report.symbol,
                    "passed": report.passed_fraction,
                    "checks": report.checks,
                    "files_checked": report.files_checked,
                    "cell_written": report.cell_written,
                }),
                GradeOutcome::Pending => json!({
                    "status": "pending",
                    "message": "no CI check runs yet",
                }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
