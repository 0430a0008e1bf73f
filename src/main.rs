//! CLI entry point for the peer grading helper.
//!
//! Provides subcommands for unpacking submissions, creating one grading form
//! per student, assigning peer graders, and aggregating returned scores.

mod infra;

use crate::infra::google::{DEFAULT_BASE_URL, GoogleFormsClient, StoredCredentials};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use peer_grader::{
    assign::assign_graders,
    notice::render_notice,
    output::{write_records, write_text},
    publish::create_forms,
    report::write_reports,
    roster::{load_roster, write_roster},
    scoring::{aggregate_scores, load_score_rows},
    unpack::unpack_submissions,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::ffi::OsStr;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "peer_grader")]
#[command(about = "Peer grading logistics: forms, grader assignment and score reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract every <random>-<handle>.zip in the submissions directory
    Unpack {
        /// Roster CSV (idx, andrewid, name)
        #[arg(short, long, default_value = "student_info.csv")]
        roster: String,

        /// Directory holding the downloaded archives
        #[arg(short, long, default_value = "submissions")]
        submissions: String,
    },
    /// Create one grading form per student and record the links in the roster
    CreateForms {
        /// Roster CSV (idx, andrewid, name)
        #[arg(short, long, default_value = "student_info.csv")]
        roster: String,

        /// Directory holding the extracted submissions
        #[arg(short, long, default_value = "submissions")]
        submissions: String,

        /// Text shown as the description of every form
        #[arg(short, long, default_value = "grade_instruction.txt")]
        instructions: String,

        /// Form title prefix, e.g. "A1-grading"
        #[arg(short, long)]
        title: String,

        /// Where to write the updated roster (defaults to the input roster)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Assign three peer graders to every student and write the notice text
    Assign {
        /// Roster CSV with the form links
        #[arg(short, long, default_value = "student_info.csv")]
        roster: String,

        /// Text file listing each grader's forms
        #[arg(short, long, default_value = "email_text.txt")]
        output: String,

        /// Seed for a reproducible assignment
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Bucket peer ratings into bands and write per-student reports
    Aggregate {
        /// Scores CSV (idx, andrewid, name, score, peer_rating[, feedback])
        #[arg(short, long, default_value = "scores.csv")]
        scores: String,

        /// Directory for the per-student text reports
        #[arg(short = 'd', long, default_value = "reports")]
        reports_dir: String,

        /// Optional: CSV file for the scored table
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/peer_grader.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("peer_grader.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Unpack {
            roster,
            submissions,
        } => {
            let students = load_roster(&roster)?;
            let count = unpack_submissions(Path::new(&submissions), &students)?;
            info!(count, submissions = %submissions, "Unpack finished");
        }
        Commands::CreateForms {
            roster,
            submissions,
            instructions,
            title,
            output,
        } => {
            let mut students = load_roster(&roster)?;
            let instruction = std::fs::read_to_string(&instructions)
                .with_context(|| format!("failed to read instructions '{instructions}'"))?;

            let token_path =
                std::env::var("FORMS_TOKEN_PATH").unwrap_or_else(|_| "token.json".to_string());
            let base_url = std::env::var("FORMS_API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
            let credentials = StoredCredentials::load(&token_path)?;
            let client = GoogleFormsClient::connect(&credentials, &base_url).await?;

            let summary = create_forms(
                &client,
                &mut students,
                Path::new(&submissions),
                &instruction,
                &title,
            )
            .await;

            let output = output.unwrap_or(roster);
            write_roster(&output, &students)?;
            info!(
                created = summary.created,
                missing = summary.missing,
                roster = %output,
                "Roster updated with form links"
            );
        }
        Commands::Assign {
            roster,
            output,
            seed,
        } => {
            let students = load_roster(&roster)?;
            let without_form = students.iter().filter(|s| !s.has_form()).count();
            if without_form > 0 {
                warn!(without_form, "Some students have no form link");
            }

            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let ids: Vec<u32> = students.iter().map(|s| s.id).collect();
            let assignments = assign_graders(&ids, &mut rng)?;

            let text = render_notice(&students, &assignments)?;
            write_text(Path::new(&output), &text)?;
            info!(graders = assignments.len(), output = %output, "Grader notice written");
        }
        Commands::Aggregate {
            scores,
            reports_dir,
            output,
        } => {
            let rows = load_score_rows(&scores)?;
            let summary = aggregate_scores(&rows);

            write_reports(Path::new(&reports_dir), &summary)?;
            if let Some(output) = output {
                write_records(&output, &summary.students)?;
                info!(output = %output, "Scored table written");
            }
        }
    }

    Ok(())
}
