//! CLI entry point for the cohort acta generator.
//!
//! Fetches the five courses of a diploma program from Canvas, reconciles each
//! student's grades, and prints and exports the resulting acta.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cohort_acta::config::CanvasConfig;
use cohort_acta::fetch::BasicClient;
use cohort_acta::fetch::auth::ApiKey;
use cohort_acta::grading::cohort::signature;
use cohort_acta::infra::canvas::CanvasClient;
use cohort_acta::output::{log_summary, render_table, to_json, write_csv};
use cohort_acta::parser::parse_course_ids;
use cohort_acta::pipeline::check_course_count;
use cohort_acta::run_acta;
use cohort_acta::services::CourseDataSource;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cohort_acta")]
#[command(about = "Builds diploma grade actas from five Canvas courses", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every student of a five-course program and export the acta
    Generate {
        /// Course ids in program order (C1..C5); commas are accepted as separators
        #[arg(value_name = "COURSE_ID", required = true, num_args = 1..)]
        course_ids: Vec<String>,

        /// CSV file to write (defaults to the suggested acta filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the acta as JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Skip writing the CSV file
        #[arg(long, default_value_t = false)]
        no_export: bool,
    },
    /// Show a single course's metadata and cohort signature
    Course {
        #[arg(value_name = "COURSE_ID")]
        course_id: String,
    },
}

fn init_logging() -> tracing_appender::non_blocking::WorkerGuard {
    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cohort_acta.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"))
        .to_path_buf();
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cohort_acta.log"))
        .to_os_string();

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let file_guard = init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(error = %format!("{e:#}"), "Run aborted");
        drop(file_guard);
        std::process::exit(1);
    }
    Ok(())
}

fn canvas_client() -> Result<CanvasClient<ApiKey<BasicClient>>> {
    let config = CanvasConfig::from_env()?;
    CanvasClient::from_config(&config)
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            course_ids,
            output,
            json,
            no_export,
        } => {
            let ids = parse_course_ids(&course_ids.join(" "));
            check_course_count(&ids)?;

            let client = canvas_client()?;
            let report = run_acta(&client, &ids).await?;

            if json {
                println!("{}", to_json(&report)?);
            } else {
                println!("{}", render_table(&report));
            }
            log_summary(&report);

            if !no_export {
                let path = output.unwrap_or_else(|| PathBuf::from(report.suggested_filename()));
                write_csv(&path, &report)?;
                info!(path = %path.display(), "Acta exported");
            }
        }
        Commands::Course { course_id } => {
            let client = canvas_client()?;
            match client.get_course(&course_id).await? {
                Some(course) => {
                    let students = client.get_enrollments(&course.id).await?.len();
                    println!("id:                 {}", course.id);
                    println!("name:               {}", course.name);
                    println!("course code:        {}", course.course_code);
                    println!("institutional code: {}", course.institutional_code);
                    println!("cohort signature:   {}", signature(&course.institutional_code));
                    println!("account:            {}", course.account_id);
                    println!("active students:    {students}");
                }
                None => anyhow::bail!("course {course_id} not found"),
            }
        }
    }

    Ok(())
}
