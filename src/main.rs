//! CLI entry point for the survey analytics tool.
//!
//! Provides subcommands for analyzing a survey export into KPI and theme
//! tables, building the dashboard JSON, tagging a single comment, and
//! exporting the built-in schema as a starting point for new surveys.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use survey_analytics::analyzers::analyzer::analyze;
use survey_analytics::analyzers::dashboard::build_dashboard;
use survey_analytics::analyzers::summary::executive_summary;
use survey_analytics::analyzers::tagger::{KeywordTagger, TagReport};
use survey_analytics::config::SurveySchema;
use survey_analytics::output::{write_analysis, write_json, write_summary};
use survey_analytics::parser::load_responses;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const SUMMARY_FILE: &str = "executive_summary.txt";

#[derive(Parser)]
#[command(name = "survey_analytics")]
#[command(about = "Normalize survey exports and aggregate KPI and theme tables", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a survey CSV and write KPI, theme and detail tables
    Analyze {
        /// Survey export with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Schema JSON (defaults to the built-in staff development survey)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Directory to write tables into
        #[arg(short, long, default_value = "out")]
        output_dir: PathBuf,
    },
    /// Build the dashboard JSON document for a survey CSV
    Dashboard {
        /// Survey export with a header row
        #[arg(short, long)]
        input: PathBuf,

        /// Schema JSON (defaults to the built-in staff development survey)
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// File to write the dashboard JSON to
        #[arg(short, long, default_value = "dashboard_data.json")]
        out: PathBuf,
    },
    /// Tag a single comment for sentiment and themes, printed as JSON to stdout
    Tag {
        /// Free text to tag
        text: String,

        /// Schema JSON whose lexicon and themes to use
        #[arg(short, long)]
        schema: Option<PathBuf>,
    },
    /// Write the built-in schema as JSON
    ExportSchema {
        /// File to write the schema to
        #[arg(short, long, default_value = "schema.json")]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/survey_analytics.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("survey_analytics.log"));

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
        Commands::Analyze {
            input,
            schema,
            output_dir,
        } => {
            let schema = load_schema(schema.as_deref())?;
            let (schema, responses) = load_responses(&input, &schema)?;
            let tagger = KeywordTagger::from_schema(&schema);
            let analysis = analyze(&schema, &responses, &tagger);

            write_analysis(&output_dir, &analysis)?;

            let points = executive_summary(&schema, &analysis);
            for (i, point) in points.iter().enumerate() {
                info!(point = i + 1, "{}", point);
            }
            let title = format!("{} - Executive Summary", schema.title);
            write_summary(output_dir.join(SUMMARY_FILE), &title, &points)?;

            info!(
                output_dir = %output_dir.display(),
                responses = analysis.total_responses,
                "Analysis complete"
            );
        }
        Commands::Dashboard { input, schema, out } => {
            let schema = load_schema(schema.as_deref())?;
            let (schema, responses) = load_responses(&input, &schema)?;
            let tagger = KeywordTagger::from_schema(&schema);
            let analysis = analyze(&schema, &responses, &tagger);

            let dashboard = build_dashboard(&schema, &responses, &analysis);
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            write_json(&out, &dashboard)?;

            info!(out = %out.display(), "Dashboard data written");
        }
        Commands::Tag { text, schema } => {
            let schema = load_schema(schema.as_deref())?;
            let report = TagReport::new(&KeywordTagger::from_schema(&schema), &text);

            info!(
                sentiment = %report.sentiment,
                themes = ?report.themes,
                "Text tagged"
            );
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::ExportSchema { out } => {
            SurveySchema::staff_development_2025().write(&out)?;
            info!(out = %out.display(), "Built-in schema written");
        }
    }

    Ok(())
}

/// Loads the schema at `path`, or falls back to the built-in preset.
fn load_schema(path: Option<&Path>) -> Result<SurveySchema> {
    match path {
        Some(path) => SurveySchema::load(path),
        None => {
            info!("No schema given, using built-in staff development survey");
            Ok(SurveySchema::staff_development_2025())
        }
    }
}
