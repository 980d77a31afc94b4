//! CLI entry point for the route risk scorer.
//!
//! Scores weather CSVs exported along a route and appends the outcome to a
//! CSV log of score records.

use anyhow::Result;
use clap::{Parser, Subcommand};
use route_risk::input::load_weather_csv;
use route_risk::output::{ScoreRecord, append_record, print_pretty};
use route_risk::scoring::scorer::{AssessmentSummary, DEFAULT_ROUTE_ID};
use route_risk::{PolicyLabel, RouteScorer, ScoreError, ScoringConfig};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "route-risk")]
#[command(about = "Scores shipping routes from per-waypoint weather", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a weather CSV (one row per waypoint)
    Score {
        /// Path to the weather CSV
        #[arg(value_name = "FILE")]
        source: String,

        /// CSV file to append score records to
        #[arg(short, long, default_value = "scores.csv")]
        output: String,

        /// Identifier recorded on the route
        #[arg(long, default_value = DEFAULT_ROUTE_ID)]
        route_id: String,

        /// JSON file overriding scoring constants
        #[arg(short, long)]
        config: Option<String>,

        /// Route-level opportunity cost in cents
        #[arg(long, default_value_t = 0)]
        opportunity_cost: u32,

        /// Print the per-segment route summary
        #[arg(short, long, default_value_t = false)]
        summary: bool,

        /// Print the assessment summary as JSON instead of plain text
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print the policy label for a score
    Label {
        #[arg(allow_negative_numbers = true)]
        score: i32,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/route_risk.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("route_risk.log"));

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
        Commands::Score {
            source,
            output,
            route_id,
            config,
            opportunity_cost,
            summary,
            json,
        } => {
            let config = match config {
                Some(path) => ScoringConfig::load(&path)?,
                None => ScoringConfig::default(),
            };
            score_file(
                &source,
                &output,
                &route_id,
                config,
                opportunity_cost,
                summary,
                json,
            )?;
        }
        Commands::Label { score } => {
            let label = PolicyLabel::from_score(score, &ScoringConfig::default().bands);
            println!("{label}");
        }
    }

    Ok(())
}

fn error_type(e: &ScoreError) -> &'static str {
    match e {
        ScoreError::InvalidInput(_) => "invalid_input",
        ScoreError::OverCapacity { .. } => "over_capacity",
    }
}

/// Loads, scores, and records one weather file. Scoring failures are written
/// as error records before being returned.
#[tracing::instrument(skip(config, summary, json))]
fn score_file(
    source: &str,
    output: &str,
    route_id: &str,
    config: ScoringConfig,
    opportunity_cost: u32,
    summary: bool,
    json: bool,
) -> Result<()> {
    let table = match load_weather_csv(source) {
        Ok(table) => table,
        Err(e) => {
            error!(error = %e, "Weather file could not be read");
            let record = ScoreRecord::from_error("read_error", &format!("{e:#}"))
                .with_route_info(route_id, source);
            print_pretty(&record);
            append_record(output, &record)?;
            return Err(e);
        }
    };

    let scorer = RouteScorer::new(config);
    let mut assessment = match table
        .matrix()
        .and_then(|m| scorer.assess_with_legs(&m, route_id, table.legs()))
    {
        Ok(a) => a,
        Err(e) => {
            error!(error = %e, rows = table.rows(), "Route could not be scored");
            let record = ScoreRecord::from_error(error_type(&e), &e.to_string())
                .with_route_info(route_id, source)
                .with_rows(table.rows());
            print_pretty(&record);
            append_record(output, &record)?;
            return Err(anyhow::Error::new(e).context(format!("failed to score {source}")));
        }
    };

    let route = &mut assessment.route;
    route.set_opportunity_cost(opportunity_cost);
    route.recalculate_totals(config.delay_cost_per_minute_cents);

    info!(
        score = assessment.score.value(),
        label = %assessment.label,
        overall_risk = %assessment.route.overall_risk,
        "Route scored"
    );

    let record = ScoreRecord::from_assessment(&assessment).with_route_info(route_id, source);
    print_pretty(&record);
    append_record(output, &record)?;

    if json {
        let summary = AssessmentSummary::from(&assessment);
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} {}", assessment.score, assessment.label);
    }
    if summary {
        print!("{}", assessment.route);
    }

    Ok(())
}
