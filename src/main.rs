use clap::{Parser, ValueEnum};
use rfq_verifier::{catalog, select, Group, RfqClient, Runner, ScenarioId, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Contract verifier for the RFQ product-matching API
#[derive(Parser)]
#[command(name = "rfq-verifier")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Run only these scenario ids (repeatable), e.g. --only A01 --only B07
    #[arg(long)]
    only: Vec<ScenarioId>,

    /// Run only these scenario groups (repeatable)
    #[arg(short, long, value_enum)]
    group: Vec<Group>,

    /// Print the scenario catalog and exit
    #[arg(long)]
    list: bool,

    /// Configuration file (defaults to config/default and config/local)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable list report
    #[default]
    Text,
    /// JSON report for programmatic use
    Json,
}

fn init_logging(level: &str, format: &str) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| level.to_string());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| format.to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    // stdout carries the report
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load .env file if present
    dotenv::dotenv().ok();

    let scenarios = select(catalog(), &cli.only, &cli.group);

    if cli.list {
        for scenario in &scenarios {
            println!("{}", scenario);
        }
        return ExitCode::SUCCESS;
    }

    let settings = match cli.config.as_ref() {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(settings) => settings,
        Err(e) => {
            init_logging("info", "compact");
            error!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);
    info!("Configuration loaded, target {}", settings.api.base_url);

    let client = match RfqClient::from_settings(&settings) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::from(2);
        }
    };

    let report = Runner::new(client).run(&scenarios).await;

    match cli.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                error!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
