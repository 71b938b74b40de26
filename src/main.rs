use std::fs::File;
use std::process::ExitCode;

use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use senti::analysis::{AnalysisClient, SentimentAnalyzer};
use senti::core::config::{self, ResolvedConfig, SentiConfig};
use senti::tui;

#[derive(Parser)]
#[command(name = "senti", version, about = "Conversational sentiment analysis in the terminal")]
struct Args {
    /// Prediction service base URL (overrides config file and SENTI_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Check that the prediction service is reachable, then exit
    #[arg(long, conflicts_with = "analyze")]
    check: bool,

    /// Analyze TEXT once, print the result, then exit
    #[arg(long, value_name = "TEXT")]
    analyze: Option<String>,

    /// With --analyze, print the result as JSON
    #[arg(long, requires = "analyze")]
    json: bool,
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to senti.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("senti.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Config error, using defaults: {}", e);
        eprintln!("warning: {e}; using default settings");
        SentiConfig::default()
    });
    let config = config::resolve(&file_config, args.base_url.as_deref());
    log::info!("Senti starting up against {}", config.base_url);

    if args.check {
        return Ok(check(&config).await);
    }
    if let Some(text) = args.analyze {
        return Ok(analyze_once(&config, &text, args.json).await);
    }

    tui::run(config)?;
    Ok(ExitCode::SUCCESS)
}

fn client(config: &ResolvedConfig) -> AnalysisClient {
    AnalysisClient::new(&config.base_url, &config.predict_path, &config.health_path)
}

async fn check(config: &ResolvedConfig) -> ExitCode {
    match client(config).health().await {
        Ok(health) if health.is_healthy() => {
            println!("{}: {} ({})", config.base_url, health.status, health.message);
            ExitCode::SUCCESS
        }
        Ok(health) => {
            eprintln!("{}: unhealthy ({})", config.base_url, health.status);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("{}: {}", config.base_url, e.detail());
            ExitCode::FAILURE
        }
    }
}

async fn analyze_once(config: &ResolvedConfig, text: &str, json: bool) -> ExitCode {
    if text.trim().is_empty() {
        eprintln!("Nothing to analyze: text is empty");
        return ExitCode::FAILURE;
    }

    match client(config).analyze(text).await {
        Ok(result) if json => match serde_json::to_string_pretty(&result) {
            Ok(out) => {
                println!("{out}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to encode result: {e}");
                ExitCode::FAILURE
            }
        },
        Ok(result) => {
            for line in result.summary_lines() {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
