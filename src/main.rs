//! Turbofan Prognostics service binary.
//!
//! # Usage
//!
//! ```bash
//! # Run the HTTP API server
//! turbofan-prognostics
//!
//! # Score a telemetry CSV offline (no model endpoint needed)
//! turbofan-prognostics score --file engine_07.csv
//!
//! # Score and scale a known RUL prediction into a health index
//! turbofan-prognostics score --file engine_07.csv --rul 42.5
//! ```
//!
//! # Environment Variables
//!
//! - `PROGNOSTICS_CONFIG`: path to the TOML config file
//! - `RUST_LOG`: logging level (default: info)

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use turbofan_prognostics::api::{create_app, ApiState};
use turbofan_prognostics::config::PrognosticsConfig;
use turbofan_prognostics::predictor::{RemoteModel, RulPredictor};
use turbofan_prognostics::preprocess::TelemetrySeries;
use turbofan_prognostics::reference::ReferenceStatistics;
use turbofan_prognostics::scoring::{health_from_rul, summarize, DamageRuleEngine};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "turbofan-prognostics")]
#[command(about = "Turbofan engine RUL prognostics and damage localization")]
#[command(version)]
struct CliArgs {
    /// Override the server bind address (default from config: "0.0.0.0:8080")
    #[arg(short, long)]
    addr: Option<String>,

    /// Path to the config file (overrides PROGNOSTICS_CONFIG and the
    /// ./prognostics.toml search)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Evaluate a telemetry CSV offline and print the damage assessment
    Score {
        /// Path to the telemetry CSV file
        #[arg(long)]
        file: PathBuf,

        /// Known RUL prediction to scale into a health index
        #[arg(long)]
        rul: Option<f64>,
    },
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(args: &CliArgs) -> Result<PrognosticsConfig> {
    let mut config = match &args.config {
        Some(path) => PrognosticsConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PrognosticsConfig::load(),
    };
    if let Some(addr) = &args.addr {
        config.server.addr.clone_from(addr);
        config.validate().context("validating overridden address")?;
    }
    Ok(config)
}

fn load_reference_stats(config: &PrognosticsConfig) -> Result<ReferenceStatistics> {
    let stats = match &config.reference_stats {
        Some(path) => ReferenceStatistics::from_toml_file(path)
            .with_context(|| format!("loading reference statistics from {}", path.display()))?,
        None => ReferenceStatistics::builtin(),
    };
    // Fail fast on a catalog/statistics mismatch; never discover it per request.
    stats.validate().context("validating reference statistics")?;
    Ok(stats)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    let stats = load_reference_stats(&config)?;

    match args.command {
        Some(SubCommand::Score { file, rul }) => score_offline(&config, &stats, &file, rul),
        None => serve(config, stats).await,
    }
}

/// Offline scoring: rule engine only, no model inference.
fn score_offline(
    config: &PrognosticsConfig,
    stats: &ReferenceStatistics,
    file: &PathBuf,
    rul: Option<f64>,
) -> Result<()> {
    let series = TelemetrySeries::from_csv_path(file)
        .with_context(|| format!("reading telemetry from {}", file.display()))?;

    let engine = DamageRuleEngine::new(stats, &config.scoring);
    let assessment = engine.evaluate(&series.latest_snapshot());
    let summary = summarize(&assessment, config.scoring.max_reported_findings);

    println!("damage location : {summary}");
    println!("rule health idx : {:.0}", assessment.health_index);
    for finding in &assessment.findings {
        println!(
            "  [{}] {} ({}): -{}",
            finding.severity, finding.feature, finding.group, finding.deduction
        );
    }

    if let Some(rul) = rul {
        let index = health_from_rul(rul, config.model.rul_ceiling)?;
        println!("rul health idx  : {index} (rul {rul}, ceiling {})", config.model.rul_ceiling);
    }
    Ok(())
}

/// Run the HTTP API server until interrupted.
async fn serve(config: PrognosticsConfig, stats: ReferenceStatistics) -> Result<()> {
    let predictor: Option<Arc<dyn RulPredictor>> = match &config.model.endpoint {
        Some(endpoint) => {
            info!(endpoint, "using remote sequence-model inference");
            Some(Arc::new(RemoteModel::new(endpoint.clone())))
        }
        None => {
            warn!("no model.endpoint configured; predict endpoints will answer 503");
            None
        }
    };

    let addr = config.server.addr.clone();
    let state = ApiState {
        config: Arc::new(config),
        stats: Arc::new(stats),
        predictor,
    };

    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;
    info!(addr = %addr, "prognostics API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to install ctrl-c handler");
    }
    info!("shutdown signal received");
}
