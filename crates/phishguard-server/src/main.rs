//! PhishGuard
//!
//! Command-line and HTTP front ends for hybrid phishing detection.
//!
//! The classifier and rule set are loaded once at start-up and shared by
//! every request.

use anyhow::{Context, Result};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use phishguard_core::Message;
use phishguard_policy::{evaluate, load_jsonl};
use phishguard_server::cli::{Cli, Commands, LogFormat};
use phishguard_server::{build_decision, create_router, render, AppConfig, AppState};
use std::io::Read;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.log_format);

    let config = AppConfig::load(&cli.config, &cli.overrides())?;

    match &cli.command {
        Commands::Analyze { text, json } => {
            let message = match text {
                Some(text) => Message::new(text.as_str()),
                None => read_stdin()?,
            };

            let decision = build_decision(&config)?;
            let verdict = decision.decide(message.as_str())?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&verdict)?);
            } else {
                println!("{}", render::verdict_report(&message, &verdict));
            }
        }

        Commands::Evaluate { file, json } => {
            let samples = load_jsonl(file)
                .with_context(|| format!("reading labeled samples from {}", file.display()))?;
            info!("Loaded {} labeled samples", samples.len());

            let decision = build_decision(&config)?;
            let report = evaluate(&decision, &samples)?;

            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::evaluation_report(&report));
            }
        }

        Commands::Serve { .. } => serve(config).await?,
    }

    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("Starting PhishGuard server");

    let metrics_handle = init_metrics()?;
    let decision = build_decision(&config)?;
    let state = AppState::new(decision, metrics_handle, config.server.max_message_bytes);

    let addr: SocketAddr = format!("{}:{}", config.server.listen, config.server.port).parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Read the whole of stdin as one message
fn read_stdin() -> Result<Message> {
    let mut bytes = Vec::new();
    std::io::stdin()
        .read_to_end(&mut bytes)
        .context("reading message from stdin")?;
    Ok(Message::from_bytes(bytes)?)
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool, format: LogFormat) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("phishguard=debug,phishguard_server=debug,phishguard_policy=debug,phishguard_rules=debug,phishguard_classifiers=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("phishguard=info,phishguard_server=info,phishguard_policy=info,phishguard_rules=info,phishguard_classifiers=info")
        })
    };

    // stdout is reserved for analyze/evaluate output
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "phishguard_requests_total",
        "Total number of analysis requests"
    );
    metrics::describe_counter!(
        "phishguard_verdicts_total",
        "Verdicts by final and classifier label"
    );
    metrics::describe_counter!(
        "phishguard_rule_hits_total",
        "Number of times each rule fired"
    );
    metrics::describe_histogram!(
        "phishguard_decision_latency_us",
        metrics::Unit::Microseconds,
        "Hybrid decision latency in microseconds"
    );
    metrics::describe_counter!("phishguard_errors_total", "Total number of errors by kind");

    info!("Metrics exporter initialized");
    Ok(handle)
}
