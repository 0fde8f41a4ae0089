//! Comment sentiment worker binary.
//!
//! Usage: `ysent-worker <link>` (or `YOUTUBE_LINK`). Prints the run report as
//! JSON on stdout.

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ysent_worker::{Pipeline, WorkerConfig};
use ysent_youtube::cancel_pair;

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries the report
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("ysent=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let Some(link) = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("YOUTUBE_LINK").ok())
        .filter(|l| !l.trim().is_empty())
    else {
        error!("Usage: ysent-worker <video or channel link> (or set YOUTUBE_LINK)");
        std::process::exit(2);
    };

    info!("Starting ysent-worker");

    // Load configuration
    let config = match WorkerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(e.exit_code());
        }
    };
    info!("Worker config: {:?}", config);

    let pipeline = match Pipeline::from_config(&config).await {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to create pipeline: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    // Ctrl-C stops the run between page fetches
    let (cancel, token) = cancel_pair();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        cancel.cancel();
    });

    let report = match pipeline.with_cancel(token).run(&link).await {
        Ok(report) => report,
        Err(e) => {
            error!("Run failed: {}", e);
            std::process::exit(e.exit_code());
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            error!("Failed to serialize report: {}", e);
            std::process::exit(1);
        }
    }

    info!(partial = report.is_partial(), "Worker finished");
}
