#![doc = include_str!("../README.md")]

mod client;

use clap::Parser;
use client::config::{CliArgs, ClientConfig};
use client::connection::Connection;
use client::runner::Runner;
use client::streaming::feed::NoteFeed;
use client::telemetry::init_telemetry;
use rand::{SeedableRng, rngs::StdRng};
use std::process::ExitCode;
use tokio::signal;

// Using mimalloc for its lower allocation overhead, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ClientConfig::try_from(args)?;

    let providers = init_telemetry()?;

    if cfg!(debug_assertions) {
        tracing::debug!("Starting route guide client with config: {config:#?}");
    }

    let connection = Connection::open(&config).await;
    let runner =
        Runner::new(&connection, StdRng::from_rng(&mut rand::rng())).with_notes(NoteFeed::empty());

    let code = tokio::select! {
        result = runner.run() => match result {
            Ok(report) => {
                tracing::debug!(
                    "Run complete: feature lookup {}, {} features listed, {} route points, {} chat notes sent, {} received",
                    if report.feature.is_some() { "answered" } else { "failed" },
                    report.features_listed,
                    report.summary.point_count,
                    report.chat.sent,
                    report.chat.received.len()
                );
                ExitCode::SUCCESS
            }
            Err(err) => {
                tracing::error!("Run aborted: {err}");
                ExitCode::FAILURE
            }
        },
        _ = signal::ctrl_c() => {
            tracing::warn!("Received Ctrl+C signal, abandoning the run");
            ExitCode::FAILURE
        },
    };

    // Release the connection while the subscriber is still installed.
    drop(connection);
    providers.shutdown();

    Ok(code)
}
