// Copyright (c) 2026 AeroTrust Maintainers. MIT License.
// See LICENSE for details.

//! # AeroTrust Gateway
//!
//! Entry point for the `aerotrust-gateway` binary. Parses CLI arguments,
//! initializes logging and metrics, optionally signs in a bootstrap
//! identity from disk, and serves the HTTP API.
//!
//! The binary supports two subcommands:
//!
//! - `run`     — start the gateway service
//! - `version` — print build version information

mod api;
mod cli;
mod fabric;
mod logging;
mod metrics;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;

use aerotrust_protocol::identity::{Identity, X509Identity};
use aerotrust_protocol::session::Session;

use cli::{Commands, GatewayCli};
use fabric::{PeerConnector, PeerEndpoints, PeerTarget};
use logging::LogFormat;
use metrics::GatewayMetrics;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = GatewayCli::parse();

    match cli.command {
        Commands::Run(args) => run_gateway(args).await,
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Starts the full gateway: session, HTTP API, and metrics endpoint.
async fn run_gateway(args: cli::RunArgs) -> Result<()> {
    logging::init_logging(
        "aerotrust_gateway=info,aerotrust_protocol=info,tower_http=debug",
        LogFormat::from_str_lossy(&args.log_format),
    );

    tracing::info!(
        api_port = args.api_port,
        metrics_port = args.metrics_port,
        org1_peer = %args.org1_peer,
        org2_peer = %args.org2_peer,
        "starting aerotrust-gateway"
    );

    let bootstrap = args.bootstrap().map_err(|e| anyhow::anyhow!(e))?;

    // --- Session over the configured peer set ---
    let endpoints = PeerEndpoints::new(
        PeerTarget {
            endpoint: args.org1_peer,
            tls_ca_path: args.org1_tls_ca,
        },
        PeerTarget {
            endpoint: args.org2_peer,
            tls_ca_path: args.org2_tls_ca,
        },
    );
    let session = Arc::new(Session::new(PeerConnector::new(endpoints)));

    // --- Optional bootstrap identity from disk ---
    match bootstrap {
        Some(bootstrap) => {
            let identity = X509Identity::from_files(
                &bootstrap.msp_id,
                &bootstrap.certificate,
                &bootstrap.private_key,
            )
            .with_context(|| {
                format!("failed to load bootstrap identity for {}", bootstrap.msp_id)
            })?;
            session.rebind(Identity::from(identity)).with_context(|| {
                format!("failed to bind bootstrap identity for {}", bootstrap.msp_id)
            })?;
            tracing::info!(msp_id = %bootstrap.msp_id, "bootstrap identity bound");
        }
        None => {
            tracing::info!("no bootstrap identity configured; waiting for sign-in");
        }
    }

    // --- Metrics ---
    let gateway_metrics = Arc::new(GatewayMetrics::new());
    gateway_metrics.identity_bound.set(session.is_bound() as i64);

    // --- Application state ---
    let app_state = api::AppState {
        version: env!("CARGO_PKG_VERSION").to_string(),
        session: Arc::clone(&session),
        metrics: Arc::clone(&gateway_metrics),
    };

    // --- API server ---
    let api_router = api::create_router(app_state);
    let api_addr = format!("0.0.0.0:{}", args.api_port);
    let api_listener = tokio::net::TcpListener::bind(&api_addr)
        .await
        .with_context(|| format!("failed to bind API listener on {api_addr}"))?;
    tracing::info!("API server listening on {}", api_addr);

    // --- Metrics server ---
    let metrics_router = axum::Router::new()
        .route("/metrics", axum::routing::get(metrics::metrics_handler))
        .with_state(Arc::clone(&gateway_metrics));
    let metrics_addr = format!("0.0.0.0:{}", args.metrics_port);
    let metrics_listener = tokio::net::TcpListener::bind(&metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics listener on {metrics_addr}"))?;
    tracing::info!("Metrics server listening on {}", metrics_addr);

    // --- Serve ---
    tokio::select! {
        res = axum::serve(api_listener, api_router) => {
            if let Err(e) = res {
                tracing::error!("API server error: {}", e);
            }
        }
        res = axum::serve(metrics_listener, metrics_router) => {
            if let Err(e) = res {
                tracing::error!("Metrics server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            tracing::info!("shutdown signal received, draining connections");
        }
    }

    session.unbind();
    tracing::info!("aerotrust-gateway stopped");
    Ok(())
}

/// Prints version information to stdout.
fn print_version() {
    println!("aerotrust-gateway {}", env!("CARGO_PKG_VERSION"));
    println!(
        "signing   {}",
        aerotrust_protocol::config::SIGNING_ALGORITHM
    );
}

/// Waits for SIGINT (Ctrl+C) or SIGTERM, whichever comes first.
///
/// On non-Unix platforms, only Ctrl+C is supported.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
