mod alerts;
mod config;
mod controller;
mod dashboard;
mod errors;
mod map;
mod metrics;
mod model;
mod rest;
mod risk;
mod scheduler;
mod sensors;
mod series;
mod telemetry;
mod ui;

use anyhow::Context;
use axum::{http::StatusCode, routing::get, Router};
use clap::Parser;
use config::Config;
use map::MapView;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sensors::SENSORS;
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting disaster monitoring dashboard");
    info!(
        "HTTP server: {}, refresh: {}ms, alert interval: {}ms",
        config.http_addr, config.refresh_ms, config.alert_interval_ms
    );

    metrics::init_metrics().context("Failed to register metrics")?;

    let map = MapView::new(config.owm_api_key.as_deref(), &SENSORS);
    let (controller, controller_task) = controller::spawn(config.controller(), StdRng::from_entropy());

    let app = Router::new()
        .route("/metrics", get(metrics_handler))
        .merge(rest::create_router(controller.clone(), map))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&config.http_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.http_addr))?;

    info!("HTTP server listening on {}", config.http_addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("HTTP server error: {}", e);
        }
    });

    tokio::select! {
        _ = controller_task => {
            error!("Dashboard controller terminated");
        }
        _ = server_handle => {
            error!("HTTP server terminated");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
            if let Err(e) = controller.shutdown().await {
                error!("Failed to stop controller: {}", e);
            }
        }
    }

    info!("Shutting down");
    Ok(())
}

async fn metrics_handler() -> Result<String, (StatusCode, String)> {
    metrics::gather_metrics().map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })
}
