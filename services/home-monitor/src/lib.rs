//! Home Monitor - dashboard data orchestrator
//!
//! Loads devices and AI models from the home monitoring API, keeps a device and
//! model selection, and refreshes the combined summary whenever it changes.

pub mod api_client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod io;
pub mod models;
pub mod orchestrator;
pub mod selection;
pub mod state;
pub mod view;

pub use config::{load_config, Config};
pub use error::{HomeMonitorError, Result};
pub use orchestrator::{Orchestrator, RefreshOutcome};

use std::net::SocketAddr;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::api_client::HttpDashboardApi;
use crate::io::ReqwestHttpClient;

/// Build an orchestrator that talks to the configured API over HTTP
pub fn build_orchestrator(config: &Config) -> Orchestrator {
    let http: Arc<dyn io::HttpClient> = Arc::new(ReqwestHttpClient::new());
    let api = HttpDashboardApi::new(&config.api, http);
    tracing::debug!("Using API base URL {}", api.base_url());
    Orchestrator::new(Arc::new(api), config.api.default_model.clone())
}

async fn check_health(orchestrator: &Orchestrator) {
    match orchestrator.health().await {
        Ok(health) => tracing::info!("API health: {}", health.status),
        Err(e) => tracing::warn!("API health check failed: {}", e),
    }
}

/// Initialize once and return the rendered dashboard text
pub async fn run_once(config: Config) -> Result<String> {
    let orchestrator = build_orchestrator(&config);
    check_health(&orchestrator).await;

    if let Err(e) = orchestrator.initialize().await {
        tracing::debug!("Rendering failed initialization: {}", e);
    }

    Ok(view::render_text(&orchestrator.snapshot().await))
}

/// Run the home monitor service with the given configuration
pub async fn run(config: Config) -> Result<()> {
    let orchestrator = Arc::new(build_orchestrator(&config));
    let cancel = CancellationToken::new();

    // Log orchestrator events
    let mut events = orchestrator.subscribe();
    let cancel_for_events = cancel.clone();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel_for_events.cancelled() => break,
                event = events.recv() => match event {
                    Ok(event) => tracing::debug!("Dashboard event: {:?}", event),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        tracing::debug!("Event logger lagged by {} events", n);
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    });

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    // Start dashboard if enabled
    if config.dashboard.enabled {
        let dashboard_port = config.dashboard.port;
        let dashboard_orchestrator = Arc::clone(&orchestrator);
        let cancel_for_dashboard = cancel.clone();

        tokio::spawn(async move {
            let router = dashboard::build_router(dashboard_orchestrator);
            let addr = SocketAddr::from(([0, 0, 0, 0], dashboard_port));
            tracing::info!("Dashboard listening on http://{}", addr);

            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    tracing::error!(
                        "Failed to bind dashboard to port {}: {}. Continuing without dashboard.",
                        dashboard_port,
                        e
                    );
                    return;
                }
            };

            axum::serve(listener, router)
                .with_graceful_shutdown(async move {
                    cancel_for_dashboard.cancelled().await;
                })
                .await
                .ok();

            tracing::debug!("Dashboard stopped");
        });
    }

    check_health(&orchestrator).await;

    // Initialization failures are kept in state and shown by the dashboard
    if let Err(e) = orchestrator.initialize().await {
        tracing::error!("Initialization failed: {}", e);
    }

    tracing::info!("Home monitor started");
    cancel.cancelled().await;
    tracing::info!("Home monitor stopped");

    Ok(())
}
