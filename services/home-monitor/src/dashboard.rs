//! Local view server: JSON state, selection endpoints, and a plain HTML page

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::orchestrator::{Orchestrator, RefreshOutcome};
use crate::selection::{find_device, find_model};
use crate::state::DashboardSnapshot;
use crate::view::render_text;

/// View server application state
#[derive(Clone)]
pub struct ViewServerState {
    pub orchestrator: Arc<Orchestrator>,
}

#[derive(Debug, Deserialize)]
pub struct DeviceSelection {
    pub device_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelSelection {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SelectionResponse {
    pub outcome: String,
    pub state: DashboardSnapshot,
}

/// Build the dashboard axum router
pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    let dashboard_state = ViewServerState { orchestrator };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/api/recommendations", get(recommendations_handler))
        .route("/api/selection/device", post(select_device_handler))
        .route("/api/selection/model", post(select_model_handler))
        .route("/health", get(health_handler))
        .with_state(dashboard_state)
}

async fn index_handler(State(dashboard): State<ViewServerState>) -> impl IntoResponse {
    let snapshot = dashboard.orchestrator.snapshot().await;
    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Home Monitor</title>
</head>
<body>
<pre>{}</pre>
</body>
</html>"#,
        escape_html(&render_text(&snapshot))
    );
    Html(html)
}

async fn state_handler(State(dashboard): State<ViewServerState>) -> impl IntoResponse {
    Json(dashboard.orchestrator.snapshot().await)
}

async fn recommendations_handler(State(dashboard): State<ViewServerState>) -> impl IntoResponse {
    match dashboard.orchestrator.recommendation_history().await {
        Ok(history) => Json(history).into_response(),
        Err(e) => {
            tracing::warn!("Failed to load recommendation history: {}", e);
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn select_device_handler(
    State(dashboard): State<ViewServerState>,
    Json(selection): Json<DeviceSelection>,
) -> Result<Json<SelectionResponse>, (StatusCode, String)> {
    let device = {
        let state = dashboard.orchestrator.state();
        let state = state.read().await;
        find_device(&state.devices, &selection.device_id).cloned()
    };
    let device = device.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            format!("Unknown device: {}", selection.device_id),
        )
    })?;

    let outcome = dashboard.orchestrator.select_device(device).await;
    Ok(Json(selection_response(&dashboard, outcome).await))
}

async fn select_model_handler(
    State(dashboard): State<ViewServerState>,
    Json(selection): Json<ModelSelection>,
) -> Result<Json<SelectionResponse>, (StatusCode, String)> {
    let model = match &selection.model {
        Some(name) => {
            let state = dashboard.orchestrator.state();
            let state = state.read().await;
            let model = find_model(&state.models, name).cloned().ok_or_else(|| {
                (StatusCode::NOT_FOUND, format!("Unknown model: {}", name))
            })?;
            Some(model)
        }
        None => None,
    };

    let outcome = dashboard.orchestrator.select_model(model).await;
    Ok(Json(selection_response(&dashboard, outcome).await))
}

async fn selection_response(dashboard: &ViewServerState, outcome: RefreshOutcome) -> SelectionResponse {
    let outcome = match outcome {
        RefreshOutcome::Skipped => "skipped",
        RefreshOutcome::Unchanged => "unchanged",
        RefreshOutcome::Applied => "applied",
        RefreshOutcome::Failed(_) => "failed",
        RefreshOutcome::Superseded => "superseded",
    };
    SelectionResponse {
        outcome: outcome.to_string(),
        state: dashboard.orchestrator.snapshot().await,
    }
}

async fn health_handler() -> impl IntoResponse {
    "OK"
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
