//! Client for the home monitor backend REST API

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::io::HttpClient;
use crate::models::{Device, HealthStatus, ModelList, Recommendation, Summary, SummaryParams};

/// Read operations offered by the backend
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait DashboardApi: Send + Sync {
    /// `GET /devices/`
    async fn list_devices(&self) -> crate::Result<Vec<Device>>;

    /// `GET /ai/models/`
    async fn list_models(&self) -> crate::Result<ModelList>;

    /// `GET /recommendations/`
    async fn list_recommendations(&self) -> crate::Result<Vec<Recommendation>>;

    /// `GET /summary/?device_id=..[&model=..]`
    async fn fetch_summary(&self, params: &SummaryParams) -> crate::Result<Summary>;

    /// `GET /health/`
    async fn health(&self) -> crate::Result<HealthStatus>;
}

/// [`DashboardApi`] over an [`HttpClient`]
pub struct HttpDashboardApi {
    base_url: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for HttpDashboardApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDashboardApi")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl HttpDashboardApi {
    pub fn new(config: &ApiConfig, http: Arc<dyn HttpClient>) -> Self {
        let base_url = config.resolved_base_url();
        tracing::debug!("Created HttpDashboardApi at {}", base_url);
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> crate::Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.http.get(&url, query).await?;

        if !response.is_success() {
            return Err(crate::HomeMonitorError::Network(format!(
                "GET {} returned status {}: {}",
                url, response.status, response.body
            )));
        }

        serde_json::from_str(&response.body).map_err(|e| {
            tracing::debug!("Failed to decode response from {}: {}", url, e);
            crate::HomeMonitorError::Json(e)
        })
    }
}

#[async_trait]
impl DashboardApi for HttpDashboardApi {
    async fn list_devices(&self) -> crate::Result<Vec<Device>> {
        self.get_json("/devices/", &[]).await
    }

    async fn list_models(&self) -> crate::Result<ModelList> {
        self.get_json("/ai/models/", &[]).await
    }

    async fn list_recommendations(&self) -> crate::Result<Vec<Recommendation>> {
        self.get_json("/recommendations/", &[]).await
    }

    async fn fetch_summary(&self, params: &SummaryParams) -> crate::Result<Summary> {
        self.get_json("/summary/", &params.to_query()).await
    }

    async fn health(&self) -> crate::Result<HealthStatus> {
        self.get_json("/health/", &[]).await
    }
}
