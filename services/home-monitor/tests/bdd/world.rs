//! BDD test world for home monitor service

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cucumber::World;

use home_monitor::api_client::HttpDashboardApi;
use home_monitor::config::ApiConfig;
use home_monitor::io::{HttpClient, HttpResponse};
use home_monitor::{Orchestrator, RefreshOutcome};

/// Canned backend answering by URL path, recording every request
#[derive(Debug, Default)]
pub struct FakeBackend {
    routes: Mutex<HashMap<String, HttpResponse>>,
    summaries: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn respond(&self, path: &str, status: u16, body: impl Into<String>) {
        self.routes.lock().unwrap().insert(
            path.to_string(),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
    }

    pub fn respond_summary(&self, device_id: &str, status: u16, body: impl Into<String>) {
        self.summaries.lock().unwrap().insert(
            device_id.to_string(),
            HttpResponse {
                status,
                body: body.into(),
            },
        );
    }

    /// Recorded requests for a path, as `path?query`
    pub fn requests_to(&self, path: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.starts_with(path))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl HttpClient for FakeBackend {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> home_monitor::Result<HttpResponse> {
        let path = url
            .find("/api/")
            .map(|i| &url[i + 4..])
            .unwrap_or(url)
            .to_string();
        let query_text = query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        let record = if query_text.is_empty() {
            path.clone()
        } else {
            format!("{}?{}", path, query_text)
        };
        self.requests.lock().unwrap().push(record);

        let response = if path == "/summary/" {
            let device_id = query
                .iter()
                .find(|(k, _)| *k == "device_id")
                .map(|(_, v)| *v)
                .unwrap_or_default();
            self.summaries.lock().unwrap().get(device_id).cloned()
        } else {
            self.routes.lock().unwrap().get(&path).cloned()
        };

        Ok(response.unwrap_or(HttpResponse {
            status: 404,
            body: r#"{"detail": "Not found."}"#.to_string(),
        }))
    }
}

#[derive(Debug, Default, World)]
pub struct HomeMonitorWorld {
    pub backend: Arc<FakeBackend>,
    pub preferred_model: Option<String>,
    pub orchestrator: Option<Arc<Orchestrator>>,

    pub init_result: Option<home_monitor::Result<()>>,
    pub last_outcome: Option<RefreshOutcome>,

    // View server
    pub response_status: Option<u16>,
    pub response_body: Option<String>,
}

impl HomeMonitorWorld {
    /// Orchestrator wired to the fake backend through the real HTTP API client
    pub fn orchestrator(&mut self) -> Arc<Orchestrator> {
        if let Some(orchestrator) = &self.orchestrator {
            return Arc::clone(orchestrator);
        }
        let http: Arc<dyn HttpClient> = self.backend.clone();
        let api = HttpDashboardApi::new(&ApiConfig::default(), http);
        let orchestrator = Arc::new(Orchestrator::new(
            Arc::new(api),
            self.preferred_model.clone(),
        ));
        self.orchestrator = Some(Arc::clone(&orchestrator));
        orchestrator
    }
}
