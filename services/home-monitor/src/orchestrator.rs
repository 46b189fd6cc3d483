//! Orchestrator: loads devices and models, applies default selection, and
//! keeps the summary in step with the selected device and model.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::sync::broadcast;

use crate::api_client::DashboardApi;
use crate::events::DashboardEvent;
use crate::models::{AiModel, Device, HealthStatus, Recommendation};
use crate::selection::{select_default_device, select_default_model};
use crate::state::{new_state_handle, DashboardSnapshot, Phase, StateHandle};
use crate::HomeMonitorError;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Result of a single summary refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// No device selected, no request issued
    Skipped,
    /// The selection did not change, no request issued
    Unchanged,
    /// The summary was replaced
    Applied,
    /// The request failed; the previous summary was kept
    Failed(String),
    /// A newer refresh started while this one was in flight
    Superseded,
}

/// Per-session dashboard data orchestrator
pub struct Orchestrator {
    api: Arc<dyn DashboardApi>,
    state: StateHandle,
    preferred_model: Option<String>,
    events: broadcast::Sender<DashboardEvent>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("preferred_model", &self.preferred_model)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(api: Arc<dyn DashboardApi>, preferred_model: Option<String>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            api,
            state: new_state_handle(),
            preferred_model,
            events,
        }
    }

    /// Subscribe to orchestrator events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    pub fn state(&self) -> StateHandle {
        Arc::clone(&self.state)
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.read().await.snapshot()
    }

    /// Load devices and models, choose defaults, and fetch the first summary.
    ///
    /// Runs once per orchestrator. A model-list failure degrades to an empty
    /// list; a device-list failure or an empty device list ends initialization
    /// in [`Phase::Failed`] and is returned.
    pub async fn initialize(&self) -> crate::Result<()> {
        {
            let mut state = self.state.write().await;
            if state.init_phase != Phase::Idle {
                return Err(HomeMonitorError::AlreadyInitialized);
            }
            state.init_phase = Phase::Loading;
        }

        tracing::debug!("Loading devices and models");
        let (devices, models) = tokio::join!(self.api.list_devices(), self.api.list_models());

        let models = match models {
            Ok(list) => list.models,
            Err(e) => {
                tracing::warn!("Failed to load AI models, continuing without: {}", e);
                Vec::new()
            }
        };

        let result = {
            let mut state = self.state.write().await;
            match devices {
                Ok(devices) => {
                    let model =
                        select_default_model(&models, self.preferred_model.as_deref()).cloned();
                    let device = select_default_device(&devices).cloned();
                    state.models = models;
                    state.devices = devices;
                    state.selected_model = model;

                    match device {
                        Some(device) => {
                            state.selected_device = Some(device);
                            state.init_phase = Phase::Ready;
                            Ok(())
                        }
                        None => {
                            let err = HomeMonitorError::NoDevices;
                            state.error = Some(err.to_string());
                            state.init_phase = Phase::Failed;
                            Err(err)
                        }
                    }
                }
                Err(e) => {
                    state.error = Some(e.to_string());
                    state.init_phase = Phase::Failed;
                    Err(e)
                }
            }
        };

        match &result {
            Ok(()) => {
                let (device, model) = self.selection_keys().await;
                tracing::info!(
                    "Dashboard initialized: device={:?}, model={:?}",
                    device,
                    model
                );
                self.publish(DashboardEvent::Initialized { device, model });
                self.refresh().await;
            }
            Err(e) => {
                tracing::warn!("Dashboard initialization failed: {}", e);
                self.publish(DashboardEvent::InitializationFailed {
                    message: e.to_string(),
                });
            }
        }

        result
    }

    /// Select a device and refresh the summary if the selection changed
    pub async fn select_device(&self, device: Device) -> RefreshOutcome {
        let changed = self.state.write().await.set_device(Some(device));
        self.after_selection(changed).await
    }

    /// Select a model (or none) and refresh the summary if the selection changed
    pub async fn select_model(&self, model: Option<AiModel>) -> RefreshOutcome {
        let changed = self.state.write().await.set_model(model);
        self.after_selection(changed).await
    }

    async fn after_selection(&self, changed: bool) -> RefreshOutcome {
        if !changed {
            return RefreshOutcome::Unchanged;
        }
        let (device, model) = self.selection_keys().await;
        tracing::debug!("Selection changed: device={:?}, model={:?}", device, model);
        self.publish(DashboardEvent::SelectionChanged { device, model });
        self.refresh().await
    }

    /// Fetch the summary for the current selection.
    ///
    /// Each call takes a new generation; a response is only applied if no newer
    /// refresh has started in the meantime.
    pub async fn refresh(&self) -> RefreshOutcome {
        let started = self.state.write().await.begin_refresh();
        let Some((generation, params)) = started else {
            tracing::debug!("No device selected, skipping summary refresh");
            return RefreshOutcome::Skipped;
        };

        tracing::debug!(
            "Refreshing summary #{} for device={} model={:?}",
            generation,
            params.device_id,
            params.model
        );
        let result = self.api.fetch_summary(&params).await;
        let now_ms = current_epoch_ms();

        match result {
            Ok(summary) => {
                let applied = self
                    .state
                    .write()
                    .await
                    .apply_summary(generation, summary, now_ms);
                if applied {
                    tracing::debug!("Summary #{} applied", generation);
                    self.publish(DashboardEvent::SummaryUpdated {
                        device_id: params.device_id,
                        model: params.model,
                        generation,
                    });
                    RefreshOutcome::Applied
                } else {
                    self.discard_stale(params.device_id, generation)
                }
            }
            Err(e) => {
                let message = e.to_string();
                let applied = self
                    .state
                    .write()
                    .await
                    .apply_refresh_error(generation, message.clone());
                if applied {
                    tracing::warn!(
                        "Summary refresh for '{}' failed: {}",
                        params.device_id,
                        message
                    );
                    self.publish(DashboardEvent::RefreshFailed {
                        device_id: params.device_id,
                        message: message.clone(),
                        generation,
                    });
                    RefreshOutcome::Failed(message)
                } else {
                    self.discard_stale(params.device_id, generation)
                }
            }
        }
    }

    /// Recommendation history, independent of the selection
    pub async fn recommendation_history(&self) -> crate::Result<Vec<Recommendation>> {
        self.api.list_recommendations().await
    }

    pub async fn health(&self) -> crate::Result<HealthStatus> {
        self.api.health().await
    }

    fn discard_stale(&self, device_id: String, generation: u64) -> RefreshOutcome {
        tracing::debug!(
            "Discarding stale summary #{} for device '{}'",
            generation,
            device_id
        );
        self.publish(DashboardEvent::StaleResponseDiscarded {
            device_id,
            generation,
        });
        RefreshOutcome::Superseded
    }

    async fn selection_keys(&self) -> (Option<String>, Option<String>) {
        let state = self.state.read().await;
        (
            state
                .selected_device
                .as_ref()
                .map(|d| d.identifier().to_string()),
            state.selected_model.as_ref().map(|m| m.name.clone()),
        )
    }

    fn publish(&self, event: DashboardEvent) {
        // No subscribers is fine
        self.events.send(event).ok();
    }
}

fn current_epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
