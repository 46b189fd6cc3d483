//! Orchestrator state: loaded lists, selection, summary, and load phases

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{AiModel, Device, Summary, SummaryParams};

/// Phase of a load sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "Idle"),
            Phase::Loading => write!(f, "Loading"),
            Phase::Ready => write!(f, "Ready"),
            Phase::Failed => write!(f, "Failed"),
        }
    }
}

/// State owned by a single orchestrator
#[derive(Debug, Default)]
pub struct DashboardState {
    pub devices: Vec<Device>,
    pub models: Vec<AiModel>,
    pub selected_device: Option<Device>,
    pub selected_model: Option<AiModel>,
    pub summary: Option<Summary>,
    pub error: Option<String>,
    pub init_phase: Phase,
    pub refresh_phase: Phase,
    /// Generation of the most recently started refresh
    pub generation: u64,
    pub last_refresh_epoch_ms: Option<u64>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.init_phase == Phase::Loading || self.refresh_phase == Phase::Loading
    }

    /// Replace the selected device, returning true if the selection changed
    pub fn set_device(&mut self, device: Option<Device>) -> bool {
        let changed = self.selected_device.as_ref().map(Device::identifier)
            != device.as_ref().map(Device::identifier);
        self.selected_device = device;
        changed
    }

    /// Replace the selected model, returning true if the selection changed
    pub fn set_model(&mut self, model: Option<AiModel>) -> bool {
        let changed = self.selected_model.as_ref().map(|m| m.name.as_str())
            != model.as_ref().map(|m| m.name.as_str());
        self.selected_model = model;
        changed
    }

    /// Start a refresh for the current selection.
    ///
    /// Returns the new generation and the request parameters, or `None` when
    /// no device is selected.
    pub fn begin_refresh(&mut self) -> Option<(u64, SummaryParams)> {
        let device = self.selected_device.as_ref()?;
        let params = SummaryParams::for_selection(device, self.selected_model.as_ref());
        self.generation += 1;
        self.refresh_phase = Phase::Loading;
        self.error = None;
        Some((self.generation, params))
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Store a fetched summary unless a newer refresh has started since
    pub fn apply_summary(&mut self, generation: u64, summary: Summary, now_ms: u64) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.summary = Some(summary);
        self.refresh_phase = Phase::Ready;
        self.last_refresh_epoch_ms = Some(now_ms);
        true
    }

    /// Record a refresh failure unless a newer refresh has started since.
    /// The previous summary is kept.
    pub fn apply_refresh_error(&mut self, generation: u64, message: String) -> bool {
        if !self.is_current(generation) {
            return false;
        }
        self.error = Some(message);
        self.refresh_phase = Phase::Failed;
        true
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            loading: self.is_loading(),
            init_phase: self.init_phase,
            refresh_phase: self.refresh_phase,
            error: self.error.clone(),
            devices: self.devices.clone(),
            models: self.models.clone(),
            selected_device: self.selected_device.clone(),
            selected_model: self.selected_model.clone(),
            radon_value: crate::view::radon_value(self.summary.as_ref()),
            radon_unit: crate::view::radon_unit(self.summary.as_ref()).to_string(),
            summary: self.summary.clone(),
            last_refresh_epoch_ms: self.last_refresh_epoch_ms,
        }
    }
}

/// Point-in-time copy of the state for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub loading: bool,
    pub init_phase: Phase,
    pub refresh_phase: Phase,
    pub error: Option<String>,
    pub devices: Vec<Device>,
    pub models: Vec<AiModel>,
    pub selected_device: Option<Device>,
    pub selected_model: Option<AiModel>,
    pub summary: Option<Summary>,
    pub radon_value: Option<f64>,
    pub radon_unit: String,
    pub last_refresh_epoch_ms: Option<u64>,
}

/// Thread-safe shared state handle
pub type StateHandle = Arc<RwLock<DashboardState>>;

pub fn new_state_handle() -> StateHandle {
    Arc::new(RwLock::new(DashboardState::new()))
}
