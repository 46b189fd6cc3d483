//! Events published by the orchestrator to its subscribers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DashboardEvent {
    Initialized {
        device: Option<String>,
        model: Option<String>,
    },
    InitializationFailed {
        message: String,
    },
    SelectionChanged {
        device: Option<String>,
        model: Option<String>,
    },
    SummaryUpdated {
        device_id: String,
        model: Option<String>,
        generation: u64,
    },
    RefreshFailed {
        device_id: String,
        message: String,
        generation: u64,
    },
    /// A response arrived after a newer refresh had started and was dropped
    StaleResponseDiscarded {
        device_id: String,
        generation: u64,
    },
}
