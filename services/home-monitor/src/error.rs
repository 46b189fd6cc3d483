//! Error types for the home monitor dashboard

/// Message shown when the backend reports no devices at all
pub const NO_DEVICES_MESSAGE: &str = "No devices available yet. Add a device to begin monitoring.";

/// Errors that can occur while orchestrating dashboard data
#[derive(Debug, thiserror::Error)]
pub enum HomeMonitorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{}", NO_DEVICES_MESSAGE)]
    NoDevices,

    #[error("Dashboard already initialized")]
    AlreadyInitialized,

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for home monitor operations
pub type Result<T> = std::result::Result<T, HomeMonitorError>;
