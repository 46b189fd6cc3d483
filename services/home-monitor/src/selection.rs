//! Default-selection policy for devices and AI models

use crate::models::{AiModel, Device};

/// The preferred model when the backend offers it, otherwise the first model
pub fn select_default_model<'a>(
    models: &'a [AiModel],
    preferred: Option<&str>,
) -> Option<&'a AiModel> {
    preferred
        .and_then(|name| models.iter().find(|m| m.name == name))
        .or_else(|| models.first())
}

/// The first device, if any
pub fn select_default_device(devices: &[Device]) -> Option<&Device> {
    devices.first()
}

/// Look up a device by its identity key (slug or id)
pub fn find_device<'a>(devices: &'a [Device], identifier: &str) -> Option<&'a Device> {
    devices
        .iter()
        .find(|d| d.identifier() == identifier || d.id == identifier)
}

/// Look up a model by name
pub fn find_model<'a>(models: &'a [AiModel], name: &str) -> Option<&'a AiModel> {
    models.iter().find(|m| m.name == name)
}
