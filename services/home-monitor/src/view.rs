//! Plain-text presentation of a dashboard snapshot

use chrono::DateTime;

use crate::models::{EnvironmentSnapshot, Recommendation, Summary, SummaryMetadata, WeatherReport};
use crate::state::DashboardSnapshot;

pub const DEFAULT_RADON_UNIT: &str = "pCi/L";

const PLACEHOLDER: &str = "—";

pub fn radon_value(summary: Option<&Summary>) -> Option<f64> {
    summary.and_then(|s| s.radon.as_ref()).and_then(|r| r.value)
}

pub fn radon_unit(summary: Option<&Summary>) -> &str {
    summary
        .and_then(|s| s.radon.as_ref())
        .and_then(|r| r.unit.as_deref())
        .unwrap_or(DEFAULT_RADON_UNIT)
}

/// Severity of a soft backend notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Soft warnings from summary metadata, in display order
pub fn notices(metadata: &SummaryMetadata) -> Vec<Notice> {
    let mut notices = Vec::new();
    if let Some(warning) = &metadata.warning {
        notices.push(Notice {
            level: NoticeLevel::Warning,
            message: warning.clone(),
        });
    }
    if let Some(error) = &metadata.error {
        notices.push(Notice {
            level: NoticeLevel::Error,
            message: error.clone(),
        });
    }
    if let Some(errors) = &metadata.home_assistant_errors {
        notices.push(Notice {
            level: NoticeLevel::Error,
            message: format!("Home Assistant sync issues: {}", errors.join(", ")),
        });
    }
    if let Some(error) = &metadata.weather_error {
        notices.push(Notice {
            level: NoticeLevel::Warning,
            message: format!("Weather lookup issue: {}", error),
        });
    }
    if let Some(error) = &metadata.ollama_error {
        notices.push(Notice {
            level: NoticeLevel::Error,
            message: format!("AI engine issue: {}", error),
        });
    }
    notices
}

/// "air_quality" -> "Air quality"
pub fn category_label(category: &str) -> String {
    let spaced = category.replacen('_', " ", 1);
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn number(value: Option<f64>) -> String {
    value.map_or_else(|| PLACEHOLDER.to_string(), |v| v.to_string())
}

fn render_environment(lines: &mut Vec<String>, environment: &EnvironmentSnapshot) {
    lines.push("Indoor Environment".to_string());
    lines.push(format!("  Temperature: {}°C", number(environment.temperature)));
    lines.push(format!("  Humidity: {}%", number(environment.humidity)));
    if let Some(ts) = environment.timestamp.as_deref().filter(|ts| *ts != "None") {
        lines.push(format!("  Updated: {}", format_timestamp(ts)));
    }
}

fn render_weather(lines: &mut Vec<String>, weather: &WeatherReport) {
    let mut location = weather.name.clone().unwrap_or_else(|| "Outdoor".to_string());
    if let Some(country) = weather.sys.as_ref().and_then(|s| s.country.as_ref()) {
        location = format!("{}, {}", location, country);
    }
    let main = weather.main.clone().unwrap_or_default();
    let speed = weather.wind.as_ref().and_then(|w| w.speed);

    lines.push(format!("Outdoor Weather ({})", location));
    lines.push(format!("  Temperature: {}°C", number(main.temp)));
    lines.push(format!("  Humidity: {}%", number(main.humidity)));
    lines.push(format!("  Feels Like: {}°C", number(main.feels_like)));
    lines.push(format!("  Wind: {} m/s", number(speed)));
    if let Some(description) = weather.weather.first().and_then(|c| c.description.as_ref()) {
        lines.push(format!("  Conditions: {}", description));
    }
}

fn render_recommendations(lines: &mut Vec<String>, recommendations: &[Recommendation]) {
    lines.push("AI Recommendations".to_string());
    if recommendations.is_empty() {
        lines.push(
            "  No recommendations yet. Trigger a sync to fetch fresh insights.".to_string(),
        );
        return;
    }
    for rec in recommendations {
        let confidence = rec
            .confidence
            .filter(|c| *c > 0.0)
            .map(|c| format!(" (confidence {:.0}%)", c * 100.0))
            .unwrap_or_default();
        lines.push(format!("  [{}]{}", category_label(&rec.category), confidence));
        lines.extend(rec.message.lines().map(|line| format!("    {}", line)));
        lines.push(format!("    {}", format_timestamp(&rec.created_at)));
    }
}

/// Render the snapshot the way the dashboard presents it
pub fn render_text(snapshot: &DashboardSnapshot) -> String {
    let device = snapshot
        .selected_device
        .as_ref()
        .map_or("None selected", |d| d.name.as_str());
    let mut lines = vec![
        "Home Environment Dashboard".to_string(),
        format!("Current device: {}", device),
    ];
    if let Some(model) = &snapshot.selected_model {
        lines.push(format!("AI model: {}", model.name));
    }

    if let Some(summary) = &snapshot.summary {
        lines.extend(notices(&summary.metadata).into_iter().map(|notice| {
            let tag = match notice.level {
                NoticeLevel::Warning => "warning",
                NoticeLevel::Error => "error",
            };
            format!("[{}] {}", tag, notice.message)
        }));
    }
    lines.push(String::new());

    match (&snapshot.summary, &snapshot.error) {
        (None, _) if snapshot.loading => lines.push("Loading data...".to_string()),
        (_, Some(error)) => lines.push(format!("Failed to load data: {}", error)),
        (Some(summary), None) => {
            let radon = snapshot
                .radon_value
                .map_or_else(|| PLACEHOLDER.to_string(), |v| format!("{:.2}", v));
            lines.push(format!("Radon Level: {} {}", radon, snapshot.radon_unit));
            if let Some(environment) = &summary.environment {
                render_environment(&mut lines, environment);
            }
            if let Some(weather) = &summary.weather {
                render_weather(&mut lines, weather);
            }
            lines.push(String::new());
            render_recommendations(&mut lines, &summary.recommendations);
        }
        (None, None) => {}
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
