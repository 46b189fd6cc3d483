//! Wire types returned by the home monitor backend
//!
//! Every type here is a read-only snapshot. The backend serialises some
//! dictionaries with string values and uses integer primary keys, so ids and
//! numeric readings are accepted in either representation.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A physical sensor unit tracked by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Device {
    /// Minimal device with only the identity fields set
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: None,
            name: name.into(),
            manufacturer: String::new(),
            sensor_type: None,
            connection_type: None,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Identity key: the slug when present and non-empty, otherwise the id
    pub fn identifier(&self) -> &str {
        match self.slug.as_deref() {
            Some(slug) if !slug.is_empty() => slug,
            _ => &self.id,
        }
    }
}

/// An AI model offered by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
}

impl AiModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modified_at: None,
        }
    }
}

/// Response of `/ai/models/`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<AiModel>,
}

/// An AI-generated insight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, deserialize_with = "optional_number")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<Device>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RadonReading {
    #[serde(default, deserialize_with = "optional_number")]
    pub value: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentSnapshot {
    #[serde(default, deserialize_with = "optional_number")]
    pub temperature: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Outdoor weather in the shape of an OpenWeather "current" payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "nested_or_literal")]
    pub sys: Option<WeatherSys>,
    #[serde(default, deserialize_with = "nested_or_literal")]
    pub main: Option<WeatherMain>,
    #[serde(default, deserialize_with = "nested_or_literal")]
    pub wind: Option<WeatherWind>,
    #[serde(default, deserialize_with = "list_or_literal")]
    pub weather: Vec<WeatherCondition>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSys {
    #[serde(default)]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherMain {
    #[serde(default, deserialize_with = "optional_number")]
    pub temp: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub humidity: Option<f64>,
    #[serde(default, deserialize_with = "optional_number")]
    pub feels_like: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherWind {
    #[serde(default, deserialize_with = "optional_number")]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: Option<String>,
}

/// Soft warnings reported alongside an otherwise successful summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "error_list"
    )]
    pub home_assistant_errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ollama_error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather_error: Option<String>,
}

/// Aggregate payload for one device/model pair
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub radon: Option<RadonReading>,
    #[serde(default)]
    pub environment: Option<EnvironmentSnapshot>,
    #[serde(default)]
    pub weather: Option<WeatherReport>,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub metadata: SummaryMetadata,
}

/// Response of `/health/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

/// Query parameters for `/summary/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryParams {
    pub device_id: String,
    pub model: Option<String>,
}

impl SummaryParams {
    /// Build parameters from a selection; the model is only sent when selected
    pub fn for_selection(device: &Device, model: Option<&AiModel>) -> Self {
        Self {
            device_id: device.identifier().to_string(),
            model: model
                .map(|m| m.name.clone())
                .filter(|name| !name.is_empty()),
        }
    }

    pub fn to_query(&self) -> Vec<(&str, &str)> {
        let mut query = vec![("device_id", self.device_id.as_str())];
        if let Some(model) = &self.model {
            query.push(("model", model.as_str()));
        }
        query
    }
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Int(i) => i.to_string(),
        Raw::Float(f) => f.to_string(),
    })
}

fn optional_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Str(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Num(n)) => Some(n),
        // The backend stringifies missing values as "None"
        Some(Raw::Str(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    })
}

/// Decode a value that is either nested JSON or the Python literal text the
/// backend produces when it coerces dictionaries and lists to strings.
fn decode_nested<T: DeserializeOwned>(value: Value) -> Option<T> {
    match value {
        Value::Null => None,
        Value::String(text) => serde_json::from_str(&python_literal_to_json(&text)).ok(),
        other => serde_json::from_value(other).ok(),
    }
}

fn nested_or_literal<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_nested(Value::deserialize(deserializer)?))
}

fn list_or_literal<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(decode_nested(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A list of messages, a literal list, or a single message kept verbatim
fn error_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Value::String(text) = &value {
        if text.trim().is_empty() || text == "None" {
            return Ok(None);
        }
        return Ok(Some(
            decode_nested(value.clone()).unwrap_or_else(|| vec![text.clone()]),
        ));
    }
    Ok(decode_nested(value))
}

/// Rewrite a Python `repr` of dicts, lists, and scalars as JSON
fn python_literal_to_json(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            match c {
                '\\' => match chars.next() {
                    Some('\'') => out.push('\''),
                    Some(next) => {
                        out.push('\\');
                        out.push(next);
                    }
                    None => {}
                },
                c if c == q => {
                    out.push('"');
                    quote = None;
                }
                '"' => out.push_str("\\\""),
                c => out.push(c),
            }
            continue;
        }

        if c.is_ascii_alphabetic() {
            word.push(c);
            continue;
        }
        flush_word(&mut out, &mut word);
        if c == '\'' || c == '"' {
            quote = Some(c);
            out.push('"');
        } else {
            out.push(c);
        }
    }
    flush_word(&mut out, &mut word);
    out
}

fn flush_word(out: &mut String, word: &mut String) {
    match word.as_str() {
        "None" => out.push_str("null"),
        "True" => out.push_str("true"),
        "False" => out.push_str("false"),
        other => out.push_str(other),
    }
    word.clear();
}
