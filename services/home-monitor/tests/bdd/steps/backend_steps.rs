//! BDD step definitions for the canned backend

use cucumber::gherkin::Step;
use cucumber::{given, then};

use crate::world::HomeMonitorWorld;

fn names(list: &str) -> Vec<&str> {
    list.split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect()
}

#[given(expr = "the backend lists devices {string}")]
fn backend_lists_devices(world: &mut HomeMonitorWorld, list: String) {
    let devices: Vec<serde_json::Value> = names(&list)
        .into_iter()
        .enumerate()
        .map(|(i, slug)| {
            serde_json::json!({
                "id": i + 1,
                "slug": slug,
                "name": slug,
                "manufacturer": "Airthings",
            })
        })
        .collect();
    world
        .backend
        .respond("/devices/", 200, serde_json::Value::from(devices).to_string());
}

#[given("the backend lists no devices")]
fn backend_lists_no_devices(world: &mut HomeMonitorWorld) {
    world.backend.respond("/devices/", 200, "[]");
}

#[given(expr = "the backend lists models {string}")]
fn backend_lists_models(world: &mut HomeMonitorWorld, list: String) {
    let models: Vec<serde_json::Value> = names(&list)
        .into_iter()
        .map(|name| serde_json::json!({ "name": name }))
        .collect();
    world.backend.respond(
        "/ai/models/",
        200,
        serde_json::json!({ "models": models }).to_string(),
    );
}

#[given(expr = "the backend answers {string} with status {int}")]
fn backend_answers_with_status(world: &mut HomeMonitorWorld, path: String, status: u16) {
    world
        .backend
        .respond(&path, status, r#"{"detail": "backend unavailable"}"#);
}

#[given(expr = "the backend returns a summary with radon {float} for device {string}")]
fn backend_summary_with_radon(world: &mut HomeMonitorWorld, radon: f64, device: String) {
    let body = serde_json::json!({
        "radon": { "value": radon, "unit": "pCi/L", "timestamp": "2024-01-05T10:00:00Z" },
        "environment": { "temperature": "21.5", "humidity": "40", "timestamp": "2024-01-05T10:00:00Z" },
        "recommendations": [],
        "metadata": {},
    });
    world.backend.respond_summary(&device, 200, body.to_string());
}

#[given(expr = "the backend returns this summary for device {string}:")]
fn backend_summary_json(world: &mut HomeMonitorWorld, device: String, step: &Step) {
    let body = step.docstring.as_ref().expect("summary docstring missing");
    world.backend.respond_summary(&device, 200, body.trim());
}

#[given(expr = "the summary for device {string} fails with status {int}")]
fn backend_summary_fails(world: &mut HomeMonitorWorld, device: String, status: u16) {
    world
        .backend
        .respond_summary(&device, status, "Internal Server Error");
}

#[given(expr = "the backend lists recommendations {string}")]
fn backend_lists_recommendations(world: &mut HomeMonitorWorld, list: String) {
    let recommendations: Vec<serde_json::Value> = names(&list)
        .into_iter()
        .enumerate()
        .map(|(i, category)| {
            serde_json::json!({
                "id": i + 1,
                "category": category,
                "message": format!("Check {}", category),
                "confidence": "0.8",
                "created_at": "2024-01-05T10:00:00Z",
            })
        })
        .collect();
    world.backend.respond(
        "/recommendations/",
        200,
        serde_json::Value::from(recommendations).to_string(),
    );
}

#[then(expr = "{int} summary request(s) should have been sent")]
fn summary_request_count(world: &mut HomeMonitorWorld, count: usize) {
    let requests = world.backend.requests_to("/summary/");
    assert_eq!(
        requests.len(),
        count,
        "unexpected summary requests: {:?}",
        requests
    );
}

#[then(expr = "the last summary request should be {string}")]
fn last_summary_request(world: &mut HomeMonitorWorld, expected: String) {
    let requests = world.backend.requests_to("/summary/");
    let last = requests.last().expect("no summary request sent");
    assert_eq!(last, &format!("/summary/?{}", expected));
}
