//! BDD step definitions for initialization and summary refresh

use cucumber::{given, then, when};

use home_monitor::RefreshOutcome;

use crate::world::HomeMonitorWorld;

#[given(expr = "the preferred model is {string}")]
fn preferred_model(world: &mut HomeMonitorWorld, model: String) {
    world.preferred_model = Some(model);
}

#[when("the dashboard initializes")]
async fn dashboard_initializes(world: &mut HomeMonitorWorld) {
    let orchestrator = world.orchestrator();
    world.init_result = Some(orchestrator.initialize().await);
}

#[given("the dashboard has initialized")]
async fn dashboard_has_initialized(world: &mut HomeMonitorWorld) {
    let orchestrator = world.orchestrator();
    orchestrator
        .initialize()
        .await
        .expect("initialization should succeed");
}

#[when(expr = "the user selects device {string}")]
async fn user_selects_device(world: &mut HomeMonitorWorld, identifier: String) {
    let orchestrator = world.orchestrator();
    let device = {
        let state = orchestrator.state();
        let state = state.read().await;
        home_monitor::selection::find_device(&state.devices, &identifier)
            .cloned()
            .unwrap_or_else(|| panic!("device '{}' not loaded", identifier))
    };
    world.last_outcome = Some(orchestrator.select_device(device).await);
}

#[when(expr = "the user selects model {string}")]
async fn user_selects_model(world: &mut HomeMonitorWorld, name: String) {
    let orchestrator = world.orchestrator();
    let model = {
        let state = orchestrator.state();
        let state = state.read().await;
        home_monitor::selection::find_model(&state.models, &name)
            .cloned()
            .unwrap_or_else(|| panic!("model '{}' not loaded", name))
    };
    world.last_outcome = Some(orchestrator.select_model(Some(model)).await);
}

#[when("the user clears the model selection")]
async fn user_clears_model(world: &mut HomeMonitorWorld) {
    let orchestrator = world.orchestrator();
    world.last_outcome = Some(orchestrator.select_model(None).await);
}

#[then("initialization should succeed")]
fn initialization_succeeds(world: &mut HomeMonitorWorld) {
    let result = world.init_result.as_ref().expect("not initialized");
    assert!(result.is_ok(), "initialization failed: {:?}", result);
}

#[then(expr = "initialization should fail with {string}")]
async fn initialization_fails_with(world: &mut HomeMonitorWorld, expected: String) {
    let result = world.init_result.as_ref().expect("not initialized");
    let err = result.as_ref().expect_err("initialization should fail");
    assert!(
        err.to_string().contains(&expected),
        "expected error containing '{}', got '{}'",
        expected,
        err
    );

    let snapshot = world.orchestrator().snapshot().await;
    let error = snapshot.error.expect("error should be stored in state");
    assert!(error.contains(&expected));
}

#[then("a second initialization should be rejected")]
async fn second_initialization_rejected(world: &mut HomeMonitorWorld) {
    let result = world.orchestrator().initialize().await;
    assert!(matches!(
        result,
        Err(home_monitor::HomeMonitorError::AlreadyInitialized)
    ));
}

#[then(expr = "the selected device should be {string}")]
async fn selected_device_is(world: &mut HomeMonitorWorld, expected: String) {
    let snapshot = world.orchestrator().snapshot().await;
    let device = snapshot.selected_device.expect("no device selected");
    assert_eq!(device.identifier(), expected);
}

#[then("no device should be selected")]
async fn no_device_selected(world: &mut HomeMonitorWorld) {
    let snapshot = world.orchestrator().snapshot().await;
    assert!(snapshot.selected_device.is_none());
}

#[then(expr = "the selected model should be {string}")]
async fn selected_model_is(world: &mut HomeMonitorWorld, expected: String) {
    let snapshot = world.orchestrator().snapshot().await;
    let model = snapshot.selected_model.expect("no model selected");
    assert_eq!(model.name, expected);
}

#[then("no model should be selected")]
async fn no_model_selected(world: &mut HomeMonitorWorld) {
    let snapshot = world.orchestrator().snapshot().await;
    assert!(snapshot.selected_model.is_none());
}

#[then(expr = "the radon value should be {float}")]
async fn radon_value_is(world: &mut HomeMonitorWorld, expected: f64) {
    let snapshot = world.orchestrator().snapshot().await;
    let value = snapshot.radon_value.expect("no radon value");
    assert!(
        (value - expected).abs() < 1e-9,
        "expected radon {}, got {}",
        expected,
        value
    );
}

#[then("no summary should be loaded")]
async fn no_summary_loaded(world: &mut HomeMonitorWorld) {
    let snapshot = world.orchestrator().snapshot().await;
    assert!(snapshot.summary.is_none());
    assert!(!snapshot.loading);
}

#[then(expr = "the dashboard error should contain {string}")]
async fn dashboard_error_contains(world: &mut HomeMonitorWorld, expected: String) {
    let snapshot = world.orchestrator().snapshot().await;
    let error = snapshot.error.expect("no error stored");
    assert!(
        error.contains(&expected),
        "expected error containing '{}', got '{}'",
        expected,
        error
    );
}

#[then("the dashboard should have no error")]
async fn dashboard_has_no_error(world: &mut HomeMonitorWorld) {
    let snapshot = world.orchestrator().snapshot().await;
    assert!(snapshot.error.is_none(), "unexpected error: {:?}", snapshot.error);
}

#[then(expr = "the refresh outcome should be {string}")]
fn refresh_outcome_is(world: &mut HomeMonitorWorld, expected: String) {
    let outcome = world.last_outcome.as_ref().expect("no selection made");
    let actual = match outcome {
        RefreshOutcome::Skipped => "skipped",
        RefreshOutcome::Unchanged => "unchanged",
        RefreshOutcome::Applied => "applied",
        RefreshOutcome::Failed(_) => "failed",
        RefreshOutcome::Superseded => "superseded",
    };
    assert_eq!(actual, expected, "outcome was {:?}", outcome);
}
