//! Failover behaviour of the task router under paused time.

use std::sync::Arc;
use std::time::Duration;

use cac_router::{
    AttemptError, DispatchOptions, EndpointConfig, MockOutcome, MockProvider, ProviderRegistry,
    ResponseShape, RouterConfig, RouterError, TaskRouter,
};
use cac_types::{Domain, TaskKind};

fn validate_router(
    primary: Arc<MockProvider>,
    secondary: Arc<MockProvider>,
    primary_slots: usize,
) -> TaskRouter {
    let config = RouterConfig::empty()
        .with_endpoint(
            EndpointConfig::new("deepseek-r1", "deepseek-r1")
                .with_timeout_ms(45_000)
                .with_max_concurrency(primary_slots),
        )
        .with_endpoint(
            EndpointConfig::new("mistral-large", "mistral-large")
                .with_timeout_ms(60_000)
                .with_max_concurrency(1),
        )
        .with_route(TaskKind::Validate, ["deepseek-r1", "mistral-large"]);

    let registry = ProviderRegistry::new().with(primary).with(secondary);
    TaskRouter::new(config, &registry).unwrap()
}

#[tokio::test(start_paused = true)]
async fn timeout_on_primary_fails_over_to_secondary() {
    let primary = Arc::new(MockProvider::hanging("deepseek-r1"));
    let secondary = Arc::new(MockProvider::replying(
        "mistral-large",
        r#"{"valid": true, "issues": []}"#,
    ));
    let router = validate_router(primary.clone(), secondary.clone(), 4);

    let response = router
        .dispatch(
            TaskKind::Validate,
            &Domain::Transport,
            "assess",
            DispatchOptions::default().with_shape(ResponseShape::json_object(["valid", "issues"])),
        )
        .await
        .unwrap();

    assert_eq!(response.decision.endpoint, "mistral-large");
    assert_eq!(response.decision.candidate_index, 1);
    assert_eq!(response.decision.attempts, 3);
    assert_eq!(primary.call_count(), 2);
    assert_eq!(secondary.call_count(), 1);
    assert_eq!(response.json.unwrap()["valid"], true);
}

#[tokio::test(start_paused = true)]
async fn timeouts_everywhere_surface_every_attempt() {
    let primary = Arc::new(MockProvider::hanging("deepseek-r1"));
    let secondary = Arc::new(MockProvider::scripted(
        "mistral-large",
        vec![MockOutcome::Hang, MockOutcome::Status(503)],
    ));
    let router = validate_router(primary, secondary, 4);

    let err = router
        .dispatch(TaskKind::Validate, &Domain::Energy, "assess", DispatchOptions::default())
        .await
        .unwrap_err();

    let RouterError::AllEndpointsFailed { task_kind, failures } = err else {
        panic!("expected AllEndpointsFailed");
    };
    assert_eq!(task_kind, TaskKind::Validate);
    assert_eq!(failures.len(), 4);
    assert_eq!(failures[0].error, AttemptError::Timeout { timeout_ms: 45_000 });
    assert_eq!(failures[2].error, AttemptError::Timeout { timeout_ms: 60_000 });
    assert!(matches!(
        failures[3].error,
        AttemptError::Provider(cac_router::ProviderError::Status { status: 503, .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn saturated_endpoints_report_capacity_exhausted() {
    let primary = Arc::new(MockProvider::new(
        "deepseek-r1",
        MockOutcome::Delayed(Duration::from_secs(10), r#"{"valid": true}"#.into()),
    ));
    let secondary = Arc::new(MockProvider::new(
        "mistral-large",
        MockOutcome::Delayed(Duration::from_secs(10), r#"{"valid": true}"#.into()),
    ));
    let router = Arc::new(validate_router(primary, secondary, 1));

    // Occupy both single-slot endpoints.
    let first = {
        let router = router.clone();
        tokio::spawn(async move {
            router
                .dispatch(TaskKind::Validate, &Domain::Building, "a", DispatchOptions::default())
                .await
        })
    };
    let second = {
        let router = router.clone();
        tokio::spawn(async move {
            router
                .dispatch(TaskKind::Validate, &Domain::Building, "b", DispatchOptions::default())
                .await
        })
    };
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert_eq!(router.available_slots("deepseek-r1"), Some(0));
    assert_eq!(router.available_slots("mistral-large"), Some(0));

    let err = router
        .dispatch(TaskKind::Validate, &Domain::Building, "c", DispatchOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err, RouterError::CapacityExhausted(TaskKind::Validate));

    assert!(first.await.unwrap().is_ok());
    assert!(second.await.unwrap().is_ok());
    assert_eq!(router.available_slots("deepseek-r1"), Some(1));
}

#[tokio::test(start_paused = true)]
async fn schema_mismatch_stops_at_the_serving_endpoint() {
    let primary = Arc::new(MockProvider::replying("deepseek-r1", r#"{"valid": true}"#));
    let secondary = Arc::new(MockProvider::replying(
        "mistral-large",
        r#"{"valid": true, "issues": []}"#,
    ));
    let router = validate_router(primary.clone(), secondary.clone(), 4);

    let err = router
        .dispatch(
            TaskKind::Validate,
            &Domain::Agriculture,
            "assess",
            DispatchOptions::default().with_shape(ResponseShape::json_object(["valid", "issues"])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, RouterError::SchemaMismatch { ref endpoint, .. } if endpoint == "deepseek-r1"));
    assert_eq!(primary.call_count(), 1);
    assert_eq!(secondary.call_count(), 0);
}

#[tokio::test]
async fn request_carries_task_defaults() {
    let primary = Arc::new(MockProvider::replying("deepseek-r1", "{}"));
    let secondary = Arc::new(MockProvider::replying("mistral-large", "{}"));
    let router = validate_router(primary.clone(), secondary, 4);

    router
        .dispatch(TaskKind::Validate, &Domain::Industry, "assess", DispatchOptions::default())
        .await
        .unwrap();

    let request = &primary.requests()[0];
    assert_eq!(request.task_kind, TaskKind::Validate);
    assert_eq!(request.domain, Domain::Industry);
    assert_eq!(request.max_tokens, 2_000);
    assert!((request.temperature - 0.2).abs() < f32::EPSILON);
}
