//! Validation engine driven through a router backed by mock providers.

use std::sync::Arc;

use std::time::Duration;

use cac_router::{
    EndpointConfig, MockOutcome, MockProvider, ProviderRegistry, RouterConfig, TaskRouter,
};
use cac_types::{ClaimKind, Domain, EconomicBand, ProbabilityClass, Proposal, SourceQuality, TaskKind};
use cac_validation::axes::physical::{MANUAL_REVIEW, VALIDATION_UNAVAILABLE};
use cac_validation::axes::references::REVIEW_UNAVAILABLE;
use cac_validation::{ValidationConfig, ValidationEngine, ValidationError};

const CLEAN_REVIEW: &str = r#"{"valid": true, "issues": []}"#;

fn config() -> ValidationConfig {
    let mut config = ValidationConfig::default();
    config.references.evaluation_year = Some(2025);
    config
}

fn engine_on(
    provider: Arc<MockProvider>,
    config: ValidationConfig,
    endpoint: EndpointConfig,
) -> ValidationEngine {
    let router_config = RouterConfig::empty()
        .with_endpoint(endpoint)
        .with_route(TaskKind::Validate, ["deepseek-r1"]);
    let router = TaskRouter::new(router_config, &ProviderRegistry::new().with(provider)).unwrap();
    ValidationEngine::new(config, Arc::new(router)).unwrap()
}

fn engine_with(provider: Arc<MockProvider>, config: ValidationConfig) -> ValidationEngine {
    engine_on(
        provider,
        config,
        EndpointConfig::new("deepseek-r1", "deepseek-r1").with_timeout_ms(1_000),
    )
}

fn cargo_bikes() -> Proposal {
    Proposal::builder("transport-001", Domain::Transport)
        .title("Municipal cargo bike fleet")
        .description("Replace diesel delivery vans in the old town with electric cargo bikes")
        .co2_reduction(1_000.0)
        .cost(300_000.0)
        .timeline_months(12)
        .stakeholder("City logistics office")
        .stakeholder("Local couriers")
        .risk("Winter usage drop", ProbabilityClass::Medium, "Covered depots")
        .reference("Urban freight emissions", 2022, SourceQuality::PeerReviewed, ClaimKind::Data)
        .reference("National transport inventory", 2023, SourceQuality::Institutional, ClaimKind::Data)
        .build()
}

#[tokio::test]
async fn cheap_transport_proposal_is_approved() {
    let provider = Arc::new(MockProvider::replying("deepseek-r1", CLEAN_REVIEW));
    let engine = engine_with(provider.clone(), config());

    let verdict = engine.validate(&cargo_bikes()).await;

    let axes = verdict.axes.as_ref().unwrap();
    let economics = axes.economic_summary.unwrap();
    assert_eq!(economics.cost_per_tonne, 30.0);
    assert_eq!(economics.band, EconomicBand::Excellent);
    assert!(axes.iter().all(|axis| axis.valid));
    assert!(verdict.overall_score >= 7.0);
    assert!(verdict.blocking_issues.is_empty());
    assert!(verdict.is_approved());
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn structural_failure_short_circuits() {
    let provider = Arc::new(MockProvider::replying("deepseek-r1", CLEAN_REVIEW));
    let engine = engine_with(provider.clone(), config());

    let mut proposal = cargo_bikes();
    proposal.co2_reduction_estimate = 0.0;
    let verdict = engine.validate(&proposal).await;

    assert_eq!(verdict.overall_score, 0.0);
    assert!(verdict.axes.is_none());
    assert!(!verdict.structurally_valid());
    assert!(verdict.blocking_issues[0].starts_with("invalid_proposal_structure"));
    assert!(!verdict.is_approved());
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn capability_outage_degrades_physical_axis() {
    let provider = Arc::new(MockProvider::failing("deepseek-r1", "connection refused"));
    let engine = engine_with(provider.clone(), config());

    let verdict = engine.validate(&cargo_bikes()).await;

    let physical = &verdict.axes.as_ref().unwrap().physical;
    assert!(!physical.valid);
    assert_eq!(physical.issues, vec![VALIDATION_UNAVAILABLE.to_string()]);
    assert!(verdict.recommendations.iter().any(|r| r == MANUAL_REVIEW));
    // First call plus one retry on the only endpoint.
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn unavailable_physical_check_is_never_approved() {
    let provider = Arc::new(MockProvider::failing("deepseek-r1", "connection refused"));
    let engine = engine_with(provider, config());

    let verdict = engine.validate(&cargo_bikes()).await;

    // Every other axis is clean, so the score alone would pass.
    assert!(verdict.overall_score >= verdict.approval_threshold);
    assert_eq!(verdict.blocking_issues, vec![VALIDATION_UNAVAILABLE.to_string()]);
    assert!(!verdict.is_approved());
}

#[tokio::test]
async fn capability_blocking_issues_reject_the_proposal() {
    let provider = Arc::new(MockProvider::replying(
        "deepseek-r1",
        r#"{"valid": true, "issues": [], "blocking_issues": ["violates energy conservation"]}"#,
    ));
    let engine = engine_with(provider, config());

    let verdict = engine.validate(&cargo_bikes()).await;

    let expected = "physical_violation: violates energy conservation".to_string();
    let physical = &verdict.axes.as_ref().unwrap().physical;
    assert!(!physical.valid);
    assert!(physical.issues.contains(&expected));
    assert_eq!(verdict.blocking_issues, vec![expected]);
    assert!(!verdict.is_approved());
}

#[tokio::test]
async fn unparseable_review_degrades_without_retry() {
    let provider = Arc::new(MockProvider::replying("deepseek-r1", "Looks plausible to me."));
    let engine = engine_with(provider.clone(), config());

    let verdict = engine.validate(&cargo_bikes()).await;

    let physical = &verdict.axes.as_ref().unwrap().physical;
    assert_eq!(physical.issues, vec![VALIDATION_UNAVAILABLE.to_string()]);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn order_of_magnitude_error_blocks_approval() {
    let provider = Arc::new(MockProvider::replying(
        "deepseek-r1",
        r#"{"valid": false, "issues": ["fleet too small for claimed savings"],
            "implied_reduction_tonnes": 60, "recommendations": ["Recompute van-km displaced"]}"#,
    ));
    let engine = engine_with(provider, config());

    let verdict = engine.validate(&cargo_bikes()).await;

    assert_eq!(verdict.blocking_issues.len(), 1);
    assert!(verdict.blocking_issues[0].starts_with("order_of_magnitude_error"));
    assert!(!verdict.is_approved());
    assert!(verdict
        .recommendations
        .contains(&"Recompute van-km displaced".to_string()));
}

#[tokio::test]
async fn stale_and_grey_references_block() {
    let provider = Arc::new(MockProvider::replying("deepseek-r1", CLEAN_REVIEW));
    let engine = engine_with(provider, config());

    let proposal = Proposal::builder("energy-002", Domain::Energy)
        .title("Heat pump subsidy")
        .description("Subsidise air-source heat pumps in rural homes")
        .co2_reduction(5_000.0)
        .cost(2_000_000.0)
        .timeline_months(36)
        .stakeholder("Cantonal energy office")
        .reference("Old field study", 2012, SourceQuality::PeerReviewed, ClaimKind::Data)
        .reference("Vendor whitepaper", 2024, SourceQuality::Grey, ClaimKind::Data)
        .build();
    let verdict = engine.validate(&proposal).await;

    let references = &verdict.axes.as_ref().unwrap().references;
    assert!(!references.valid);
    assert_eq!(references.score, 0.0);
    assert!(verdict
        .blocking_issues
        .iter()
        .any(|issue| issue.starts_with("insufficient_references")));
    assert!(!verdict.is_approved());
}

#[tokio::test]
async fn reference_review_runs_when_enabled() {
    let provider = Arc::new(MockProvider::replying("deepseek-r1", CLEAN_REVIEW));
    let mut config = config();
    config.references.capability_review = true;
    let engine = engine_with(provider.clone(), config);

    let verdict = engine.validate(&cargo_bikes()).await;

    assert_eq!(provider.call_count(), 2);
    assert!(verdict.is_approved());
}

#[tokio::test]
async fn reference_review_waits_for_the_physical_slot() {
    let provider = Arc::new(MockProvider::new(
        "deepseek-r1",
        MockOutcome::Delayed(Duration::from_millis(20), CLEAN_REVIEW.to_string()),
    ));
    let mut config = config();
    config.references.capability_review = true;
    let endpoint = EndpointConfig::new("deepseek-r1", "deepseek-r1")
        .with_timeout_ms(1_000)
        .with_max_concurrency(1);
    let engine = engine_on(provider.clone(), config, endpoint);

    let verdict = engine.validate(&cargo_bikes()).await;

    let axes = verdict.axes.as_ref().unwrap();
    assert!(axes.physical.issues.is_empty());
    assert!(!axes.references.issues.iter().any(|i| i == REVIEW_UNAVAILABLE));
    assert_eq!(provider.call_count(), 2);
    assert!(verdict.is_approved());
}

#[tokio::test]
async fn failed_reference_review_is_recorded_but_not_blocking() {
    let provider = Arc::new(MockProvider::scripted(
        "deepseek-r1",
        vec![MockOutcome::Reply(CLEAN_REVIEW.to_string())],
    ));
    let mut config = config();
    config.references.capability_review = true;
    let engine = engine_with(provider, config);

    let verdict = engine.validate(&cargo_bikes()).await;

    let references = &verdict.axes.as_ref().unwrap().references;
    assert!(references.issues.iter().any(|i| i == REVIEW_UNAVAILABLE));
    assert!(verdict.blocking_issues.is_empty());
    assert!(verdict.is_approved());
}

#[test]
fn broken_weights_are_rejected_at_construction() {
    let mut bad = ValidationConfig::default();
    bad.axis_weights.references = 0.5;
    let provider = Arc::new(MockProvider::replying("deepseek-r1", CLEAN_REVIEW));
    let router_config = RouterConfig::empty()
        .with_endpoint(EndpointConfig::new("deepseek-r1", "deepseek-r1"))
        .with_route(TaskKind::Validate, ["deepseek-r1"]);
    let router = TaskRouter::new(router_config, &ProviderRegistry::new().with(provider)).unwrap();

    let err = ValidationEngine::new(bad, Arc::new(router)).err().unwrap();
    assert!(matches!(err, ValidationError::InvalidConfig(_)));
}
