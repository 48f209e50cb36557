//! End-to-end integration tests for the bizpilot query pipeline.
//!
//! These tests exercise the full path from a business query to a typed
//! response, across the agent, sources, telemetry and gateway crates.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use bizpilot_agent::{BusinessAgent, build_query};
use bizpilot_core::{
    Attachment, BusinessQuery, Domain, OutputFormat, PageContext, Provider, ProviderError,
    ProviderRequest, ProviderResponse, Regime, ResponseBody, Urgency, Usage,
};
use bizpilot_sources::{CustomerRecord, OrderRecord, StaticDataSource, TextAttachmentSummarizer};
use bizpilot_telemetry::RecentQueryLog;

// ── Mock Providers ───────────────────────────────────────────────────────

/// Answers every call with the same text, recording each prompt.
struct ScriptedProvider {
    text: String,
    prompts: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn last(&self) -> ProviderRequest {
        self.prompts.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.prompts.lock().unwrap().push(request);
        Ok(ProviderResponse {
            text: self.text.clone(),
            usage: Usage {
                input_tokens: 400,
                output_tokens: 100,
            },
            model,
        })
    }
}

struct DownProvider;

#[async_trait::async_trait]
impl Provider for DownProvider {
    fn name(&self) -> &str {
        "down"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        Err(ProviderError::Network("connection refused".into()))
    }
}

struct SlowProvider;

#[async_trait::async_trait]
impl Provider for SlowProvider {
    fn name(&self) -> &str {
        "slow"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        tokio::time::sleep(Duration::from_secs(120)).await;
        Ok(ProviderResponse {
            text: "too late".into(),
            usage: Usage::default(),
            model: request.model,
        })
    }
}

const ANSWER: &str = "Focus on the two grade A accounts:\n\
                      - Call Gulf Trading about the Q3 renewal\n\
                      - Offer Delta Foods 5% off repeat orders";

fn sample_source() -> StaticDataSource {
    StaticDataSource::new()
        .with_customers(vec![
            CustomerRecord::new("Gulf Trading").with_grade("A"),
            CustomerRecord::new("Delta Foods").with_grade("A"),
            CustomerRecord::new("Nile Imports").with_grade("C"),
        ])
        .with_orders(vec![OrderRecord::new(1_200.0), OrderRecord::new(800.0)])
        .with_pipeline(4, 2)
}

// ── E2E: Full pipeline ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_deep_context_query_with_attachment() {
    let provider = Arc::new(ScriptedProvider::new(ANSWER));
    let agent = BusinessAgent::new(provider.clone(), "mock-model")
        .with_data_source(Arc::new(sample_source()))
        .with_attachment_processor(Arc::new(TextAttachmentSummarizer::new()));

    let query = BusinessQuery::new("Analyze which customers to prioritize this month")
        .with_domain(Domain::Analytics)
        .with_format(OutputFormat::ActionItems)
        .with_attachment(Attachment::text("targets.csv", "text/csv", "customer,target\nGulf,5000"))
        .with_deep_context(Some(PageContext::section("customers")));

    let response = agent.try_process(&query).await.expect("valid query");

    assert_eq!(response.regime, Regime::Exploration);
    assert_eq!(response.tokens_used, 500);
    assert_eq!(response.action_items.len(), 2);
    assert_eq!(response.action_items[0], "Call Gulf Trading about the Q3 renewal");
    assert_eq!(
        response.body,
        ResponseBody::ActionItems {
            items: response.action_items.clone()
        }
    );

    let prompt = provider.last().prompt;
    assert!(prompt.contains("## Current Business Data Context (Read-Only Access)"));
    assert!(prompt.contains("**3 Customers** (2 Grade A, 0 Grade B, 1 Grade C)"));
    assert!(prompt.contains("### Customer Highlights"));
    assert!(prompt.contains("## Attached Files (1)"));
    assert!(prompt.contains("targets.csv"));
    assert!(prompt.contains("## User Query\nAnalyze which customers to prioritize this month"));
}

#[tokio::test]
async fn e2e_regime_sets_temperature_and_ceiling() {
    let provider = Arc::new(ScriptedProvider::new("Noted."));
    let agent = BusinessAgent::new(provider.clone(), "mock-model");

    let urgent = BusinessQuery::new("Update the price list asap")
        .with_urgency(Urgency::High)
        .with_format(OutputFormat::ActionItems);
    let response = agent.process(&urgent).await;
    assert_eq!(response.regime, Regime::Support);
    let request = provider.last();
    assert!((request.temperature - 0.4).abs() < 1e-6);
    assert_eq!(request.max_tokens, 280);

    let plan = BusinessQuery::new("Plan our expansion strategy").with_domain(Domain::Strategy);
    let response = agent.process(&plan).await;
    assert_eq!(response.regime, Regime::Balanced);
    assert!((provider.last().temperature - 0.6).abs() < 1e-6);
}

#[tokio::test]
async fn e2e_usage_accumulates_past_budget() {
    let provider = Arc::new(ScriptedProvider::new("Done."));
    let agent = BusinessAgent::new(provider.clone(), "mock-model")
        .with_recent_queries(RecentQueryLog::new(Duration::from_secs(60), 100));

    for i in 0..25 {
        agent
            .process(&BusinessQuery::new(format!("Summarize week {i}")))
            .await;
    }

    let stats = agent.usage_stats();
    assert_eq!(stats.tokens_used, 12_500);
    assert_eq!(stats.tokens_remaining, -2_500);
    assert!(stats.percent_used > 100.0);
    // Advisory budget: nothing was throttled.
    assert_eq!(provider.calls(), 25);
}

#[tokio::test]
async fn e2e_overload_short_circuits_without_provider_call() {
    let provider = Arc::new(ScriptedProvider::new("Handled."));
    let agent = BusinessAgent::new(provider.clone(), "mock-model")
        .with_recent_queries(RecentQueryLog::new(Duration::from_secs(60), 20));

    let mut last = None;
    for i in 0..21 {
        last = Some(agent.process(&BusinessQuery::new(format!("Check order {i}"))).await);
    }

    let last = last.unwrap();
    assert_eq!(provider.calls(), 20);
    assert_eq!(last.tokens_used, 0);
    assert_eq!(last.cost, 0.0);
    assert!(last.response.contains("21 requests"));
    assert!(agent.load_status().high_load);
}

#[tokio::test]
async fn e2e_provider_down_falls_back() {
    let agent = BusinessAgent::new(Arc::new(DownProvider), "mock-model");

    let response = agent
        .process(&BusinessQuery::new("Discover market patterns").with_domain(Domain::Analytics))
        .await;

    assert_eq!(response.regime, Regime::Exploration);
    assert!((response.confidence - 0.3).abs() < 1e-9);
    assert!(!response.action_items.is_empty());
    assert_eq!(response.tokens_used, 0);
    assert_eq!(agent.usage_stats().tokens_used, 0);
}

#[tokio::test(start_paused = true)]
async fn e2e_slow_provider_times_out_to_fallback() {
    let agent = BusinessAgent::new(Arc::new(SlowProvider), "mock-model")
        .with_completion_timeout(Duration::from_secs(5));

    let response = agent.process(&BusinessQuery::new("Generate report")).await;

    assert!((response.confidence - 0.3).abs() < 1e-9);
    assert_eq!(response.tokens_used, 0);
}

#[tokio::test]
async fn e2e_clear_cache_is_idempotent() {
    let provider = Arc::new(ScriptedProvider::new("Ok."));
    let agent = BusinessAgent::new(provider, "mock-model");

    agent
        .process(&BusinessQuery::new("Plan Q4").with_domain(Domain::Strategy))
        .await;
    assert!(!agent.assembler().cache().is_empty());

    assert!(agent.clear_cache());
    let once = agent.assembler().cache().len();
    assert!(agent.clear_cache());
    assert_eq!(agent.assembler().cache().len(), once);
    assert_eq!(once, 0);
}

// ── E2E: Presets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_preset_market_insights_returns_json_body() {
    let provider = Arc::new(ScriptedProvider::new(
        r#"{"segment": "food service", "opportunities": ["bulk contracts"]}"#,
    ));
    let agent = BusinessAgent::new(provider.clone(), "mock-model");

    let params = serde_json::json!({ "segment": "food service" });
    let query = build_query("market-insights", &params).unwrap();
    let response = agent.process(&query).await;

    assert_eq!(response.regime, Regime::Exploration);
    match response.body {
        ResponseBody::Json { data } => assert_eq!(data["segment"], "food service"),
        other => panic!("expected a JSON body, got {other:?}"),
    }
    assert!(provider.last().prompt.contains("Output format requested: json"));
}

// ── E2E: Gateway ─────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_gateway_runs_preset_over_http() {
    use axum::body::Body;
    use axum::http::{HeaderValue, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    let provider = Arc::new(ScriptedProvider::new(ANSWER));
    let agent = BusinessAgent::new(provider.clone(), "mock-model")
        .with_data_source(Arc::new(sample_source()));
    let state = Arc::new(bizpilot_gateway::api_v1::ApiV1State {
        agent: Arc::new(agent),
    });
    let app = bizpilot_gateway::build_router(state, HeaderValue::from_static("http://localhost:3000"));

    let body = serde_json::json!({
        "customerId": "Gulf Trading",
        "deepContextMode": true,
        "currentPageContext": { "section": "customers", "userContext": "Customers" }
    });
    let req = Request::builder()
        .method("POST")
        .uri("/v1/agent/actions/analyze-customer")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["action"], "analyze-customer");
    assert_eq!(json["regime"], "exploration");
    assert_eq!(json["body"]["format"], "markdown");

    let prompt = provider.last().prompt;
    assert!(prompt.contains("Analyze customer Gulf Trading"));
    assert!(prompt.contains("The user is in the **Customers** section."));
}
