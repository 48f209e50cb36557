//! HTTP API v1: the business agent over REST.
//!
//! Endpoints:
//!
//! - `POST   /v1/agent`                  Run one business query
//! - `GET    /v1/agent`                  Service info, usage and load
//! - `DELETE /v1/agent`                  Clear the context cache
//! - `GET    /v1/agent/stats`            Token usage against the budget
//! - `GET    /v1/agent/actions`          Preset action catalog
//! - `GET    /v1/agent/actions/{action}` One preset
//! - `POST   /v1/agent/actions/{action}` Run a preset with JSON parameters

use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use bizpilot_agent::{ActionError, ActionInfo, BusinessAgent, PresetAction, build_query, catalog};
use bizpilot_core::{BusinessQuery, BusinessResponse, Domain, OutputFormat, Regime, RegimeProfile};
use bizpilot_telemetry::{LoadStatus, UsageStats};

// ── State ─────────────────────────────────────────────────────────────────

/// Shared state for the v1 API.
pub struct ApiV1State {
    pub agent: Arc<BusinessAgent>,
}

pub type SharedApiState = Arc<ApiV1State>;

/// Build the v1 API router. Mounted under `/v1` by the gateway.
pub fn v1_router(state: SharedApiState) -> Router {
    Router::new()
        .route(
            "/agent",
            get(agent_info_handler)
                .post(agent_query_handler)
                .delete(clear_cache_handler),
        )
        .route("/agent/stats", get(stats_handler))
        .route("/agent/actions", get(list_actions_handler))
        .route(
            "/agent/actions/{action}",
            get(get_action_handler).post(run_action_handler),
        )
        .with_state(state)
}

// ── DTOs ──────────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
}

#[derive(Serialize)]
struct AgentReply {
    success: bool,
    #[serde(flatten)]
    response: BusinessResponse,
}

#[derive(Serialize)]
struct ActionReply {
    success: bool,
    action: String,
    #[serde(flatten)]
    response: BusinessResponse,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RegimeDto {
    regime: Regime,
    #[serde(flatten)]
    profile: RegimeProfile,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AgentInfoResponse {
    name: &'static str,
    version: &'static str,
    provider: String,
    model: String,
    regimes: Vec<RegimeDto>,
    domains: Vec<Domain>,
    output_formats: Vec<OutputFormat>,
    usage: UsageStats,
    load: LoadStatus,
}

#[derive(Serialize)]
struct ClearCacheResponse {
    success: bool,
    message: &'static str,
}

#[derive(Serialize)]
struct ActionListResponse {
    actions: Vec<ActionInfo>,
    count: usize,
}

// ── Handlers ──────────────────────────────────────────────────────────────

async fn agent_query_handler(
    State(state): State<SharedApiState>,
    Json(query): Json<BusinessQuery>,
) -> Result<Json<AgentReply>, ApiError> {
    info!(task_len = query.task.len(), "v1/agent request");

    let response = state
        .agent
        .try_process(&query)
        .await
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    Ok(Json(AgentReply {
        success: true,
        response,
    }))
}

async fn agent_info_handler(State(state): State<SharedApiState>) -> Json<AgentInfoResponse> {
    let agent = &state.agent;
    Json(AgentInfoResponse {
        name: "bizpilot",
        version: env!("CARGO_PKG_VERSION"),
        provider: agent.provider_name().to_string(),
        model: agent.model().to_string(),
        regimes: Regime::ALL
            .into_iter()
            .map(|regime| RegimeDto {
                regime,
                profile: *regime.profile(),
            })
            .collect(),
        domains: Domain::ALL.to_vec(),
        output_formats: OutputFormat::ALL.to_vec(),
        usage: agent.usage_stats(),
        load: agent.load_status(),
    })
}

async fn clear_cache_handler(State(state): State<SharedApiState>) -> Json<ClearCacheResponse> {
    state.agent.clear_cache();
    Json(ClearCacheResponse {
        success: true,
        message: "Context cache cleared",
    })
}

async fn stats_handler(State(state): State<SharedApiState>) -> Json<UsageStats> {
    Json(state.agent.usage_stats())
}

async fn list_actions_handler() -> Json<ActionListResponse> {
    let actions = catalog();
    let count = actions.len();
    Json(ActionListResponse { actions, count })
}

async fn get_action_handler(Path(action): Path<String>) -> Result<Json<ActionInfo>, ApiError> {
    action
        .parse::<PresetAction>()
        .map(|preset| Json(preset.info()))
        .map_err(|_| api_error(StatusCode::NOT_FOUND, format!("Unknown action: {action}")))
}

async fn run_action_handler(
    State(state): State<SharedApiState>,
    Path(action): Path<String>,
    body: Bytes,
) -> Result<Json<ActionReply>, ApiError> {
    // An empty body means "no parameters".
    let params: Value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}")))?
    };

    let query = build_query(&action, &params).map_err(|e: ActionError| {
        warn!(action = %action, error = %e, "Rejected preset action");
        api_error(StatusCode::BAD_REQUEST, e)
    })?;

    info!(action = %action, "v1/agent/actions request");
    let response = state.agent.process(&query).await;

    Ok(Json(ActionReply {
        success: true,
        action,
        response,
    }))
}
