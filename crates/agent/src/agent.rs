//! The business query pipeline.
//!
//! `overload check → classify → assemble → complete → post-process`, with
//! one fork (fallback on any completion failure) and one early exit
//! (overload). `process` never fails.

use std::sync::Arc;
use std::time::Duration;

use bizpilot_config::{AppConfig, ConfigError};
use bizpilot_core::{
    AttachmentProcessor, BusinessDataSource, BusinessQuery, BusinessResponse, Provider,
    ProviderRequest, QueryError,
};
use bizpilot_sources::{HttpDataSource, TextAttachmentSummarizer};
use bizpilot_telemetry::{LoadStatus, RecentQueryLog, TokenRate, UsageLedger, UsageStats};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::classifier::classify;
use crate::context::ContextAssembler;
use crate::fallback::{fallback_response, overload_response};
use crate::postprocess::PostProcessor;

pub const DEFAULT_COMPLETION_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_OVERLOAD_WINDOW: Duration = Duration::from_secs(60);
pub const DEFAULT_OVERLOAD_THRESHOLD: usize = 20;

pub struct BusinessAgent {
    /// The completion provider
    provider: Arc<dyn Provider>,

    model: String,

    assembler: ContextAssembler,

    /// Cumulative token usage (advisory budget)
    ledger: UsageLedger,

    /// Arrival log behind the overload short-circuit
    recent: RecentQueryLog,

    post: PostProcessor,

    completion_timeout: Duration,
}

impl BusinessAgent {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            assembler: ContextAssembler::new(),
            ledger: UsageLedger::default(),
            recent: RecentQueryLog::new(DEFAULT_OVERLOAD_WINDOW, DEFAULT_OVERLOAD_THRESHOLD),
            post: PostProcessor::new(),
            completion_timeout: DEFAULT_COMPLETION_TIMEOUT,
        }
    }

    /// Build the provider, collaborators and limits from configuration.
    ///
    /// Fails fast when no API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let provider = bizpilot_providers::build_from_config(config)?;
        let model = bizpilot_providers::model_for(config);
        let agent_cfg = &config.agent;

        let ledger = UsageLedger::new(
            agent_cfg.token_budget,
            TokenRate::new(config.pricing.usd_per_million_tokens),
        )
        .with_max_output_tokens(agent_cfg.max_output_tokens);

        let recent = RecentQueryLog::new(
            Duration::from_secs(agent_cfg.overload_window_secs),
            agent_cfg.overload_threshold,
        )
        .with_retention(Duration::from_secs(agent_cfg.recent_query_retention_secs));

        let mut agent = Self::new(provider, model)
            .with_ledger(ledger)
            .with_recent_queries(recent)
            .with_completion_timeout(Duration::from_secs(agent_cfg.completion_timeout_secs))
            .with_session_capacity(agent_cfg.session_memory_size)
            .with_attachment_processor(Arc::new(TextAttachmentSummarizer::new()));

        if let Some(base_url) = config.data.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
            let source = HttpDataSource::new(base_url)
                .with_request_timeout(Duration::from_secs(config.data.request_timeout_secs))
                .with_cache_ttl(Duration::from_secs(config.data.cache_ttl_secs));
            info!(base_url, "Live business data enabled");
            agent = agent.with_data_source(Arc::new(source));
        }

        Ok(agent)
    }

    pub fn with_data_source(mut self, source: Arc<dyn BusinessDataSource>) -> Self {
        self.assembler = self.assembler.with_data_source(source);
        self
    }

    pub fn with_attachment_processor(mut self, processor: Arc<dyn AttachmentProcessor>) -> Self {
        self.assembler = self.assembler.with_attachment_processor(processor);
        self
    }

    pub fn with_session_capacity(mut self, capacity: usize) -> Self {
        self.assembler = self.assembler.with_session_capacity(capacity);
        self
    }

    pub fn with_ledger(mut self, ledger: UsageLedger) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn with_recent_queries(mut self, log: RecentQueryLog) -> Self {
        self.recent = log;
        self
    }

    pub fn with_post_processor(mut self, post: PostProcessor) -> Self {
        self.post = post;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn assembler(&self) -> &ContextAssembler {
        &self.assembler
    }

    /// Validate, then process.
    pub async fn try_process(&self, query: &BusinessQuery) -> Result<BusinessResponse, QueryError> {
        query.validate()?;
        Ok(self.process(query).await)
    }

    /// Run one query through the pipeline.
    pub async fn process(&self, query: &BusinessQuery) -> BusinessResponse {
        let request_id = Uuid::new_v4();

        let load = self.recent.record();
        if load.high_load {
            warn!(
                %request_id,
                recent = load.recent,
                threshold = self.recent.threshold(),
                "High load, short-circuiting"
            );
            return overload_response(load.recent, self.recent.window().as_secs());
        }

        let regime = classify(&query.task, query.domain, query.urgency);
        debug!(%request_id, regime = %regime, domain = ?query.domain, "Query classified");

        let prompt = self.assembler.assemble(query, regime).await;
        let max_tokens = self
            .ledger
            .estimate_output_tokens(query.output_format, query.urgency);

        let request = ProviderRequest::new(&self.model, prompt.text, max_tokens)
            .with_temperature(regime.temperature());

        let completion =
            tokio::time::timeout(self.completion_timeout, self.provider.complete(request)).await;
        let response = match completion {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(%request_id, provider = self.provider.name(), error = %e, "Completion failed, using fallback");
                return fallback_response(regime);
            }
            Err(_) => {
                warn!(
                    %request_id,
                    provider = self.provider.name(),
                    timeout_secs = self.completion_timeout.as_secs_f64(),
                    "Completion timed out, using fallback"
                );
                return fallback_response(regime);
            }
        };

        let processed = self
            .post
            .process(&response.text, regime, query.output_format);

        let tokens = response.usage.total();
        let total_used = self.ledger.record_usage(tokens);
        let cost = self.ledger.cost(tokens);
        self.assembler.session().remember(&query.task, regime);

        info!(
            %request_id,
            regime = %regime,
            tokens,
            total_used,
            max_tokens,
            cache_hit = prompt.cache_hit,
            confidence = processed.confidence,
            "Query completed"
        );

        BusinessResponse {
            response: processed.text,
            regime,
            confidence: processed.confidence,
            action_items: processed.action_items,
            metrics: processed.metrics,
            tokens_used: tokens,
            cost,
            amplification: regime.amplification(),
            body: processed.body,
        }
    }

    pub fn usage_stats(&self) -> UsageStats {
        self.ledger.stats()
    }

    pub fn load_status(&self) -> LoadStatus {
        self.recent.status()
    }

    /// Empty the context cache and drop recent-query entries past retention.
    pub fn clear_cache(&self) -> bool {
        self.assembler.cache().clear();
        let pruned = self.recent.prune();
        info!(pruned, "Context cache cleared");
        true
    }
}
