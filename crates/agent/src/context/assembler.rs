//! Context assembly pipeline.
//!
//! Builds the prompt for one query from ordered fragments:
//!
//! 1. **Purpose**: shared-purpose framing, always present
//! 2. **Capabilities**: catalog filtered by task keywords and domain
//! 3. **Session**: recently completed tasks, when there are any
//! 4. **Knowledge**: regime profile and domain guidance (memoized per
//!    `(domain, regime)`), plus the company profile when relevant
//! 5. **Business data**: live snapshot, only in deep-context mode
//! 6. **Business intelligence**: tiered modules for the detected domain,
//!    only in deep-context mode
//! 7. **Attachments**: summary of attached files
//! 8. **User query**: the task text and requested output format
//!
//! Assembly never fails. A collaborator error is logged, noted in the
//! metadata, and the fragment is degraded or omitted.

use std::sync::Arc;

use bizpilot_core::{
    AttachmentProcessor, BusinessDataSource, BusinessQuery, BusinessSnapshot, OutputFormat, Regime,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::context::cache::ContextCache;
use crate::context::session::SessionMemory;
use crate::context::{capabilities, intelligence, knowledge, purpose, snapshot, token};

// ── Types ─────────────────────────────────────────────────────────────────

/// Size of one included fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FragmentStats {
    pub name: &'static str,
    pub tokens: usize,
}

/// A fragment that was degraded or left out, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFragment {
    pub name: &'static str,
    pub reason: String,
}

/// The prompt for one query plus what went into it.
#[derive(Debug, Clone, Serialize)]
pub struct AssembledPrompt {
    pub text: String,
    pub fragments: Vec<FragmentStats>,
    pub skipped: Vec<SkippedFragment>,
    /// Whether the knowledge fragment came from the cache.
    pub cache_hit: bool,
    pub estimated_tokens: usize,
}

impl AssembledPrompt {
    pub fn has_fragment(&self, name: &str) -> bool {
        self.fragments.iter().any(|f| f.name == name)
    }
}

#[derive(Default)]
struct Builder {
    sections: Vec<String>,
    fragments: Vec<FragmentStats>,
    skipped: Vec<SkippedFragment>,
}

impl Builder {
    fn push(&mut self, name: &'static str, text: String) {
        self.fragments.push(FragmentStats {
            name,
            tokens: token::estimate_tokens(&text),
        });
        self.sections.push(text);
    }

    fn skip(&mut self, name: &'static str, reason: impl Into<String>) {
        self.skipped.push(SkippedFragment {
            name,
            reason: reason.into(),
        });
    }
}

// ── Assembler ─────────────────────────────────────────────────────────────

pub struct ContextAssembler {
    cache: ContextCache,
    session: SessionMemory,
    data_source: Option<Arc<dyn BusinessDataSource>>,
    attachments: Option<Arc<dyn AttachmentProcessor>>,
}

impl ContextAssembler {
    pub fn new() -> Self {
        Self {
            cache: ContextCache::new(),
            session: SessionMemory::default(),
            data_source: None,
            attachments: None,
        }
    }

    pub fn with_data_source(mut self, source: Arc<dyn BusinessDataSource>) -> Self {
        self.data_source = Some(source);
        self
    }

    pub fn with_attachment_processor(mut self, processor: Arc<dyn AttachmentProcessor>) -> Self {
        self.attachments = Some(processor);
        self
    }

    pub fn with_session_capacity(mut self, capacity: usize) -> Self {
        self.session = SessionMemory::new(capacity);
        self
    }

    pub fn cache(&self) -> &ContextCache {
        &self.cache
    }

    pub fn session(&self) -> &SessionMemory {
        &self.session
    }

    /// Assemble the prompt for `query` under `regime`.
    pub async fn assemble(&self, query: &BusinessQuery, regime: Regime) -> AssembledPrompt {
        let mut b = Builder::default();

        b.push("purpose", purpose::render(&query.task, query.domain));
        b.push(
            "capabilities",
            capabilities::render(&query.task, query.domain),
        );

        if let Some(history) = self.session.render() {
            b.push("session", history);
        }

        let (mut knowledge_text, cache_hit) = self
            .cache
            .get_or_insert_with((query.domain, regime), || {
                knowledge::render(query.domain, regime)
            });
        if let Some(profile) = knowledge::company_profile(&query.task, query.domain) {
            knowledge_text.push_str("\n\n");
            knowledge_text.push_str(&profile);
        }
        b.push("knowledge", knowledge_text);

        if query.deep_context {
            let snap = self.load_snapshot(query, &mut b).await;
            b.push("business_data", snapshot::render(&snap));
            if let Some(intel) = intelligence::render(&query.task) {
                b.push("business_intelligence", intel);
            }
        }

        if !query.attachments.is_empty() {
            self.add_attachments(query, &mut b).await;
        }

        b.push("user_query", render_user_query(query));

        let text = b.sections.join("\n\n");
        let estimated_tokens = token::estimate_tokens(&text);
        debug!(
            regime = %regime,
            fragments = b.fragments.len(),
            skipped = b.skipped.len(),
            cache_hit,
            estimated_tokens,
            "Prompt assembled"
        );

        AssembledPrompt {
            text,
            fragments: b.fragments,
            skipped: b.skipped,
            cache_hit,
            estimated_tokens,
        }
    }

    async fn load_snapshot(&self, query: &BusinessQuery, b: &mut Builder) -> BusinessSnapshot {
        let page = query.page_context.as_ref();
        let Some(source) = &self.data_source else {
            debug!("Deep context requested without a data source");
            b.skip("business_data", "no data source configured");
            return BusinessSnapshot::unavailable(page.cloned());
        };

        match source.snapshot(page).await {
            Ok(snap) => snap,
            Err(e) => {
                warn!(source = source.name(), error = %e, "Business data unavailable, using placeholder");
                b.skip("business_data", e.to_string());
                BusinessSnapshot::unavailable(page.cloned())
            }
        }
    }

    async fn add_attachments(&self, query: &BusinessQuery, b: &mut Builder) {
        let Some(processor) = &self.attachments else {
            b.skip("attachments", "no attachment processor configured");
            return;
        };

        match processor.summarize(&query.attachments).await {
            Ok(summary) if !summary.trim().is_empty() => b.push("attachments", summary),
            Ok(_) => {}
            Err(e) => {
                warn!(count = query.attachments.len(), error = %e, "Attachment summary failed");
                b.skip("attachments", e.to_string());
            }
        }
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new()
    }
}

fn render_user_query(query: &BusinessQuery) -> String {
    let mut out = format!("## User Query\n{}", query.task.trim());

    if let Some(extra) = query.context.as_ref().filter(|v| !v.is_null()) {
        out.push_str("\n\nAdditional context:\n");
        out.push_str(&extra.to_string());
    }

    if query.output_format != OutputFormat::Text {
        out.push_str(&format!(
            "\n\nOutput format requested: {}",
            query.output_format
        ));
    }
    out
}
