//! # bizpilot Core
//!
//! Domain types, traits, and error definitions for the bizpilot business
//! query pipeline. This crate has **no framework dependencies**; it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is a trait here. Implementations live in
//! their respective crates, so tests can swap any of them for a double:
//! - [`Provider`]: the hosted completion endpoint
//! - [`BusinessDataSource`]: live business records for deep context
//! - [`AttachmentProcessor`]: attachment summaries

pub mod error;
pub mod provider;
pub mod query;
pub mod regime;
pub mod response;
pub mod source;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, QueryError, Result, SourceError};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use query::{Attachment, BusinessQuery, Domain, OutputFormat, PageContext, Urgency, VisibleCustomer};
pub use regime::{Regime, RegimeProfile};
pub use response::{BusinessResponse, MarkdownSection, ResponseBody};
pub use source::{AttachmentProcessor, BusinessDataSource, BusinessSnapshot, CustomerHighlight, KeyMetrics};
