//! Context collaborators for bizpilot.
//!
//! Implementations of the `BusinessDataSource` and `AttachmentProcessor`
//! traits from `bizpilot-core`:
//!
//! - [`HttpDataSource`]: read-only snapshot of the ERP REST API, cached per collection
//! - [`StaticDataSource`]: fixed records, for tests and offline runs
//! - [`TextAttachmentSummarizer`]: renders attachment previews into a prompt fragment

pub mod attachments;
pub mod fixed;
pub mod http;
pub mod records;
pub mod summary;

pub use attachments::{TextAttachmentSummarizer, load_attachment, mime_for};
pub use fixed::StaticDataSource;
pub use http::HttpDataSource;
pub use records::{CustomerRecord, OrderRecord};
pub use summary::summarize;
