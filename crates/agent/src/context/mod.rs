//! Prompt context assembly.
//!
//! # Fragments (in prompt order)
//!
//! | Fragment | Source | When |
//! |----------|--------|------|
//! | Purpose | `PURPOSE_RULES` | Always |
//! | Capabilities | Fixed catalog | Always |
//! | Session | `SessionMemory` | After the first completed query |
//! | Knowledge | `ContextCache` + company profile | Always |
//! | Business data | `BusinessDataSource` | Deep-context mode |
//! | Business intelligence | `DOMAIN_RULES` + module tables | Deep-context mode, domain detected |
//! | Attachments | `AttachmentProcessor` | Attachments present |
//! | User query | The task | Always |

pub mod assembler;
pub mod cache;
pub mod capabilities;
pub mod intelligence;
pub mod knowledge;
pub mod purpose;
pub mod session;
pub mod snapshot;
pub mod token;

pub use assembler::{AssembledPrompt, ContextAssembler, FragmentStats, SkippedFragment};
pub use cache::ContextCache;
pub use purpose::{PURPOSE_RULES, PurposeCategory};
pub use session::SessionMemory;
