//! Token accounting and load detection for bizpilot.
//!
//! Provides the token budget manager ([`UsageLedger`]) that derives
//! per-request output ceilings and tracks cumulative spend, flat-rate cost
//! estimation, and the sliding-window [`RecentQueryLog`] behind the
//! overload short-circuit. All state is per instance; nothing is global.

pub mod ledger;
pub mod load;
pub mod model;
pub mod pricing;

pub use ledger::{MAX_OUTPUT_TOKENS, UsageLedger, estimate_output_tokens};
pub use load::{LoadCheck, RecentQueryLog};
pub use model::{LoadStatus, UsageStats};
pub use pricing::TokenRate;
