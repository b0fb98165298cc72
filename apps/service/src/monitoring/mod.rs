//! Monitoring engine module - sequential endpoint checks and scheduling.
//!
//! This module is responsible for:
//! - Probing HTTP endpoints with a bounded timeout
//! - Resolving the status code each endpoint is expected to answer
//! - Running the check/alert/sleep loop

pub mod checker;
pub mod rules;
pub mod scheduler;
pub mod types;

pub use checker::HttpChecker;
pub use rules::StatusRules;
pub use scheduler::Scheduler;
pub use types::CheckResult;
