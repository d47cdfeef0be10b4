//! Diffgate - CI trigger decisions from git diffs
//!
//! Decides whether a pipeline should run for the changes between two commits:
//! - Include/exclude glob patterns resolved to absolute files up front
//! - Changed files listed from the change commit to the target commit
//! - Commits from ignored authors never trigger

pub mod config;
pub mod error;
pub mod gate;
pub mod git;
pub mod observe;
pub mod patterns;

pub use error::{GateError, Result};
pub use gate::{first_trigger, DiffGate, GateConfig};
pub use git::{CommitRef, GitRepo};
pub use observe::{GateEvent, GateSink, GateSummary, TracingSink};
pub use patterns::PatternSet;
