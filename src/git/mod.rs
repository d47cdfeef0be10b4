//! Git operations module
//!
//! Provides:
//! - Commit resolution
//! - Changed file listing between two commits
//! - Commit author lookup

pub mod repo;

pub use repo::{CommitRef, GitRepo};
