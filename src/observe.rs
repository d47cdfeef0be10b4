//! Observability hooks for the gate
//!
//! The gate reports what it resolved and decided through a [`GateSink`].
//! The default sink forwards to `tracing`; tests can record events instead.

use std::path::PathBuf;

/// Fully resolved gate configuration, reported once after construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateSummary {
    pub root: PathBuf,
    /// Commit identifiers as given, next to the ids they resolved to
    pub target_ref: String,
    pub target_commit: String,
    pub change_ref: String,
    pub change_commit: String,
    pub include: Vec<PathBuf>,
    pub exclude: Vec<PathBuf>,
    pub ignore_authors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateEvent {
    Configured(GateSummary),
    ChangedPaths(Vec<PathBuf>),
    Author(String),
    /// The first changed path that triggered a positive decision
    Matched(PathBuf),
    Decision(bool),
}

pub trait GateSink {
    fn record(&self, event: &GateEvent);
}

/// Emits every event as a structured `tracing` record
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl GateSink for TracingSink {
    fn record(&self, event: &GateEvent) {
        match event {
            GateEvent::Configured(summary) => tracing::info!(
                root = %summary.root.display(),
                target_ref = %summary.target_ref,
                target_commit = %summary.target_commit,
                change_ref = %summary.change_ref,
                change_commit = %summary.change_commit,
                include = ?summary.include,
                exclude = ?summary.exclude,
                ignore_authors = ?summary.ignore_authors,
                "gate configured"
            ),
            GateEvent::ChangedPaths(paths) => tracing::info!(
                count = paths.len(),
                paths = ?paths,
                "changed paths between commits"
            ),
            GateEvent::Author(author) => tracing::info!(%author, "change commit author"),
            GateEvent::Matched(path) => tracing::info!(
                path = %path.display(),
                "changed path is included and not excluded"
            ),
            GateEvent::Decision(trigger) => tracing::info!(trigger, "trigger decision"),
        }
    }
}
