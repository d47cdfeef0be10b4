//! The diff gate: should a pipeline run for the changes between two commits?

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{GateError, Result};
use crate::git::{CommitRef, GitRepo};
use crate::observe::{GateEvent, GateSink, GateSummary, TracingSink};
use crate::patterns::PatternSet;

/// Inputs needed to build a [`DiffGate`]
#[derive(Debug, Clone, Default)]
pub struct GateConfig {
    /// Repository working tree root
    pub root: PathBuf,
    /// Commit the change is compared against
    pub target: String,
    /// Commit carrying the new changes
    pub change: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub ignore_authors: Vec<String>,
}

pub struct DiffGate {
    repo: GitRepo,
    target: CommitRef,
    change: CommitRef,
    include: PatternSet,
    exclude: PatternSet,
    ignore_authors: HashSet<String>,
    sink: Box<dyn GateSink>,
}

impl std::fmt::Debug for DiffGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiffGate")
            .field("root", &self.repo.root())
            .field("target", &self.target)
            .field("change", &self.change)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("ignore_authors", &self.ignore_authors)
            .finish_non_exhaustive()
    }
}

impl DiffGate {
    /// Build a gate that reports through `tracing`
    pub fn new(config: GateConfig) -> Result<Self> {
        Self::with_sink(config, Box::new(TracingSink))
    }

    /// Build a gate that reports through `sink`.
    ///
    /// The include list is checked before touching the file system. Every
    /// include and exclude pattern must match at least one file, then both
    /// commits are resolved in the repository at `config.root`.
    pub fn with_sink(config: GateConfig, sink: Box<dyn GateSink>) -> Result<Self> {
        if config.include.is_empty() {
            return Err(GateError::EmptyIncludeList);
        }

        let root = std::path::absolute(&config.root).map_err(|source| GateError::RepositoryRoot {
            path: config.root.clone(),
            source,
        })?;

        let include = PatternSet::resolve(&root, &config.include)?;
        let exclude = PatternSet::resolve(&root, &config.exclude)?;

        let repo = GitRepo::open(&root)?;
        let target = repo.resolve_commit(&config.target)?;
        let change = repo.resolve_commit(&config.change)?;

        let gate = Self {
            repo,
            target,
            change,
            include,
            exclude,
            ignore_authors: config.ignore_authors.iter().cloned().collect(),
            sink,
        };

        let mut ignore_authors = config.ignore_authors;
        ignore_authors.sort();
        ignore_authors.dedup();
        gate.sink.record(&GateEvent::Configured(GateSummary {
            root,
            target_ref: gate.target.spec.clone(),
            target_commit: gate.target.to_string(),
            change_ref: gate.change.spec.clone(),
            change_commit: gate.change.to_string(),
            include: gate.include.paths().iter().cloned().collect(),
            exclude: gate.exclude.paths().iter().cloned().collect(),
            ignore_authors,
        }));

        Ok(gate)
    }

    /// Decide whether the change commit should trigger.
    ///
    /// The diff runs from the change commit to the target commit and paths
    /// are taken from the change side. Repeated calls give the same answer
    /// as long as the repository is unchanged.
    pub fn evaluate(&self) -> Result<bool> {
        let changed = self.repo.changed_paths(&self.change, &self.target)?;
        self.sink.record(&GateEvent::ChangedPaths(changed.clone()));

        let author = self.repo.author_email(&self.change)?;
        self.sink.record(&GateEvent::Author(author.clone()));

        let hit = first_trigger(
            &changed,
            &self.include,
            &self.exclude,
            &self.ignore_authors,
            &author,
        );
        if let Some(path) = hit {
            self.sink.record(&GateEvent::Matched(path.to_path_buf()));
        }

        let decision = hit.is_some();
        self.sink.record(&GateEvent::Decision(decision));

        Ok(decision)
    }

    pub fn include(&self) -> &PatternSet {
        &self.include
    }

    pub fn exclude(&self) -> &PatternSet {
        &self.exclude
    }
}

/// First changed path that is included, not excluded, and authored by
/// someone outside the ignore list. Exclusion wins over inclusion.
pub fn first_trigger<'a>(
    changed: &'a [PathBuf],
    include: &PatternSet,
    exclude: &PatternSet,
    ignore_authors: &HashSet<String>,
    author: &str,
) -> Option<&'a Path> {
    changed
        .iter()
        .find(|path| {
            include.contains(path) && !exclude.contains(path) && !ignore_authors.contains(author)
        })
        .map(PathBuf::as_path)
}
