//! Commit resolution and tree diffs

use git2::{DiffFindOptions, DiffOptions, Oid, Repository};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// A resolved commit, remembered by id so it can be looked up again
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRef {
    /// The identifier as given by the caller (hash, branch, tag, ...)
    pub spec: String,
    pub id: Oid,
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// Read-only access to the repository that owns the working tree at `root`
pub struct GitRepo {
    repo: Repository,
    root: PathBuf,
}

impl GitRepo {
    /// Open the repository rooted exactly at `root`
    pub fn open(root: &Path) -> Result<Self> {
        let repo = Repository::open(root)?;

        Ok(Self {
            repo,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a commit-ish (hash, short hash, branch, tag, `HEAD~1`)
    pub fn resolve_commit(&self, spec: &str) -> Result<CommitRef> {
        let commit = self.repo.revparse_single(spec)?.peel_to_commit()?;

        Ok(CommitRef {
            spec: spec.to_string(),
            id: commit.id(),
        })
    }

    /// Files that differ from `from` to `to`, as absolute paths taken from
    /// the `from` side of each delta.
    ///
    /// Renames are detected, so a renamed file is reported under its name in
    /// `from`.
    pub fn changed_paths(&self, from: &CommitRef, to: &CommitRef) -> Result<Vec<PathBuf>> {
        let from_tree = self.repo.find_commit(from.id)?.tree()?;
        let to_tree = self.repo.find_commit(to.id)?.tree()?;

        let mut diff_opts = DiffOptions::new();
        let mut diff = self.repo.diff_tree_to_tree(
            Some(&from_tree),
            Some(&to_tree),
            Some(&mut diff_opts),
        )?;

        let mut find_opts = DiffFindOptions::new();
        find_opts.renames(true);
        diff.find_similar(Some(&mut find_opts))?;

        // libgit2 fills the old-side path for added files too
        let paths = diff
            .deltas()
            .filter_map(|delta| delta.old_file().path().map(|p| self.root.join(p)))
            .collect();

        Ok(paths)
    }

    /// Author e-mail of a commit
    pub fn author_email(&self, commit: &CommitRef) -> Result<String> {
        let commit = self.repo.find_commit(commit.id)?;
        let author = commit.author();

        Ok(String::from_utf8_lossy(author.email_bytes()).to_string())
    }
}
