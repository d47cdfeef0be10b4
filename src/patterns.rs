//! Glob pattern resolution into absolute file sets

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};

use crate::error::{GateError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// An ordered list of glob patterns together with the files they resolved to
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<String>,
    paths: BTreeSet<PathBuf>,
}

impl PatternSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve every pattern against `root`, failing on the first pattern
    /// that matches nothing.
    ///
    /// Relative patterns are anchored at `root`, absolute patterns are used
    /// as given. `root` must already be absolute.
    pub fn resolve<S: AsRef<str>>(root: &Path, patterns: &[S]) -> Result<Self> {
        let mut paths = BTreeSet::new();

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let matched = expand(root, pattern)?;
            if matched.is_empty() {
                return Err(GateError::UnmatchedPattern {
                    pattern: pattern.to_string(),
                });
            }
            paths.extend(matched);
        }

        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            paths,
        })
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> &BTreeSet<PathBuf> {
        &self.paths
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Expand a single pattern into the absolute paths it matches.
///
/// A trailing `**` matches everything below its base directory, files
/// included. Hidden entries are only matched by wildcards when the pattern
/// itself spells out a leading dot.
fn expand(root: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern_path = Path::new(pattern);
    let (full_pattern, literal_prefix) = if pattern_path.is_absolute() {
        (pattern.to_string(), literal_components(pattern_path))
    } else {
        let root_str = root.to_str().ok_or_else(|| GateError::RepositoryRoot {
            path: root.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "path is not valid UTF-8"),
        })?;
        let full = Path::new(&Pattern::escape(root_str))
            .join(pattern)
            .to_string_lossy()
            .to_string();
        (full, root.components().count() + literal_components(pattern_path))
    };

    let mut globs = vec![full_pattern.clone()];
    if pattern_path.file_name() == Some(OsStr::new("**")) {
        globs.push(Path::new(&full_pattern).join("*").to_string_lossy().to_string());
    }

    let wildcard_part: Vec<Component> = pattern_path
        .components()
        .skip(literal_components(pattern_path))
        .collect();
    let allow_hidden = wildcard_part.iter().any(|c| is_hidden(c));

    let mut matched = Vec::new();
    for glob_pattern in &globs {
        let entries = glob::glob_with(glob_pattern, MATCH_OPTIONS).map_err(|source| {
            GateError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            }
        })?;

        for entry in entries {
            match entry {
                Ok(path) => {
                    let hidden = path.components().skip(literal_prefix).any(|c| is_hidden(&c));
                    if allow_hidden || !hidden {
                        matched.push(path);
                    }
                }
                Err(e) => tracing::warn!(pattern, error = %e, "skipping unreadable path"),
            }
        }
    }

    Ok(matched)
}

/// Number of leading components without glob metacharacters
fn literal_components(pattern: &Path) -> usize {
    pattern
        .components()
        .take_while(|c| !c.as_os_str().to_string_lossy().contains(['*', '?', '[']))
        .count()
}

fn is_hidden(component: &Component) -> bool {
    match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_tree(root: &Path) {
        fs::create_dir_all(root.join("app/nested")).unwrap();
        fs::create_dir_all(root.join("docs")).unwrap();
        fs::create_dir_all(root.join("app/.cache")).unwrap();
        fs::write(root.join("app/.cache/cached.py"), "").unwrap();
        fs::write(root.join("app/main.py"), "print()").unwrap();
        fs::write(root.join("app/nested/util.py"), "").unwrap();
        fs::write(root.join("app/.hidden.py"), "").unwrap();
        fs::write(root.join("docs/README.md"), "# docs").unwrap();
        fs::write(root.join("pyproject.toml"), "").unwrap();
    }

    #[test]
    fn test_single_file() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["pyproject.toml"]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.contains(&dir.path().join("pyproject.toml")));
    }

    #[test]
    fn test_recursive_glob() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["app/**/*.py"]).unwrap();
        let expected: BTreeSet<PathBuf> = [
            dir.path().join("app/main.py"),
            dir.path().join("app/nested/util.py"),
        ]
        .into_iter()
        .collect();

        // dotfiles and dot-directories need a literal leading dot
        assert_eq!(set.paths(), &expected);
    }

    #[test]
    fn test_trailing_recursive_wildcard_includes_files() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["app/**"]).unwrap();
        assert!(set.contains(&dir.path().join("app")));
        assert!(set.contains(&dir.path().join("app/main.py")));
        assert!(set.contains(&dir.path().join("app/nested")));
        assert!(set.contains(&dir.path().join("app/nested/util.py")));
        assert!(!set.contains(&dir.path().join("app/.hidden.py")));
        assert!(!set.contains(&dir.path().join("app/.cache/cached.py")));
        assert!(!set.contains(&dir.path().join("docs/README.md")));
    }

    #[test]
    fn test_bare_recursive_wildcard_covers_tree() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["**"]).unwrap();
        assert!(set.contains(&dir.path().join("pyproject.toml")));
        assert!(set.contains(&dir.path().join("docs/README.md")));
        assert!(set.contains(&dir.path().join("app/nested/util.py")));
        assert!(!set.contains(&dir.path().join("app/.cache/cached.py")));
    }

    #[test]
    fn test_recursive_wildcard_matches_zero_directories() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["**/main.py"]).unwrap();
        assert!(set.contains(&dir.path().join("app/main.py")));

        let set = PatternSet::resolve(dir.path(), &["**/pyproject.toml"]).unwrap();
        assert!(set.contains(&dir.path().join("pyproject.toml")));
    }

    #[test]
    fn test_explicit_dot_reaches_hidden_entries() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["app/.cache/*.py"]).unwrap();
        assert!(set.contains(&dir.path().join("app/.cache/cached.py")));

        let set = PatternSet::resolve(dir.path(), &["app/**/.hidden.py"]).unwrap();
        assert!(set.contains(&dir.path().join("app/.hidden.py")));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_root_is_rejected() {
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let root = dir.path().join(OsStr::from_bytes(b"repo\xff"));

        let err = PatternSet::resolve(&root, &["*.txt"]).unwrap_err();
        assert!(matches!(err, GateError::RepositoryRoot { .. }));
    }

    #[test]
    fn test_absolute_and_relative_patterns_agree() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let relative = PatternSet::resolve(dir.path(), &["app/**/*.py"]).unwrap();
        let absolute_pattern = format!("{}/app/**/*.py", dir.path().display());
        let absolute = PatternSet::resolve(dir.path(), &[absolute_pattern]).unwrap();

        assert_eq!(relative.paths(), absolute.paths());
    }

    #[test]
    fn test_patterns_are_merged_and_deduplicated() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let set = PatternSet::resolve(dir.path(), &["app/*.py", "app/main.py", "docs/*"]).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.patterns().len(), 3);
    }

    #[test]
    fn test_unmatched_pattern_is_named() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let err = PatternSet::resolve(dir.path(), &["app/*.py", "not_real_path/**/*"]).unwrap_err();
        match err {
            GateError::UnmatchedPattern { pattern } => assert_eq!(pattern, "not_real_path/**/*"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        let dir = tempdir().unwrap();
        create_tree(dir.path());

        let err = PatternSet::resolve(dir.path(), &["docs/readme.*"]).unwrap_err();
        assert!(matches!(err, GateError::UnmatchedPattern { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let dir = tempdir().unwrap();

        let err = PatternSet::resolve(dir.path(), &["app/***"]).unwrap_err();
        assert!(matches!(err, GateError::InvalidPattern { .. }));
    }

    #[test]
    fn test_empty_pattern_list() {
        let dir = tempdir().unwrap();

        let set = PatternSet::resolve::<&str>(dir.path(), &[]).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_root_with_glob_metacharacters() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("repo[1]");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("a.txt"), "").unwrap();

        let set = PatternSet::resolve(&root, &["*.txt"]).unwrap();
        assert!(set.contains(&root.join("a.txt")));
    }
}
