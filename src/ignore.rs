use std::fs;

use crate::error::{IoResultExt, Result};
use crate::repo::Repo;

struct IgnorePattern {
    raw: String,
    directory_only: bool,
    glob: glob::Pattern,
}

/// the patterns loaded from a repository's `.gitignore`, consumed by
/// `status`/`clean`/the working-tree scanner. this is a pluggable
/// helper, not part of the core object model.
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    pub fn load(repo: &Repo) -> Result<Self> {
        let path = repo.gitignore_path();
        if !path.exists() {
            return Ok(Self { patterns: Vec::new() });
        }

        let content = fs::read_to_string(&path).with_path(&path)?;
        let mut patterns = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let directory_only = line.ends_with('/');
            let trimmed = line.trim_end_matches('/');
            if let Ok(glob) = glob::Pattern::new(trimmed) {
                patterns.push(IgnorePattern {
                    raw: line.to_string(),
                    directory_only,
                    glob,
                });
            }
        }

        Ok(Self { patterns })
    }

    pub fn empty() -> Self {
        Self { patterns: Vec::new() }
    }

    /// is `path` (repo-relative, `/`-separated) ignored. patterns with a
    /// trailing slash only match directories; patterns with no slash in
    /// their body match against the basename at any depth.
    pub fn is_ignored(&self, path: &str, is_dir: bool) -> bool {
        self.patterns.iter().any(|p| {
            let body = p.raw.trim_end_matches('/');

            if p.directory_only {
                if is_dir && p.glob.matches(path) {
                    return true;
                }
                return path.starts_with(&format!("{}/", body));
            }

            if p.glob.matches(path) {
                return true;
            }
            if !body.contains('/') {
                if let Some(name) = path.rsplit('/').next() {
                    return p.glob.matches(name);
                }
            }
            false
        })
    }
}
