use std::fmt;

use chrono::{TimeZone, Utc};

use crate::dag::first_parent_history;
use crate::error::Result;
use crate::hash::Hash;
use crate::object::read_commit;
use crate::repo::Repo;
use crate::resolver::resolve_to_commit;
use crate::types::Commit;

/// a commit paired with its id, for display
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub hash: Hash,
    pub commit: Commit,
}

/// first-parent history of `rev`, newest first.
pub fn log(repo: &Repo, rev: &str, max_count: Option<usize>) -> Result<Vec<LogEntry>> {
    let start = resolve_to_commit(repo, rev)?;
    let mut history = first_parent_history(repo, start)?;

    if let Some(max) = max_count {
        history.truncate(max);
    }

    history
        .into_iter()
        .map(|hash| {
            let commit = read_commit(repo, &hash)?;
            Ok(LogEntry { hash, commit })
        })
        .collect()
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "commit {}", self.hash)?;
        if self.commit.is_merge() {
            let parents: Vec<String> = self
                .commit
                .parents
                .iter()
                .map(|p| p.to_hex()[..7].to_string())
                .collect();
            writeln!(f, "Merge: {}", parents.join(" "))?;
        }
        writeln!(f, "Author: {}", self.commit.author)?;

        let datetime = Utc
            .timestamp_opt(self.commit.author_time, 0)
            .single()
            .unwrap_or_else(Utc::now);
        writeln!(f, "Date:   {}", datetime.format("%Y-%m-%d %H:%M:%S +0000"))?;

        writeln!(f)?;
        for line in self.commit.message.lines() {
            writeln!(f, "    {}", line)?;
        }

        Ok(())
    }
}
