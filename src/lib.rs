//! pygit: a minimal content-addressed version-control engine.
//!
//! # Core concepts
//!
//! - **Blob**: content-addressed file data (DEFLATE-compressed at rest)
//! - **Tree**: a flat mapping of path to blob hash
//! - **Commit**: a snapshot of a tree plus parents, author and message
//! - **Tag**: an annotated pointer to an object
//! - **Ref**: a named pointer under `refs/heads`, `refs/tags`, or `refs/stash`
//!
//! # Example usage
//!
//! ```no_run
//! use pygit::{ops, Repo};
//! use std::path::Path;
//!
//! let repo = Repo::init(Path::new("/path/to/repo")).unwrap();
//! std::fs::write(repo.root().join("hello.txt"), "hi").unwrap();
//! ops::add(&repo, &[".".to_string()]).unwrap();
//! ops::commit(&repo, "initial commit").unwrap();
//! ```

mod config;
mod dag;
mod diff;
mod error;
mod hash;
mod ignore;
mod index;
mod object;
mod refs;
mod repo;
mod resolver;
mod scanner;

pub mod ops;
pub mod transport;
pub mod types;

pub use config::{Config, Remote};
pub use dag::{ancestor_set, first_parent_history, lowest_common_ancestor};
pub use diff::{file_diff, tree_delta, ChangeKind, DiffEntry};
pub use error::{Error, IoResultExt, Result};
pub use hash::{compute_object_id, Hash, ObjectKind};
pub use ignore::IgnoreSet;
pub use index::{read_index, stage, unstage, write_index};
pub use object::{
    blob_exists, commit_exists, object_exists, read_blob, read_commit, read_object, read_tag,
    read_tree, tree_exists, write_blob, write_commit, write_object, write_tag, write_tree,
};
pub use refs::{
    branch_commit, branch_exists, branch_path, create_tag, delete_branch, delete_tag, head_commit,
    list_branches, list_tags, peek_stash_entry, pop_stash_entry, push_stash, read_head, read_stash,
    tag_exists, tag_object_id, tag_path, write_branch, write_head_branch, write_head_detached,
    write_stash, Head,
};
pub use repo::{Repo, RepoLock};
pub use resolver::{resolve, resolve_to_commit};
pub use scanner::{content_hash, scan_workdir};
pub use types::{Commit, Tag, Tree};
