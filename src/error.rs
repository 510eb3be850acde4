use std::path::PathBuf;

use crate::Hash;

/// error type for pygit operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("not a pygit repository (or any parent up to {0})")]
    NotARepository(PathBuf),

    #[error("repository already exists at {0}")]
    RepoExists(PathBuf),

    #[error("bad revision: {0}")]
    BadRevision(String),

    #[error("ambiguous revision '{0}' matches multiple objects")]
    Ambiguous(String),

    #[error("ref not found: {0}")]
    RefNotFound(String),

    #[error("object not found: {0}")]
    ObjectNotFound(Hash),

    #[error("path not found in tree: {0}")]
    PathNotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("corrupt object {0}: {1}")]
    CorruptObject(Hash, String),

    #[error("HEAD is detached, but this operation requires an attached branch")]
    DetachedHead,

    #[error("no common ancestor between {0} and {1}")]
    NoCommonAncestor(Hash, Hash),

    #[error("usage: {0}")]
    Usage(String),

    #[error("checkout target not empty: {0}")]
    TargetNotEmpty(PathBuf),

    #[error("remote not found: {0}")]
    RemoteNotFound(String),

    #[error("config key not found: {0}")]
    ConfigKeyNotFound(String),

    #[error("invalid ref name: {0}")]
    InvalidRef(String),

    #[error("invalid hash hex: {0}")]
    InvalidHashHex(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("config serialization error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("lock contention on repository")]
    LockContention,
}

pub type Result<T> = std::result::Result<T, Error>;

/// helper to wrap io errors with path context
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
