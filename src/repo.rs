use std::fs::{self, File};
use std::path::{Path, PathBuf};

use nix::fcntl::{Flock, FlockArg};

use crate::config::Config;
use crate::error::{Error, IoResultExt, Result};

/// name of the repository meta directory
pub const META_DIR: &str = ".pygit";

/// a pygit repository: a root directory plus the `.pygit` meta directory
/// underneath it. `Repo` is the handle every operation in this crate is
/// threaded through explicitly — there is no implicit CWD coupling below
/// the CLI layer.
pub struct Repo {
    /// the repository's working directory (parent of `.pygit`)
    root: PathBuf,
    /// absolute path to `.pygit`
    meta: PathBuf,
}

impl Repo {
    /// initialize a new repository rooted at `path`. fails if `.pygit`
    /// already exists there.
    pub fn init(path: &Path) -> Result<Self> {
        let meta = path.join(META_DIR);
        if meta.exists() {
            return Err(Error::RepoExists(path.to_path_buf()));
        }

        fs::create_dir_all(&meta).with_path(&meta)?;
        fs::create_dir_all(meta.join("objects")).with_path(&meta)?;
        fs::create_dir_all(meta.join("refs/heads")).with_path(&meta)?;
        fs::create_dir_all(meta.join("refs/tags")).with_path(&meta)?;

        fs::write(meta.join("HEAD"), "ref: refs/heads/main\n").with_path(&meta)?;
        fs::write(meta.join("index"), "{}").with_path(&meta)?;

        let config = Config::default();
        config.save(&meta.join("config"))?;

        log::debug!("initialized pygit repository at {}", path.display());

        Ok(Self {
            root: path.to_path_buf(),
            meta,
        })
    }

    /// find the repository root by walking upward from `start` until a
    /// `.pygit` directory is found, or the filesystem root is reached.
    pub fn discover(start: &Path) -> Result<Self> {
        let mut current = start
            .canonicalize()
            .unwrap_or_else(|_| start.to_path_buf());

        loop {
            let meta = current.join(META_DIR);
            if meta.is_dir() {
                return Ok(Self {
                    root: current,
                    meta,
                });
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(Error::NotARepository(start.to_path_buf())),
            }
        }
    }

    /// repository root (working directory)
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// absolute path to `.pygit`
    pub fn meta_path(&self) -> &Path {
        &self.meta
    }

    pub fn objects_path(&self) -> PathBuf {
        self.meta.join("objects")
    }

    pub fn object_path(&self, id: &crate::Hash) -> PathBuf {
        self.objects_path().join(id.to_hex())
    }

    pub fn refs_heads_path(&self) -> PathBuf {
        self.meta.join("refs/heads")
    }

    pub fn refs_tags_path(&self) -> PathBuf {
        self.meta.join("refs/tags")
    }

    pub fn stash_path(&self) -> PathBuf {
        self.meta.join("refs/stash")
    }

    pub fn head_path(&self) -> PathBuf {
        self.meta.join("HEAD")
    }

    pub fn index_path(&self) -> PathBuf {
        self.meta.join("index")
    }

    pub fn config_path(&self) -> PathBuf {
        self.meta.join("config")
    }

    pub fn gitignore_path(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// load this repository's configuration
    pub fn config(&self) -> Result<Config> {
        Config::load(&self.config_path())
    }

    /// persist a configuration back to disk
    pub fn save_config(&self, config: &Config) -> Result<()> {
        config.save(&self.config_path())
    }

    /// path to the advisory lock file
    fn lock_path(&self) -> PathBuf {
        self.meta.join(".lock")
    }

    /// acquire an exclusive advisory lock on the repository, blocking
    /// concurrent self-invocation.
    pub fn lock(&self) -> Result<RepoLock> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;
        let flock =
            Flock::lock(file, FlockArg::LockExclusiveNonblock).map_err(|_| Error::LockContention)?;
        Ok(RepoLock { flock })
    }

    pub fn try_lock(&self) -> Result<Option<RepoLock>> {
        let lock_path = self.lock_path();
        let file = File::create(&lock_path).with_path(&lock_path)?;
        match Flock::lock(file, FlockArg::LockExclusiveNonblock) {
            Ok(flock) => Ok(Some(RepoLock { flock })),
            Err((_, nix::errno::Errno::EWOULDBLOCK)) => Ok(None),
            Err(_) => Err(Error::LockContention),
        }
    }
}

/// guard that releases the repository lock when dropped
pub struct RepoLock {
    #[allow(dead_code)]
    flock: Flock<File>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_repo_init() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        std::fs::create_dir_all(&repo_path).unwrap();

        let repo = Repo::init(&repo_path).unwrap();

        assert!(repo_path.join(".pygit/objects").is_dir());
        assert!(repo_path.join(".pygit/refs/heads").is_dir());
        assert!(repo_path.join(".pygit/refs/tags").is_dir());
        assert!(repo_path.join(".pygit/HEAD").is_file());
        assert!(repo_path.join(".pygit/index").is_file());
        assert_eq!(repo.root(), repo_path);
    }

    #[test]
    fn test_repo_init_already_exists() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        std::fs::create_dir_all(&repo_path).unwrap();

        Repo::init(&repo_path).unwrap();
        let result = Repo::init(&repo_path);
        assert!(matches!(result, Err(Error::RepoExists(_))));
    }

    #[test]
    fn test_repo_discover_from_subdirectory() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        std::fs::create_dir_all(repo_path.join("a/b/c")).unwrap();

        Repo::init(&repo_path).unwrap();
        let repo = Repo::discover(&repo_path.join("a/b/c")).unwrap();

        assert_eq!(
            repo.root().canonicalize().unwrap(),
            repo_path.canonicalize().unwrap()
        );
    }

    #[test]
    fn test_repo_discover_not_found() {
        let dir = tempdir().unwrap();
        let result = Repo::discover(dir.path());
        assert!(matches!(result, Err(Error::NotARepository(_))));
    }

    #[test]
    fn test_repo_lock() {
        let dir = tempdir().unwrap();
        let repo_path = dir.path().join("repo");
        std::fs::create_dir_all(&repo_path).unwrap();
        let repo = Repo::init(&repo_path).unwrap();

        let lock = repo.lock().unwrap();
        let result = repo.try_lock().unwrap();
        assert!(result.is_none());

        drop(lock);
        let lock2 = repo.try_lock().unwrap();
        assert!(lock2.is_some());
    }
}
