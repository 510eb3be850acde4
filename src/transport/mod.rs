//! transport layer: moving a repository's objects and refs onto a new
//! working directory.

pub mod local;

pub use local::{clone_local, TransferStats};
