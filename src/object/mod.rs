pub mod blob;
pub mod commit;
pub mod store;
pub mod tag;
pub mod tree;

pub use blob::{blob_exists, read_blob, write_blob};
pub use commit::{commit_exists, read_commit, write_commit};
pub use store::{object_exists, read_object, write_object};
pub use tag::{read_tag, tag_exists, write_tag};
pub use tree::{read_tree, tree_exists, write_tree};
