mod commit;
mod tag;
mod tree;

pub use commit::Commit;
pub use tag::Tag;
pub use tree::Tree;
