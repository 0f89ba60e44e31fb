//! Hierarchical path index for archive-backed filesystems.
//!
//! A [`PathTree`] is built incrementally by inserting the slash-delimited
//! entry paths an archive enumerator produces, and queried by path to
//! resolve nodes for filesystem-style operations (stat, readdir, open).
//! Archive decoding, content decompression, and the kernel-facing protocol
//! all live in the embedding application; this crate owns only the tree,
//! the identity of its nodes, and the per-node storage those collaborators
//! read and write.
//!
//! The tree performs no locking and no I/O. Callers that mutate and resolve
//! concurrently must serialize access themselves.

mod tree;

pub use tree::{
    FindError, InsertError, MAX_NAME_LEN, Node, NodeId, NodeState, PathTree, SYNTHETIC_ROOT_INO,
    UNASSIGNED_INO,
};
