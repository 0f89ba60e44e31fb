//! In-memory tree of archive entries.
//!
//! This module provides a tree-like structure mirroring the layout of an
//! archive, where nodes are either directories (containing other nodes) or
//! file leaves, built by inserting slash-delimited entry paths and queried
//! by path to resolve nodes for stat, readdir, and open.

mod node;
mod path_tree;

pub use node::{MAX_NAME_LEN, Node, NodeId, NodeState, SYNTHETIC_ROOT_INO, UNASSIGNED_INO};
pub use path_tree::{FindError, InsertError, PathTree};
