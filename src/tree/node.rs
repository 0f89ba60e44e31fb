use std::time::SystemTime;

use derive_more::Display;
use hashlink::LinkedHashMap;

/// Longest permitted segment name in bytes, matching the NAME_MAX limit of
/// common filesystems. Inserts and lookups reject longer segments instead of
/// truncating them.
pub const MAX_NAME_LEN: usize = 255;

/// Inode value reserved for protocol adapters that need to tag a synthetic
/// root entry of their own. The tree never assigns it.
pub const SYNTHETIC_ROOT_INO: u64 = u64::MAX;

/// Inode value reserved for entry slots that are allocated but not yet
/// numbered. The tree never assigns it.
pub const UNASSIGNED_INO: u64 = u64::MAX - 1;

/// Identifies a node within its owning [`PathTree`](super::PathTree).
///
/// Ids are only meaningful for the tree that handed them out.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Lifecycle of a node's content buffer, maintained by the protocol adapter.
/// The tree stores the value but never interprets it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// No handle has materialized the content buffer yet.
    #[default]
    Closed,
    /// The archive backend is decompressing into the content buffer.
    Loading,
    /// The content buffer holds the full entry contents.
    Ready,
}

/// A single filesystem entry (file or directory) inside a
/// [`PathTree`](super::PathTree).
///
/// The structural fields (name, parent, children, inode number) are managed
/// by the tree and exposed read-only. The remaining fields are plain storage
/// for the archive backend and the protocol adapter: the tree initializes
/// them and frees the content buffer on drop, nothing more.
#[derive(Debug)]
pub struct Node {
    pub(crate) name: String,
    pub(crate) ino: u64,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: LinkedHashMap<String, NodeId>,
    pub(crate) is_dir: bool,
    /// Number of currently-open handles referencing this entry.
    pub open_count: u32,
    /// Content buffer lifecycle marker.
    pub state: NodeState,
    /// Decompressed entry contents, populated lazily on first read.
    pub content: Option<Vec<u8>>,
    /// Entry size as reported by the archive listing, if known.
    pub size: Option<u64>,
    /// Entry modification time as reported by the archive listing, if known.
    pub modified_time: Option<SystemTime>,
}

impl Node {
    pub(crate) fn new(name: String, ino: u64, parent: Option<NodeId>) -> Self {
        Self {
            name,
            ino,
            parent,
            children: LinkedHashMap::new(),
            is_dir: false,
            open_count: 0,
            state: NodeState::Closed,
            content: None,
            size: None,
            modified_time: None,
        }
    }

    /// The node's segment name within its parent. Never contains `/`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable inode number assigned at construction.
    pub fn ino(&self) -> u64 {
        self.ino
    }

    /// Whether this entry was created as (or promoted to) a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Id of the containing node, or `None` for the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child id for `name`, if such an entry exists.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Children in insertion order, the order entries were listed by the
    /// archive. This is the enumeration `readdir` is answered from.
    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(name, id)| (name.as_str(), *id))
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
