use snafu::prelude::*;
use tracing::{debug, trace};

use super::node::{MAX_NAME_LEN, Node, NodeId, UNASSIGNED_INO};

/// Index of archive entries, addressed by slash-delimited relative paths.
///
/// The tree owns every [`Node`] and the inode counter that numbers them, so
/// two trees mounted in the same process never hand out colliding inode
/// numbers. Nodes are referred to by [`NodeId`]; passing an id from another
/// tree is a caller bug and panics on access.
///
/// Nothing here locks or blocks: callers that resolve paths concurrently
/// with insertion must serialize externally.
#[derive(Debug)]
pub struct PathTree {
    nodes: Vec<Node>,
    next_ino: u64,
}

impl PathTree {
    /// Creates a tree holding only the root directory, which takes inode 0.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            next_ino: 0,
        };
        let root_ino = tree.allocate_ino();
        let mut root = Node::new(String::new(), root_ino, None);
        root.is_dir = true;
        tree.nodes.push(root);
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Total number of nodes constructed so far, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// Inserts an archive entry path below the root, creating any missing
    /// intermediate directories, and returns the leaf node.
    ///
    /// Called once per entry while enumerating the archive listing. Inserting
    /// a path that already exists is harmless and returns the existing node.
    pub fn insert(&mut self, path: &str) -> Result<NodeId, InsertError> {
        self.insert_below(self.root(), path)
    }

    /// Inserts a path relative to `below` instead of the root.
    pub fn insert_below(&mut self, below: NodeId, path: &str) -> Result<NodeId, InsertError> {
        ensure!(!path.is_empty(), EmptyPathSnafu);
        for segment in path.split('/') {
            ensure!(!segment.is_empty(), EmptySegmentSnafu { path });
            ensure!(segment.len() <= MAX_NAME_LEN, SegmentTooLongSnafu { segment });
        }

        debug!("Inserting '{}' under node {}", path, below);
        Ok(self.insert_at(below, path))
    }

    /// Resolves a path below the root to a node.
    ///
    /// A missing entry is an expected outcome, reported as
    /// [`FindError::NotFound`] for the caller to translate into its
    /// protocol's "no such entry" reply.
    pub fn find(&self, path: &str) -> Result<NodeId, FindError> {
        self.find_below(self.root(), path)
    }

    /// Resolves a path relative to `below`. The empty path resolves to
    /// `below` itself.
    pub fn find_below(&self, below: NodeId, path: &str) -> Result<NodeId, FindError> {
        for segment in path.split('/') {
            ensure!(segment.len() <= MAX_NAME_LEN, OversizedSegmentSnafu { segment });
        }

        trace!("Finding '{}' from node {}", path, below);
        self.find_at(below, path).context(NotFoundSnafu { path })
    }

    /// Canonical slash-delimited path of `id`, measured from just below the
    /// root. The root itself contributes no name and no separator, so its
    /// own fullname is empty and a direct child's fullname is the bare name.
    pub fn fullname(&self, id: NodeId) -> String {
        let node = &self.nodes[id.0];
        match node.parent {
            None => node.name.clone(),
            Some(parent) if self.nodes[parent.0].parent.is_none() => node.name.clone(),
            Some(parent) => format!("{}/{}", self.fullname(parent), node.name),
        }
    }

    /// One segment per call: split off the leading segment, descend into or
    /// create its node, recurse with the remainder.
    fn insert_at(&mut self, node: NodeId, path: &str) -> NodeId {
        match path.split_once('/') {
            Some((segment, rest)) => {
                let child = self.ensure_child(node, segment, true);
                self.insert_at(child, rest)
            }
            None => self.ensure_child(node, path, false),
        }
    }

    fn ensure_child(&mut self, parent: NodeId, segment: &str, is_dir: bool) -> NodeId {
        if let Some(existing) = self.nodes[parent.0].child(segment) {
            if is_dir && !self.nodes[existing.0].is_dir {
                // A later entry used this leaf as an intermediate segment.
                // Archives are taken as well-formed, so promote silently.
                trace!("Promoting leaf '{}' to a directory", segment);
                self.nodes[existing.0].is_dir = true;
            }
            return existing;
        }

        let id = NodeId(self.nodes.len());
        let ino = self.allocate_ino();
        trace!(
            "Creating {} '{}' (inode {}) under node {}",
            if is_dir { "subdirectory" } else { "leaf" },
            segment,
            ino,
            parent
        );

        let mut child = Node::new(segment.to_string(), ino, Some(parent));
        child.is_dir = is_dir;
        self.nodes.push(child);
        self.nodes[parent.0].children.insert(segment.to_string(), id);
        id
    }

    fn find_at(&self, node: NodeId, path: &str) -> Option<NodeId> {
        if path.is_empty() {
            return Some(node);
        }
        match path.split_once('/') {
            Some((segment, rest)) => {
                let child = self.nodes[node.0].child(segment)?;
                self.find_at(child, rest)
            }
            None => self.nodes[node.0].child(path),
        }
    }

    fn allocate_ino(&mut self) -> u64 {
        let ino = self.next_ino;
        // The reserved sentinel values sit at the top of the u64 range; no
        // tree can allocate enough nodes to reach them.
        debug_assert!(ino < UNASSIGNED_INO);
        self.next_ino += 1;
        ino
    }
}

impl Default for PathTree {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Snafu)]
pub enum InsertError {
    #[snafu(display("Cannot insert an empty path"))]
    EmptyPath,
    #[snafu(display("Path '{}' contains an empty segment", path))]
    EmptySegment { path: String },
    #[snafu(display("Segment '{}' exceeds the {} byte name limit", segment, MAX_NAME_LEN))]
    SegmentTooLong { segment: String },
}

#[derive(Debug, Snafu)]
pub enum FindError {
    #[snafu(display("No entry at '{}'", path))]
    NotFound { path: String },
    #[snafu(display("Segment '{}' exceeds the {} byte name limit", segment, MAX_NAME_LEN))]
    OversizedSegment { segment: String },
}
