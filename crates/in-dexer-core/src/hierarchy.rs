use crate::platform::{normalize_path, SEPARATOR};
use ahash::AHashMap;

pub type NodeId = usize;

/// One path-segment node of the folder browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryNode {
    pub id: NodeId,
    /// Final path segment, shown to the user.
    pub label: String,
    /// Full normalized path; the lookup key for this node.
    pub path: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Prefix tree over every distinct directory known to the store.
///
/// The path index lives with the tree it was built for, so a stale tree can
/// never answer lookups for a newer one.
#[derive(Debug, Clone, Default)]
pub struct DirectoryTree {
    nodes: Vec<DirectoryNode>,
    top_level: Vec<NodeId>,
    index: AHashMap<String, NodeId>,
}

impl DirectoryTree {
    /// Build from normalized directory strings using the host separator.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_paths_with_separator(paths, SEPARATOR)
    }

    /// Paths are sorted and deduplicated first, then each unique prefix is
    /// created once. A leading segment ending in `:` is a drive root.
    pub fn from_paths_with_separator<I, S>(paths: I, separator: char) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted: Vec<String> = paths.into_iter().map(|p| p.as_ref().to_string()).collect();
        sorted.sort();
        sorted.dedup();

        let mut tree = DirectoryTree::default();
        for path in &sorted {
            tree.insert_path(path, separator);
        }
        tree
    }

    fn insert_path(&mut self, path: &str, separator: char) {
        let mut parent: Option<NodeId> = None;

        // `/x` keeps one leading separator, a UNC `\\server\share` keeps two.
        let leading = path.chars().take_while(|&c| c == separator).count().min(2);
        let mut path_so_far: String = std::iter::repeat(separator).take(leading).collect();

        for part in path.split(separator) {
            if part.is_empty() {
                continue;
            }

            if path_so_far.is_empty() && part.ends_with(':') {
                path_so_far.push_str(part);
                path_so_far.push(separator);
            } else {
                if !path_so_far.is_empty() && !path_so_far.ends_with(separator) {
                    path_so_far.push(separator);
                }
                path_so_far.push_str(part);
            }

            let existing = self.index.get(&path_so_far).copied();
            parent = Some(match existing {
                Some(id) => id,
                None => self.push_node(part, &path_so_far, parent),
            });
        }
    }

    fn push_node(&mut self, label: &str, path: &str, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(DirectoryNode {
            id,
            label: label.to_string(),
            path: path.to_string(),
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent_id) => self.nodes[parent_id].children.push(id),
            None => self.top_level.push(id),
        }
        self.index.insert(path.to_string(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&DirectoryNode> {
        self.nodes.get(id)
    }

    pub fn top_level(&self) -> impl Iterator<Item = &DirectoryNode> {
        self.top_level.iter().map(|&id| &self.nodes[id])
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &DirectoryNode> {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&child| &self.nodes[child])
    }

    /// Exact lookup by an already-normalized key.
    pub fn get(&self, path: &str) -> Option<&DirectoryNode> {
        self.index.get(path).map(|&id| &self.nodes[id])
    }

    /// Normalize `path` and return its node, if the tree has one.
    pub fn lookup_directory_node(&self, path: &str) -> Option<&DirectoryNode> {
        self.get(&normalize_path(path))
    }

    /// Chain from the top-level node down to `id`, inclusive.
    pub fn ancestors(&self, id: NodeId) -> Vec<&DirectoryNode> {
        let mut chain = Vec::new();
        let mut current = self.nodes.get(id);
        while let Some(node) = current {
            chain.push(node);
            current = node.parent.and_then(|p| self.nodes.get(p));
        }
        chain.reverse();
        chain
    }

    /// Depth-first, pre-order listing with each node's depth.
    pub fn depth_first(&self) -> Vec<(usize, &DirectoryNode)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> =
            self.top_level.iter().rev().map(|&id| (0, id)).collect();
        while let Some((depth, id)) = stack.pop() {
            let node = &self.nodes[id];
            out.push((depth, node));
            stack.extend(node.children.iter().rev().map(|&child| (depth + 1, child)));
        }
        out
    }
}
