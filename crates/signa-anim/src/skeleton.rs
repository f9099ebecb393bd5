//! Skeleton - the avatar's node hierarchy
//!
//! Nodes live in a flat arena and refer to each other by handle. Each node
//! keeps its rest position so the mixer can blend toward it.

use std::collections::HashMap;

use signa_core::Position3D;

use crate::{AnimError, AnimResult, RigNode};

/// Handle on a node inside one `Skeleton`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub usize);

/// A single node of the hierarchy
#[derive(Debug, Clone)]
pub struct SkeletonNode {
    /// Node name (may be empty for anonymous groups)
    pub name: String,
    pub parent: Option<NodeHandle>,
    pub children: Vec<NodeHandle>,
    /// Current local position
    pub position: Position3D,
    /// Position from the asset, before any animation
    pub rest_position: Position3D,
}

/// Node hierarchy of a loaded avatar
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    nodes: Vec<SkeletonNode>,
    roots: Vec<NodeHandle>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node. A parent handle that does not exist makes it a root.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeHandle>,
        rest_position: Position3D,
    ) -> NodeHandle {
        let handle = NodeHandle(self.nodes.len());
        let parent = parent.filter(|p| p.0 < self.nodes.len());

        self.nodes.push(SkeletonNode {
            name: name.into(),
            parent,
            children: Vec::new(),
            position: rest_position,
            rest_position,
        });

        match parent {
            Some(p) => self.nodes[p.0].children.push(handle),
            None => self.roots.push(handle),
        }
        handle
    }

    /// Build a hierarchy from asset nodes. Parents may be declared after
    /// their children; names are resolved to the first node carrying them.
    pub fn from_rig(rig: &[RigNode]) -> AnimResult<Skeleton> {
        let mut by_name: HashMap<&str, NodeHandle> = HashMap::new();
        for (i, node) in rig.iter().enumerate() {
            by_name.entry(node.name.as_str()).or_insert(NodeHandle(i));
        }

        let mut skeleton = Skeleton {
            nodes: rig
                .iter()
                .map(|node| SkeletonNode {
                    name: node.name.clone(),
                    parent: None,
                    children: Vec::new(),
                    position: node.position,
                    rest_position: node.position,
                })
                .collect(),
            roots: Vec::new(),
        };

        for (i, node) in rig.iter().enumerate() {
            let handle = NodeHandle(i);
            match node.parent.as_deref() {
                Some(parent_name) => {
                    let parent = by_name.get(parent_name).copied().ok_or_else(|| {
                        AnimError::UnknownParent {
                            node: node.name.clone(),
                            parent: parent_name.to_string(),
                        }
                    })?;
                    skeleton.nodes[i].parent = Some(parent);
                    skeleton.nodes[parent.0].children.push(handle);
                }
                None => skeleton.roots.push(handle),
            }
        }

        Ok(skeleton)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeHandle] {
        &self.roots
    }

    pub fn node(&self, handle: NodeHandle) -> Option<&SkeletonNode> {
        self.nodes.get(handle.0)
    }

    pub fn position(&self, handle: NodeHandle) -> Option<Position3D> {
        self.nodes.get(handle.0).map(|n| n.position)
    }

    pub fn rest_position(&self, handle: NodeHandle) -> Option<Position3D> {
        self.nodes.get(handle.0).map(|n| n.rest_position)
    }

    /// Write a node's local position. Returns false for a stale handle.
    pub fn set_position(&mut self, handle: NodeHandle, position: Position3D) -> bool {
        match self.nodes.get_mut(handle.0) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Depth-first, pre-order walk from every root. Nodes unreachable from
    /// a root (parent cycles) are not visited.
    pub fn traverse(&self) -> Vec<NodeHandle> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeHandle> = self.roots.iter().rev().copied().collect();

        while let Some(handle) = stack.pop() {
            order.push(handle);
            if let Some(node) = self.nodes.get(handle.0) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        order
    }
}
