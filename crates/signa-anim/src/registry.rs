//! Joint Registry - name -> skeleton node index
//!
//! Built once per loaded avatar by walking the node hierarchy. Keyframes
//! address joints by name; the registry turns those names into handles.
//! A lookup that misses is never an error, the caller skips that joint.

use std::collections::HashMap;

use signa_core::is_facial_joint;

use crate::{NodeHandle, Skeleton};

/// Immutable joint name index for one avatar
#[derive(Debug, Clone, Default)]
pub struct JointRegistry {
    joints: HashMap<String, NodeHandle>,
    facial: Vec<String>,
}

impl JointRegistry {
    /// Index every named node. When two nodes share a name, the one visited
    /// later in pre-order wins.
    pub fn build(skeleton: &Skeleton) -> Self {
        let mut joints = HashMap::with_capacity(skeleton.len());
        let mut facial = Vec::new();

        for handle in skeleton.traverse() {
            let Some(node) = skeleton.node(handle) else {
                continue;
            };
            if node.name.is_empty() {
                continue;
            }
            if is_facial_joint(&node.name) && !joints.contains_key(&node.name) {
                facial.push(node.name.clone());
            }
            joints.insert(node.name.clone(), handle);
        }

        tracing::debug!(
            joints = joints.len(),
            facial = facial.len(),
            "Joint registry built"
        );

        JointRegistry { joints, facial }
    }

    pub fn resolve(&self, joint: &str) -> Option<NodeHandle> {
        self.joints.get(joint).copied()
    }

    pub fn contains(&self, joint: &str) -> bool {
        self.joints.contains_key(joint)
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// All indexed joint names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.joints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Joints following the facial naming convention, in traversal order
    pub fn facial_joints(&self) -> &[String] {
        &self.facial
    }
}
