//! Avatar asset description
//!
//! The rig is described as a flat node list plus optional baked clips:
//!
//! ```json
//! {
//!   "name": "stacy",
//!   "nodes": [
//!     {"name": "Hips", "position": [0, 1, 0]},
//!     {"name": "Spine", "parent": "Hips", "position": [0, 0.1, 0]}
//!   ],
//!   "clips": [{"name": "idle", "tracks": []}]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use signa_core::Position3D;

use crate::{AnimResult, AnimationClip, Skeleton};

/// One node of the rig
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigNode {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub position: Position3D,
}

/// Everything loaded for one avatar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvatarAsset {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<RigNode>,
    #[serde(default)]
    pub clips: Vec<AnimationClip>,
}

impl AvatarAsset {
    pub fn from_json_str(text: &str) -> AnimResult<Self> {
        let asset: AvatarAsset = serde_json::from_str(text)?;
        for clip in &asset.clips {
            clip.validate()?;
        }
        Ok(asset)
    }

    pub fn load(path: impl AsRef<Path>) -> AnimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn build_skeleton(&self) -> AnimResult<Skeleton> {
        Skeleton::from_rig(&self.nodes)
    }

    /// Minimal humanoid upper body, used when no asset file is configured
    pub fn default_humanoid() -> Self {
        let node = |name: &str, parent: Option<&str>, p: [f32; 3]| RigNode {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            position: Position3D::from(p),
        };

        AvatarAsset {
            name: "humanoid".to_string(),
            nodes: vec![
                node("Hips", None, [0.0, 1.0, 0.0]),
                node("Spine", Some("Hips"), [0.0, 0.1, 0.0]),
                node("Neck", Some("Spine"), [0.0, 0.4, 0.0]),
                node("Head", Some("Neck"), [0.0, 0.1, 0.0]),
                node("face_jaw", Some("Head"), [0.0, -0.05, 0.05]),
                node("LeftShoulder", Some("Spine"), [0.15, 0.35, 0.0]),
                node("LeftArm", Some("LeftShoulder"), [0.1, 0.0, 0.0]),
                node("LeftForeArm", Some("LeftArm"), [0.25, 0.0, 0.0]),
                node("LeftHand", Some("LeftForeArm"), [0.25, 0.0, 0.0]),
                node("RightShoulder", Some("Spine"), [-0.15, 0.35, 0.0]),
                node("RightArm", Some("RightShoulder"), [-0.1, 0.0, 0.0]),
                node("RightForeArm", Some("RightArm"), [-0.25, 0.0, 0.0]),
                node("RightHand", Some("RightForeArm"), [-0.25, 0.0, 0.0]),
            ],
            clips: Vec::new(),
        }
    }
}
