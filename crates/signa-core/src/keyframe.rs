//! Keyframes - timestamped joint snapshots
//!
//! A sequence is created wholesale when a translation arrives and is never
//! mutated afterwards. The next translation replaces it atomically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{PayloadError, Position3D};

/// Keyframe - target positions for a set of named joints at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    /// Seconds since sequence start
    pub time: f64,

    /// Joint name -> target position
    #[serde(default)]
    pub joints: BTreeMap<String, Position3D>,
}

impl Keyframe {
    pub fn new(time: f64) -> Self {
        Self {
            time,
            joints: BTreeMap::new(),
        }
    }

    /// Builder-style joint insertion
    pub fn with_joint(mut self, name: impl Into<String>, position: Position3D) -> Self {
        self.joints.insert(name.into(), position);
        self
    }

    pub fn joint(&self, name: &str) -> Option<&Position3D> {
        self.joints.get(name)
    }
}

/// Ordered keyframes with non-decreasing, finite timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeSequence {
    frames: Vec<Keyframe>,
}

impl KeyframeSequence {
    /// Validate and wrap a list of frames.
    pub fn new(frames: Vec<Keyframe>) -> Result<Self, PayloadError> {
        let mut previous: Option<f64> = None;
        for (index, frame) in frames.iter().enumerate() {
            if !frame.time.is_finite() {
                return Err(PayloadError::InvalidTime { index });
            }
            if let Some(prev) = previous {
                if frame.time < prev {
                    return Err(PayloadError::OutOfOrder {
                        index,
                        previous: prev,
                        time: frame.time,
                    });
                }
            }
            previous = Some(frame.time);
        }
        Ok(Self { frames })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keyframe> {
        self.frames.get(index)
    }

    pub fn first(&self) -> Option<&Keyframe> {
        self.frames.first()
    }

    pub fn last(&self) -> Option<&Keyframe> {
        self.frames.last()
    }

    pub fn frames(&self) -> &[Keyframe] {
        &self.frames
    }

    pub fn iter(&self) -> impl Iterator<Item = &Keyframe> {
        self.frames.iter()
    }

    /// Timestamp of the final keyframe (0 for an empty sequence)
    pub fn duration(&self) -> f64 {
        self.frames.last().map(|f| f.time).unwrap_or(0.0)
    }

    /// Number of distinct joints referenced anywhere in the sequence
    pub fn joint_count(&self) -> usize {
        let mut names: Vec<&str> = self
            .frames
            .iter()
            .flat_map(|f| f.joints.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }
}
