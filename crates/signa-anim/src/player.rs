//! Keyframe Player - real-time playback of sparse joint keyframes
//!
//! The player is driven once per render frame with the time elapsed since
//! the current sequence was loaded. It never blocks: each tick is a bounded
//! amount of arithmetic plus one write per joint in the applied frame.
//!
//! INVARIANT: within one loaded sequence the current index never decreases.
//! INVARIANT: once elapsed reaches the final timestamp the final pose is
//! applied exactly, and stays applied for every later tick.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use signa_core::{Keyframe, KeyframeSequence, Position3D};

use crate::{JointRegistry, Skeleton};

/// Anything joint positions can be written into
pub trait PoseTarget {
    /// Write one joint. Returns false if the joint cannot be resolved.
    fn set_joint_position(&mut self, joint: &str, position: Position3D) -> bool;
}

/// Headless capture: every joint resolves
impl PoseTarget for HashMap<String, Position3D> {
    fn set_joint_position(&mut self, joint: &str, position: Position3D) -> bool {
        self.insert(joint.to_string(), position);
        true
    }
}

/// Writes joints into skeleton nodes through the registry
pub struct SkeletonBinding<'a> {
    skeleton: &'a mut Skeleton,
    registry: &'a JointRegistry,
}

impl<'a> SkeletonBinding<'a> {
    pub fn new(skeleton: &'a mut Skeleton, registry: &'a JointRegistry) -> Self {
        Self { skeleton, registry }
    }
}

impl PoseTarget for SkeletonBinding<'_> {
    fn set_joint_position(&mut self, joint: &str, position: Position3D) -> bool {
        match self.registry.resolve(joint) {
            Some(handle) => self.skeleton.set_position(handle, position),
            None => false,
        }
    }
}

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// Nothing to play; the last applied pose stays on the avatar
    Idle,
    /// Interpolating between keyframes
    Playing,
    /// Past the final keyframe; its pose is frozen
    Held,
}

/// State owned by the player for the current sequence
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    pub sequence: Option<Arc<KeyframeSequence>>,
    /// Wall-clock instant the sequence was loaded
    pub started_at: Option<Instant>,
    /// Latest keyframe whose timestamp has been passed
    pub current_index: usize,
}

/// Outcome of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub phase: PlaybackPhase,
    pub index: usize,
    /// Joints written this tick
    pub applied: usize,
    /// Joints that could not be resolved this tick
    pub skipped: usize,
}

impl TickReport {
    fn idle() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            index: 0,
            applied: 0,
            skipped: 0,
        }
    }
}

/// Keyframe player
#[derive(Debug)]
pub struct KeyframePlayer {
    state: PlaybackState,
    phase: PlaybackPhase,
    /// Unresolved joints already reported for the current sequence
    warned: HashSet<String>,
}

impl KeyframePlayer {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::default(),
            phase: PlaybackPhase::Idle,
            warned: HashSet::new(),
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn sequence(&self) -> Option<&KeyframeSequence> {
        self.state.sequence.as_deref()
    }

    /// Replace whatever is playing. A non-empty sequence always restarts
    /// playback at index 0 with `now` as the clock origin; an empty one
    /// leaves the player idle and the avatar in its current pose.
    pub fn load_sequence(&mut self, sequence: impl Into<Arc<KeyframeSequence>>, now: Instant) {
        let sequence = sequence.into();
        self.warned.clear();

        if sequence.is_empty() {
            tracing::debug!("Empty keyframe sequence; holding current pose");
            self.state = PlaybackState::default();
            self.phase = PlaybackPhase::Idle;
            return;
        }

        tracing::debug!(
            frames = sequence.len(),
            duration = sequence.duration(),
            "Keyframe sequence loaded"
        );
        self.state = PlaybackState {
            sequence: Some(sequence),
            started_at: Some(now),
            current_index: 0,
        };
        self.phase = PlaybackPhase::Playing;
    }

    /// Drop the current sequence without touching the avatar.
    pub fn clear(&mut self) {
        self.state = PlaybackState::default();
        self.phase = PlaybackPhase::Idle;
        self.warned.clear();
    }

    /// Seconds since the current sequence was loaded
    pub fn elapsed_at(&self, now: Instant) -> Option<f64> {
        self.state
            .started_at
            .map(|start| now.saturating_duration_since(start).as_secs_f64())
    }

    /// Tick using the wall clock.
    pub fn tick_at<T: PoseTarget + ?Sized>(&mut self, now: Instant, target: &mut T) -> TickReport {
        match self.elapsed_at(now) {
            Some(elapsed) => self.tick(elapsed, target),
            None => TickReport::idle(),
        }
    }

    /// Apply the pose for `elapsed` seconds into the current sequence.
    pub fn tick<T: PoseTarget + ?Sized>(&mut self, elapsed: f64, target: &mut T) -> TickReport {
        let Some(sequence) = self.state.sequence.clone() else {
            return TickReport::idle();
        };
        let frames = sequence.frames();
        let Some(last) = frames.last() else {
            return TickReport::idle();
        };

        let elapsed = if elapsed.is_finite() {
            elapsed.max(0.0)
        } else {
            0.0
        };
        let last_index = frames.len() - 1;

        if self.state.current_index >= last_index || elapsed >= last.time {
            self.state.current_index = last_index;
            self.phase = PlaybackPhase::Held;
            let (applied, skipped) = self.apply_frame(last, target);
            return self.report(applied, skipped);
        }

        // elapsed < last.time, so this stops before the final frame
        while self.state.current_index + 1 < last_index
            && frames[self.state.current_index + 1].time <= elapsed
        {
            self.state.current_index += 1;
        }

        let current = &frames[self.state.current_index];
        let next = &frames[self.state.current_index + 1];
        let span = next.time - current.time;
        let ratio = if span > 0.0 {
            ((elapsed - current.time) / span).clamp(0.0, 1.0)
        } else {
            1.0
        };

        self.phase = PlaybackPhase::Playing;
        let (applied, skipped) = self.apply_interpolated(current, next, ratio as f32, target);
        self.report(applied, skipped)
    }

    fn report(&self, applied: usize, skipped: usize) -> TickReport {
        TickReport {
            phase: self.phase,
            index: self.state.current_index,
            applied,
            skipped,
        }
    }

    fn apply_frame<T: PoseTarget + ?Sized>(
        &mut self,
        frame: &Keyframe,
        target: &mut T,
    ) -> (usize, usize) {
        let mut applied = 0;
        let mut skipped = 0;
        for (joint, position) in &frame.joints {
            if target.set_joint_position(joint, *position) {
                applied += 1;
            } else {
                self.warn_missing(joint);
                skipped += 1;
            }
        }
        (applied, skipped)
    }

    /// Joints of `next` absent from `current` start from the origin.
    fn apply_interpolated<T: PoseTarget + ?Sized>(
        &mut self,
        current: &Keyframe,
        next: &Keyframe,
        ratio: f32,
        target: &mut T,
    ) -> (usize, usize) {
        let mut applied = 0;
        let mut skipped = 0;
        for (joint, to) in &next.joints {
            let from = current.joints.get(joint).copied().unwrap_or(Position3D::ORIGIN);
            if target.set_joint_position(joint, from.lerp(to, ratio)) {
                applied += 1;
            } else {
                self.warn_missing(joint);
                skipped += 1;
            }
        }
        (applied, skipped)
    }

    fn warn_missing(&mut self, joint: &str) {
        if self.warned.insert(joint.to_string()) {
            tracing::warn!(joint = %joint, "Bone not found; skipping joint");
        }
    }
}

impl Default for KeyframePlayer {
    fn default() -> Self {
        Self::new()
    }
}
