//! Player Session - one loaded avatar and everything that animates it
//!
//! Each tick runs two passes in a fixed order:
//!
//! 1. the clip mixer writes the base layer
//! 2. the keyframe player writes its joints on top
//!
//! Per joint the last write wins, so keyframe joints always override clips.

use std::sync::Arc;
use std::time::{Duration, Instant};

use signa_core::{KeyframeSequence, Position3D};

use crate::{
    AnimResult, AvatarAsset, ClipMixer, FrameClock, JointRegistry, KeyframePlayer, PlaybackPhase,
    Skeleton, SkeletonBinding, TickReport, DEFAULT_FADE, IDLE_CLIP,
};

/// Result of one render tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    /// Delta handed to the mixer
    pub delta: Duration,
    /// Nodes written by the base layer
    pub base_nodes: usize,
    pub keyframes: TickReport,
}

/// Owns the skeleton, its registry and both animation layers
#[derive(Debug)]
pub struct PlayerSession {
    name: String,
    skeleton: Skeleton,
    /// Built once at construction, never rebuilt
    registry: JointRegistry,
    mixer: ClipMixer,
    player: KeyframePlayer,
    clock: FrameClock,
}

impl PlayerSession {
    pub fn new(asset: AvatarAsset) -> AnimResult<Self> {
        let skeleton = asset.build_skeleton()?;
        let registry = JointRegistry::build(&skeleton);
        tracing::info!(
            avatar = %asset.name,
            bones = registry.len(),
            facial = registry.facial_joints().len(),
            "Avatar loaded"
        );
        tracing::debug!(bones = ?registry.names(), "Available bones");

        let mut mixer = ClipMixer::new(asset.clips);
        if mixer.has_clip(IDLE_CLIP) {
            mixer.play(IDLE_CLIP, DEFAULT_FADE)?;
        }

        Ok(Self {
            name: asset.name,
            skeleton,
            registry,
            mixer,
            player: KeyframePlayer::new(),
            clock: FrameClock::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn registry(&self) -> &JointRegistry {
        &self.registry
    }

    pub fn player(&self) -> &KeyframePlayer {
        &self.player
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.player.phase()
    }

    pub fn clip_names(&self) -> Vec<&str> {
        self.mixer.clip_names()
    }

    pub fn active_clips(&self) -> Vec<&str> {
        self.mixer.active_clips()
    }

    /// Cross-fade the base layer to another baked clip
    pub fn play_clip(&mut self, name: &str) -> AnimResult<()> {
        self.mixer.crossfade_to(name)
    }

    pub fn load_sequence(&mut self, sequence: impl Into<Arc<KeyframeSequence>>) {
        self.load_sequence_at(sequence, Instant::now());
    }

    pub fn load_sequence_at(&mut self, sequence: impl Into<Arc<KeyframeSequence>>, now: Instant) {
        self.player.load_sequence(sequence, now);
    }

    /// Stop keyframe playback and fade the base layer back to idle. Without
    /// an idle clip the base layer stops and the avatar keeps its pose.
    pub fn clear_sequence(&mut self) {
        self.player.clear();
        if !self.mixer.has_clip(IDLE_CLIP) {
            self.mixer.stop_all();
            return;
        }
        if self.mixer.active_clips() != [IDLE_CLIP] {
            if let Err(err) = self.mixer.crossfade_to(IDLE_CLIP) {
                tracing::warn!(error = %err, "Failed to return to idle clip");
            }
        }
    }

    /// Current position of a joint, by name
    pub fn joint_position(&self, joint: &str) -> Option<Position3D> {
        self.registry
            .resolve(joint)
            .and_then(|handle| self.skeleton.position(handle))
    }

    /// Render tick driven by the wall clock
    pub fn tick_at(&mut self, now: Instant) -> FrameReport {
        let delta = self.clock.tick_at(now);
        let base_nodes = self
            .mixer
            .update(delta, &mut self.skeleton, &self.registry);

        let mut binding = SkeletonBinding::new(&mut self.skeleton, &self.registry);
        let keyframes = self.player.tick_at(now, &mut binding);

        FrameReport {
            delta,
            base_nodes,
            keyframes,
        }
    }

    pub fn tick(&mut self) -> FrameReport {
        self.tick_at(Instant::now())
    }

    /// Same two passes with explicit times: `dt` for the mixer and
    /// `elapsed` seconds into the keyframe sequence.
    pub fn advance(&mut self, dt: Duration, elapsed: f64) -> FrameReport {
        let base_nodes = self
            .mixer
            .update(dt, &mut self.skeleton, &self.registry);

        let mut binding = SkeletonBinding::new(&mut self.skeleton, &self.registry);
        let keyframes = self.player.tick(elapsed, &mut binding);

        FrameReport {
            delta: dt,
            base_nodes,
            keyframes,
        }
    }
}
