//! Clip Mixer - base animation layer
//!
//! Plays the avatar's baked clips on named bones. Every running action has
//! a weight; fades move weights linearly over time. Per node the weighted
//! samples are summed and, when the total weight is below one, the rest
//! pose makes up the remainder.

use std::collections::HashMap;
use std::time::Duration;

use signa_core::Position3D;

use crate::{AnimError, AnimResult, AnimationClip, JointRegistry, NodeHandle, Skeleton};

/// Default cross-fade length in seconds
pub const DEFAULT_FADE: f32 = 0.5;

/// Clip started automatically when an avatar loads
pub const IDLE_CLIP: &str = "idle";

#[derive(Debug, Clone)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// Playback of one clip inside the mixer
#[derive(Debug, Clone)]
pub struct ClipAction {
    clip: usize,
    time: f32,
    weight: f32,
    fade: Option<Fade>,
    running: bool,
}

impl ClipAction {
    fn start(clip: usize, fade_in: f32) -> Self {
        let mut action = ClipAction {
            clip,
            time: 0.0,
            weight: 1.0,
            fade: None,
            running: true,
        };
        action.reset(fade_in);
        action
    }

    fn reset(&mut self, fade_in: f32) {
        self.time = 0.0;
        self.running = true;
        if fade_in > 0.0 {
            self.weight = 0.0;
            self.fade = Some(Fade {
                from: 0.0,
                to: 1.0,
                duration: fade_in,
                elapsed: 0.0,
            });
        } else {
            self.weight = 1.0;
            self.fade = None;
        }
    }

    fn fade_out(&mut self, duration: f32) {
        if duration <= 0.0 {
            self.weight = 0.0;
            self.running = false;
            return;
        }
        self.fade = Some(Fade {
            from: self.weight,
            to: 0.0,
            duration,
            elapsed: 0.0,
        });
    }

    fn advance(&mut self, dt: f32, clip_duration: f32) {
        self.time = if clip_duration > 0.0 {
            (self.time + dt).rem_euclid(clip_duration)
        } else {
            0.0
        };

        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            let progress = (fade.elapsed / fade.duration).min(1.0);
            self.weight = fade.from + (fade.to - fade.from) * progress;
            if progress >= 1.0 {
                if fade.to <= 0.0 {
                    self.running = false;
                }
                self.fade = None;
            }
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }
}

/// Blends baked clips into the skeleton
#[derive(Debug, Default)]
pub struct ClipMixer {
    clips: Vec<AnimationClip>,
    actions: Vec<ClipAction>,
}

impl ClipMixer {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self {
            clips,
            actions: Vec::new(),
        }
    }

    pub fn clip_names(&self) -> Vec<&str> {
        self.clips.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_clip(&self, name: &str) -> bool {
        self.clip_index(name).is_some()
    }

    fn clip_index(&self, name: &str) -> Option<usize> {
        self.clips.iter().position(|c| c.name == name)
    }

    /// Start (or restart) a clip, fading it in over `fade_in` seconds.
    pub fn play(&mut self, name: &str, fade_in: f32) -> AnimResult<()> {
        let clip = self
            .clip_index(name)
            .ok_or_else(|| AnimError::UnknownClip(name.to_string()))?;

        match self.actions.iter_mut().find(|a| a.clip == clip) {
            Some(action) => action.reset(fade_in),
            None => self.actions.push(ClipAction::start(clip, fade_in)),
        }
        Ok(())
    }

    /// Fade out everything running and fade `name` in from its start.
    pub fn crossfade_to(&mut self, name: &str) -> AnimResult<()> {
        if !self.has_clip(name) {
            return Err(AnimError::UnknownClip(name.to_string()));
        }
        for action in &mut self.actions {
            action.fade_out(DEFAULT_FADE);
        }
        self.play(name, DEFAULT_FADE)
    }

    pub fn stop_all(&mut self) {
        self.actions.clear();
    }

    pub fn action(&self, name: &str) -> Option<&ClipAction> {
        let clip = self.clip_index(name)?;
        self.actions.iter().find(|a| a.clip == clip)
    }

    /// Names of clips currently contributing to the pose
    pub fn active_clips(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter(|a| a.running)
            .map(|a| self.clips[a.clip].name.as_str())
            .collect()
    }

    /// Advance every action by `dt` and write the blended base pose.
    /// Returns the number of nodes written.
    pub fn update(
        &mut self,
        dt: Duration,
        skeleton: &mut Skeleton,
        registry: &JointRegistry,
    ) -> usize {
        let dt = dt.as_secs_f32();
        for action in &mut self.actions {
            let duration = self.clips[action.clip].effective_duration();
            action.advance(dt, duration);
        }
        self.actions.retain(|a| a.running);

        let mut accum: HashMap<NodeHandle, (Position3D, f32)> = HashMap::new();
        for action in &self.actions {
            if action.weight <= 0.0 {
                continue;
            }
            let clip = &self.clips[action.clip];
            for track in &clip.tracks {
                let Some(handle) = registry.resolve(&track.node) else {
                    continue;
                };
                let Some(sample) = track.sample(action.time) else {
                    continue;
                };
                let entry = accum.entry(handle).or_insert((Position3D::ORIGIN, 0.0));
                entry.0 = entry.0 + sample * action.weight;
                entry.1 += action.weight;
            }
        }

        let written = accum.len();
        for (handle, (sum, total)) in accum {
            let position = if total >= 1.0 {
                sum * (1.0 / total)
            } else {
                let rest = skeleton.rest_position(handle).unwrap_or_default();
                sum + rest * (1.0 - total)
            };
            skeleton.set_position(handle, position);
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PositionTrack;

    fn constant_clip(name: &str, node: &str, value: Position3D) -> AnimationClip {
        let mut clip = AnimationClip::new(
            name,
            vec![PositionTrack {
                node: node.to_string(),
                times: vec![0.0, 1.0],
                values: vec![value, value],
            }],
        );
        clip.duration = 1.0;
        clip
    }

    fn rig() -> (Skeleton, JointRegistry, NodeHandle) {
        let mut skeleton = Skeleton::new();
        let hips = skeleton.add_node("Hips", None, Position3D::zero());
        let registry = JointRegistry::build(&skeleton);
        (skeleton, registry, hips)
    }

    #[test]
    fn test_play_unknown_clip() {
        let mut mixer = ClipMixer::new(vec![]);
        assert!(matches!(
            mixer.play("dance", 0.0),
            Err(AnimError::UnknownClip(_))
        ));
    }

    #[test]
    fn test_full_weight_clip_writes_sample() {
        let (mut skeleton, registry, hips) = rig();
        let mut mixer = ClipMixer::new(vec![constant_clip(
            "idle",
            "Hips",
            Position3D::new(0.0, 2.0, 0.0),
        )]);
        mixer.play("idle", 0.0).unwrap();

        let written = mixer.update(Duration::from_millis(16), &mut skeleton, &registry);
        assert_eq!(written, 1);
        assert_eq!(skeleton.position(hips), Some(Position3D::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_fade_in_blends_with_rest() {
        let (mut skeleton, registry, hips) = rig();
        let mut mixer = ClipMixer::new(vec![constant_clip(
            "idle",
            "Hips",
            Position3D::new(0.0, 2.0, 0.0),
        )]);
        mixer.play("idle", 1.0).unwrap();

        mixer.update(Duration::from_millis(500), &mut skeleton, &registry);
        let y = skeleton.position(hips).unwrap().y;
        assert!((y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_crossfade_retires_previous_clip() {
        let (mut skeleton, registry, hips) = rig();
        let mut mixer = ClipMixer::new(vec![
            constant_clip("idle", "Hips", Position3D::new(0.0, 0.0, 0.0)),
            constant_clip("wave", "Hips", Position3D::new(4.0, 0.0, 0.0)),
        ]);
        mixer.play("idle", 0.0).unwrap();
        mixer.crossfade_to("wave").unwrap();

        mixer.update(Duration::from_millis(250), &mut skeleton, &registry);
        let x = skeleton.position(hips).unwrap().x;
        assert!((x - 2.0).abs() < 1e-5);
        assert_eq!(mixer.active_clips().len(), 2);

        mixer.update(Duration::from_millis(250), &mut skeleton, &registry);
        assert_eq!(mixer.active_clips(), vec!["wave"]);
        assert_eq!(skeleton.position(hips), Some(Position3D::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn test_action_time_loops() {
        let (mut skeleton, registry, _) = rig();
        let mut mixer = ClipMixer::new(vec![constant_clip("idle", "Hips", Position3D::zero())]);
        mixer.play("idle", 0.0).unwrap();

        mixer.update(Duration::from_millis(2500), &mut skeleton, &registry);
        let t = mixer.action("idle").unwrap().time();
        assert!((t - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_stop_all_writes_nothing() {
        let (mut skeleton, registry, hips) = rig();
        let mut mixer = ClipMixer::new(vec![constant_clip(
            "idle",
            "Hips",
            Position3D::new(1.0, 1.0, 1.0),
        )]);
        mixer.play("idle", 0.0).unwrap();
        mixer.stop_all();
        skeleton.set_position(hips, Position3D::new(7.0, 0.0, 0.0));

        assert_eq!(mixer.update(Duration::from_millis(16), &mut skeleton, &registry), 0);
        assert_eq!(skeleton.position(hips), Some(Position3D::new(7.0, 0.0, 0.0)));
    }
}
