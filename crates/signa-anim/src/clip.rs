//! Baked animation clips shipped with the avatar asset

use serde::{Deserialize, Serialize};
use signa_core::Position3D;

use crate::{AnimError, AnimResult};

/// Position keys for one node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionTrack {
    /// Target node name
    pub node: String,
    /// Key times in seconds, ascending
    pub times: Vec<f32>,
    pub values: Vec<Position3D>,
}

impl PositionTrack {
    /// Linearly sample the track, holding the end keys outside their range.
    pub fn sample(&self, t: f32) -> Option<Position3D> {
        let n = self.times.len().min(self.values.len());
        if n == 0 {
            return None;
        }
        let times = &self.times[..n];

        if t <= times[0] {
            return Some(self.values[0]);
        }
        if t >= times[n - 1] {
            return Some(self.values[n - 1]);
        }

        // First key strictly after t; always in 1..n here
        let next = times.partition_point(|&k| k <= t);
        let (t0, t1) = (times[next - 1], times[next]);
        let span = t1 - t0;
        let ratio = if span > 0.0 { (t - t0) / span } else { 1.0 };

        Some(self.values[next - 1].lerp(&self.values[next], ratio))
    }

    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }
}

/// Named set of tracks played as a unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationClip {
    pub name: String,
    /// Loop length in seconds; 0 means "until the last key"
    #[serde(default)]
    pub duration: f32,
    #[serde(default)]
    pub tracks: Vec<PositionTrack>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, tracks: Vec<PositionTrack>) -> Self {
        Self {
            name: name.into(),
            duration: 0.0,
            tracks,
        }
    }

    /// Loop length actually used for playback
    pub fn effective_duration(&self) -> f32 {
        if self.duration > 0.0 {
            self.duration
        } else {
            self.tracks
                .iter()
                .map(PositionTrack::end_time)
                .fold(0.0, f32::max)
        }
    }

    /// Every track needs one value per key and finite, ascending key times.
    pub fn validate(&self) -> AnimResult<()> {
        for track in &self.tracks {
            if track.times.len() != track.values.len() {
                return Err(AnimError::TrackMismatch {
                    clip: self.name.clone(),
                    node: track.node.clone(),
                    times: track.times.len(),
                    values: track.values.len(),
                });
            }
            let mut previous = f32::NEG_INFINITY;
            for (index, &time) in track.times.iter().enumerate() {
                if !time.is_finite() || time < previous {
                    return Err(AnimError::TrackTimes {
                        clip: self.name.clone(),
                        node: track.node.clone(),
                        index,
                    });
                }
                previous = time;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track() -> PositionTrack {
        PositionTrack {
            node: "Hips".to_string(),
            times: vec![0.0, 1.0, 3.0],
            values: vec![
                Position3D::new(0.0, 0.0, 0.0),
                Position3D::new(2.0, 0.0, 0.0),
                Position3D::new(2.0, 4.0, 0.0),
            ],
        }
    }

    #[test]
    fn test_sample_interpolates() {
        let t = track();
        assert_eq!(t.sample(0.5), Some(Position3D::new(1.0, 0.0, 0.0)));
        assert_eq!(t.sample(2.0), Some(Position3D::new(2.0, 2.0, 0.0)));
    }

    #[test]
    fn test_sample_holds_ends() {
        let t = track();
        assert_eq!(t.sample(-1.0), Some(Position3D::new(0.0, 0.0, 0.0)));
        assert_eq!(t.sample(10.0), Some(Position3D::new(2.0, 4.0, 0.0)));
        assert_eq!(t.sample(1.0), Some(Position3D::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn test_effective_duration() {
        let mut clip = AnimationClip::new("wave", vec![track()]);
        assert_eq!(clip.effective_duration(), 3.0);
        clip.duration = 1.5;
        assert_eq!(clip.effective_duration(), 1.5);
    }

    #[test]
    fn test_validate_mismatch() {
        let mut bad = track();
        bad.values.pop();
        let clip = AnimationClip::new("broken", vec![bad]);
        assert!(matches!(
            clip.validate(),
            Err(AnimError::TrackMismatch { times: 3, values: 2, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unsorted_times() {
        let mut bad = track();
        bad.times = vec![0.0, 3.0, 1.0];
        let clip = AnimationClip::new("shuffled", vec![bad]);
        assert!(matches!(
            clip.validate(),
            Err(AnimError::TrackTimes { index: 2, .. })
        ));

        let mut bad = track();
        bad.times[1] = f32::NAN;
        let clip = AnimationClip::new("nan", vec![bad]);
        assert!(matches!(
            clip.validate(),
            Err(AnimError::TrackTimes { index: 1, .. })
        ));

        assert!(AnimationClip::new("ok", vec![track()]).validate().is_ok());
    }
}
