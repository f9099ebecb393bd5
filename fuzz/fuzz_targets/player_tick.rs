//! Random sequences and tick times through the keyframe player

#![no_main]

use std::collections::HashMap;
use std::time::Instant;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use signa_anim::{KeyframePlayer, PlaybackPhase};
use signa_core::{Keyframe, KeyframeSequence, Position3D};

#[derive(Debug, Arbitrary)]
struct Input {
    /// (gap to previous frame, joint index, x, y, z)
    frames: Vec<(u8, u8, f32, f32, f32)>,
    ticks: Vec<f64>,
}

fuzz_target!(|input: Input| {
    let mut time = 0.0;
    let frames = input
        .frames
        .iter()
        .take(64)
        .map(|&(gap, joint, x, y, z)| {
            time += f64::from(gap) / 100.0;
            Keyframe::new(time).with_joint(format!("j{}", joint % 8), Position3D::new(x, y, z))
        })
        .collect();
    let Ok(sequence) = KeyframeSequence::new(frames) else {
        return;
    };

    let mut player = KeyframePlayer::new();
    player.load_sequence(sequence, Instant::now());
    let mut pose: HashMap<String, Position3D> = HashMap::new();

    let mut previous = 0;
    for t in input.ticks.into_iter().take(256) {
        let report = player.tick(t, &mut pose);
        assert!(report.index >= previous);
        previous = report.index;
        if player.phase() == PlaybackPhase::Held {
            assert_eq!(report.index, player.sequence().map_or(0, |s| s.len() - 1));
        }
    }
});
