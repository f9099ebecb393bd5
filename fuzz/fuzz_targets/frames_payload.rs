//! Arbitrary bytes through the animation payload parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use signa_core::parse_frames_str;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(parsed) = parse_frames_str(text) {
        let frames = parsed.sequence.frames();
        assert!(frames.windows(2).all(|w| w[0].time <= w[1].time));
        assert!(frames.iter().all(|f| f.time.is_finite()));
        assert!(frames
            .iter()
            .flat_map(|f| f.joints.values())
            .all(|p| p.is_finite()));
    }
});
