//! Frame sources
//!
//! A source is either an uploaded video file, which ends, or a live camera,
//! which does not. Frames carry raw RGBA pixels.

use bytes::Bytes;

/// Display surface frames are rendered to before classification
pub const DISPLAY_WIDTH: u32 = 640;
pub const DISPLAY_HEIGHT: u32 = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    VideoFile,
    Camera,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::VideoFile => write!(f, "video"),
            SourceKind::Camera => write!(f, "camera"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    /// Position within the source in milliseconds
    pub timestamp_ms: u64,
    /// RGBA, row-major
    pub pixels: Bytes,
}

pub trait FrameSource: Send {
    fn kind(&self) -> SourceKind;

    /// Ready to deliver frames
    fn is_ready(&self) -> bool;

    /// Next frame, or `None` once a video file has ended
    fn next_frame(&mut self) -> Option<VideoFrame>;

    /// Stop delivering and rewind to the start
    fn stop(&mut self);
}

/// Makes classifier timestamps strictly increasing.
///
/// Video-mode classifiers reject timestamps that do not advance, which wall
/// clocks and rewound files both produce.
#[derive(Debug, Default)]
pub struct FrameStamper {
    last: Option<u64>,
}

impl FrameStamper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&mut self, wall_ms: u64) -> u64 {
        let ts = match self.last {
            Some(last) if wall_ms <= last => last + 1,
            _ => wall_ms,
        };
        self.last = Some(ts);
        ts
    }
}

/// Headless source producing blank frames at a fixed rate
#[derive(Debug, Clone)]
pub struct BlankFrameSource {
    kind: SourceKind,
    width: u32,
    height: u32,
    interval_ms: u64,
    /// Frames left for a video file; unbounded for a camera
    total: Option<u64>,
    produced: u64,
    stopped: bool,
    pixels: Bytes,
}

impl BlankFrameSource {
    fn new(kind: SourceKind, fps: u32, total: Option<u64>) -> Self {
        let fps = fps.max(1);
        let len = (DISPLAY_WIDTH * DISPLAY_HEIGHT * 4) as usize;
        Self {
            kind,
            width: DISPLAY_WIDTH,
            height: DISPLAY_HEIGHT,
            interval_ms: 1000 / u64::from(fps),
            total,
            produced: 0,
            stopped: false,
            pixels: Bytes::from(vec![0u8; len]),
        }
    }

    pub fn camera(fps: u32) -> Self {
        Self::new(SourceKind::Camera, fps, None)
    }

    pub fn video_file(frames: u64, fps: u32) -> Self {
        Self::new(SourceKind::VideoFile, fps, Some(frames))
    }

    pub fn produced(&self) -> u64 {
        self.produced
    }
}

impl FrameSource for BlankFrameSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    fn is_ready(&self) -> bool {
        !self.stopped
    }

    fn next_frame(&mut self) -> Option<VideoFrame> {
        if self.stopped {
            return None;
        }
        if let Some(total) = self.total {
            if self.produced >= total {
                return None;
            }
        }
        let frame = VideoFrame {
            width: self.width,
            height: self.height,
            timestamp_ms: self.produced * self.interval_ms,
            // Cheap clone, shares the buffer
            pixels: self.pixels.clone(),
        };
        self.produced += 1;
        Some(frame)
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.produced = 0;
    }
}
