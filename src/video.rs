//! Video frames and the sources that produce them.

/// One camera frame: ARGB pixels plus the video's current playback time.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
    /// Playback position in seconds. Detection only reruns when this changes.
    pub current_time: f64,
}

impl VideoFrame {
    /// An all-black frame.
    pub fn blank(width: usize, height: usize, current_time: f64) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF00_0000; width * height],
            current_time,
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}

/// A camera-like frame source.
pub trait VideoSource {
    /// Acquire the device at the requested resolution.
    fn open(&mut self, width: usize, height: usize) -> Result<(), CameraError>;

    /// Next frame, or `None` once the source has stopped.
    fn next_frame(&mut self) -> Option<VideoFrame>;
}

/// Errors raised while acquiring a camera.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("camera permission denied")]
    PermissionDenied,
    #[error("no camera available: {0}")]
    Unavailable(String),
    #[error("unsupported resolution {width}x{height}")]
    UnsupportedResolution { width: usize, height: usize },
}

/// Produces blank frames on a virtual clock.
///
/// Each distinct timestamp is delivered `repeat` times, which mimics a display
/// refreshing faster than the camera.
pub struct SyntheticCamera {
    fps: f64,
    repeat: u32,
    width: usize,
    height: usize,
    opened: bool,
    frame_index: u64,
    delivered: u32,
    limit: Option<u64>,
}

impl SyntheticCamera {
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            repeat: 1,
            width: 0,
            height: 0,
            opened: false,
            frame_index: 0,
            delivered: 0,
            limit: None,
        }
    }

    /// Deliver every timestamp `times` times.
    pub fn repeat_frames(mut self, times: u32) -> Self {
        self.repeat = times.max(1);
        self
    }

    /// Stop after this many distinct timestamps.
    pub fn limit(mut self, frames: u64) -> Self {
        self.limit = Some(frames);
        self
    }
}

impl VideoSource for SyntheticCamera {
    fn open(&mut self, width: usize, height: usize) -> Result<(), CameraError> {
        if width == 0 || height == 0 {
            return Err(CameraError::UnsupportedResolution { width, height });
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(CameraError::Unavailable(format!(
                "invalid frame rate {}",
                self.fps
            )));
        }
        self.width = width;
        self.height = height;
        self.opened = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Option<VideoFrame> {
        if !self.opened {
            return None;
        }
        if self.delivered == self.repeat {
            self.delivered = 0;
            self.frame_index += 1;
        }
        if self.limit.is_some_and(|limit| self.frame_index >= limit) {
            return None;
        }
        self.delivered += 1;
        let current_time = self.frame_index as f64 / self.fps;
        Some(VideoFrame::blank(self.width, self.height, current_time))
    }
}
