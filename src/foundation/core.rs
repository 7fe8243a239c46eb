use crate::foundation::error::{CaptureError, CaptureResult};
use std::time::Duration;

/// Bytes per pixel of the only supported raw layout (`rgb24`, no alpha, no row padding).
pub const BYTES_PER_PIXEL: usize = 3;

/// Pixel format name passed to the encoder for raw input.
pub const PIXEL_FORMAT: &str = "rgb24";

/// Shortest recording window accepted by [`RecordLength`].
pub const MIN_RECORD_LENGTH_SECS: f64 = 0.01;

/// Integer capture frame rate in frames per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRate(u32);

impl FrameRate {
    /// Create a validated frame rate (`fps > 0`).
    pub fn new(fps: u32) -> CaptureResult<Self> {
        if fps == 0 {
            return Err(CaptureError::validation("frame rate must be non-zero"));
        }
        Ok(Self(fps))
    }

    /// Frames per second.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Duration of a single frame at this rate.
    pub fn frame_duration(self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.0))
    }
}

impl std::fmt::Display for FrameRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Dimensions of the raw frames streamed into one pipe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameFormat {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl FrameFormat {
    /// Create a validated format with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> CaptureResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::validation(format!(
                "frame size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Exact byte length of one frame (`width * height * 3`).
    pub fn frame_len(self) -> usize {
        self.width as usize * self.height as usize * BYTES_PER_PIXEL
    }

    /// Byte length of one row.
    pub fn row_len(self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// `WxH` as passed to the encoder's `-video_size`.
    pub fn size_arg(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Length of the recording window, measured from the first tick.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct RecordLength(f64);

impl RecordLength {
    /// Create a window of `secs` seconds.
    ///
    /// Values below [`MIN_RECORD_LENGTH_SECS`] (including NaN) are clamped up to it.
    pub fn from_secs(secs: f64) -> Self {
        if secs.is_nan() {
            return Self(MIN_RECORD_LENGTH_SECS);
        }
        Self(secs.max(MIN_RECORD_LENGTH_SECS))
    }

    /// Window length in seconds.
    pub fn as_secs(self) -> f64 {
        self.0
    }

    /// Return `true` while `elapsed` is still inside the window.
    pub fn contains(self, elapsed: Duration) -> bool {
        elapsed.as_secs_f64() < self.0
    }
}

impl Default for RecordLength {
    fn default() -> Self {
        Self(5.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
