//! Framepipe streams rendered frames into an external encoder process.
//!
//! - A [`FramePipe`] owns one `ffmpeg` subprocess: raw `rgb24` frames go to its stdin, its
//!   stderr is drained on a background thread and handed back on [`FramePipe::close`].
//! - A [`CaptureController`] opens and closes pipes over a time-bounded recording window,
//!   driven by one [`CaptureController::tick`] per rendered frame.
#![forbid(unsafe_code)]

mod foundation;

/// Raw frame helpers.
pub mod frame;

/// Capture sessions.
pub mod capture;
/// Process-wide encoder configuration.
pub mod config;
/// Encoder subprocess plumbing.
pub mod encode;
/// Subscriber setup.
pub mod logging;

pub use crate::foundation::core::{
    BYTES_PER_PIXEL, FrameFormat, FrameRate, MIN_RECORD_LENGTH_SECS, PIXEL_FORMAT, RecordLength,
};
pub use crate::foundation::error::{CaptureError, CaptureResult};

pub use crate::capture::controller::{
    CaptureController, CaptureEvent, CaptureSettings, CaptureState,
};
pub use crate::capture::host::{FixedSizeHost, RenderTarget, RenderTargetHost, RenderTargetId};
pub use crate::capture::rate::{RateClaim, SharedFrameRate};
pub use crate::config::EncoderConfig;
pub use crate::encode::drain::DiagnosticLog;
pub use crate::encode::pipe::{CloseReport, FramePipe, PipeHandle};
