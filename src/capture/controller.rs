use crate::capture::host::{RenderTarget, RenderTargetHost};
use crate::capture::rate::{RateClaim, SharedFrameRate};
use crate::config::EncoderConfig;
use crate::encode::pipe::{CloseReport, FramePipe};
use crate::foundation::core::{FrameFormat, FrameRate, RecordLength};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Per-controller capture settings.
#[derive(Clone, Debug, PartialEq)]
pub struct CaptureSettings {
    /// Session name, used as the output file name prefix.
    pub name: String,
    /// Fixed capture size. `None` captures at the host's native size.
    pub resolution: Option<FrameFormat>,
    /// Requested capture frame rate.
    pub frame_rate: FrameRate,
    /// Length of the recording window.
    pub record_length: RecordLength,
}

impl CaptureSettings {
    /// Native-size capture of the default window length.
    pub fn new(name: impl Into<String>, frame_rate: FrameRate) -> Self {
        Self {
            name: name.into(),
            resolution: None,
            frame_rate,
            record_length: RecordLength::default(),
        }
    }

    /// Capture into a dedicated `format`-sized render target.
    pub fn with_resolution(mut self, format: FrameFormat) -> Self {
        self.resolution = Some(format);
        self
    }

    /// Set the recording window length.
    pub fn with_record_length(mut self, record_length: RecordLength) -> Self {
        self.record_length = record_length;
        self
    }
}

/// Whether a session is currently streaming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureState {
    /// No encoder running.
    Idle,
    /// An encoder is open and receives one frame per tick.
    Capturing,
}

/// Something noteworthy that happened during [`CaptureController::enable`],
/// [`CaptureController::tick`] or teardown.
#[derive(Debug)]
pub enum CaptureEvent {
    /// The encoder is unavailable. Reported once per controller; the controller is disabled.
    SetupFailed(String),
    /// A session started writing to `path`.
    Started {
        /// Output file.
        path: PathBuf,
        /// Frame size the host must supply.
        format: FrameFormat,
    },
    /// The shared capture rate was already set to a different value.
    FrameRateMismatch {
        /// Rate this controller asked for.
        requested: FrameRate,
        /// Rate in effect.
        active: FrameRate,
    },
    /// The session could not be opened (bad frame size, unwritable output directory, invalid
    /// extra arguments). Reported once; the controller stays enabled but does not retry until
    /// it is re-enabled.
    OpenFailed(String),
    /// The encoder process could not be started; frames for this session are dropped.
    SpawnFailed {
        /// Output file the session would have written.
        path: PathBuf,
    },
    /// A frame was rejected or the encoder stopped reading.
    WriteFailed(String),
    /// A session ended.
    Stopped(CloseReport),
}

/// Drives one [`FramePipe`] through a time-bounded recording window.
///
/// The host calls [`tick`](Self::tick) once per rendered frame. While the accumulated time is
/// inside the window a pipe is kept open and fed; once it leaves the window, or the controller
/// is disabled, shut down or dropped, the session is torn down through the same path.
pub struct CaptureController<H: RenderTargetHost> {
    config: Arc<EncoderConfig>,
    shared_rate: SharedFrameRate,
    settings: CaptureSettings,
    host: H,

    enabled: bool,
    setup_reported: bool,
    open_failed: bool,
    write_warned: bool,
    elapsed: Duration,
    pipe: Option<FramePipe>,
    target: Option<RenderTarget>,
}

impl<H: RenderTargetHost> CaptureController<H> {
    /// Create a disabled controller. Call [`enable`](Self::enable) before ticking.
    pub fn new(
        config: Arc<EncoderConfig>,
        shared_rate: SharedFrameRate,
        settings: CaptureSettings,
        host: H,
    ) -> Self {
        Self {
            config,
            shared_rate,
            settings,
            host,
            enabled: false,
            setup_reported: false,
            open_failed: false,
            write_warned: false,
            elapsed: Duration::ZERO,
            pipe: None,
            target: None,
        }
    }

    /// Probe the encoder and start accepting ticks.
    ///
    /// A missing encoder leaves the controller disabled and is reported once per controller.
    /// Re-enabling after [`disable`](Self::disable) restarts the recording window.
    pub fn enable(&mut self) -> Vec<CaptureEvent> {
        if self.enabled {
            return Vec::new();
        }
        if let Err(e) = self.config.resolve_binary() {
            return self.fail_setup(e.to_string());
        }
        self.enabled = true;
        self.open_failed = false;
        self.elapsed = Duration::ZERO;
        Vec::new()
    }

    /// Stop the running session (if any) and ignore ticks until re-enabled.
    pub fn disable(&mut self) -> Vec<CaptureEvent> {
        self.enabled = false;
        self.teardown().into_iter().collect()
    }

    /// Stop the running session (if any) and release the host.
    pub fn shutdown(mut self) -> Vec<CaptureEvent> {
        self.disable()
    }

    /// Advance the recording window by `delta` and feed `frame` to the open session.
    ///
    /// `frame` must be `width * height * 3` bytes at [`frame_format`](Self::frame_format).
    /// Never fails; encoder trouble is logged and returned as events.
    pub fn tick(&mut self, delta: Duration, frame: Option<&[u8]>) -> Vec<CaptureEvent> {
        let mut events = Vec::new();
        if !self.enabled {
            return events;
        }
        self.elapsed = self.elapsed.saturating_add(delta);

        if self.settings.record_length.contains(self.elapsed) {
            if self.pipe.is_none() && !self.open_failed {
                self.start(&mut events);
            }
        } else if let Some(report) = self.teardown() {
            events.push(report);
        }

        if let (Some(pipe), Some(frame)) = (self.pipe.as_mut(), frame)
            && let Err(e) = pipe.write(frame)
        {
            if !self.write_warned {
                self.write_warned = true;
                tracing::warn!(
                    error = %e,
                    path = %pipe.path().display(),
                    "frame rejected by capture '{}'; further failures this session are not logged",
                    self.settings.name
                );
            }
            events.push(CaptureEvent::WriteFailed(e.to_string()));
        }
        events
    }

    /// Current session state.
    pub fn state(&self) -> CaptureState {
        if self.pipe.is_some() {
            CaptureState::Capturing
        } else {
            CaptureState::Idle
        }
    }

    /// Return `true` while a session is open.
    pub fn is_capturing(&self) -> bool {
        self.pipe.is_some()
    }

    /// Return `true` while ticks are processed.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Time accumulated in the current recording window.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Controller settings.
    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// Frame size expected by the open session.
    pub fn frame_format(&self) -> Option<FrameFormat> {
        self.pipe.as_ref().map(|p| p.handle().format)
    }

    /// Dedicated render target bound for the running fixed-resolution session.
    pub fn preview_target(&self) -> Option<RenderTarget> {
        self.target
    }

    /// The open session's pipe.
    pub fn pipe(&self) -> Option<&FramePipe> {
        self.pipe.as_ref()
    }

    /// Borrow the host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Mutably borrow the host.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    fn start(&mut self, events: &mut Vec<CaptureEvent>) {
        let format = match self.settings.resolution {
            Some(format) => {
                let target = self.host.bind_target(format);
                self.target = Some(target);
                target.format
            }
            None => self.host.native_format(),
        };

        let pipe = match FramePipe::open(
            &self.config,
            &self.settings.name,
            format,
            self.settings.frame_rate,
        ) {
            Ok(pipe) => pipe,
            Err(e) if e.is_setup() => {
                self.release_target();
                events.extend(self.fail_setup(e.to_string()));
                return;
            }
            Err(e) => {
                self.release_target();
                self.open_failed = true;
                tracing::error!(
                    error = %e,
                    "capture '{}' could not open a session; no retry until re-enabled",
                    self.settings.name
                );
                events.push(CaptureEvent::OpenFailed(e.to_string()));
                return;
            }
        };

        if let RateClaim::Mismatch { requested, active } =
            self.shared_rate.claim(self.settings.frame_rate)
        {
            tracing::warn!(
                %requested,
                %active,
                "capture frame rate mismatch; the shared rate was already set by another \
                 session, use the same frame rate when capturing several sources"
            );
            events.push(CaptureEvent::FrameRateMismatch { requested, active });
        }

        let path = pipe.path().to_path_buf();
        if !pipe.is_operational() {
            events.push(CaptureEvent::SpawnFailed { path: path.clone() });
        }
        tracing::info!(path = %path.display(), size = %format.size_arg(), "capture started");
        events.push(CaptureEvent::Started { path, format });
        self.write_warned = false;
        self.pipe = Some(pipe);
    }

    /// Release the render target and close the pipe together.
    fn teardown(&mut self) -> Option<CaptureEvent> {
        self.release_target();
        let mut pipe = self.pipe.take()?;
        let report = pipe.close();

        tracing::info!(
            path = %report.path.display(),
            frames = report.frames_written,
            "capture ended"
        );
        if report.has_diagnostics() {
            tracing::warn!(
                path = %report.path.display(),
                status = ?report.exit_status,
                "encoder returned with a warning or an error message:\n{}",
                report.diagnostics.trim_end()
            );
        }
        Some(CaptureEvent::Stopped(report))
    }

    fn release_target(&mut self) {
        if let Some(target) = self.target.take() {
            self.host.release_target(target);
        }
    }

    fn fail_setup(&mut self, message: String) -> Vec<CaptureEvent> {
        self.enabled = false;
        if self.setup_reported {
            return Vec::new();
        }
        self.setup_reported = true;
        tracing::error!(
            "{message}; encoder setup failed, capture '{}' is disabled",
            self.settings.name
        );
        vec![CaptureEvent::SetupFailed(message)]
    }
}

impl<H: RenderTargetHost> Drop for CaptureController<H> {
    fn drop(&mut self) {
        let _ = self.teardown();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/controller.rs"]
mod tests;
