use crate::config::EncoderConfig;
use crate::encode::command::{encoder_args, reserve_output_path};
use crate::encode::drain::{DiagnosticDrain, DiagnosticLog};
use crate::foundation::core::{FrameFormat, FrameRate};
use crate::foundation::error::{CaptureError, CaptureResult};
use crate::frame::validate_frame_len;
use std::ffi::OsString;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Identity of one capture session's pipe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PipeHandle {
    /// Encoded output file.
    pub path: PathBuf,
    /// Frame dimensions.
    pub format: FrameFormat,
    /// Input frame rate.
    pub frame_rate: FrameRate,
    /// Encoder process id, `None` when the spawn failed.
    pub pid: Option<u32>,
    /// `false` once the pipe has been closed.
    pub open: bool,
}

/// Result of closing a pipe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CloseReport {
    /// Output file the encoder was writing. Empty for a repeated close.
    pub path: PathBuf,
    /// Everything the encoder printed on its diagnostic stream.
    pub diagnostics: String,
    /// Encoder exit status, when a process was running and could be waited on.
    pub exit_status: Option<ExitStatus>,
    /// Frames accepted by the input stream.
    pub frames_written: u64,
}

impl CloseReport {
    /// Return `true` when the encoder printed anything worth reviewing.
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.trim().is_empty()
    }

    /// Return `true` when the encoder exited with a failure status.
    pub fn failed(&self) -> bool {
        self.exit_status.is_some_and(|s| !s.success())
    }
}

struct EncoderProcess {
    child: Child,
    stdin: Option<ChildStdin>,
    drain: Option<DiagnosticDrain>,
}

/// One encoder subprocess fed with raw `rgb24` frames over its stdin.
///
/// Writes block while the encoder is behind, which paces the caller to encoder throughput.
/// Dropping the pipe closes it.
pub struct FramePipe {
    handle: PipeHandle,
    process: Option<EncoderProcess>,
    frames_written: u64,
}

impl std::fmt::Debug for FramePipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramePipe")
            .field("handle", &self.handle)
            .field("operational", &self.is_operational())
            .field("frames_written", &self.frames_written)
            .finish()
    }
}

impl FramePipe {
    /// Spawn an encoder writing `{output_dir}/{name}_{timestamp}.{ext}`.
    ///
    /// The output file is reserved up front; a name already taken gets a `_N` suffix. Invalid
    /// parameters, unsplittable `extra_args` and an unresolvable encoder return `Err` before
    /// anything is spawned.
    /// A failed spawn is logged once and yields a non-operational pipe whose writes are no-ops.
    #[tracing::instrument(skip(cfg), fields(path = tracing::field::Empty))]
    pub fn open(
        cfg: &EncoderConfig,
        name: &str,
        format: FrameFormat,
        frame_rate: FrameRate,
    ) -> CaptureResult<Self> {
        let format = FrameFormat::new(format.width, format.height)?;
        let frame_rate = FrameRate::new(frame_rate.get())?;
        let binary = cfg.resolve_binary()?;

        let out_dir = cfg.output_dir();
        std::fs::create_dir_all(&out_dir).map_err(|e| {
            CaptureError::io(format!(
                "failed to create output directory '{}': {e}",
                out_dir.display()
            ))
        })?;

        let path = reserve_output_path(cfg, name, chrono::Local::now())?;
        tracing::Span::current().record("path", tracing::field::display(path.display()));

        let args = match encoder_args(cfg, format, frame_rate, &path) {
            Ok(args) => args,
            Err(e) => {
                let _ = std::fs::remove_file(&path);
                return Err(e);
            }
        };

        let mut handle = PipeHandle {
            path,
            format,
            frame_rate,
            pid: None,
            open: true,
        };

        let process = match spawn_encoder(cfg, &binary, &args) {
            Ok(process) => {
                handle.pid = Some(process.child.id());
                Some(process)
            }
            Err(e) => {
                tracing::error!(error = %e, binary = %binary.display(), "encoder failed to start");
                let _ = std::fs::remove_file(&handle.path);
                None
            }
        };

        Ok(Self {
            handle,
            process,
            frames_written: 0,
        })
    }

    /// Session identity.
    pub fn handle(&self) -> &PipeHandle {
        &self.handle
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.handle.path
    }

    /// Return `true` while frames can still reach the encoder.
    pub fn is_operational(&self) -> bool {
        self.process.as_ref().is_some_and(|p| p.stdin.is_some())
    }

    /// Frames accepted so far.
    pub fn frames_written(&self) -> u64 {
        self.frames_written
    }

    /// Stream one frame of exactly `width * height * 3` bytes to the encoder.
    ///
    /// A closed or non-operational pipe ignores the call. A broken input stream is logged,
    /// reported once as `Err`, and turns later writes into no-ops.
    pub fn write(&mut self, frame: &[u8]) -> CaptureResult<()> {
        let Some(process) = self.process.as_mut() else {
            return Ok(());
        };
        let Some(stdin) = process.stdin.as_mut() else {
            return Ok(());
        };
        validate_frame_len(self.handle.format, frame)?;

        if let Err(e) = stdin.write_all(frame) {
            process.stdin = None;
            tracing::warn!(
                error = %e,
                path = %self.handle.path.display(),
                frames_written = self.frames_written,
                "encoder stopped accepting frames"
            );
            return Err(CaptureError::io(format!(
                "failed to write frame to encoder stdin: {e}"
            )));
        }
        self.frames_written += 1;
        Ok(())
    }

    /// End the input stream, wait for the encoder to exit, and collect its diagnostics.
    ///
    /// Safe to call repeatedly; later calls return an empty report.
    pub fn close(&mut self) -> CloseReport {
        if !self.handle.open {
            return CloseReport::default();
        }
        self.handle.open = false;

        let mut report = CloseReport {
            path: self.handle.path.clone(),
            frames_written: self.frames_written,
            ..CloseReport::default()
        };
        let Some(mut process) = self.process.take() else {
            return report;
        };

        // EOF on stdin tells the encoder to flush and finish the container.
        drop(process.stdin.take());

        match process.child.wait() {
            Ok(status) => report.exit_status = Some(status),
            Err(e) => tracing::warn!(error = %e, "failed to wait for encoder exit"),
        }

        let log: DiagnosticLog = process
            .drain
            .take()
            .map(DiagnosticDrain::join)
            .unwrap_or_default();
        report.diagnostics = log.into_text();

        tracing::debug!(
            path = %report.path.display(),
            status = ?report.exit_status,
            frames = report.frames_written,
            "encoder closed"
        );
        report
    }
}

impl Drop for FramePipe {
    fn drop(&mut self) {
        if self.handle.open {
            let report = self.close();
            if report.has_diagnostics() {
                tracing::warn!(
                    path = %report.path.display(),
                    "encoder diagnostics at drop:\n{}",
                    report.diagnostics.trim_end()
                );
            }
        }
    }
}

fn spawn_encoder(
    cfg: &EncoderConfig,
    binary: &Path,
    args: &[OsString],
) -> CaptureResult<EncoderProcess> {
    let mut cmd = Command::new(binary);
    cmd.args(args)
        .current_dir(&cfg.working_dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped());
    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt as _;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    tracing::debug!(binary = %binary.display(), ?args, "spawning encoder");

    let mut child = cmd.spawn().map_err(|e| {
        CaptureError::spawn(format!("failed to spawn '{}': {e}", binary.display()))
    })?;

    let stdin = child.stdin.take();
    let drain = match child.stderr.take() {
        Some(stderr) => match DiagnosticDrain::spawn(&child.id().to_string(), stderr) {
            Ok(drain) => Some(drain),
            Err(e) => {
                terminate(&mut child);
                return Err(CaptureError::spawn(format!(
                    "failed to start diagnostic drain thread: {e}"
                )));
            }
        },
        None => None,
    };
    if stdin.is_none() {
        terminate(&mut child);
        return Err(CaptureError::spawn("encoder stdin was not captured"));
    }

    Ok(EncoderProcess {
        child,
        stdin,
        drain,
    })
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
