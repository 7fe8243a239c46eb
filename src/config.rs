//! Process-wide encoder configuration.
//!
//! An [`EncoderConfig`] is built once (defaults or a JSON file) and shared read-only as
//! `Arc<EncoderConfig>` between every capture session for the rest of the process lifetime.

use crate::foundation::error::{CaptureError, CaptureResult};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Encoder executable searched on `PATH` when no explicit binary is configured.
#[cfg(windows)]
pub const DEFAULT_ENCODER_NAME: &str = "ffmpeg.exe";
/// Encoder executable searched on `PATH` when no explicit binary is configured.
#[cfg(not(windows))]
pub const DEFAULT_ENCODER_NAME: &str = "ffmpeg";

/// Settings shared by every pipe opened in this process.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Explicit encoder binary. Relative paths resolve against `working_dir`.
    pub binary: Option<PathBuf>,
    /// Directory receiving encoded files. Relative paths resolve against `working_dir`.
    pub output_dir: PathBuf,
    /// Extra encoder arguments, split with shell quoting rules and inserted before the output
    /// path.
    pub extra_args: String,
    /// Container extension of produced files (without the dot).
    pub container_ext: String,
    /// Value passed to the encoder's `-loglevel`.
    pub loglevel: String,
    /// Subprocess working directory, captured once when the config is created.
    #[serde(skip)]
    pub working_dir: PathBuf,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            binary: None,
            output_dir: PathBuf::from("Capture"),
            extra_args: "-pix_fmt yuv420p".to_string(),
            container_ext: "mp4".to_string(),
            loglevel: "warning".to_string(),
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

impl EncoderConfig {
    /// Load a JSON config file. Missing fields keep their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> CaptureResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CaptureError::config(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&text)
            .map_err(|e| CaptureError::config(format!("'{}': {e}", path.display())))
    }

    /// Parse a JSON config document.
    pub fn from_json_str(text: &str) -> CaptureResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| CaptureError::config(format!("invalid encoder config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Override the captured working directory.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    fn validate(&self) -> CaptureResult<()> {
        if self.container_ext.trim().is_empty() {
            return Err(CaptureError::config("container_ext must not be empty"));
        }
        if self.container_ext.contains(['/', '\\', '.']) {
            return Err(CaptureError::config(format!(
                "container_ext must be a bare extension, got '{}'",
                self.container_ext
            )));
        }
        self.extra_args()?;
        Ok(())
    }

    /// Absolute output directory.
    pub fn output_dir(&self) -> PathBuf {
        self.working_dir.join(&self.output_dir)
    }

    /// Extra arguments split into individual tokens.
    ///
    /// Quoted values stay one argument (`-metadata title="my clip"`); unbalanced quotes are a
    /// config error.
    pub fn extra_args(&self) -> CaptureResult<Vec<String>> {
        shlex::split(&self.extra_args).ok_or_else(|| {
            CaptureError::config(format!(
                "extra_args has unbalanced quotes or a trailing escape: {}",
                self.extra_args
            ))
        })
    }

    /// Resolve the encoder executable without spawning anything.
    ///
    /// An explicit `binary` must exist; otherwise [`DEFAULT_ENCODER_NAME`] is searched on `PATH`.
    pub fn resolve_binary(&self) -> CaptureResult<PathBuf> {
        match &self.binary {
            Some(binary) => {
                let path = self.working_dir.join(binary);
                if path.is_file() {
                    Ok(path)
                } else {
                    Err(CaptureError::encoder_missing(format!(
                        "configured encoder '{}' does not exist",
                        path.display()
                    )))
                }
            }
            None => find_on_path(DEFAULT_ENCODER_NAME).ok_or_else(|| {
                CaptureError::encoder_missing(format!(
                    "'{DEFAULT_ENCODER_NAME}' was not found on PATH; install ffmpeg or set `binary`"
                ))
            }),
        }
    }

    /// Return `true` when the encoder binary resolves.
    pub fn check_available(&self) -> bool {
        self.resolve_binary().is_ok()
    }

    /// Run `<binary> -version` and return its first output line.
    pub fn probe_version(&self) -> CaptureResult<String> {
        let binary = self.resolve_binary()?;
        let out = Command::new(&binary)
            .arg("-version")
            .current_dir(&self.working_dir)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| {
                CaptureError::spawn(format!("failed to run '{}': {e}", binary.display()))
            })?;
        if !out.status.success() {
            return Err(CaptureError::spawn(format!(
                "'{} -version' exited with {}",
                binary.display(),
                out.status
            )));
        }
        Ok(String::from_utf8_lossy(&out.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
