use crate::config::EncoderConfig;
use crate::foundation::core::{FrameFormat, FrameRate, PIXEL_FORMAT};
use crate::foundation::error::{CaptureError, CaptureResult};
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Timestamp layout embedded in output file names (`20261016_142501_123`).
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S_%3f";

/// Output file for a session named `name` started at `at`:
/// `{output_dir}/{name}_{timestamp}.{ext}`.
pub fn output_path(cfg: &EncoderConfig, name: &str, at: DateTime<Local>) -> PathBuf {
    numbered_output_path(cfg, name, at, 0)
}

/// Upper bound on `_N` suffixes tried by [`reserve_output_path`].
const MAX_RESERVE_ATTEMPTS: u32 = 1000;

/// Claim a fresh output file for a session named `name` started at `at`.
///
/// Tries [`output_path`] first, then `{name}_{timestamp}_{n}.{ext}` for `n = 1, 2, ...`, and
/// creates the first free one as an empty placeholder so concurrent sessions with the same name
/// never share a file. The encoder overwrites the placeholder.
pub fn reserve_output_path(
    cfg: &EncoderConfig,
    name: &str,
    at: DateTime<Local>,
) -> CaptureResult<PathBuf> {
    for n in 0..MAX_RESERVE_ATTEMPTS {
        let candidate = numbered_output_path(cfg, name, at, n);
        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&candidate)
        {
            Ok(_) => return Ok(candidate),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => {
                return Err(CaptureError::io(format!(
                    "failed to create output file '{}': {e}",
                    candidate.display()
                )));
            }
        }
    }
    Err(CaptureError::io(format!(
        "no free output file name for '{}' after {MAX_RESERVE_ATTEMPTS} attempts",
        output_path(cfg, name, at).display()
    )))
}

fn numbered_output_path(cfg: &EncoderConfig, name: &str, at: DateTime<Local>, n: u32) -> PathBuf {
    let stem = format!("{}_{}", sanitize_name(name), at.format(TIMESTAMP_FORMAT));
    let file = if n == 0 {
        format!("{stem}.{}", cfg.container_ext)
    } else {
        format!("{stem}_{n}.{}", cfg.container_ext)
    };
    cfg.output_dir().join(file)
}

/// Replace characters that are unsafe in file names with `_`.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "capture".to_string()
    } else {
        cleaned
    }
}

/// Full argument list for one encoder invocation.
///
/// Input is raw `rgb24` at `format`/`rate` read from stdin; the output overwrites `out_path`.
/// Fails only when `extra_args` cannot be split.
pub fn encoder_args(
    cfg: &EncoderConfig,
    format: FrameFormat,
    rate: FrameRate,
    out_path: &Path,
) -> CaptureResult<Vec<OsString>> {
    let mut args: Vec<OsString> = [
        "-y",
        "-loglevel",
        cfg.loglevel.as_str(),
        "-f",
        "rawvideo",
        "-vcodec",
        "rawvideo",
        "-pixel_format",
        PIXEL_FORMAT,
        "-video_size",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(format.size_arg().into());
    args.push("-framerate".into());
    args.push(rate.get().to_string().into());
    args.push("-i".into());
    args.push("pipe:0".into());
    args.extend(cfg.extra_args()?.into_iter().map(OsString::from));
    args.push(out_path.as_os_str().to_owned());
    Ok(args)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/command.rs"]
mod tests;
