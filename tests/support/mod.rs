#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use framepipe::EncoderConfig;

/// Copies stdin into the output path (last argument) without printing anything.
pub const QUIET: &str = "quiet-encoder";
/// Like `QUIET`, but reports on stderr before and after consuming stdin.
pub const CHATTY: &str = "chatty-encoder";
/// Floods stderr with far more than a pipe buffer before reading any input.
pub const FLOODING: &str = "flooding-encoder";
/// Exits with status 3 without reading stdin.
pub const CRASHING: &str = "crashing-encoder";

pub const FLOOD_BYTES: usize = 512 * 1024;

fn scripts() -> &'static Path {
    static DIR: OnceLock<tempfile::TempDir> = OnceLock::new();
    DIR.get_or_init(|| {
        let dir = tempfile::tempdir().unwrap();
        write_script(
            dir.path(),
            QUIET,
            "for last; do :; done\ncat > \"$last\"\n",
        );
        write_script(
            dir.path(),
            CHATTY,
            "for last; do :; done\necho \"fake encoder: $# args\" >&2\ncat > \"$last\"\necho \"fake encoder: done\" >&2\n",
        );
        write_script(
            dir.path(),
            FLOODING,
            &format!(
                "for last; do :; done\nhead -c {FLOOD_BYTES} /dev/zero | tr '\\0' 'x' >&2\ncat > \"$last\"\n"
            ),
        );
        write_script(dir.path(), CRASHING, "echo \"boom: encoder crashed\" >&2\nexit 3\n");
        dir
    })
    .path()
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt as _;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(not(unix))]
fn write_script(_dir: &Path, _name: &str, _body: &str) {}

pub fn script(name: &str) -> PathBuf {
    scripts().join(name)
}

/// Config using the fake encoder `name`, writing into `work/Capture`.
pub fn fake_config(name: &str, work: &Path) -> Arc<EncoderConfig> {
    Arc::new(
        EncoderConfig {
            binary: Some(script(name)),
            ..EncoderConfig::default()
        }
        .with_working_dir(work),
    )
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|rd| rd.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    out.sort();
    out
}

pub fn ffmpeg_available() -> bool {
    std::process::Command::new("ffmpeg")
        .arg("-version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
