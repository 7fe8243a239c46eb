//! Raw frame helpers for hosts feeding a [`crate::FramePipe`].
//!
//! Pipes accept exactly one tightly packed `rgb24` buffer per write. Hosts whose readback
//! produces RGBA8 or bottom-up rows can normalize with these helpers before handing the
//! buffer over.

use crate::foundation::core::{BYTES_PER_PIXEL, FrameFormat};
use crate::foundation::error::{CaptureError, CaptureResult};

/// Check that `data` holds exactly one frame of `format`.
pub fn validate_frame_len(format: FrameFormat, data: &[u8]) -> CaptureResult<()> {
    let expected = format.frame_len();
    if data.len() != expected {
        return Err(CaptureError::validation(format!(
            "frame length mismatch: got {} bytes, expected {expected} ({} x 3)",
            data.len(),
            format.size_arg()
        )));
    }
    Ok(())
}

/// Flatten straight-alpha RGBA8 over an opaque background into `rgb24`.
///
/// `dst` must hold `src.len() / 4 * 3` bytes.
pub fn flatten_rgba8_to_rgb24(dst: &mut [u8], src: &[u8], bg_rgb: [u8; 3]) -> CaptureResult<()> {
    if !src.len().is_multiple_of(4) || dst.len() != src.len() / 4 * BYTES_PER_PIXEL {
        return Err(CaptureError::validation(
            "flatten_rgba8_to_rgb24 expects rgba8 input and a matching rgb24 output buffer",
        ));
    }

    for (d, s) in dst
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(src.chunks_exact(4))
    {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }

        let inv = 255 - a;
        for ((dc, &sc), &bc) in d.iter_mut().zip(&s[..3]).zip(&bg_rgb) {
            let v = mul_div255(u16::from(sc), a) + mul_div255(u16::from(bc), inv);
            *dc = v.min(255) as u8;
        }
    }

    Ok(())
}

/// Reverse row order in place (bottom-up readback to top-down).
pub fn flip_rows(format: FrameFormat, data: &mut [u8]) -> CaptureResult<()> {
    validate_frame_len(format, data)?;
    let row = format.row_len();
    let rows = format.height as usize;
    for y in 0..rows / 2 {
        let (top, bottom) = data.split_at_mut((rows - 1 - y) * row);
        top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
    }
    Ok(())
}

/// `x * y / 255`, rounded to nearest.
fn mul_div255(x: u16, y: u16) -> u16 {
    let t = u32::from(x) * u32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u16
}

#[cfg(test)]
#[path = "../tests/unit/frame.rs"]
mod tests;
