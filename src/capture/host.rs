use crate::foundation::core::FrameFormat;

/// Opaque id of a render target allocated by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RenderTargetId(pub u64);

/// A dedicated render target bound for the duration of one capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTarget {
    /// Host-side id.
    pub id: RenderTargetId,
    /// Target dimensions.
    pub format: FrameFormat,
}

/// Graphics-side collaborator of a [`crate::CaptureController`].
///
/// The host produces the frames; the controller only asks which size they have and, for
/// fixed-resolution captures, binds a dedicated target while a session runs.
pub trait RenderTargetHost {
    /// Size of the frames the host renders when no dedicated target is bound.
    fn native_format(&self) -> FrameFormat;

    /// Allocate a `format`-sized target and redirect rendering into it.
    fn bind_target(&mut self, format: FrameFormat) -> RenderTarget;

    /// Stop rendering into `target` and free it.
    fn release_target(&mut self, target: RenderTarget);
}

/// Host rendering at a fixed size with no separate render targets.
///
/// Binding returns a target with the requested format but allocates nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedSizeHost {
    format: FrameFormat,
    next_id: u64,
}

impl FixedSizeHost {
    /// Create a host whose native frames have `format`.
    pub fn new(format: FrameFormat) -> Self {
        Self { format, next_id: 0 }
    }
}

impl RenderTargetHost for FixedSizeHost {
    fn native_format(&self) -> FrameFormat {
        self.format
    }

    fn bind_target(&mut self, format: FrameFormat) -> RenderTarget {
        self.next_id += 1;
        RenderTarget {
            id: RenderTargetId(self.next_id),
            format,
        }
    }

    fn release_target(&mut self, _target: RenderTarget) {}
}
