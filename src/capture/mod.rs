//! Time-bounded capture sessions on top of [`crate::FramePipe`].

/// The capture state machine.
pub mod controller;
/// Graphics host seam.
pub mod host;
/// Shared capture frame rate.
pub mod rate;
