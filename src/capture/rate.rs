use crate::foundation::core::FrameRate;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Outcome of [`SharedFrameRate::claim`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RateClaim {
    /// The rate was unset; the caller's rate is now the shared capture rate.
    Adopted,
    /// The shared rate already equals the caller's rate.
    Matched,
    /// Another session set a different rate first; it stays in effect.
    Mismatch {
        /// Rate this session asked for.
        requested: FrameRate,
        /// Rate actually in effect.
        active: FrameRate,
    },
}

/// Capture frame rate shared by every session of one application clock.
///
/// The first session to claim a rate sets it; later sessions asking for a different rate
/// are told about the mismatch and keep the first rate. Cloning shares the same value.
#[derive(Clone, Debug, Default)]
pub struct SharedFrameRate {
    fps: Arc<AtomicU32>,
}

impl SharedFrameRate {
    /// Create an unset shared rate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current rate, `None` while unset.
    pub fn get(&self) -> Option<FrameRate> {
        FrameRate::new(self.fps.load(Ordering::Acquire)).ok()
    }

    /// Set the rate if unset, otherwise compare against it.
    pub fn claim(&self, requested: FrameRate) -> RateClaim {
        match self
            .fps
            .compare_exchange(0, requested.get(), Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => RateClaim::Adopted,
            Err(current) if current == requested.get() => RateClaim::Matched,
            Err(current) => RateClaim::Mismatch {
                requested,
                active: FrameRate::new(current).unwrap_or(requested),
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/rate.rs"]
mod tests;
