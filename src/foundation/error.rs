pub type CaptureResult<T> = Result<T, CaptureError>;

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("encoder missing: {0}")]
    EncoderMissing(String),

    #[error("spawn error: {0}")]
    Spawn(String),

    #[error("io error: {0}")]
    Io(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CaptureError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn encoder_missing(msg: impl Into<String>) -> Self {
        Self::EncoderMissing(msg.into())
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::Spawn(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Setup failures disable the capture component instead of ending one session.
    pub fn is_setup(&self) -> bool {
        matches!(self, Self::EncoderMissing(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
