use std::io::Read;
use std::thread::JoinHandle;

/// Bytes the encoder wrote to its diagnostic stream.
///
/// Filled only by the drain thread and handed to the pipe owner when that thread is joined,
/// so it never needs a lock.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiagnosticLog {
    bytes: Vec<u8>,
}

impl DiagnosticLog {
    /// Wrap already captured bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Raw captured bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Return `true` when nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Captured text, lossily decoded as UTF-8.
    pub fn into_text(self) -> String {
        match String::from_utf8(self.bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }
    }
}

/// Background reader draining one diagnostic stream until EOF.
pub(crate) struct DiagnosticDrain {
    handle: JoinHandle<DiagnosticLog>,
}

impl DiagnosticDrain {
    /// Start draining `stream` on a dedicated thread.
    pub(crate) fn spawn<R>(label: &str, mut stream: R) -> std::io::Result<Self>
    where
        R: Read + Send + 'static,
    {
        let handle = std::thread::Builder::new()
            .name(format!("framepipe-drain-{label}"))
            .spawn(move || {
                let mut bytes = Vec::new();
                let mut chunk = [0u8; 4096];
                loop {
                    match stream.read(&mut chunk) {
                        Ok(0) => break,
                        Ok(n) => bytes.extend_from_slice(&chunk[..n]),
                        Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                        Err(e) => {
                            tracing::debug!(error = %e, "diagnostic stream read failed");
                            break;
                        }
                    }
                }
                tracing::debug!(bytes = bytes.len(), "diagnostic drain finished");
                DiagnosticLog::from_bytes(bytes)
            })?;
        Ok(Self { handle })
    }

    /// Wait for EOF and take the captured log.
    pub(crate) fn join(self) -> DiagnosticLog {
        self.handle.join().unwrap_or_else(|_| {
            tracing::warn!("diagnostic drain thread panicked; diagnostics lost");
            DiagnosticLog::default()
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/drain.rs"]
mod tests;
