//! Encoder subprocess plumbing.
//!
//! A [`pipe::FramePipe`] owns one encoder process: frames go in through its stdin, and its
//! stderr is drained on a background thread into a [`drain::DiagnosticLog`].

/// Command-line and output-path construction.
pub mod command;
/// Diagnostic stream draining.
pub mod drain;
/// The frame pipe itself.
pub mod pipe;
