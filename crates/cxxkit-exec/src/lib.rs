//! cxxkit-exec: subprocess invocation and bounded-concurrency fan-out.
//!
//! Provides:
//! - **Invocation** / **CommandOutput**: run one external tool, capture its
//!   exit code and output streams, with optional timeout and cancellation
//! - **run_bounded**: fan N independent operations out under a concurrency
//!   limit, attributing every result to its originating item
//! - **Progress**: injected observer for completion-order reporting
//!
//! Nothing here interprets what the external tools do; callers decide what
//! an exit code means and how to render the captured output.

mod fanout;
mod invoke;

pub use fanout::{run_bounded, NullProgress, Progress, TaskReport};
pub use invoke::{CommandOutput, Invocation};

use std::io;
use std::time::Duration;
use thiserror::Error;

/// Errors from running an external tool.
///
/// A tool that runs to completion with a non-zero exit code is NOT an error
/// here — that outcome is reported through `CommandOutput`. These variants
/// cover the invocation itself going wrong.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The executable could not be spawned (usually: not found).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting for the child failed at the OS level.
    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The child exceeded the invocation's timeout and was killed.
    #[error("{program} timed out after {after:?}")]
    TimedOut { program: String, after: Duration },

    /// The invocation was cancelled and the child was killed.
    #[error("{program} was cancelled")]
    Cancelled { program: String },
}
