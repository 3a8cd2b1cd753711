//! Capture lifecycle observation.
//!
//! The orchestrator reports its state transitions through an injected
//! observer instead of logging inline, so tests can assert on the exact
//! transition sequence and embedders can forward events wherever they
//! like. The default observer writes to the tracing facade.

use super::invoker::BackendError;
use crate::config::CameraMode;

/// A state transition in one capture.
#[derive(Debug)]
pub enum CaptureEvent<'a> {
    /// Capture began in the given mode.
    Started {
        /// Mode the capture runs in.
        mode: CameraMode,
    },
    /// A tool invocation is about to run.
    AttemptStarted {
        /// Tool being invoked.
        tool: &'a str,
    },
    /// A tool invocation failed; the chain may move to a fallback.
    AttemptFailed {
        /// Tool that failed.
        tool: &'a str,
        /// Why it failed.
        error: &'a BackendError,
    },
    /// A tool invocation reported success.
    AttemptSucceeded {
        /// Tool that succeeded.
        tool: &'a str,
    },
    /// The image was encoded into a data URL.
    Encoded {
        /// MIME type of the encoded image.
        mime: &'a str,
        /// Length of the resulting data URL in bytes.
        data_url_len: usize,
    },
    /// The capture finished, successfully or not.
    Finished {
        /// Final outcome.
        success: bool,
    },
}

/// Sink for capture state transitions.
pub trait CaptureObserver: Send + Sync {
    /// Called at each state transition, in order, on the capture task.
    fn on_event(&self, event: &CaptureEvent<'_>);
}

/// Observer that logs transitions through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CaptureObserver for TracingObserver {
    fn on_event(&self, event: &CaptureEvent<'_>) {
        match event {
            CaptureEvent::Started { mode } => {
                tracing::info!(mode = %mode, "Capture started");
            }
            CaptureEvent::AttemptStarted { tool } => {
                tracing::info!(tool = *tool, "Attempting capture");
            }
            CaptureEvent::AttemptFailed { tool, error } => {
                tracing::warn!(tool = *tool, error = %error, "Capture attempt failed");
            }
            CaptureEvent::AttemptSucceeded { tool } => {
                tracing::info!(tool = *tool, "Capture attempt succeeded");
            }
            CaptureEvent::Encoded { mime, data_url_len } => {
                tracing::debug!(mime = *mime, data_url_len = *data_url_len, "Image encoded");
            }
            CaptureEvent::Finished { success } => {
                tracing::info!(success = *success, "Capture finished");
            }
        }
    }
}
