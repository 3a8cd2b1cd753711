//! Capture orchestration.
//!
//! A capture is one walk through a small state machine: branch on mode,
//! run the tool fallback chain against a scratch file, encode what the
//! tool wrote, and fold every outcome into one [`CaptureResult`] shape.
//! Failures stay inside the result; nothing here panics or propagates a
//! backend error to the caller.
//!
//! # Example
//!
//! ```no_run
//! use still_server::{CameraConfig, CaptureOrchestrator};
//!
//! # async fn demo() {
//! let orchestrator = CaptureOrchestrator::new(CameraConfig::mock());
//! let result = orchestrator.capture().await;
//! assert!(result.success);
//! # }
//! ```

mod attempt;
mod invoker;
mod observe;
mod orchestrator;
mod result;

pub use attempt::{attempts_for, CaptureAttempt, DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_WARMUP_MS};
pub use invoker::{BackendError, ProcessInvoker, ToolInvoker};
pub use observe::{CaptureEvent, CaptureObserver, TracingObserver};
pub use orchestrator::CaptureOrchestrator;
pub use result::CaptureResult;
