//! Capture orchestration state machine.
//!
//! One entry point, one result shape: the orchestrator branches on mode,
//! walks the tool fallback chain for real captures, coordinates the
//! scratch file and the encoder, and folds every failure into a
//! [`CaptureResult`] instead of propagating it.

use super::attempt::{attempts_for, CaptureAttempt, DEFAULT_WARMUP_MS};
use super::invoker::{BackendError, ProcessInvoker, ToolInvoker};
use super::observe::{CaptureEvent, CaptureObserver, TracingObserver};
use super::result::CaptureResult;
use crate::config::{CameraConfig, CameraMode, CameraType};
use crate::image::{self, EncodeError, MIME_JPEG, MIME_SVG};
use crate::scratch::ScratchStore;
use chrono::Local;
use std::fmt;
use thiserror::Error;
use tokio::sync::Mutex;

const MSG_SUCCESS: &str = "Photo captured successfully";
const MSG_MOCK_SUCCESS: &str = "Mock photo captured successfully";
const MSG_USB_UNAVAILABLE: &str =
    "USB webcam not available. Make sure fswebcam is installed and camera is connected.";
const MSG_CSI_UNAVAILABLE: &str =
    "Camera not available. Make sure the camera is enabled and connected.";
const MSG_CAPTURE_FAILED: &str =
    "Failed to capture photo. Make sure the camera is enabled and connected.";

/// Internal error carrier for the real-capture path. Never escapes:
/// [`CaptureOrchestrator::capture`] folds it into the result.
#[derive(Debug, Error)]
enum CaptureError {
    #[error("all capture attempts failed")]
    Exhausted { last: Option<BackendError> },
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error("failed to allocate scratch file: {0}")]
    Scratch(#[from] std::io::Error),
}

/// Drives a single capture from mode branch to uniform result.
///
/// The orchestrator owns the capture lock: at most one capture is in
/// flight at a time, because captures share one physical camera. Callers
/// choose between queueing ([`capture`]) and an immediate busy signal
/// ([`try_capture`]).
///
/// [`capture`]: CaptureOrchestrator::capture
/// [`try_capture`]: CaptureOrchestrator::try_capture
pub struct CaptureOrchestrator<I = ProcessInvoker> {
    config: CameraConfig,
    scratch: ScratchStore,
    invoker: I,
    observer: Box<dyn CaptureObserver>,
    warmup_ms: u64,
    camera_lock: Mutex<()>,
}

impl CaptureOrchestrator {
    /// Creates an orchestrator that invokes real capture tools.
    pub fn new(config: CameraConfig) -> Self {
        Self::with_invoker(config, ProcessInvoker)
    }
}

impl<I: ToolInvoker> CaptureOrchestrator<I> {
    /// Creates an orchestrator with a custom invoker.
    pub fn with_invoker(config: CameraConfig, invoker: I) -> Self {
        Self {
            config,
            scratch: ScratchStore::default(),
            invoker,
            observer: Box::new(TracingObserver),
            warmup_ms: DEFAULT_WARMUP_MS,
            camera_lock: Mutex::new(()),
        }
    }

    /// Replaces the scratch store.
    pub fn with_scratch(mut self, scratch: ScratchStore) -> Self {
        self.scratch = scratch;
        self
    }

    /// Replaces the transition observer.
    pub fn with_observer(mut self, observer: impl CaptureObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Overrides the CSI warm-up delay in milliseconds.
    pub fn with_warmup_ms(mut self, warmup_ms: u64) -> Self {
        self.warmup_ms = warmup_ms;
        self
    }

    /// The configuration this orchestrator was built with.
    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// Runs one capture, waiting for any capture already in flight.
    pub async fn capture(&self) -> CaptureResult {
        let _permit = self.camera_lock.lock().await;
        self.capture_locked().await
    }

    /// Runs one capture, or returns `None` if a capture is already in
    /// flight.
    pub async fn try_capture(&self) -> Option<CaptureResult> {
        match self.camera_lock.try_lock() {
            Ok(_permit) => Some(self.capture_locked().await),
            Err(_) => None,
        }
    }

    async fn capture_locked(&self) -> CaptureResult {
        self.observer.on_event(&CaptureEvent::Started {
            mode: self.config.mode,
        });

        let result = match self.config.mode {
            CameraMode::Mock => self.capture_mock(),
            CameraMode::Real => self.capture_real().await,
        };

        self.observer.on_event(&CaptureEvent::Finished {
            success: result.success,
        });
        result
    }

    fn capture_mock(&self) -> CaptureResult {
        let bytes = image::render_placeholder(Local::now().naive_local());
        match image::to_data_url(&bytes, MIME_SVG) {
            Ok(url) => {
                self.observer.on_event(&CaptureEvent::Encoded {
                    mime: MIME_SVG,
                    data_url_len: url.len(),
                });
                CaptureResult::success(CameraMode::Mock, url, MSG_MOCK_SUCCESS)
            }
            Err(error) => {
                CaptureResult::failure(CameraMode::Mock, MSG_CAPTURE_FAILED, Some(error.to_string()))
            }
        }
    }

    async fn capture_real(&self) -> CaptureResult {
        match self.run_real().await {
            Ok(url) => CaptureResult::success(CameraMode::Real, url, MSG_SUCCESS),
            Err(error) => self.real_failure(error),
        }
    }

    /// Real-capture pipeline. The artifact is dropped on every early
    /// return, which removes whatever the failed attempt left behind.
    async fn run_real(&self) -> Result<String, CaptureError> {
        let artifact = self.scratch.allocate()?;
        let attempts = attempts_for(&self.config, artifact.path(), self.warmup_ms);

        self.invoke_chain(&attempts).await?;

        let url = image::encode_file(artifact.path(), MIME_JPEG).await?;
        self.observer.on_event(&CaptureEvent::Encoded {
            mime: MIME_JPEG,
            data_url_len: url.len(),
        });

        artifact.release();
        Ok(url)
    }

    /// Walks the fallback chain until a tool reports success.
    ///
    /// Only invocation failures advance the chain; once a tool reports
    /// success the chain is over, whatever the output file turns out to
    /// hold.
    async fn invoke_chain(&self, attempts: &[CaptureAttempt]) -> Result<(), CaptureError> {
        let mut last_error = None;
        for attempt in attempts {
            self.observer.on_event(&CaptureEvent::AttemptStarted {
                tool: attempt.tool(),
            });
            match self.invoker.invoke(attempt).await {
                Ok(()) => {
                    self.observer.on_event(&CaptureEvent::AttemptSucceeded {
                        tool: attempt.tool(),
                    });
                    return Ok(());
                }
                Err(error) => {
                    self.observer.on_event(&CaptureEvent::AttemptFailed {
                        tool: attempt.tool(),
                        error: &error,
                    });
                    last_error = Some(error);
                }
            }
        }
        Err(CaptureError::Exhausted { last: last_error })
    }

    fn real_failure(&self, error: CaptureError) -> CaptureResult {
        let (message, detail) = match error {
            CaptureError::Exhausted { last } => {
                let message = match self.config.camera_type {
                    CameraType::Usb => MSG_USB_UNAVAILABLE,
                    CameraType::Csi => MSG_CSI_UNAVAILABLE,
                };
                (message, last.map(|e| e.to_string()))
            }
            other => (MSG_CAPTURE_FAILED, Some(other.to_string())),
        };
        CaptureResult::failure(CameraMode::Real, message, detail)
    }
}

impl<I: fmt::Debug> fmt::Debug for CaptureOrchestrator<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureOrchestrator")
            .field("config", &self.config)
            .field("scratch", &self.scratch)
            .field("invoker", &self.invoker)
            .field("warmup_ms", &self.warmup_ms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::{Arc, Mutex as StdMutex};
    use tokio::sync::Notify;

    struct StubInvoker {
        script: StdMutex<VecDeque<Result<(), BackendError>>>,
        payload: Option<Vec<u8>>,
        invoked: Arc<StdMutex<Vec<String>>>,
    }

    impl StubInvoker {
        /// Returns the stub plus a handle to the tools it was asked to run.
        /// Attempts beyond the script succeed. On success the stub writes
        /// `payload` to the attempt's output path, like a real tool would.
        fn scripted(
            results: Vec<Result<(), BackendError>>,
        ) -> (Self, Arc<StdMutex<Vec<String>>>) {
            let invoked = Arc::new(StdMutex::new(Vec::new()));
            let stub = Self {
                script: StdMutex::new(results.into()),
                payload: Some(b"jpeg bytes".to_vec()),
                invoked: invoked.clone(),
            };
            (stub, invoked)
        }

        fn with_payload(mut self, payload: Option<Vec<u8>>) -> Self {
            self.payload = payload;
            self
        }
    }

    #[async_trait]
    impl ToolInvoker for StubInvoker {
        async fn invoke(&self, attempt: &CaptureAttempt) -> Result<(), BackendError> {
            self.invoked.lock().unwrap().push(attempt.tool().to_string());
            let result = self.script.lock().unwrap().pop_front().unwrap_or(Ok(()));
            if result.is_ok() {
                if let Some(payload) = &self.payload {
                    let output = attempt
                        .args()
                        .iter()
                        .find(|a| a.ends_with(".jpg"))
                        .expect("attempt has an output path");
                    std::fs::write(output, payload).unwrap();
                }
            }
            result
        }
    }

    fn not_found(tool: &str) -> BackendError {
        BackendError::ToolNotFound {
            tool: tool.to_string(),
        }
    }

    fn exec_failed(tool: &str) -> BackendError {
        BackendError::ExecutionFailed {
            tool: tool.to_string(),
            detail: format!("{tool}: simulated failure"),
        }
    }

    fn usb_config() -> CameraConfig {
        CameraConfig {
            camera_type: CameraType::Usb,
            ..Default::default()
        }
    }

    fn entry_count(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
    }

    #[tokio::test]
    async fn test_mock_capture_always_succeeds() {
        let (stub, invoked) = StubInvoker::scripted(vec![]);
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::mock(), stub);

        let result = orchestrator.capture().await;

        assert!(result.success);
        assert_eq!(result.mode, CameraMode::Mock);
        assert_eq!(result.message, "Mock photo captured successfully");
        let url = result.image_data_url.unwrap();
        assert!(url.starts_with("data:image/svg+xml;base64,"));
        assert!(result.error_detail.is_none());
        // mock mode touches no tools and no scratch files
        assert!(invoked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_csi_primary_success_skips_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) = StubInvoker::scripted(vec![Ok(())]);
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(result.success);
        assert_eq!(*invoked.lock().unwrap(), ["libcamera-still"]);
    }

    #[tokio::test]
    async fn test_csi_falls_back_after_primary_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) =
            StubInvoker::scripted(vec![Err(exec_failed("libcamera-still")), Ok(())]);
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(result.success);
        assert_eq!(result.mode, CameraMode::Real);
        assert_eq!(result.message, "Photo captured successfully");
        let url = result.image_data_url.unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        assert_eq!(*invoked.lock().unwrap(), ["libcamera-still", "raspistill"]);
        assert_eq!(entry_count(dir.path()), 0, "scratch file must not survive");
    }

    #[tokio::test]
    async fn test_csi_both_tools_failing_is_uniform_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) = StubInvoker::scripted(vec![
            Err(not_found("libcamera-still")),
            Err(exec_failed("raspistill")),
        ]);
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(!result.success);
        assert_eq!(result.mode, CameraMode::Real);
        assert_eq!(
            result.message,
            "Camera not available. Make sure the camera is enabled and connected."
        );
        assert!(result.error_detail.unwrap().contains("raspistill"));
        assert!(result.image_data_url.is_none());
        assert_eq!(invoked.lock().unwrap().len(), 2);
        assert_eq!(entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_usb_capture_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) = StubInvoker::scripted(vec![Ok(())]);
        let orchestrator = CaptureOrchestrator::with_invoker(usb_config(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(result.success);
        assert_eq!(*invoked.lock().unwrap(), ["fswebcam"]);
        assert_eq!(entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_usb_missing_tool_has_no_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) = StubInvoker::scripted(vec![Err(not_found("fswebcam"))]);
        let orchestrator = CaptureOrchestrator::with_invoker(usb_config(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(!result.success);
        assert_eq!(
            result.message,
            "USB webcam not available. Make sure fswebcam is installed and camera is connected."
        );
        assert!(result.error_detail.unwrap().contains("fswebcam"));
        assert_eq!(*invoked.lock().unwrap(), ["fswebcam"]);
        assert_eq!(entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_reported_success_without_file_does_not_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, invoked) =
            StubInvoker::scripted(vec![Ok(())]);
        let stub = stub.with_payload(None);
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(!result.success);
        assert_eq!(
            result.message,
            "Failed to capture photo. Make sure the camera is enabled and connected."
        );
        // the chain ended at the reported success; raspistill never ran
        assert_eq!(*invoked.lock().unwrap(), ["libcamera-still"]);
        assert_eq!(entry_count(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_empty_output_file_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, _invoked) = StubInvoker::scripted(vec![Ok(())]);
        let stub = stub.with_payload(Some(Vec::new()));
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()));

        let result = orchestrator.capture().await;

        assert!(!result.success);
        assert!(result.error_detail.unwrap().contains("empty"));
        assert_eq!(entry_count(dir.path()), 0, "empty scratch file must be removed");
    }

    struct RecordingObserver {
        events: Arc<StdMutex<Vec<String>>>,
    }

    impl CaptureObserver for RecordingObserver {
        fn on_event(&self, event: &CaptureEvent<'_>) {
            let summary = match event {
                CaptureEvent::Started { mode } => format!("started {mode}"),
                CaptureEvent::AttemptStarted { tool } => format!("attempt {tool}"),
                CaptureEvent::AttemptFailed { tool, .. } => format!("failed {tool}"),
                CaptureEvent::AttemptSucceeded { tool } => format!("succeeded {tool}"),
                CaptureEvent::Encoded { mime, .. } => format!("encoded {mime}"),
                CaptureEvent::Finished { success } => format!("finished {success}"),
            };
            self.events.lock().unwrap().push(summary);
        }
    }

    #[tokio::test]
    async fn test_observer_sees_transitions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let (stub, _invoked) =
            StubInvoker::scripted(vec![Err(exec_failed("libcamera-still")), Ok(())]);
        let events = Arc::new(StdMutex::new(Vec::new()));
        let orchestrator = CaptureOrchestrator::with_invoker(CameraConfig::default(), stub)
            .with_scratch(ScratchStore::new(dir.path()))
            .with_observer(RecordingObserver {
                events: events.clone(),
            });

        let result = orchestrator.capture().await;
        assert!(result.success);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            [
                "started real",
                "attempt libcamera-still",
                "failed libcamera-still",
                "attempt raspistill",
                "succeeded raspistill",
                "encoded image/jpeg",
                "finished true",
            ]
        );
    }

    struct BlockingInvoker {
        entered: Arc<Notify>,
        release: Arc<Notify>,
    }

    #[async_trait]
    impl ToolInvoker for BlockingInvoker {
        async fn invoke(&self, _attempt: &CaptureAttempt) -> Result<(), BackendError> {
            self.entered.notify_one();
            self.release.notified().await;
            // report success but write nothing; the capture fails cleanly
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_try_capture_reports_busy_while_capture_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let invoker = BlockingInvoker {
            entered: entered.clone(),
            release: release.clone(),
        };
        let orchestrator = Arc::new(
            CaptureOrchestrator::with_invoker(CameraConfig::default(), invoker)
                .with_scratch(ScratchStore::new(dir.path())),
        );

        let background = {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.capture().await })
        };

        entered.notified().await;
        assert!(orchestrator.try_capture().await.is_none());

        release.notify_one();
        let result = background.await.unwrap();
        assert!(!result.success);

        // once the first capture is done the lock is free again
        release.notify_one();
        assert!(orchestrator.try_capture().await.is_some());
    }
}
