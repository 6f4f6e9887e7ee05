//! Scan session lifecycle and the capture-decode-submit loop.
//!
//! ```text
//! Idle --start--> Starting --opened--> Capturing --hit--> Submitting --resume--> Capturing
//!                    |                     |                   |------halt-----> Idle
//!                    '--denied/stop--> Idle |                   '----checked in-> Closed
//!                                          '--------stop---------------------->  Idle
//! ```
//!
//! [`Scanner::start`] acquires the camera and spawns the loop task. The
//! session lock is not held while the camera opens, so a stop issued
//! during a permission prompt returns at once and the late stream is
//! released as soon as it arrives. The loop runs one capture-and-decode
//! attempt per tick and never has more than one attempt in flight.
//! [`Scanner::stop`] releases the camera before returning; a tick that
//! was already scheduled sees the cancelled session and does nothing.

use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::camera::{Camera, CameraError, CaptureSession, VideoConstraints};
use crate::config::ScanConfig;
use crate::decoder::{CodeDecoder, RasterFrame};
use crate::submitter::{CheckInSubmitter, SubmitDecision};

/// Alert shown when the camera cannot be opened.
pub const CAMERA_ERROR_MESSAGE: &str = "Unable to access the camera.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No camera held.
    Idle,
    /// Waiting for the camera to open.
    Starting,
    /// Camera held, decoding one frame per tick.
    Capturing,
    /// A decoded payload is being submitted.
    Submitting,
    /// Last scan checked a reservation in; camera released.
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("A scan session is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Camera(#[from] CameraError),
}

/// Drives check-in scanning for one front end.
pub struct Scanner {
    shared: Arc<Shared>,
}

struct Shared {
    camera: Arc<dyn Camera>,
    decoder: Arc<dyn CodeDecoder>,
    submitter: Arc<CheckInSubmitter>,
    config: ScanConfig,
    session: Mutex<Slot>,
    state: watch::Sender<ScanState>,
}

enum Slot {
    Empty,
    /// Camera requested; the token fires if the start is abandoned.
    Opening(CancellationToken),
    Running(ScanSession),
}

/// Resources held while the camera is on.
struct ScanSession {
    capture: CaptureSession,
    cancel: CancellationToken,
}

impl Scanner {
    pub fn new(
        camera: Arc<dyn Camera>,
        decoder: Arc<dyn CodeDecoder>,
        submitter: Arc<CheckInSubmitter>,
        config: ScanConfig,
    ) -> Self {
        let (state, _) = watch::channel(ScanState::Idle);
        Self {
            shared: Arc::new(Shared {
                camera,
                decoder,
                submitter,
                config,
                session: Mutex::new(Slot::Empty),
                state,
            }),
        }
    }

    pub fn state(&self) -> ScanState {
        *self.shared.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScanState> {
        self.shared.state.subscribe()
    }

    /// Open the rear camera and start scanning.
    ///
    /// A camera failure is reported to the user and leaves the scanner
    /// idle; it is not retried. If [`Scanner::stop`] runs while the camera
    /// is opening, the stream is released on arrival and no loop starts.
    pub async fn start(&self) -> Result<(), ScanError> {
        let cancel = CancellationToken::new();
        {
            let mut slot = self.shared.session.lock().await;
            if !matches!(*slot, Slot::Empty) {
                return Err(ScanError::AlreadyRunning);
            }
            *slot = Slot::Opening(cancel.clone());
            self.shared.set_state(ScanState::Starting);
        }

        let opened = self.shared.camera.open(VideoConstraints::rear_camera()).await;

        let mut slot = self.shared.session.lock().await;
        if cancel.is_cancelled() {
            if let Ok(mut stream) = opened {
                stream.stop();
            }
            tracing::info!("Scanning stopped before the camera opened");
            return Ok(());
        }

        let stream = match opened {
            Ok(stream) => stream,
            Err(e) => {
                *slot = Slot::Empty;
                tracing::error!(error = %e, "Error accessing camera");
                self.shared.submitter.alerts().show(CAMERA_ERROR_MESSAGE);
                self.shared.set_state(ScanState::Idle);
                return Err(e.into());
            }
        };

        let capture = CaptureSession::new(
            stream,
            self.shared.config.frame_width,
            self.shared.config.frame_height,
        );

        *slot = Slot::Running(ScanSession {
            capture,
            cancel: cancel.clone(),
        });
        self.shared.set_state(ScanState::Capturing);
        drop(slot);

        tokio::spawn(scan_loop(Arc::clone(&self.shared), cancel));
        Ok(())
    }

    /// Release the camera and stop scanning. A no-op when idle.
    pub async fn stop(&self) {
        let mut slot = self.shared.session.lock().await;
        if matches!(*slot, Slot::Empty) {
            if self.state() == ScanState::Closed {
                self.shared.set_state(ScanState::Idle);
            }
            return;
        }

        release(&mut slot);
        self.shared.set_state(ScanState::Idle);
        tracing::info!("Scanning stopped");
    }

    /// Submit typed text as a check-in code without touching the camera.
    pub async fn submit_text(&self, text: &str) -> SubmitDecision {
        self.shared.submitter.submit(text).await
    }
}

impl Shared {
    fn set_state(&self, next: ScanState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            tracing::debug!(?previous, ?next, "Scan state changed");
        }
    }
}

fn release(slot: &mut Slot) {
    match std::mem::replace(slot, Slot::Empty) {
        Slot::Empty => {}
        Slot::Opening(cancel) => cancel.cancel(),
        Slot::Running(mut session) => {
            session.cancel.cancel();
            session.capture.release();
        }
    }
}

/// One session's tick loop. Exits when `cancel` fires or a submission
/// ends the session.
async fn scan_loop(shared: Arc<Shared>, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(shared.config.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => {}
        }

        let payload = {
            let mut slot = shared.session.lock().await;
            if cancel.is_cancelled() {
                return;
            }
            let Slot::Running(session) = &mut *slot else {
                return;
            };

            let decoded = match session.capture.capture() {
                Ok(frame) => shared.decoder.decode(RasterFrame::from(frame)),
                Err(e) => {
                    tracing::warn!(error = %e, "Frame capture failed");
                    None
                }
            };
            if decoded.is_some() {
                // Under the lock; a racing stop lands after this and sets Idle.
                shared.set_state(ScanState::Submitting);
            }
            decoded
        };

        let Some(payload) = payload else {
            continue;
        };

        tracing::debug!("Code decoded, submitting");
        let decision = shared.submitter.submit(&payload).await;

        let mut slot = shared.session.lock().await;
        if cancel.is_cancelled() {
            // Stopped while the request was in flight; stop already set the state.
            return;
        }

        match decision {
            SubmitDecision::ResumeScanning => {
                if let Slot::Running(session) = &mut *slot {
                    session.capture.clear();
                }
                shared.set_state(ScanState::Capturing);
            }
            SubmitDecision::HaltScanning => {
                release(&mut slot);
                shared.set_state(ScanState::Idle);
                return;
            }
            SubmitDecision::CheckedIn => {
                release(&mut slot);
                shared.set_state(ScanState::Closed);
                return;
            }
        }
    }
}
