//! In-memory stand-ins for the camera, decoder, server and view.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use image::RgbaImage;

use yup_checkin::api::{CheckInApiError, CheckInTransport};
use yup_checkin::camera::{Camera, CameraError, VideoConstraints, VideoStream};
use yup_checkin::config::ScanConfig;
use yup_checkin::decoder::{CodeDecoder, RasterFrame};
use yup_checkin::feedback::{AlertBoard, CheckInView};
use yup_checkin::scanner::Scanner;
use yup_checkin::submitter::CheckInSubmitter;
use yup_core::checkin::{CheckInCode, CheckInOutcome};
use yup_core::types::EventId;

pub const VALID_CODE: &str = "YUP_RES-1717171717171";
pub const EVENT_ID: &str = "6f1c2e4a-0b7d-4c55-9a8e-1d2f3a4b5c6d";

pub fn event_id() -> EventId {
    EVENT_ID.parse().unwrap()
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCamera {
    pub deny: bool,
    /// Time the permission prompt stays open.
    pub open_delay: Duration,
    pub opened: AtomicUsize,
    pub stopped: Arc<AtomicUsize>,
    pub constraints: Mutex<Vec<VideoConstraints>>,
}

impl FakeCamera {
    pub fn denying() -> Self {
        Self {
            deny: true,
            ..Default::default()
        }
    }

    pub fn slow(open_delay: Duration) -> Self {
        Self {
            open_delay,
            ..Default::default()
        }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }
}

struct FakeStream {
    stopped: Arc<AtomicUsize>,
}

impl VideoStream for FakeStream {
    fn draw_frame(&mut self, _canvas: &mut RgbaImage) -> Result<(), CameraError> {
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Camera for FakeCamera {
    async fn open(&self, constraints: VideoConstraints) -> Result<Box<dyn VideoStream>, CameraError> {
        self.constraints.lock().unwrap().push(constraints);
        if !self.open_delay.is_zero() {
            tokio::time::sleep(self.open_delay).await;
        }
        if self.deny {
            return Err(CameraError::PermissionDenied);
        }
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            stopped: Arc::clone(&self.stopped),
        }))
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Returns scripted results in order, then misses forever.
#[derive(Default)]
pub struct ScriptedDecoder {
    script: Mutex<VecDeque<Option<String>>>,
    calls: AtomicUsize,
}

impl ScriptedDecoder {
    pub fn new(script: &[Option<&str>]) -> Self {
        Self {
            script: Mutex::new(script.iter().map(|s| s.map(str::to_string)).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Misses `misses` frames, then decodes `payload` once.
    pub fn hit_after(misses: usize, payload: &str) -> Self {
        let mut script = vec![None; misses];
        script.push(Some(payload));
        Self::new(&script)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CodeDecoder for ScriptedDecoder {
    fn decode(&self, frame: RasterFrame<'_>) -> Option<String> {
        assert_eq!(frame.pixels.len(), (frame.width * frame.height * 4) as usize);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().flatten()
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

pub enum Reply {
    Outcome(CheckInOutcome),
    Status(u16),
}

/// Answers every submission with the same reply and records the codes.
pub struct FakeTransport {
    reply: Reply,
    latency: Duration,
    pub submitted: Mutex<Vec<(String, EventId)>>,
}

impl FakeTransport {
    pub fn answering(outcome: CheckInOutcome) -> Self {
        Self {
            reply: Reply::Outcome(outcome),
            latency: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
        }
    }

    /// Holds every request open for `latency` before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Reply::Status(status),
            latency: Duration::ZERO,
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckInTransport for FakeTransport {
    async fn check_qr_code(
        &self,
        code: &CheckInCode,
        event_id: EventId,
    ) -> Result<CheckInOutcome, CheckInApiError> {
        self.submitted
            .lock()
            .unwrap()
            .push((code.as_str().to_string(), event_id));
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        match self.reply {
            Reply::Outcome(outcome) => Ok(outcome),
            Reply::Status(status) => Err(CheckInApiError::ApiError {
                status,
                body: String::new(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingView {
    pub confirmed: Mutex<Vec<String>>,
    pub cleared: AtomicUsize,
}

impl RecordingView {
    pub fn confirmations(&self) -> usize {
        self.confirmed.lock().unwrap().len()
    }

    pub fn clears(&self) -> usize {
        self.cleared.load(Ordering::SeqCst)
    }
}

impl CheckInView for RecordingView {
    fn show_confirmation(&self, code: &CheckInCode) {
        self.confirmed.lock().unwrap().push(code.as_str().to_string());
    }

    fn clear_text_input(&self) {
        self.cleared.fetch_add(1, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

pub struct Harness {
    pub scanner: Scanner,
    pub camera: Arc<FakeCamera>,
    pub decoder: Arc<ScriptedDecoder>,
    pub transport: Arc<FakeTransport>,
    pub view: Arc<RecordingView>,
    pub alerts: Arc<AlertBoard>,
}

pub fn submitter(
    transport: &Arc<FakeTransport>,
    alerts: &Arc<AlertBoard>,
    view: &Arc<RecordingView>,
) -> CheckInSubmitter {
    CheckInSubmitter::new(
        Arc::clone(transport) as Arc<dyn CheckInTransport>,
        event_id(),
        Arc::clone(alerts),
        Arc::clone(view) as Arc<dyn CheckInView>,
    )
}

pub fn harness(camera: FakeCamera, decoder: ScriptedDecoder, transport: FakeTransport) -> Harness {
    let camera = Arc::new(camera);
    let decoder = Arc::new(decoder);
    let transport = Arc::new(transport);
    let view = Arc::new(RecordingView::default());
    let alerts = Arc::new(AlertBoard::new());

    let scanner = Scanner::new(
        Arc::clone(&camera) as Arc<dyn Camera>,
        Arc::clone(&decoder) as Arc<dyn CodeDecoder>,
        Arc::new(submitter(&transport, &alerts, &view)),
        ScanConfig {
            tick: Duration::from_millis(16),
            frame_width: 8,
            frame_height: 6,
        },
    );

    Harness {
        scanner,
        camera,
        decoder,
        transport,
        view,
        alerts,
    }
}

/// Poll `condition` while letting the scan loop run.
pub async fn eventually<F: Fn() -> bool>(condition: F) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached");
}
