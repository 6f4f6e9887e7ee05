//! Camera acquisition and the per-session capture canvas.
//!
//! A [`Camera`] hands out at most one [`VideoStream`] per scan session.
//! [`CaptureSession`] owns that stream exclusively together with an
//! off-screen RGBA canvas sized to the scan output; each capture draws
//! the current video frame into the canvas.

use async_trait::async_trait;
use image::RgbaImage;

/// Which physical camera to ask the platform for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Rear camera on phones and tablets.
    Environment,
    /// Front ("selfie") camera.
    User,
}

/// Constraints passed to [`Camera::open`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConstraints {
    pub facing_mode: FacingMode,
    pub audio: bool,
}

impl VideoConstraints {
    /// Video only, rear-facing when the device has one.
    pub fn rear_camera() -> Self {
        Self {
            facing_mode: FacingMode::Environment,
            audio: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Camera permission denied")]
    PermissionDenied,

    #[error("Camera unavailable: {0}")]
    Unavailable(String),

    #[error("Frame capture failed: {0}")]
    Capture(String),
}

/// Platform camera access.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Request a video stream. Suspends until the user grants or denies
    /// permission.
    async fn open(&self, constraints: VideoConstraints) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// A live video stream owned by one capture session.
pub trait VideoStream: Send {
    /// Draw the current frame into `canvas`, scaled to its dimensions.
    fn draw_frame(&mut self, canvas: &mut RgbaImage) -> Result<(), CameraError>;

    /// Stop every track of the stream and hand the device back to the
    /// platform.
    fn stop(&mut self);
}

/// Exclusive owner of a video stream and its capture canvas.
pub struct CaptureSession {
    stream: Option<Box<dyn VideoStream>>,
    canvas: RgbaImage,
}

impl CaptureSession {
    pub fn new(stream: Box<dyn VideoStream>, width: u32, height: u32) -> Self {
        Self {
            stream: Some(stream),
            canvas: RgbaImage::new(width, height),
        }
    }

    /// Whether the stream is still held.
    pub fn is_live(&self) -> bool {
        self.stream.is_some()
    }

    /// Draw the current frame and return the canvas.
    pub fn capture(&mut self) -> Result<&RgbaImage, CameraError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| CameraError::Capture("stream already released".to_string()))?;
        stream.draw_frame(&mut self.canvas)?;
        Ok(&self.canvas)
    }

    /// Reset the canvas to transparent black.
    pub fn clear(&mut self) {
        self.canvas.fill(0);
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Stop the stream. Returns `false` when it was already released.
    pub fn release(&mut self) -> bool {
        match self.stream.take() {
            Some(mut stream) => {
                stream.stop();
                self.clear();
                tracing::debug!("Camera stream released");
                true
            }
            None => false,
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.release();
    }
}
