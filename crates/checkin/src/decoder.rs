//! Seam for the QR decoder.
//!
//! Decoding is delegated to an external implementation; the scan loop
//! only needs "payload or nothing" for one raster frame.

use image::RgbaImage;

/// One RGBA raster frame, row-major, four bytes per pixel.
#[derive(Debug, Clone, Copy)]
pub struct RasterFrame<'a> {
    pub width: u32,
    pub height: u32,
    pub pixels: &'a [u8],
}

impl<'a> From<&'a RgbaImage> for RasterFrame<'a> {
    fn from(image: &'a RgbaImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.as_raw(),
        }
    }
}

/// Extracts the text payload of a code visible in a frame, if any.
pub trait CodeDecoder: Send + Sync {
    fn decode(&self, frame: RasterFrame<'_>) -> Option<String>;
}
