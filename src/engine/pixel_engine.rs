//! Pure Rust raster engine built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG) | `image::ImageReader` (header checked against the pixel limit first) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (RGB, quality 1-100) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (RGBA when alpha saving is on) |
//! | Scale | `image::imageops::resize` (`Triangle` / `Nearest`) |
//! | Raw dump | [`raw`](super::raw) layout over the RGBA8 buffer |
//!
//! Every handle stores an RGBA8 true-color buffer regardless of the source
//! format, plus the per-handle state the engine consults on encode and scale.

use super::backend::{Dimensions, EngineError, Interpolation, RasterEngine};
use super::raw;
use crate::format::ImageFormat;
use crate::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage};
use std::io::{Cursor, Write};

/// Largest canvas area allocated by default (16384 × 16384).
pub const DEFAULT_MAX_PIXELS: u64 = 16384 * 16384;

/// JPEG quality used when the caller passes a negative value.
pub const ENGINE_DEFAULT_JPEG_QUALITY: u8 = 75;

const OPAQUE_BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Handle owned by [`PixelEngine`].
#[derive(Debug)]
pub struct PixelHandle {
    /// Always `DynamicImage::ImageRgba8`.
    image: DynamicImage,
    save_alpha: bool,
    interpolation: Interpolation,
}

impl PixelHandle {
    fn new(image: RgbaImage) -> Self {
        Self {
            image: DynamicImage::ImageRgba8(image),
            save_alpha: false,
            interpolation: Interpolation::default(),
        }
    }

    pub fn save_alpha(&self) -> bool {
        self.save_alpha
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }
}

/// Pure Rust engine using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelEngine {
    max_pixels: u64,
}

impl PixelEngine {
    pub fn new() -> Self {
        Self::with_max_pixels(DEFAULT_MAX_PIXELS)
    }

    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }

    pub fn max_pixels(&self) -> u64 {
        self.max_pixels
    }

    fn check_allocation(&self, dims: Dimensions) -> Result<(), EngineError> {
        if dims.is_empty() {
            return Err(EngineError::InvalidDimensions {
                width: dims.width,
                height: dims.height,
            });
        }
        if dims.area() > self.max_pixels {
            return Err(EngineError::OutOfMemory {
                width: dims.width,
                height: dims.height,
            });
        }
        Ok(())
    }
}

impl Default for PixelEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Map caller quality onto the encoder's 1-100 range.
fn jpeg_quality(quality: Quality) -> u8 {
    match quality.value() {
        q if q < 0 => ENGINE_DEFAULT_JPEG_QUALITY,
        q => q.clamp(1, 100) as u8,
    }
}

fn filter_for(mode: Interpolation) -> FilterType {
    match mode {
        Interpolation::BilinearFixed => FilterType::Triangle,
        Interpolation::NearestNeighbor => FilterType::Nearest,
    }
}

impl RasterEngine for PixelEngine {
    type Handle = PixelHandle;

    fn create_true_color(&self, dims: Dimensions) -> Result<PixelHandle, EngineError> {
        self.check_allocation(dims)?;
        log::trace!("allocating {}x{} canvas", dims.width, dims.height);
        Ok(PixelHandle::new(RgbaImage::from_pixel(
            dims.width,
            dims.height,
            OPAQUE_BLACK,
        )))
    }

    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<PixelHandle, EngineError> {
        let codec = match format {
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
        };
        let decode_error = |e: image::ImageError| EngineError::Decode(format!("{format:?}: {e}"));

        // Header-only read, so oversized images are refused before any pixel allocation.
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), codec)
            .into_dimensions()
            .map_err(decode_error)?;
        self.check_allocation(Dimensions::new(width, height))?;

        let decoded = ImageReader::with_format(Cursor::new(bytes), codec)
            .decode()
            .map_err(decode_error)?;
        Ok(PixelHandle::new(decoded.into_rgba8()))
    }

    fn from_raw(&self, bytes: Vec<u8>) -> Result<PixelHandle, EngineError> {
        let (dims, pixels) = raw::parse(bytes)?;
        self.check_allocation(dims)?;
        let buffer = RgbaImage::from_raw(dims.width, dims.height, pixels).ok_or_else(|| {
            EngineError::RawLayout(format!(
                "pixel buffer does not fit {}x{}",
                dims.width, dims.height
            ))
        })?;
        Ok(PixelHandle::new(buffer))
    }

    fn to_raw(&self, handle: &PixelHandle) -> Vec<u8> {
        raw::write(self.size(handle), handle.image.as_bytes())
    }

    fn size(&self, handle: &PixelHandle) -> Dimensions {
        Dimensions::new(handle.image.width(), handle.image.height())
    }

    fn encode(
        &self,
        handle: &PixelHandle,
        format: ImageFormat,
        quality: Quality,
        sink: &mut dyn Write,
    ) -> Result<(), EngineError> {
        let result = match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel.
                let encoder = JpegEncoder::new_with_quality(sink, jpeg_quality(quality));
                DynamicImage::ImageRgb8(handle.image.to_rgb8()).write_with_encoder(encoder)
            }
            ImageFormat::Png if handle.save_alpha => {
                handle.image.write_with_encoder(PngEncoder::new(sink))
            }
            ImageFormat::Png => {
                DynamicImage::ImageRgb8(handle.image.to_rgb8())
                    .write_with_encoder(PngEncoder::new(sink))
            }
        };
        result.map_err(|e| EngineError::Encode(format!("{format:?}: {e}")))
    }

    fn set_alpha_saving(&self, handle: &mut PixelHandle, enabled: bool) {
        handle.save_alpha = enabled;
    }

    fn set_interpolation(&self, handle: &mut PixelHandle, mode: Interpolation) {
        handle.interpolation = mode;
    }

    fn scale(&self, handle: &PixelHandle, target: Dimensions) -> Result<PixelHandle, EngineError> {
        self.check_allocation(target)?;
        let scaled = image::imageops::resize(
            &handle.image,
            target.width,
            target.height,
            filter_for(handle.interpolation),
        );
        Ok(PixelHandle::new(scaled))
    }

    fn destroy(&self, handle: PixelHandle) {
        log::trace!(
            "releasing {}x{} canvas",
            handle.image.width(),
            handle.image.height()
        );
        drop(handle);
    }
}
