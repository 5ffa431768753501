//! Raster engine trait and shared types.
//!
//! The [`RasterEngine`] trait is the seam between the owning
//! [`RasterImage`](crate::RasterImage) wrapper and whatever does the actual
//! pixel work. A handle is opaque to the wrapper: it is created by the engine,
//! passed back to the engine for every operation, and finally handed to
//! [`RasterEngine::destroy`] exactly once.
//!
//! The production implementation is
//! [`PixelEngine`](super::pixel_engine::PixelEngine), built on the `image`
//! crate. Tests wrap it in a recording engine that counts allocations and
//! releases.

use crate::format::ImageFormat;
use crate::params::Quality;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("cannot allocate a {width}x{height} canvas")]
    OutOfMemory { width: u32, height: u32 },
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("raw layout mismatch: {0}")]
    RawLayout(String),
}

/// Width and height of a raster, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count. Cannot overflow: `u32::MAX²` fits in a `u64`.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Interpolation used by the next [`RasterEngine::scale`] on a handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    #[default]
    BilinearFixed,
    NearestNeighbor,
}

impl Interpolation {
    /// Smooth resizing maps to bilinear, everything else to nearest-neighbor.
    pub fn from_smoothing(smoothing: bool) -> Self {
        if smoothing {
            Self::BilinearFixed
        } else {
            Self::NearestNeighbor
        }
    }
}

/// Operations every raster engine must provide.
///
/// Handles are exclusively owned values. Operations that change per-handle
/// engine state (alpha saving, interpolation) take `&mut Self::Handle`; the
/// engine is not expected to be safe for concurrent use of a single handle.
pub trait RasterEngine: Clone {
    type Handle;

    /// Allocate an opaque true-color canvas.
    fn create_true_color(&self, dims: Dimensions) -> Result<Self::Handle, EngineError>;

    /// Decode a complete encoded image.
    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<Self::Handle, EngineError>;

    /// Reinterpret bytes as the engine's raw in-memory raster layout.
    ///
    /// No format decoding happens here; compressed files are rejected.
    fn from_raw(&self, bytes: Vec<u8>) -> Result<Self::Handle, EngineError>;

    /// Dump a handle in the layout accepted by [`RasterEngine::from_raw`].
    fn to_raw(&self, handle: &Self::Handle) -> Vec<u8>;

    fn size(&self, handle: &Self::Handle) -> Dimensions;

    /// Encode into `sink`. `quality` only applies to lossy formats.
    fn encode(
        &self,
        handle: &Self::Handle,
        format: ImageFormat,
        quality: Quality,
        sink: &mut dyn Write,
    ) -> Result<(), EngineError>;

    fn set_alpha_saving(&self, handle: &mut Self::Handle, enabled: bool);

    fn set_interpolation(&self, handle: &mut Self::Handle, mode: Interpolation);

    /// Produce a new handle scaled with the handle's current interpolation.
    fn scale(&self, handle: &Self::Handle, target: Dimensions) -> Result<Self::Handle, EngineError>;

    /// Release a handle. Called exactly once per handle.
    fn destroy(&self, handle: Self::Handle);

    /// Encode into a fresh buffer.
    fn encode_to_vec(
        &self,
        handle: &Self::Handle,
        format: ImageFormat,
        quality: Quality,
    ) -> Result<Vec<u8>, EngineError> {
        let mut buffer = Vec::new();
        self.encode(handle, format, quality, &mut buffer)?;
        Ok(buffer)
    }
}
