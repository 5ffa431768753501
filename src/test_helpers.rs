//! Shared test utilities for the raster-image test suite.
//!
//! Provides synthetic image encoders and a [`RecordingEngine`] that wraps
//! [`PixelEngine`] and records every call, so lifecycle tests can assert that
//! each allocated handle is destroyed exactly once.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let engine = RecordingEngine::new();
//! {
//!     let image = RasterImage::new_in(engine.clone(), 4, 4).unwrap();
//! }
//! assert_eq!(engine.allocated(), engine.destroyed());
//! ```

use crate::engine::{Dimensions, EngineError, Interpolation, PixelEngine, RasterEngine};
use crate::format::ImageFormat;
use crate::params::Quality;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ImageEncoder, RgbImage};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// =========================================================================
// Synthetic fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Encode a small gradient JPEG in memory.
pub fn encode_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    JpegEncoder::new(&mut bytes)
        .write_image(
            gradient(width, height).as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

/// Encode a small gradient PNG in memory.
pub fn encode_test_png(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            gradient(width, height).as_raw(),
            width,
            height,
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

pub fn write_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_test_jpeg(width, height)).unwrap();
}

pub fn write_test_png(path: &Path, width: u32, height: u32) {
    std::fs::write(path, encode_test_png(width, height)).unwrap();
}

// =========================================================================
// Recording engine
// =========================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedOp {
    Allocate(usize),
    Encode(ImageFormat, i32),
    SetAlphaSaving(bool),
    SetInterpolation(Interpolation),
    Scale(u32, u32),
    Destroy(usize),
}

/// Handle wrapper tagging each pixel handle with a unique id.
#[derive(Debug)]
pub struct RecordedHandle {
    pub id: usize,
    inner: crate::engine::PixelHandle,
}

/// Engine that delegates to [`PixelEngine`] and records every call.
/// Uses `Arc<Mutex<_>>` so clones handed to derived images share one log.
#[derive(Clone, Default)]
pub struct RecordingEngine {
    inner: PixelEngine,
    operations: Arc<Mutex<Vec<RecordedOp>>>,
    next_id: Arc<AtomicUsize>,
    fail_encode: bool,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose encoder always fails.
    pub fn failing_encoder() -> Self {
        Self {
            fail_encode: true,
            ..Self::default()
        }
    }

    pub fn operations(&self) -> Vec<RecordedOp> {
        self.operations.lock().unwrap().clone()
    }

    /// Ids of every handle ever allocated, in order.
    pub fn allocated(&self) -> Vec<usize> {
        self.operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Allocate(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Ids of every handle destroyed, sorted.
    pub fn destroyed(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self
            .operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Destroy(id) => Some(id),
                _ => None,
            })
            .collect();
        ids.sort_unstable();
        ids
    }

    fn record(&self, op: RecordedOp) {
        self.operations.lock().unwrap().push(op);
    }

    fn track(
        &self,
        result: Result<crate::engine::PixelHandle, EngineError>,
    ) -> Result<RecordedHandle, EngineError> {
        let inner = result?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.record(RecordedOp::Allocate(id));
        Ok(RecordedHandle { id, inner })
    }
}

impl RasterEngine for RecordingEngine {
    type Handle = RecordedHandle;

    fn create_true_color(&self, dims: Dimensions) -> Result<RecordedHandle, EngineError> {
        self.track(self.inner.create_true_color(dims))
    }

    fn decode(&self, bytes: &[u8], format: ImageFormat) -> Result<RecordedHandle, EngineError> {
        self.track(self.inner.decode(bytes, format))
    }

    fn from_raw(&self, bytes: Vec<u8>) -> Result<RecordedHandle, EngineError> {
        self.track(self.inner.from_raw(bytes))
    }

    fn to_raw(&self, handle: &RecordedHandle) -> Vec<u8> {
        self.inner.to_raw(&handle.inner)
    }

    fn size(&self, handle: &RecordedHandle) -> Dimensions {
        self.inner.size(&handle.inner)
    }

    fn encode(
        &self,
        handle: &RecordedHandle,
        format: ImageFormat,
        quality: Quality,
        sink: &mut dyn Write,
    ) -> Result<(), EngineError> {
        self.record(RecordedOp::Encode(format, quality.value()));
        if self.fail_encode {
            return Err(EngineError::Encode("recording engine refuses".into()));
        }
        self.inner.encode(&handle.inner, format, quality, sink)
    }

    fn set_alpha_saving(&self, handle: &mut RecordedHandle, enabled: bool) {
        self.record(RecordedOp::SetAlphaSaving(enabled));
        self.inner.set_alpha_saving(&mut handle.inner, enabled);
    }

    fn set_interpolation(&self, handle: &mut RecordedHandle, mode: Interpolation) {
        self.record(RecordedOp::SetInterpolation(mode));
        self.inner.set_interpolation(&mut handle.inner, mode);
    }

    fn scale(
        &self,
        handle: &RecordedHandle,
        target: Dimensions,
    ) -> Result<RecordedHandle, EngineError> {
        self.record(RecordedOp::Scale(target.width, target.height));
        self.track(self.inner.scale(&handle.inner, target))
    }

    fn destroy(&self, handle: RecordedHandle) {
        self.record(RecordedOp::Destroy(handle.id));
        self.inner.destroy(handle.inner);
    }
}

#[test]
fn recording_engine_tags_handles_uniquely() {
    let engine = RecordingEngine::new();
    let a = engine.create_true_color(Dimensions::new(1, 1)).unwrap();
    let b = engine.create_true_color(Dimensions::new(1, 1)).unwrap();
    assert_ne!(a.id, b.id);
    engine.destroy(b);
    engine.destroy(a);
    assert_eq!(engine.allocated(), vec![0, 1]);
    assert_eq!(engine.destroyed(), vec![0, 1]);
}

#[test]
fn failed_allocation_is_not_recorded() {
    let engine = RecordingEngine::new();
    assert!(engine.create_true_color(Dimensions::new(0, 1)).is_err());
    assert!(engine.allocated().is_empty());
}
