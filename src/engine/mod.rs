//! Raster engine: the collaborator that owns pixel memory.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Allocate** | `RgbaImage::from_pixel` |
//! | **Decode** | `image` JPEG/PNG decoders |
//! | **Encode** | `JpegEncoder` / `PngEncoder` |
//! | **Scale** | `imageops::resize` |
//!
//! The module is split into:
//! - **Backend**: [`RasterEngine`] trait + shared types
//! - **Pixel engine**: [`PixelEngine`], the production implementation
//! - **Raw**: the raw in-memory layout read by [`RasterEngine::from_raw`]

pub mod backend;
pub mod pixel_engine;
pub mod raw;

pub use backend::{Dimensions, EngineError, Interpolation, RasterEngine};
pub use pixel_engine::{PixelEngine, PixelHandle};
