//! # Raster Image
//!
//! An owning image handle over a raster engine. Each [`RasterImage`] wraps
//! exactly one engine handle, exposes its size, can be resized into a new
//! image, and can be persisted to a JPEG/PNG file or a base64 transport
//! string. The handle is released exactly once, when the image is dropped.
//!
//! ```no_run
//! use raster_image::RasterImage;
//!
//! # fn main() -> Result<(), raster_image::RasterError> {
//! let mut photo = RasterImage::open("photo.jpg")?;
//! let mut thumb = photo.resized_to_width(200, true)?;
//! thumb.write("thumb.png")?;
//! let inline = thumb.to_base64();
//! # Ok(())
//! # }
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`raster`] | [`RasterImage`]: construction, resize, persistence, release |
//! | [`engine`] | [`RasterEngine`] trait and the `image`-crate [`PixelEngine`] |
//! | [`format`] | Extension → [`ImageFormat`] dispatch |
//! | [`params`] | [`Quality`] and its defaults |
//! | [`calculations`] | Aspect-ratio math for resizing |
//! | [`config`] | Optional `raster.toml` with engine limits and output defaults |
//!
//! # Design Decisions
//!
//! ## One Owner Per Handle
//!
//! `RasterImage` is neither `Clone` nor `Copy`. Resizing never aliases the
//! source handle: the engine produces a new one, wrapped in a new image that
//! can outlive its source. `Drop` hands the handle back to
//! [`RasterEngine::destroy`], so release also happens on `?` early returns.
//!
//! ## Extension Dispatch
//!
//! Formats are chosen by exact, case-sensitive extension (`png`, `jpg`,
//! `jpeg`), computed once into an [`ImageFormat`]. Unknown extensions fail
//! before any file is opened or created.
//!
//! ## Write Never Overwrites
//!
//! [`RasterImage::write`] refuses existing paths. The existence check and the
//! create are separate steps, so a concurrent writer can still race it.
//!
//! ## Pure-Rust Engine
//!
//! [`PixelEngine`] uses the `image` crate's JPEG/PNG codecs and resampling,
//! so there are no system libraries to install.

pub mod calculations;
pub mod config;
pub mod engine;
pub mod format;
pub mod params;
pub mod raster;

pub use config::{ConfigError, OutputConfig, RasterConfig, load_config};
pub use engine::{Dimensions, EngineError, Interpolation, PixelEngine, RasterEngine};
pub use format::ImageFormat;
pub use params::Quality;
pub use raster::{RasterError, RasterImage};

#[cfg(test)]
pub(crate) mod test_helpers;
