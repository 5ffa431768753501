//! The owning image handle.
//!
//! A [`RasterImage`] wraps exactly one engine handle for its whole lifetime:
//!
//! ```text
//! acquire (new / open / decode / from_raw_file)
//!    → optional transform (resized_to* → a new RasterImage, new handle)
//!    → optional persist (write / to_base64)
//!    → release on drop, exactly once
//! ```
//!
//! `RasterImage` is deliberately not `Clone`: a handle has one owner, and
//! ownership only moves. Release happens in `Drop`, so an early `?` return in
//! the owning scope still frees the handle.
//!
//! ## Writing files
//!
//! [`RasterImage::write`] never overwrites. It checks for an existing file and
//! then creates the destination; another process can create the same path in
//! between (TOCTOU). Callers that need atomic creation must coordinate
//! themselves.

use crate::calculations::{height_for_width, width_for_height};
use crate::config::OutputConfig;
use crate::engine::{Dimensions, EngineError, Interpolation, PixelEngine, RasterEngine};
use crate::format::ImageFormat;
use crate::params::Quality;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::mem::ManuallyDrop;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RasterError {
    #[error("unsupported image format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("refusing to overwrite existing file: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("file missing after write: {}", .0.display())]
    NotWritten(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine error: {0}")]
    Engine(#[from] EngineError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, RasterError>;

/// An image backed by exactly one raster engine handle.
pub struct RasterImage<E: RasterEngine = PixelEngine> {
    engine: E,
    /// Taken exactly once, in `Drop`.
    handle: ManuallyDrop<E::Handle>,
}

impl RasterImage<PixelEngine> {
    /// Allocate a blank true-color canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::new_in(PixelEngine::default(), width, height)
    }

    /// Load a JPEG or PNG file, choosing the decoder by extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_in(PixelEngine::default(), path)
    }

    /// Decode an encoded image already held in memory.
    pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<Self> {
        Self::decode_in(PixelEngine::default(), bytes, format)
    }

    /// See [`RasterImage::from_raw_file_in`].
    pub fn from_raw_file(path: impl AsRef<Path>) -> Result<(Self, Option<String>)> {
        Self::from_raw_file_in(PixelEngine::default(), path)
    }
}

impl<E: RasterEngine> RasterImage<E> {
    fn from_handle(engine: E, handle: E::Handle) -> Self {
        Self {
            engine,
            handle: ManuallyDrop::new(handle),
        }
    }

    pub fn new_in(engine: E, width: u32, height: u32) -> Result<Self> {
        let handle = engine.create_true_color(Dimensions::new(width, height))?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Load a file whose extension (`jpg`, `jpeg` or `png`, case-sensitive)
    /// names its format.
    ///
    /// Any other extension fails before the file is opened.
    pub fn open_in(engine: E, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let Some(format) = ImageFormat::from_path(path) else {
            log::debug!("not loading {}: unsupported extension", path.display());
            return Err(RasterError::UnsupportedFormat(path.to_path_buf()));
        };

        let mut bytes = Vec::new();
        File::open(path)?.read_to_end(&mut bytes)?;
        Self::decode_in(engine, &bytes, format)
    }

    pub fn decode_in(engine: E, bytes: &[u8], format: ImageFormat) -> Result<Self> {
        let handle = engine.decode(bytes, format)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Load a raw in-memory dump of an engine handle and return it together
    /// with its base64 JPEG transport string.
    ///
    /// This is a narrower, riskier path than [`RasterImage::open_in`]: the
    /// bytes are reinterpreted as the engine's raw raster layout with no
    /// format decoding, so only dumps produced by
    /// [`RasterImage::to_raw_bytes`] (or the same engine) load. JPEG and PNG
    /// files are rejected.
    ///
    /// The transport string is `None` if JPEG encoding fails; the image is
    /// still returned.
    pub fn from_raw_file_in(engine: E, path: impl AsRef<Path>) -> Result<(Self, Option<String>)> {
        let bytes = std::fs::read(path)?;
        let handle = engine.from_raw(bytes)?;
        let image = Self::from_handle(engine, handle);
        let transport = image.to_base64();
        Ok((image, transport))
    }

    /// Current size, read from the handle on every call.
    pub fn size(&self) -> Dimensions {
        self.engine.size(&self.handle)
    }

    pub fn width(&self) -> u32 {
        self.size().width
    }

    pub fn height(&self) -> u32 {
        self.size().height
    }

    /// Base64 JPEG at [`Quality::TRANSPORT_DEFAULT`].
    pub fn to_base64(&self) -> Option<String> {
        self.to_base64_with_quality(Quality::TRANSPORT_DEFAULT)
    }

    /// Encode as JPEG and base64 the bytes (standard alphabet, padded).
    ///
    /// Returns `None` when the encoder fails; the caller may retry with a
    /// different quality.
    pub fn to_base64_with_quality(&self, quality: Quality) -> Option<String> {
        match self
            .engine
            .encode_to_vec(&self.handle, ImageFormat::Jpeg, quality)
        {
            Ok(jpeg) => Some(STANDARD.encode(jpeg)),
            Err(e) => {
                log::debug!("transport encode at quality {} failed: {e}", quality.value());
                None
            }
        }
    }

    /// Base64 JPEG at the configured `transport_quality`.
    pub fn to_base64_with_config(&self, output: &OutputConfig) -> Option<String> {
        self.to_base64_with_quality(output.transport_quality())
    }

    /// Dump the handle in the engine's raw layout.
    pub fn to_raw_bytes(&self) -> Vec<u8> {
        self.engine.to_raw(&self.handle)
    }

    /// Write at [`Quality::FILE_DEFAULT`].
    pub fn write(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.write_with_quality(path, Quality::FILE_DEFAULT)
    }

    /// Write at the configured `jpeg_quality`.
    pub fn write_with_config(
        &mut self,
        path: impl AsRef<Path>,
        output: &OutputConfig,
    ) -> Result<()> {
        self.write_with_quality(path, output.jpeg_quality())
    }

    /// Encode to `path`, choosing PNG or JPEG by extension.
    ///
    /// Fails without touching the filesystem if the extension is unsupported
    /// or a file already exists at `path`. `quality` is passed to the JPEG
    /// encoder as is; PNG output always keeps the full alpha channel.
    ///
    /// An encoder failure can leave a partial file behind.
    pub fn write_with_quality(&mut self, path: impl AsRef<Path>, quality: Quality) -> Result<()> {
        let path = path.as_ref();
        let Some(format) = ImageFormat::from_path(path) else {
            log::debug!("not writing {}: unsupported extension", path.display());
            return Err(RasterError::UnsupportedFormat(path.to_path_buf()));
        };

        // Not atomic with the create below.
        if path.exists() {
            log::debug!("not writing {}: file exists", path.display());
            return Err(RasterError::AlreadyExists(path.to_path_buf()));
        }

        match format {
            ImageFormat::Png => self.engine.set_alpha_saving(&mut self.handle, true),
            ImageFormat::Jpeg => {}
        }

        {
            let mut writer = BufWriter::new(File::create(path)?);
            self.engine
                .encode(&self.handle, format, quality, &mut writer)?;
            writer.flush()?;
        }

        if path.exists() {
            Ok(())
        } else {
            Err(RasterError::NotWritten(path.to_path_buf()))
        }
    }

    /// Scale to exactly `width` × `height`.
    ///
    /// `smoothing` selects bilinear interpolation; otherwise nearest-neighbor.
    pub fn resized_to(&mut self, width: u32, height: u32, smoothing: bool) -> Result<Self> {
        self.scaled(Dimensions::new(width, height), smoothing)
    }

    /// Scale to `width`, keeping the aspect ratio.
    pub fn resized_to_width(&mut self, width: u32, smoothing: bool) -> Result<Self> {
        let height = height_for_width(self.size(), width);
        self.scaled(Dimensions::new(width, height), smoothing)
    }

    /// Scale to `height`, keeping the aspect ratio.
    pub fn resized_to_height(&mut self, height: u32, smoothing: bool) -> Result<Self> {
        let width = width_for_height(self.size(), height);
        self.scaled(Dimensions::new(width, height), smoothing)
    }

    fn scaled(&mut self, target: Dimensions, smoothing: bool) -> Result<Self> {
        self.engine
            .set_interpolation(&mut self.handle, Interpolation::from_smoothing(smoothing));
        let handle = self.engine.scale(&self.handle, target)?;
        Ok(Self::from_handle(self.engine.clone(), handle))
    }
}

impl<E: RasterEngine> fmt::Debug for RasterImage<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size();
        f.debug_struct("RasterImage")
            .field("width", &size.width)
            .field("height", &size.height)
            .finish()
    }
}

impl<E: RasterEngine> Drop for RasterImage<E> {
    fn drop(&mut self) {
        // SAFETY: `handle` is never accessed again after being taken here.
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.engine.destroy(handle);
    }
}
