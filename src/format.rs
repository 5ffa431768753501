//! Format dispatch by file extension.
//!
//! The extension is inspected once and turned into a closed tag. Callers match
//! on it exhaustively instead of re-comparing extension strings; `None` is the
//! "unsupported" case.
//!
//! Matching is case-sensitive: `photo.JPG` is unsupported.

use std::path::Path;

/// Encoded formats the raster engine can read and write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Map a bare extension (no dot) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Map a path's extension to a format. Paths without a UTF-8 extension
    /// are unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}
