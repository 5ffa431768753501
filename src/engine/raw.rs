//! Raw in-memory raster layout used by [`PixelEngine`](super::PixelEngine).
//!
//! ```text
//! offset  size         field
//! 0       4            magic "RIMG"
//! 4       4            width  (u32, little-endian)
//! 8       4            height (u32, little-endian)
//! 12      w * h * 4    RGBA8 pixels, row-major
//! ```
//!
//! This is a dump of the handle's pixel memory, not an interchange format.
//! JPEG/PNG files fail the magic check.

use super::backend::{Dimensions, EngineError};

pub const MAGIC: &[u8; 4] = b"RIMG";
pub const HEADER_LEN: usize = 12;

/// Split a raw dump into its dimensions and pixel bytes.
pub fn parse(mut bytes: Vec<u8>) -> Result<(Dimensions, Vec<u8>), EngineError> {
    if bytes.len() < HEADER_LEN {
        return Err(EngineError::RawLayout(format!(
            "{} bytes is shorter than the {HEADER_LEN}-byte header",
            bytes.len()
        )));
    }
    if &bytes[..4] != MAGIC {
        return Err(EngineError::RawLayout("missing RIMG magic".into()));
    }
    let dims = Dimensions::new(read_u32(&bytes[4..8]), read_u32(&bytes[8..12]));
    if dims.is_empty() {
        return Err(EngineError::InvalidDimensions {
            width: dims.width,
            height: dims.height,
        });
    }

    let expected = dims.area().checked_mul(4).and_then(|n| usize::try_from(n).ok());
    let actual = bytes.len() - HEADER_LEN;
    if expected != Some(actual) {
        return Err(EngineError::RawLayout(format!(
            "{}x{} needs {} pixel bytes, found {actual}",
            dims.width,
            dims.height,
            dims.area().saturating_mul(4)
        )));
    }

    bytes.drain(..HEADER_LEN);
    Ok((dims, bytes))
}

/// Serialize dimensions and RGBA8 pixels into the raw layout.
pub fn write(dims: Dimensions, pixels: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(HEADER_LEN + pixels.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&dims.width.to_le_bytes());
    out.extend_from_slice(&dims.height.to_le_bytes());
    out.extend_from_slice(pixels);
    out
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(bytes);
    u32::from_le_bytes(word)
}
