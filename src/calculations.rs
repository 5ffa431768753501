//! Pure calculation functions for resize dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use crate::engine::Dimensions;

/// Height that keeps the source aspect ratio at the given width.
///
/// `round(source.height × width / source.width)`. The edge is rounded to the
/// nearest pixel, not truncated, so 3×2 at width 4 gives height 3. A
/// zero-width source yields zero, which the engine then rejects.
///
/// # Examples
/// ```
/// # use raster_image::calculations::height_for_width;
/// # use raster_image::Dimensions;
/// assert_eq!(height_for_width(Dimensions::new(800, 600), 400), 300);
/// ```
pub fn height_for_width(source: Dimensions, width: u32) -> u32 {
    scale_edge(source.height, width, source.width)
}

/// Width that keeps the source aspect ratio at the given height.
///
/// `round(source.width × height / source.height)`, rounded like
/// [`height_for_width`].
pub fn width_for_height(source: Dimensions, height: u32) -> u32 {
    scale_edge(source.width, height, source.height)
}

fn scale_edge(edge: u32, target: u32, reference: u32) -> u32 {
    if reference == 0 {
        return 0;
    }
    let scaled = (edge as f64 * (target as f64 / reference as f64)).round();
    // Saturates on absurd ratios; the engine's pixel limit rejects those.
    scaled.min(u32::MAX as f64) as u32
}
