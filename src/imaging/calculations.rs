//! Pure calculation functions for variant dimensions.
//!
//! No I/O here; everything is testable without images.

/// Scale `original` so its width equals `target_width`, preserving aspect ratio.
///
/// The height is rounded to the nearest pixel and never drops below 1, so very
/// wide panoramas still produce a valid raster.
///
/// ```
/// # use invite_media::imaging::scaled_dimensions;
/// assert_eq!(scaled_dimensions((1260, 700), 315), (315, 175));
/// assert_eq!(scaled_dimensions((800, 1000), 472), (472, 590));
/// ```
pub fn scaled_dimensions(original: (u32, u32), target_width: u32) -> (u32, u32) {
    let (orig_w, orig_h) = original;
    if orig_w == 0 {
        return (target_width, orig_h.max(1));
    }
    let ratio = target_width as f64 / orig_w as f64;
    let height = (orig_h as f64 * ratio).round() as u32;
    (target_width, height.max(1))
}

/// The narrowest requested width, i.e. the one whose variant marks a record
/// as already migrated.
pub fn smallest_width(widths: &[u32]) -> Option<u32> {
    widths.iter().copied().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_landscape_down() {
        // 16:9 source, 630 wide → 354.375 rounds to 354
        assert_eq!(scaled_dimensions((1920, 1080), 630), (630, 354));
    }

    #[test]
    fn scale_portrait_down() {
        assert_eq!(scaled_dimensions((1000, 1500), 472), (472, 708));
    }

    #[test]
    fn scale_up_keeps_exact_width() {
        // Width always equals the requested width, even above the original.
        assert_eq!(scaled_dimensions((200, 100), 630), (630, 315));
    }

    #[test]
    fn extreme_panorama_height_floor() {
        assert_eq!(scaled_dimensions((10_000, 10), 315), (315, 1));
    }

    #[test]
    fn zero_width_source_does_not_divide() {
        assert_eq!(scaled_dimensions((0, 0), 315), (315, 1));
    }

    #[test]
    fn smallest_width_picks_minimum_regardless_of_order() {
        assert_eq!(smallest_width(&[630, 315, 472]), Some(315));
        assert_eq!(smallest_width(&[]), None);
    }
}
