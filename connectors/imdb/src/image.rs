//! Thumbnail resize tokens for the image CDN.

use imdb_graphql::{ImageSizer, ThumbnailSize};

/// Scales the source to cover the target box and crops the overflow evenly.
///
/// A source wider than the target aspect is fitted to the target height and
/// cropped horizontally (`SY`); anything else is fitted to the target width and
/// cropped vertically (`SX`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AspectCropSizer;

impl AspectCropSizer {
    /// Create a sizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ImageSizer for AspectCropSizer {
    fn resize_parameter(&self, width: u32, height: u32, target: ThumbnailSize) -> String {
        let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
        let (tw, th) = (f64::from(target.width.max(1)), f64::from(target.height.max(1)));

        if tw / th < w / h {
            let scaled_width = w * th / h;
            let offset = crop_offset(scaled_width, tw);
            format!(
                "QL75_SY{}_CR{offset},0,{},{}_AL_.jpg",
                target.height, target.width, target.height
            )
        } else {
            let scaled_height = h * tw / w;
            let offset = crop_offset(scaled_height, th);
            format!(
                "QL75_SX{}_CR0,{offset},{},{}_AL_.jpg",
                target.width, target.width, target.height
            )
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn crop_offset(scaled: f64, target: f64) -> u32 {
    ((scaled - target) / 2.0).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const THUMB: ThumbnailSize = ThumbnailSize::new(140, 207);

    #[test]
    fn landscape_sources_are_cropped_horizontally() {
        // 1000x500 scaled to height 207 is 414 wide: (414 - 140) / 2 = 137
        assert_eq!(
            AspectCropSizer.resize_parameter(1000, 500, THUMB),
            "QL75_SY207_CR137,0,140,207_AL_.jpg"
        );
    }

    #[test]
    fn portrait_sources_are_cropped_vertically() {
        // 1000x2000 scaled to width 140 is 280 high: (280 - 207) / 2 = 36.5
        assert_eq!(
            AspectCropSizer.resize_parameter(1000, 2000, THUMB),
            "QL75_SX140_CR0,37,140,207_AL_.jpg"
        );
    }

    #[test]
    fn matching_aspect_needs_no_crop() {
        assert_eq!(
            AspectCropSizer.resize_parameter(280, 414, THUMB),
            "QL75_SX140_CR0,0,140,207_AL_.jpg"
        );
    }
}
