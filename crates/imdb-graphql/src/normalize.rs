//! Shared normalizer primitives: dates and image variants.

use serde::Serialize;

use crate::navigate::Nav;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Token replacing the file extension of the full-size image URL.
pub const FULL_IMAGE_SUFFIX: &str = "QL100_UX1000_.jpg";

/// English month name for `month` in `1..=12`.
#[must_use]
pub fn month_name(month: u8) -> Option<&'static str> {
    MONTH_NAMES.get(usize::from(month).checked_sub(1)?).copied()
}

/// Partial calendar date. `month_name` is set iff `month` is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateComponents {
    /// Day of month.
    pub day: Option<u8>,
    /// Month number, 1-12.
    pub month: Option<u8>,
    /// English month name derived from `month`.
    pub month_name: Option<&'static str>,
    /// Year.
    pub year: Option<i32>,
}

/// Read `{day, month, year}` from a date-components object.
///
/// Missing fields stay `None`. A month outside 1-12 is treated as missing.
#[must_use]
pub fn normalize_date(components: Nav<'_>) -> DateComponents {
    let month = components
        .get("month")
        .u64()
        .and_then(|m| u8::try_from(m).ok())
        .filter(|m| (1..=12).contains(m));
    DateComponents {
        day: components
            .get("day")
            .u64()
            .and_then(|d| u8::try_from(d).ok()),
        month,
        month_name: month.and_then(month_name),
        year: components
            .get("year")
            .i64()
            .and_then(|y| i32::try_from(y).ok()),
    }
}

/// Target box for a thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub struct ThumbnailSize {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

impl ThumbnailSize {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Computes the resize token appended to an image URL base.
///
/// Implementations receive the source image's natural dimensions and the
/// target box and return a token such as `QL75_SX140_CR0,37,140,207_AL_.jpg`.
pub trait ImageSizer: Send + Sync {
    /// Resize token for scaling `width`×`height` into `target`.
    fn resize_parameter(&self, width: u32, height: u32, target: ThumbnailSize) -> String;
}

/// Full-size and thumbnail URLs derived from one source image.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageVariant {
    /// High-quality full-size URL.
    pub full_url: Option<String>,
    /// Thumbnail URL.
    pub thumb_url: Option<String>,
}

/// URL with its trailing file extension removed.
#[must_use]
pub fn strip_extension(url: &str) -> &str {
    let name_start = url.rfind('/').map_or(0, |i| i + 1);
    match url[name_start..].rfind('.') {
        Some(dot) => &url[..name_start + dot],
        None => url,
    }
}

/// Derive full-size and thumbnail URLs from a source image.
///
/// The sizer is called with the source's own `width`/`height`. Without both
/// dimensions the thumbnail is absent while the full-size URL is kept.
#[must_use]
pub fn normalize_image(
    url: Option<&str>,
    width: Option<u32>,
    height: Option<u32>,
    target: ThumbnailSize,
    sizer: &dyn ImageSizer,
) -> ImageVariant {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return ImageVariant::default();
    };
    let base = strip_extension(url);
    let thumb_url = match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            Some(format!("{base}{}", sizer.resize_parameter(w, h, target)))
        }
        _ => None,
    };
    ImageVariant {
        full_url: Some(format!("{base}{FULL_IMAGE_SUFFIX}")),
        thumb_url,
    }
}

/// [`normalize_image`] over a `{url, width, height}` image object.
#[must_use]
pub fn normalize_image_node(
    image: Nav<'_>,
    target: ThumbnailSize,
    sizer: &dyn ImageSizer,
) -> ImageVariant {
    normalize_image(
        image.get("url").str(),
        image.get("width").u32(),
        image.get("height").u32(),
        target,
        sizer,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct RecordingSizer {
        calls: Mutex<Vec<(u32, u32, ThumbnailSize)>>,
    }

    impl ImageSizer for RecordingSizer {
        fn resize_parameter(&self, width: u32, height: u32, target: ThumbnailSize) -> String {
            self.calls.lock().unwrap().push((width, height, target));
            format!("SX{}_.jpg", target.width)
        }
    }

    #[test]
    fn month_only_date() {
        let doc = json!({"month": 7});
        assert_eq!(
            normalize_date(Nav::new(&doc)),
            DateComponents {
                day: None,
                month: Some(7),
                month_name: Some("July"),
                year: None,
            }
        );
    }

    #[test]
    fn empty_and_absent_dates_are_all_none() {
        let empty = json!({});
        assert_eq!(normalize_date(Nav::new(&empty)), DateComponents::default());
        assert_eq!(normalize_date(Nav::absent()), DateComponents::default());
    }

    #[test]
    fn full_date_and_out_of_range_month() {
        let doc = json!({"day": 25, "month": 12, "year": 1954});
        let date = normalize_date(Nav::new(&doc));
        assert_eq!(date.day, Some(25));
        assert_eq!(date.month_name, Some("December"));
        assert_eq!(date.year, Some(1954));

        let doc = json!({"month": 13, "year": 2001});
        let date = normalize_date(Nav::new(&doc));
        assert_eq!(date.month, None);
        assert_eq!(date.month_name, None);
        assert_eq!(date.year, Some(2001));
    }

    #[test]
    fn date_serializes_every_key() {
        let value = serde_json::to_value(DateComponents::default()).unwrap();
        assert_eq!(
            value,
            json!({"day": null, "month": null, "monthName": null, "year": null})
        );
    }

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(1), Some("January"));
        assert_eq!(month_name(12), Some("December"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn image_variants_use_original_dimensions() {
        let sizer = RecordingSizer::default();
        let target = ThumbnailSize::new(140, 207);
        let image = normalize_image(
            Some("https://m.media-amazon.com/images/M/MV5BMTg3._V1_.jpg"),
            Some(1000),
            Some(1500),
            target,
            &sizer,
        );
        assert_eq!(
            image.full_url.as_deref(),
            Some("https://m.media-amazon.com/images/M/MV5BMTg3._V1_QL100_UX1000_.jpg")
        );
        assert_eq!(
            image.thumb_url.as_deref(),
            Some("https://m.media-amazon.com/images/M/MV5BMTg3._V1_SX140_.jpg")
        );
        assert_eq!(sizer.calls.lock().unwrap().as_slice(), &[(1000, 1500, target)]);
    }

    #[test]
    fn missing_url_yields_no_variants() {
        let sizer = RecordingSizer::default();
        let target = ThumbnailSize::new(140, 207);
        assert_eq!(
            normalize_image(None, Some(10), Some(10), target, &sizer),
            ImageVariant::default()
        );
        assert_eq!(
            normalize_image(Some(""), Some(10), Some(10), target, &sizer),
            ImageVariant::default()
        );
        assert!(sizer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn missing_dimensions_drop_only_the_thumbnail() {
        let sizer = RecordingSizer::default();
        let doc = json!({"url": "https://img.example/a/b.jpg", "width": null, "height": 300});
        let image = normalize_image_node(Nav::new(&doc), ThumbnailSize::new(140, 207), &sizer);
        assert_eq!(
            image.full_url.as_deref(),
            Some("https://img.example/a/bQL100_UX1000_.jpg")
        );
        assert_eq!(image.thumb_url, None);
        assert!(sizer.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn extension_stripping_ignores_dots_in_directories() {
        assert_eq!(strip_extension("https://a.b/c.d/e"), "https://a.b/c.d/e");
        assert_eq!(strip_extension("https://a.b/c/e.png"), "https://a.b/c/e");
        assert_eq!(strip_extension("e._V1_.jpg"), "e._V1_");
    }
}
