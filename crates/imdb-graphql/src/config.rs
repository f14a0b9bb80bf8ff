//! Engine configuration.

use crate::normalize::ThumbnailSize;
use crate::search::SearchSettings;

/// Settings the engine passes to normalizers and the search builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Target size of person photo thumbnails.
    pub photo_thumbnail: ThumbnailSize,
    /// Target size of title thumbnails in person records.
    pub title_thumbnail: ThumbnailSize,
    /// Advanced-search settings.
    pub search: SearchSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            photo_thumbnail: ThumbnailSize::new(140, 207),
            title_thumbnail: ThumbnailSize::new(140, 207),
            search: SearchSettings::default(),
        }
    }
}
