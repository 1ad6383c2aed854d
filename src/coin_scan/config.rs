//! Configuration for coin scanning

use super::region::Rect;
use serde::{Deserialize, Serialize};

/// Pixels removed from each edge of a screenshot before slicing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorderCrop {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl BorderCrop {
    pub const NONE: BorderCrop = BorderCrop {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    /// Rectangle left after cropping an image of the given size, `None` when
    /// nothing remains.
    pub fn apply(&self, width: u32, height: u32) -> Option<Rect> {
        let w = width as i64 - self.left as i64 - self.right as i64;
        let h = height as i64 - self.top as i64 - self.bottom as i64;
        if w <= 0 || h <= 0 {
            return None;
        }
        Some(Rect::new(
            self.left as i32,
            self.top as i32,
            w as i32,
            h as i32,
        ))
    }
}

impl Default for BorderCrop {
    fn default() -> Self {
        Self {
            left: 425,
            top: 126,
            right: 84,
            bottom: 65,
        }
    }
}

/// Horizontal band of a slice searched for markers, as fractions of the
/// slice width: starts at `start/denominator`, spans `width/denominator`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBand {
    pub start: u32,
    pub width: u32,
    pub denominator: u32,
}

impl SearchBand {
    pub const FULL_WIDTH: SearchBand = SearchBand {
        start: 0,
        width: 1,
        denominator: 1,
    };

    /// Search rectangle inside a slice of the given size
    pub fn region(&self, slice_width: u32, slice_height: u32) -> Rect {
        let denominator = self.denominator.max(1) as u64;
        let x = slice_width as u64 * self.start as u64 / denominator;
        let w = slice_width as u64 * self.width as u64 / denominator;
        let w = w.min((slice_width as u64).saturating_sub(x));
        Rect::new(x as i32, 0, w as i32, slice_height as i32)
    }
}

impl Default for SearchBand {
    /// Rightmost quarter of the slice
    fn default() -> Self {
        Self {
            start: 3,
            width: 1,
            denominator: 4,
        }
    }
}

/// Geometry of the text regions relative to a detected coin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionLayout {
    /// Height of the value strip right of the coin
    pub number_height: i32,
    /// Name box is always anchored at this slice x
    pub name_x: i32,
    pub name_width: i32,
    pub name_height: i32,
    /// Added to the coin's y to get the name box's y
    pub name_offset_y: i32,
}

impl Default for RegionLayout {
    fn default() -> Self {
        Self {
            number_height: 30,
            name_x: 0,
            name_width: 260,
            name_height: 30,
            name_offset_y: 30 - 155,
        }
    }
}

/// Colors and stroke for debug annotation (RGB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    pub anchor_color: [u8; 3],
    pub number_color: [u8; 3],
    pub name_color: [u8; 3],
    pub thickness: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            anchor_color: [0, 255, 0],
            number_color: [255, 0, 0],
            name_color: [0, 0, 255],
            thickness: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Border removed before slicing
    pub border_crop: BorderCrop,
    /// Number of equal vertical slices
    pub slice_count: u32,
    /// Part of each slice searched for coins
    pub search_band: SearchBand,
    /// Correlation threshold for template matching (-1.0 to 1.0)
    pub match_threshold: f32,
    /// Match points closer than this on both axes are merged
    pub min_distance: u32,
    pub layout: RegionLayout,
    pub annotation: AnnotationStyle,
    /// Debug mode flag
    pub debug_enabled: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            border_crop: BorderCrop::default(),
            slice_count: 3,
            search_band: SearchBand::default(),
            match_threshold: 0.6,
            min_distance: 20,
            layout: RegionLayout::default(),
            annotation: AnnotationStyle::default(),
            debug_enabled: false,
        }
    }
}

impl ScanConfig {
    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), String> {
        if self.slice_count == 0 {
            return Err("slice_count must be at least 1".to_string());
        }
        if self.search_band.denominator == 0 || self.search_band.width == 0 {
            return Err("search_band must have a non-zero width and denominator".to_string());
        }
        if self.search_band.start >= self.search_band.denominator {
            return Err("search_band must start inside the slice".to_string());
        }
        if !(-1.0..=1.0).contains(&self.match_threshold) {
            return Err(format!(
                "match_threshold {} outside [-1, 1]",
                self.match_threshold
            ));
        }
        if self.layout.number_height <= 0
            || self.layout.name_width <= 0
            || self.layout.name_height <= 0
        {
            return Err("region layout sizes must be positive".to_string());
        }
        Ok(())
    }
}

/// Configuration for the three-column result screen the default crop was measured on
pub fn create_screenshot_layout_config() -> ScanConfig {
    ScanConfig::default()
}

/// Configuration for images that are already cropped to a single column
pub fn create_full_frame_config() -> ScanConfig {
    ScanConfig {
        border_crop: BorderCrop::NONE,
        slice_count: 1,
        search_band: SearchBand::FULL_WIDTH,
        ..ScanConfig::default()
    }
}
