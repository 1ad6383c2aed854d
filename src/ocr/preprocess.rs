//! Region normalization before OCR
//!
//! luma -> optional upscale -> 3x3 Gaussian -> Otsu binarization, in that order.

use super::types::CharacterPolicy;
use image::imageops::FilterType;
use image::{GrayImage, Luma, RgbImage};
use imageproc::contrast::otsu_level;
use imageproc::filter::separable_filter_equal;
use imageproc::map::map_colors;

/// 1-D kernel of the 3x3 Gaussian (sigma derived from the size, as ksize 3)
const GAUSSIAN_3: [f32; 3] = [0.25, 0.5, 0.25];

/// Full preprocessing chain for one extracted region
pub fn preprocess_region(region: &RgbImage, policy: CharacterPolicy, upscale_factor: f32) -> GrayImage {
    let gray = image::imageops::grayscale(region);
    let gray = if policy.upscales() {
        upscale(&gray, upscale_factor)
    } else {
        gray
    };
    let smoothed = gaussian_blur_3x3(&gray);
    binarize_otsu(&smoothed)
}

/// Scale both dimensions by `factor` (truncated) with bilinear interpolation
pub fn upscale(gray: &GrayImage, factor: f32) -> GrayImage {
    let width = ((gray.width() as f32 * factor) as u32).max(1);
    let height = ((gray.height() as f32 * factor) as u32).max(1);
    image::imageops::resize(gray, width, height, FilterType::Triangle)
}

pub fn gaussian_blur_3x3(gray: &GrayImage) -> GrayImage {
    separable_filter_equal(gray, &GAUSSIAN_3)
}

/// Global Otsu threshold; pixels above the level become 255, the rest 0
pub fn binarize_otsu(gray: &GrayImage) -> GrayImage {
    let level = otsu_level(gray);
    map_colors(gray, |p: Luma<u8>| Luma([if p[0] > level { 255 } else { 0 }]))
}
