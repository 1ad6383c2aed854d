/// Template matching implementation
///
/// Zero-mean normalized cross-correlation over a restricted search region

use super::types::{MatchPoint, Template};
use crate::coin_scan::error::{ScanError, ScanResult};
use crate::coin_scan::region::Rect;
use image::{GrayImage, ImageBuffer, Luma, RgbImage};

/// Per-offset score surface produced by [`score_surface`]
pub type ScoreSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Template matcher for finding coin variants in a slice
pub struct TemplateMatcher {
    /// Minimum score for a position to be reported
    threshold: f32,
}

impl TemplateMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    /// Find every position where `template` matches inside `search_region`
    /// of `slice`.
    ///
    /// # Returns
    /// Offsets relative to the search region origin, in row-major order
    /// (y ascending, then x ascending). A template that does not fit the
    /// search region yields [`ScanError::TemplateTooLarge`].
    pub fn find_matches(
        &self,
        slice: &RgbImage,
        template: &Template,
        search_region: Rect,
    ) -> ScanResult<Vec<MatchPoint>> {
        if !search_region.fits_within(slice.width(), slice.height()) {
            return Err(ScanError::RegionOutOfBounds {
                region: search_region,
                width: slice.width(),
                height: slice.height(),
            });
        }
        let search_gray = search_area_luma(slice, search_region);
        self.find_matches_in_gray(&search_gray, template)
    }

    /// Same as [`TemplateMatcher::find_matches`] on an already extracted
    /// single-channel search area.
    pub fn find_matches_in_gray(
        &self,
        search_gray: &GrayImage,
        template: &Template,
    ) -> ScanResult<Vec<MatchPoint>> {
        if template.width() == 0
            || template.height() == 0
            || template.width() > search_gray.width()
            || template.height() > search_gray.height()
        {
            return Err(ScanError::TemplateTooLarge {
                template: template.name.clone(),
                template_width: template.width(),
                template_height: template.height(),
                region_width: search_gray.width(),
                region_height: search_gray.height(),
            });
        }

        let surface = score_surface(search_gray, &template.image);
        let points = collect_match_points(&surface, self.threshold);
        log::debug!(
            "  🔍 {}: {} positions >= {:.2} in {}x{} surface",
            template.name,
            points.len(),
            self.threshold,
            surface.width(),
            surface.height()
        );
        Ok(points)
    }
}

/// One-shot matching of a single template inside `search_region` of `slice`
pub fn match_template(
    slice: &RgbImage,
    template: &Template,
    search_region: Rect,
    threshold: f32,
) -> ScanResult<Vec<MatchPoint>> {
    TemplateMatcher::new(threshold).find_matches(slice, template, search_region)
}

/// Extract `region` of `slice` as an owned single-channel image
pub fn search_area_luma(slice: &RgbImage, region: Rect) -> GrayImage {
    let (x, y, w, h) = region.to_crop();
    let cropped = image::imageops::crop_imm(slice, x, y, w, h).to_image();
    image::imageops::grayscale(&cropped)
}

/// Zero-mean normalized cross-correlation of `template` at every offset of
/// `search`. The surface is `(sw - tw + 1) x (sh - th + 1)`; flat windows and
/// flat templates score 0.
///
/// Callers must ensure the template fits inside `search`.
pub fn score_surface(search: &GrayImage, template: &GrayImage) -> ScoreSurface {
    let (sw, sh) = search.dimensions();
    let (tw, th) = template.dimensions();
    let out_w = sw - tw + 1;
    let out_h = sh - th + 1;

    let n = (tw * th) as u64;
    let t_sum: u64 = template.pixels().map(|p| p[0] as u64).sum();
    let t_mean = t_sum as f64 / n as f64;
    let t_centered: Vec<f64> = template.pixels().map(|p| p[0] as f64 - t_mean).collect();
    let t_norm_sq: f64 = t_centered.iter().map(|v| v * v).sum();

    let raw = search.as_raw();
    let stride = sw as usize;
    let (tw, th) = (tw as usize, th as usize);

    ScoreSurface::from_fn(out_w, out_h, |ox, oy| {
        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        let mut cross = 0.0f64;
        for ty in 0..th {
            let row = (oy as usize + ty) * stride + ox as usize;
            let window = &raw[row..row + tw];
            let t_row = &t_centered[ty * tw..(ty + 1) * tw];
            for (&v, &t) in window.iter().zip(t_row) {
                let v = v as u64;
                sum += v;
                sum_sq += v * v;
                cross += v as f64 * t;
            }
        }
        // n * variance, exact in integers
        let window_var_n = (n * sum_sq).saturating_sub(sum * sum) as f64 / n as f64;
        let denom = (window_var_n * t_norm_sq).sqrt();
        let score = if denom <= f64::EPSILON {
            0.0
        } else {
            (cross / denom).clamp(-1.0, 1.0)
        };
        Luma([score as f32])
    })
}

/// Every offset scoring at least `threshold`, scanned row by row
pub fn collect_match_points(surface: &ScoreSurface, threshold: f32) -> Vec<MatchPoint> {
    // enumerate_pixels walks rows top to bottom, left to right
    surface
        .enumerate_pixels()
        .filter(|(_, _, p)| p[0] >= threshold)
        .map(|(x, y, p)| MatchPoint::new(x, y, p[0]))
        .collect()
}
