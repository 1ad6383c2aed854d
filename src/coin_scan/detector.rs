//! Coin detection and text reading for one screenshot

use super::annotate::annotate_detection;
use super::config::ScanConfig;
use super::dedup::{AnchorClaims, AnchorDetection, ClaimSet, suppress_near_duplicates};
use super::derive::{derive_name_region, derive_number_region};
use super::error::{ScanError, ScanResult};
use super::partition::{Slice, partition};
use super::region::Rect;
use crate::ocr::{CharacterPolicy, OcrEngine, RecognitionDispatcher, RecognitionResult};
use crate::template_matching::{Template, TemplateMatcher, matcher::search_area_luma};
use image::RgbImage;
use serde::Serialize;

// Per-unit progress is info with --debug, debug otherwise
macro_rules! debug_log {
    ($debug_enabled:expr, $($arg:tt)*) => {
        if $debug_enabled {
            log::info!($($arg)*);
        } else {
            log::debug!($($arg)*);
        }
    };
}

/// What was read for one anchor
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    /// The value strip gave no text, or the name box fell outside the slice
    NumberOnly {
        anchor: AnchorDetection,
        number_region: Rect,
        number: RecognitionResult,
    },
    /// The value was read, so the name box was derived and recognized
    NumberAndName {
        anchor: AnchorDetection,
        number_region: Rect,
        number: String,
        name_region: Rect,
        name: RecognitionResult,
    },
}

impl Detection {
    pub fn anchor(&self) -> &AnchorDetection {
        match self {
            Detection::NumberOnly { anchor, .. } | Detection::NumberAndName { anchor, .. } => {
                anchor
            }
        }
    }

    pub fn number_region(&self) -> Rect {
        match self {
            Detection::NumberOnly { number_region, .. }
            | Detection::NumberAndName { number_region, .. } => *number_region,
        }
    }

    pub fn name_region(&self) -> Option<Rect> {
        match self {
            Detection::NumberOnly { .. } => None,
            Detection::NumberAndName { name_region, .. } => Some(*name_region),
        }
    }

    /// `(number, name)` when the value was read
    pub fn reading(&self) -> Option<(String, Option<String>)> {
        match self {
            Detection::NumberOnly { number, .. } => {
                number.text().map(|text| (text.to_string(), None))
            }
            Detection::NumberAndName { number, name, .. } => {
                Some((number.clone(), name.text().map(str::to_string)))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    TemplateTooLarge,
    RegionOutOfBounds,
    EmptySourceCrop,
    DuplicateNumberRegion,
}

/// A unit (template, region) that was skipped without stopping the scan
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedUnit {
    pub unit: String,
    pub reason: SkipReason,
    pub detail: String,
}

impl SkippedUnit {
    fn from_error(unit: String, error: &ScanError) -> Option<Self> {
        let reason = match error {
            ScanError::TemplateTooLarge { .. } => SkipReason::TemplateTooLarge,
            ScanError::RegionOutOfBounds { .. } => SkipReason::RegionOutOfBounds,
            ScanError::EmptySourceCrop { .. } => SkipReason::EmptySourceCrop,
            _ => return None,
        };
        Some(Self {
            unit,
            reason,
            detail: error.to_string(),
        })
    }
}

/// Everything produced for one slice
#[derive(Debug, Clone)]
pub struct SliceReport {
    pub slice_index: usize,
    /// Slice position in the source screenshot
    pub origin: Rect,
    pub detections: Vec<Detection>,
    pub skipped: Vec<SkippedUnit>,
    /// Slice with anchor, number and name boxes drawn
    pub annotated: RgbImage,
}

impl SliceReport {
    pub fn anchors(&self) -> Vec<&AnchorDetection> {
        self.detections.iter().map(Detection::anchor).collect()
    }

    pub fn readings(&self) -> Vec<(String, Option<String>)> {
        self.detections.iter().filter_map(Detection::reading).collect()
    }
}

/// Runs the slice pipeline: match -> dedupe -> derive -> recognize -> annotate
pub struct CoinScanner {
    config: ScanConfig,
    matcher: TemplateMatcher,
    dispatcher: RecognitionDispatcher,
}

impl CoinScanner {
    pub fn new(config: ScanConfig, dispatcher: RecognitionDispatcher) -> Self {
        let matcher = TemplateMatcher::new(config.match_threshold);
        Self {
            config,
            matcher,
            dispatcher,
        }
    }

    /// Crop, slice and scan a whole screenshot
    pub fn scan_image(
        &self,
        image: &RgbImage,
        templates: &[Template],
        engine: &mut dyn OcrEngine,
    ) -> ScanResult<Vec<SliceReport>> {
        let slices = partition(image, &self.config.border_crop, self.config.slice_count)?;
        if slices.dropped_columns() > 0 {
            log::debug!(
                "{} column(s) right of the last slice are not scanned",
                slices.dropped_columns()
            );
        }
        Ok(slices
            .map(|slice| self.scan_slice(&slice, templates, engine))
            .collect())
    }

    /// Detect coins in one slice with every template, then read their labels
    pub fn scan_slice(
        &self,
        slice: &Slice,
        templates: &[Template],
        engine: &mut dyn OcrEngine,
    ) -> SliceReport {
        let debug = self.config.debug_enabled;
        let slice_size = (slice.width(), slice.height());
        let search = self.config.search_band.region(slice.width(), slice.height());
        let search_gray = search
            .is_valid()
            .then(|| search_area_luma(&slice.image, search));

        let mut skipped = Vec::new();
        let mut claims = AnchorClaims::new();
        let mut number_regions = ClaimSet::new();
        let mut detections = Vec::new();

        for (i, template) in templates.iter().enumerate() {
            debug_log!(
                debug,
                "🔍 Slice {}: template {}/{}: {}",
                slice.index,
                i + 1,
                templates.len(),
                template.display_name()
            );

            let result = match &search_gray {
                Some(gray) => self.matcher.find_matches_in_gray(gray, template),
                None => Err(ScanError::TemplateTooLarge {
                    template: template.name.clone(),
                    template_width: template.width(),
                    template_height: template.height(),
                    region_width: search.width.max(0) as u32,
                    region_height: search.height.max(0) as u32,
                }),
            };
            let points = match result {
                Ok(points) => points,
                Err(e) => {
                    log::warn!("⚠️ Skipping template {}: {}", template.name, e);
                    skipped.extend(SkippedUnit::from_error(
                        format!("slice {} / {}", slice.index, template.name),
                        &e,
                    ));
                    continue;
                }
            };

            let candidates = suppress_near_duplicates(&points, self.config.min_distance);
            for point in &candidates {
                let Some(anchor) = claims.claim(point, template, (search.x, search.y)) else {
                    debug_log!(debug, "  ↩️ Duplicate of a claimed coin: {}", point.describe(template));
                    continue;
                };
                debug_log!(debug, "  ✅ Coin {} score {:.3}", anchor.rect, anchor.score);

                if let Some(detection) = self.read_anchor(
                    slice,
                    slice_size,
                    anchor,
                    &mut number_regions,
                    &mut skipped,
                    engine,
                ) {
                    detections.push(detection);
                }
            }
        }

        let mut annotated = slice.image.clone();
        for detection in &detections {
            annotate_detection(
                &mut annotated,
                detection.anchor().rect,
                detection.number_region(),
                detection.name_region(),
                &self.config.annotation,
            );
        }

        SliceReport {
            slice_index: slice.index,
            origin: slice.origin,
            detections,
            skipped,
            annotated,
        }
    }

    /// Stage one reads the value strip; stage two derives and reads the
    /// name box only when stage one produced text.
    fn read_anchor(
        &self,
        slice: &Slice,
        slice_size: (u32, u32),
        anchor: AnchorDetection,
        number_regions: &mut ClaimSet,
        skipped: &mut Vec<SkippedUnit>,
        engine: &mut dyn OcrEngine,
    ) -> Option<Detection> {
        let layout = &self.config.layout;
        let unit = format!("slice {} / coin {}", slice.index, anchor.rect);

        let number_region = match derive_number_region(&anchor.rect, slice_size, layout) {
            Ok(region) => region,
            Err(e) => {
                log::warn!("⚠️ Number region skipped for {}: {}", unit, e);
                skipped.extend(SkippedUnit::from_error(format!("{unit} / number"), &e));
                return None;
            }
        };
        if !number_regions.try_claim(number_region) {
            log::debug!("  ↩️ Number region {} already read", number_region);
            skipped.push(SkippedUnit {
                unit: format!("{unit} / number"),
                reason: SkipReason::DuplicateNumberRegion,
                detail: format!("{number_region} overlaps a value strip already read"),
            });
            return None;
        }

        let number = self.dispatcher.recognize(
            engine,
            &slice.image,
            number_region,
            CharacterPolicy::DigitsAndComma,
        );
        record_sentinel(&number, number_region, &format!("{unit} / number"), skipped);

        let RecognitionResult::Text(number_text) = number else {
            log::info!("🔢 {}: no value ({})", unit, number);
            return Some(Detection::NumberOnly {
                anchor,
                number_region,
                number,
            });
        };

        let name_region = match derive_name_region(&anchor.rect, slice_size, layout) {
            Ok(region) => region,
            Err(e) => {
                log::warn!("⚠️ Name region skipped for {}: {}", unit, e);
                skipped.extend(SkippedUnit::from_error(format!("{unit} / name"), &e));
                return Some(Detection::NumberOnly {
                    anchor,
                    number_region,
                    number: RecognitionResult::Text(number_text),
                });
            }
        };

        let name = self.dispatcher.recognize(
            engine,
            &slice.image,
            name_region,
            CharacterPolicy::Unrestricted,
        );
        record_sentinel(&name, name_region, &format!("{unit} / name"), skipped);
        log::info!("🔢 Number: {}, Name: {}", number_text, name);

        Some(Detection::NumberAndName {
            anchor,
            number_region,
            number: number_text,
            name_region,
            name,
        })
    }
}

/// Recognition sentinels that correspond to skipped units
fn record_sentinel(
    result: &RecognitionResult,
    region: Rect,
    unit: &str,
    skipped: &mut Vec<SkippedUnit>,
) {
    let reason = match result {
        RecognitionResult::OutOfBounds => SkipReason::RegionOutOfBounds,
        RecognitionResult::EmptySource => SkipReason::EmptySourceCrop,
        _ => return,
    };
    skipped.push(SkippedUnit {
        unit: unit.to_string(),
        reason,
        detail: format!("{result} {region}"),
    });
}
