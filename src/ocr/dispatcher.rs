//! Boundary-safe recognition of one region of a slice

use super::OcrEngine;
use super::preprocess::preprocess_region;
use super::types::{CharacterPolicy, RecognitionResult};
use crate::coin_scan::region::Rect;
use image::RgbImage;

/// Validates, extracts and normalizes regions before handing them to an engine
#[derive(Debug, Clone, Copy)]
pub struct RecognitionDispatcher {
    upscale_factor: f32,
}

impl RecognitionDispatcher {
    pub fn new(upscale_factor: f32) -> Self {
        Self { upscale_factor }
    }

    /// Recognize `region` of `image` under `policy`.
    ///
    /// Never fails: containment and extraction problems become sentinel
    /// results and an engine error is logged and reported as
    /// [`RecognitionResult::Empty`].
    pub fn recognize(
        &self,
        engine: &mut dyn OcrEngine,
        image: &RgbImage,
        region: Rect,
        policy: CharacterPolicy,
    ) -> RecognitionResult {
        if !region.fits_within(image.width(), image.height()) {
            log::warn!(
                "⚠️ Invalid ROI {} for {}x{} image",
                region,
                image.width(),
                image.height()
            );
            return RecognitionResult::OutOfBounds;
        }

        let (x, y, w, h) = region.to_crop();
        let cropped = image::imageops::crop_imm(image, x, y, w, h).to_image();
        if cropped.width() == 0 || cropped.height() == 0 {
            log::warn!("⚠️ Crop of {} produced an empty image", region);
            return RecognitionResult::EmptySource;
        }

        let processed = preprocess_region(&cropped, policy, self.upscale_factor);
        match engine.recognize_text(&processed, policy) {
            Ok(raw) => RecognitionResult::from_raw(&raw),
            Err(e) => {
                log::warn!("⚠️ {} failed on {}: {}", engine.name(), region, e);
                RecognitionResult::Empty
            }
        }
    }
}

impl Default for RecognitionDispatcher {
    fn default() -> Self {
        Self::new(2.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::error::{OcrError, OcrResult};
    use image::{GrayImage, Rgb};

    /// Records what it was asked to read and answers from a script
    struct ScriptedEngine {
        answer: OcrResult<String>,
        seen: Vec<(u32, u32, CharacterPolicy)>,
    }

    impl ScriptedEngine {
        fn answering(text: &str) -> Self {
            Self {
                answer: Ok(text.to_string()),
                seen: Vec::new(),
            }
        }
    }

    impl OcrEngine for ScriptedEngine {
        fn name(&self) -> &str {
            "scripted"
        }

        fn recognize_text(&mut self, image: &GrayImage, policy: CharacterPolicy) -> OcrResult<String> {
            self.seen.push((image.width(), image.height(), policy));
            match &self.answer {
                Ok(text) => Ok(text.clone()),
                Err(_) => Err(OcrError::Failed {
                    engine: "scripted".to_string(),
                    description: "boom".to_string(),
                }),
            }
        }
    }

    fn slice() -> RgbImage {
        RgbImage::from_pixel(900, 600, Rgb([200, 200, 200]))
    }

    #[test]
    fn test_out_of_bounds_never_reaches_engine() {
        let mut engine = ScriptedEngine::answering("123");
        let result = RecognitionDispatcher::default().recognize(
            &mut engine,
            &slice(),
            Rect::new(0, -25, 260, 30),
            CharacterPolicy::Unrestricted,
        );
        assert_eq!(result, RecognitionResult::OutOfBounds);
        assert!(engine.seen.is_empty());
    }

    #[test]
    fn test_zero_area_region_is_out_of_bounds() {
        let mut engine = ScriptedEngine::answering("123");
        let result = RecognitionDispatcher::default().recognize(
            &mut engine,
            &slice(),
            Rect::new(900, 100, 0, 30),
            CharacterPolicy::DigitsAndComma,
        );
        assert_eq!(result, RecognitionResult::OutOfBounds);
    }

    #[test]
    fn test_digits_region_sent_at_native_size() {
        let mut engine = ScriptedEngine::answering(" 1,250 \n");
        let result = RecognitionDispatcher::default().recognize(
            &mut engine,
            &slice(),
            Rect::new(740, 100, 160, 30),
            CharacterPolicy::DigitsAndComma,
        );
        assert_eq!(result, RecognitionResult::Text("1,250".to_string()));
        assert_eq!(engine.seen, vec![(160, 30, CharacterPolicy::DigitsAndComma)]);
    }

    #[test]
    fn test_name_region_is_upscaled() {
        let mut engine = ScriptedEngine::answering("プレイヤー");
        RecognitionDispatcher::new(2.8).recognize(
            &mut engine,
            &slice(),
            Rect::new(0, 175, 260, 30),
            CharacterPolicy::Unrestricted,
        );
        assert_eq!(engine.seen, vec![(728, 84, CharacterPolicy::Unrestricted)]);
    }

    #[test]
    fn test_engine_failure_maps_to_empty() {
        let mut engine = ScriptedEngine {
            answer: Err(OcrError::Failed {
                engine: "scripted".to_string(),
                description: "boom".to_string(),
            }),
            seen: Vec::new(),
        };
        let result = RecognitionDispatcher::default().recognize(
            &mut engine,
            &slice(),
            Rect::new(740, 100, 160, 30),
            CharacterPolicy::DigitsAndComma,
        );
        assert_eq!(result, RecognitionResult::Empty);
        assert_eq!(engine.seen.len(), 1);
    }
}
