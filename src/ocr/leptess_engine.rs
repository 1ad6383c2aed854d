//! OCR engine linked against libtesseract through `leptess`
//!
//! One `LepTess` handle per character policy, created once and reused for
//! every region the owning worker recognizes.

use super::OcrEngine;
use super::error::{OcrError, OcrResult};
use super::types::{CharacterPolicy, OcrConfig};
use image::{GrayImage, ImageFormat};
use leptess::{LepTess, Variable};
use std::io::Cursor;

const ENGINE_NAME: &str = "tesseract/leptess";

pub struct LepTessEngine {
    digits: LepTess,
    names: LepTess,
}

fn init_error(languages: &str, e: impl std::fmt::Debug) -> OcrError {
    OcrError::EngineUnavailable {
        engine: ENGINE_NAME.to_string(),
        description: format!("failed to initialize '{languages}': {e:?}"),
    }
}

fn failed(e: impl std::fmt::Debug) -> OcrError {
    OcrError::Failed {
        engine: ENGINE_NAME.to_string(),
        description: format!("{e:?}"),
    }
}

/// Tesseract variables applied to the handle used for `policy`
fn engine_variables(config: &OcrConfig, policy: CharacterPolicy) -> Vec<(Variable, String)> {
    let mut variables = Vec::new();
    if let Some(whitelist) = policy.whitelist() {
        variables.push((Variable::TesseditCharWhitelist, whitelist.to_string()));
    }
    if let Some(psm) = config.page_segmentation {
        variables.push((Variable::TesseditPagesegMode, psm.to_string()));
    }
    variables
}

fn open_handle(
    data_path: Option<&str>,
    config: &OcrConfig,
    policy: CharacterPolicy,
) -> OcrResult<LepTess> {
    let languages = config.languages_for(policy);
    let mut handle = LepTess::new(data_path, languages).map_err(|e| init_error(languages, e))?;
    for (variable, value) in engine_variables(config, policy) {
        handle.set_variable(variable, &value).map_err(failed)?;
    }
    Ok(handle)
}

impl LepTessEngine {
    pub fn new(config: &OcrConfig) -> OcrResult<Self> {
        let data_path = config
            .tessdata_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string());

        Ok(Self {
            digits: open_handle(data_path.as_deref(), config, CharacterPolicy::DigitsAndComma)?,
            names: open_handle(data_path.as_deref(), config, CharacterPolicy::Unrestricted)?,
        })
    }
}

impl OcrEngine for LepTessEngine {
    fn name(&self) -> &str {
        ENGINE_NAME
    }

    fn recognize_text(&mut self, image: &GrayImage, policy: CharacterPolicy) -> OcrResult<String> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let handle = match policy {
            CharacterPolicy::DigitsAndComma => &mut self.digits,
            CharacterPolicy::Unrestricted => &mut self.names,
        };
        handle.set_image_from_mem(&png).map_err(failed)?;
        handle.get_utf8_text().map_err(failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_segmentation_applies_to_both_handles() {
        let config = OcrConfig {
            page_segmentation: Some(7),
            ..OcrConfig::default()
        };

        let digits = engine_variables(&config, CharacterPolicy::DigitsAndComma);
        assert_eq!(digits.len(), 2);
        assert!(matches!(digits[0].0, Variable::TesseditCharWhitelist));
        assert_eq!(digits[0].1, "0123456789,");
        assert!(matches!(digits[1].0, Variable::TesseditPagesegMode));
        assert_eq!(digits[1].1, "7");

        let names = engine_variables(&config, CharacterPolicy::Unrestricted);
        assert_eq!(names.len(), 1);
        assert!(matches!(names[0].0, Variable::TesseditPagesegMode));
    }

    #[test]
    fn test_no_page_segmentation_by_default() {
        let names = engine_variables(&OcrConfig::default(), CharacterPolicy::Unrestricted);
        assert!(names.is_empty());
    }
}
