//! OCR policies, results and configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Constraint placed on what the OCR engine may return for a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterPolicy {
    /// Coin values: digits and the thousands separator
    DigitsAndComma,
    /// Player names: any script the configured languages cover
    Unrestricted,
}

impl CharacterPolicy {
    pub const DIGITS_AND_COMMA: &'static str = "0123456789,";

    /// Characters the engine is restricted to, if any
    pub fn whitelist(&self) -> Option<&'static str> {
        match self {
            CharacterPolicy::DigitsAndComma => Some(Self::DIGITS_AND_COMMA),
            CharacterPolicy::Unrestricted => None,
        }
    }

    /// Names are small glyphs and are enlarged before recognition
    pub fn upscales(&self) -> bool {
        matches!(self, CharacterPolicy::Unrestricted)
    }
}

/// Outcome of recognizing one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecognitionResult {
    /// The engine ran but returned nothing but whitespace
    Empty,
    /// The region failed the containment check, nothing was extracted
    OutOfBounds,
    /// The extracted crop had no pixels
    EmptySource,
    Text(String),
}

impl RecognitionResult {
    /// Trim raw engine output, mapping blank output to [`RecognitionResult::Empty`]
    pub fn from_raw(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            RecognitionResult::Empty
        } else {
            RecognitionResult::Text(trimmed.to_string())
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            RecognitionResult::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, RecognitionResult::Text(_))
    }
}

impl std::fmt::Display for RecognitionResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecognitionResult::Empty => write!(f, "(none)"),
            RecognitionResult::OutOfBounds => write!(f, "(out of bounds)"),
            RecognitionResult::EmptySource => write!(f, "(empty image)"),
            RecognitionResult::Text(text) => write!(f, "{text}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Tesseract executable used by the CLI engine
    pub binary: PathBuf,
    /// Directory holding `*.traineddata`; engine default when unset
    pub tessdata_dir: Option<PathBuf>,
    /// Languages for [`CharacterPolicy::DigitsAndComma`] regions
    pub number_languages: String,
    /// Languages for [`CharacterPolicy::Unrestricted`] regions
    pub name_languages: String,
    /// Scale applied to name regions before binarization
    pub upscale_factor: f32,
    /// Tesseract page segmentation mode; engine default when unset
    pub page_segmentation: Option<u32>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("tesseract"),
            tessdata_dir: None,
            number_languages: "eng".to_string(),
            name_languages: "jpn+eng".to_string(),
            upscale_factor: 2.8,
            page_segmentation: None,
        }
    }
}

impl OcrConfig {
    /// Language list for a policy, e.g. "jpn+eng"
    pub fn languages_for(&self, policy: CharacterPolicy) -> &str {
        match policy {
            CharacterPolicy::DigitsAndComma => &self.number_languages,
            CharacterPolicy::Unrestricted => &self.name_languages,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for languages in [&self.number_languages, &self.name_languages] {
            let valid = !languages.is_empty()
                && languages.split('+').all(|lang| {
                    !lang.is_empty() && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                });
            if !valid {
                return Err(format!("invalid OCR language list '{languages}'"));
            }
        }
        if !(self.upscale_factor.is_finite() && self.upscale_factor > 0.0) {
            return Err(format!("upscale_factor {} must be positive", self.upscale_factor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_trims_and_sentinelizes() {
        assert_eq!(RecognitionResult::from_raw("  \n\t"), RecognitionResult::Empty);
        assert_eq!(RecognitionResult::from_raw(""), RecognitionResult::Empty);
        assert_eq!(
            RecognitionResult::from_raw(" 1,250\n"),
            RecognitionResult::Text("1,250".to_string())
        );
    }

    #[test]
    fn test_only_text_counts_as_value() {
        assert!(RecognitionResult::from_raw("1,250").is_text());
        for sentinel in [
            RecognitionResult::Empty,
            RecognitionResult::OutOfBounds,
            RecognitionResult::EmptySource,
        ] {
            assert!(!sentinel.is_text());
            assert_eq!(sentinel.text(), None);
        }
    }

    #[test]
    fn test_policy_whitelist() {
        assert_eq!(CharacterPolicy::DigitsAndComma.whitelist(), Some("0123456789,"));
        assert_eq!(CharacterPolicy::Unrestricted.whitelist(), None);
        assert!(CharacterPolicy::Unrestricted.upscales());
        assert!(!CharacterPolicy::DigitsAndComma.upscales());
    }

    #[test]
    fn test_config_languages() {
        let config = OcrConfig::default();
        assert_eq!(config.languages_for(CharacterPolicy::DigitsAndComma), "eng");
        assert_eq!(config.languages_for(CharacterPolicy::Unrestricted), "jpn+eng");
        assert!(config.validate().is_ok());

        let bad = OcrConfig {
            name_languages: "jpn+;rm".to_string(),
            ..OcrConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
