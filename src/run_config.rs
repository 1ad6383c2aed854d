//! Settings for one run: scan layout plus OCR engine, optionally from JSON

use crate::args::Args;
use crate::coin_scan::{ScanError, ScanResult, ScanConfig, create_full_frame_config};
use crate::ocr::OcrConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub scan: ScanConfig,
    pub ocr: OcrConfig,
}

impl RunConfig {
    /// Missing keys keep their defaults
    pub fn from_json(text: &str) -> ScanResult<Self> {
        serde_json::from_str(text).map_err(|e| ScanError::Config {
            description: e.to_string(),
        })
    }

    pub fn load(path: &Path) -> ScanResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ScanError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Config file (or defaults) with command-line overrides applied, validated
    pub fn resolve(args: &Args) -> ScanResult<Self> {
        let mut config = match &args.config_path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if args.full_frame {
            let preset = create_full_frame_config();
            config.scan.border_crop = preset.border_crop;
            config.scan.slice_count = preset.slice_count;
            config.scan.search_band = preset.search_band;
        }
        if let Some(dir) = &args.tessdata_dir {
            config.ocr.tessdata_dir = Some(dir.clone());
        }
        if args.debug_mode {
            config.scan.debug_enabled = true;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ScanResult<()> {
        self.scan
            .validate()
            .and_then(|_| self.ocr.validate())
            .map_err(|description| ScanError::Config { description })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin_scan::BorderCrop;
    use std::path::PathBuf;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RunConfig::from_json(
            r#"{ "scan": { "match_threshold": 0.7 }, "ocr": { "name_languages": "jpn" } }"#,
        )
        .unwrap();
        assert_eq!(config.scan.match_threshold, 0.7);
        assert_eq!(config.scan.slice_count, 3);
        assert_eq!(config.ocr.name_languages, "jpn");
        assert_eq!(config.ocr.number_languages, "eng");
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            RunConfig::from_json("{ scan: }"),
            Err(ScanError::Config { .. })
        ));
    }

    #[test]
    fn test_args_override_file() {
        let path = std::env::temp_dir().join(format!("coin-ocr-scan-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "scan": { "min_distance": 12 } }"#).unwrap();
        let args = Args {
            config_path: Some(path.clone()),
            tessdata_dir: Some(PathBuf::from("/opt/tessdata")),
            full_frame: true,
            debug_mode: true,
            ..Args::default()
        };

        let config = RunConfig::resolve(&args).unwrap();
        assert_eq!(config.scan.min_distance, 12);
        assert_eq!(config.scan.slice_count, 1);
        assert_eq!(config.scan.border_crop, BorderCrop::NONE);
        assert!(config.scan.debug_enabled);
        assert_eq!(config.ocr.tessdata_dir, Some(PathBuf::from("/opt/tessdata")));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_invalid_values_rejected() {
        let config = RunConfig::from_json(r#"{ "scan": { "slice_count": 0 } }"#).unwrap();
        assert!(matches!(config.validate(), Err(ScanError::Config { .. })));
        let config = RunConfig::from_json(r#"{ "ocr": { "name_languages": "jpn eng" } }"#).unwrap();
        assert!(config.validate().is_err());
    }
}
