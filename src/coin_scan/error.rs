use std::path::PathBuf;
use thiserror::Error;

use super::region::Rect;

/// A specialized `Result` type for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// The error type for the detection pipeline and its file adapters.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(
        "Template '{template}' ({template_width}x{template_height}) is larger than the search region ({region_width}x{region_height})"
    )]
    TemplateTooLarge {
        template: String,
        template_width: u32,
        template_height: u32,
        region_width: u32,
        region_height: u32,
    },

    #[error("Region {region} lies outside the {width}x{height} image")]
    RegionOutOfBounds { region: Rect, width: u32, height: u32 },

    #[error("Cropping region {region} produced an empty image")]
    EmptySourceCrop { region: Rect },

    #[error("Border crop leaves no pixels of the {width}x{height} image")]
    CropTooLarge { width: u32, height: u32 },

    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to encode image: {source}")]
    ImageEncode {
        #[from]
        source: image::ImageError,
    },

    #[error("Directory not found: {path:?}")]
    DirectoryNotFound { path: PathBuf },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {description}")]
    Config { description: String },

    #[error("No OCR engine could be started: {source}")]
    Engine {
        #[from]
        source: crate::ocr::OcrError,
    },

    #[error("Worker task failed to complete: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl ScanError {
    /// Errors that only skip one unit (template, region, crop) and never stop the batch
    pub fn is_unit_skip(&self) -> bool {
        matches!(
            self,
            ScanError::TemplateTooLarge { .. }
                | ScanError::RegionOutOfBounds { .. }
                | ScanError::EmptySourceCrop { .. }
        )
    }
}
