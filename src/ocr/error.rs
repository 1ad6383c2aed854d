use thiserror::Error;

/// A specialized `Result` type for OCR engine calls.
pub type OcrResult<T> = Result<T, OcrError>;

/// The error type for OCR engine construction and recognition.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("OCR engine '{engine}' is not available: {description}")]
    EngineUnavailable { engine: String, description: String },

    #[error("Invalid OCR language list '{languages}'")]
    InvalidLanguage { languages: String },

    #[error("Failed to encode region for OCR: {source}")]
    Encode {
        #[from]
        source: image::ImageError,
    },

    #[error("OCR process I/O failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("OCR engine '{engine}' failed: {description}")]
    Failed { engine: String, description: String },
}
