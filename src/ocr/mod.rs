//! Text recognition for the regions derived around each coin
//!
//! The OCR engine itself is a collaborator behind [`OcrEngine`]; this module
//! owns region validation, preprocessing and the per-region character policy.

pub mod dispatcher;
pub mod error;
#[cfg(feature = "leptess")]
pub mod leptess_engine;
pub mod preprocess;
pub mod tesseract;
pub mod types;

use image::GrayImage;
use std::sync::Arc;

pub use dispatcher::RecognitionDispatcher;
pub use error::{OcrError, OcrResult};
#[cfg(feature = "leptess")]
pub use leptess_engine::LepTessEngine;
pub use tesseract::TesseractCli;
pub use types::{CharacterPolicy, OcrConfig, RecognitionResult};

/// A text-from-image service. Instances are not assumed to be safe for
/// concurrent use; every worker owns its own.
pub trait OcrEngine {
    fn name(&self) -> &str;

    /// Raw text for a single-channel, binarized region
    fn recognize_text(&mut self, image: &GrayImage, policy: CharacterPolicy) -> OcrResult<String>;
}

/// Builds one engine per worker, called on the worker's own thread
pub type EngineFactory = Arc<dyn Fn() -> OcrResult<Box<dyn OcrEngine>> + Send + Sync>;

/// Factory for the engine selected at build time
pub fn default_engine_factory(config: OcrConfig) -> EngineFactory {
    Arc::new(move || -> OcrResult<Box<dyn OcrEngine>> {
        #[cfg(feature = "leptess")]
        {
            Ok(Box::new(LepTessEngine::new(&config)?))
        }
        #[cfg(not(feature = "leptess"))]
        {
            Ok(Box::new(TesseractCli::new(config.clone())?))
        }
    })
}
