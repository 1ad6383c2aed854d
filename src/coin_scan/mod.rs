//! Coin detection pipeline for result-screen screenshots
//!
//! Screenshots are cropped and split into slices; each slice is searched for
//! coin templates, duplicate hits are merged, and the value and name regions
//! next to each coin are derived and handed to OCR.

pub mod annotate;
pub mod config;
pub mod dedup;
pub mod derive;
pub mod detector;
pub mod error;
pub mod partition;
pub mod region;
pub mod template;


// Re-export main types and functions
pub use config::{
    AnnotationStyle, BorderCrop, RegionLayout, ScanConfig, SearchBand, create_full_frame_config,
    create_screenshot_layout_config,
};
pub use dedup::{AnchorClaims, AnchorDetection, ClaimSet, is_near, suppress_near_duplicates};
pub use derive::{derive_name_region, derive_number_region};
pub use detector::{CoinScanner, Detection, SkipReason, SkippedUnit, SliceReport};
pub use error::{ScanError, ScanResult};
pub use partition::{Slice, SliceIter, partition};
pub use region::Rect;
pub use template::{TEMPLATE_PREFIX, TemplateSet};
