//! Batch scanning of a screenshot directory
//!
//! Screenshots are handed to a pool of blocking workers, each owning one OCR
//! engine. Progress, readings and annotated slices flow back to the caller as
//! [`ScanEvent`]s.

pub mod channels;
pub mod runner;
pub mod sink;
pub mod source;
pub mod types;

pub use channels::create_scan_channels;
pub use runner::BatchRunner;
pub use sink::{ResultSink, slice_file_name, timestamp};
pub use source::ScreenshotSource;
pub use types::{BatchSummary, CancelFlag, ReadingRecord, ScanEvent, ScanJob};
