pub mod args;
pub mod batch;
pub mod coin_scan;
pub mod ocr;
pub mod run_config;
pub mod template_matching;

pub use batch::{BatchRunner, BatchSummary, ReadingRecord, ScanEvent};
pub use coin_scan::{CoinScanner, ScanConfig, ScanError, ScanResult, TemplateSet};
pub use run_config::RunConfig;
