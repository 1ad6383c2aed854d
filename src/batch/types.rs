// Types for batch scanning
use crate::coin_scan::{Rect, SkippedUnit, SliceReport};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// One screenshot waiting to be scanned
#[derive(Debug, Clone, PartialEq)]
pub struct ScanJob {
    pub id: usize,
    pub path: PathBuf,
}

/// Progress reported by the batch workers
#[derive(Debug)]
pub enum ScanEvent {
    ImageStarted { job: ScanJob, worker: usize },
    SliceFinished { job: ScanJob, report: SliceReport },
    Reading(ReadingRecord),
    Skipped { job: ScanJob, slice: usize, unit: SkippedUnit },
    ImageFailed { job: ScanJob, error: String },
    WorkerFailed { worker: usize, error: String },
    Finished(BatchSummary),
}

impl ScanJob {
    /// File stem used in output names and reading records
    pub fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("image{}", self.id))
    }
}

/// Batch-level cancellation. Workers finish the image in hand and take no new one.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A successfully read value, with the name when one was read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingRecord {
    pub image: String,
    pub slice: usize,
    pub anchor: Rect,
    pub template: String,
    pub number: String,
    pub name: Option<String>,
}

impl ReadingRecord {
    pub fn from_report(image: &str, report: &SliceReport) -> Vec<Self> {
        report
            .detections
            .iter()
            .filter_map(|detection| {
                detection.reading().map(|(number, name)| Self {
                    image: image.to_string(),
                    slice: report.slice_index,
                    anchor: detection.anchor().rect,
                    template: detection.anchor().template.clone(),
                    number,
                    name,
                })
            })
            .collect()
    }
}

/// Counters for one worker or a whole batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub images: usize,
    pub failed_images: usize,
    pub slices: usize,
    pub detections: usize,
    pub readings: usize,
    pub skipped: Vec<SkippedUnit>,
    /// Workers that never started or stopped early
    pub failed_workers: usize,
    pub cancelled: bool,
}

impl BatchSummary {
    pub fn merge(&mut self, other: BatchSummary) {
        self.images += other.images;
        self.failed_images += other.failed_images;
        self.slices += other.slices;
        self.detections += other.detections;
        self.readings += other.readings;
        self.skipped.extend(other.skipped);
        self.failed_workers += other.failed_workers;
        self.cancelled |= other.cancelled;
    }
}
