//! Worker pool that scans screenshots in parallel

use super::types::{BatchSummary, CancelFlag, ReadingRecord, ScanEvent, ScanJob};
use crate::coin_scan::{CoinScanner, ScanError, ScanResult, TemplateSet};
use crate::ocr::{EngineFactory, OcrEngine, OcrResult};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

pub struct BatchRunner {
    scanner: Arc<CoinScanner>,
    workers: usize,
}

impl BatchRunner {
    pub fn new(scanner: CoinScanner, workers: usize) -> Self {
        Self {
            scanner: Arc::new(scanner),
            workers: workers.max(1),
        }
    }

    /// Scan every job and report progress on `events`. A worker that cannot
    /// start an engine or panics is counted and the others carry on; the run
    /// fails only when no worker finished.
    pub async fn run(
        &self,
        jobs: Vec<ScanJob>,
        templates: Arc<TemplateSet>,
        engine_factory: EngineFactory,
        cancel: CancelFlag,
        events: mpsc::Sender<ScanEvent>,
    ) -> ScanResult<BatchSummary> {
        let worker_count = self.workers.min(jobs.len()).max(1);
        log::info!(
            "🚀 Scanning {} image(s) with {} worker(s) and {} template(s)",
            jobs.len(),
            worker_count,
            templates.len()
        );

        let queue = Arc::new(Mutex::new(VecDeque::from(jobs)));
        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let context = Worker {
                id: worker,
                scanner: Arc::clone(&self.scanner),
                templates: Arc::clone(&templates),
                queue: Arc::clone(&queue),
                factory: Arc::clone(&engine_factory),
                cancel: cancel.clone(),
                events: events.clone(),
            };
            handles.push(tokio::task::spawn_blocking(move || context.run()));
        }

        let mut summary = BatchSummary::default();
        let mut finished = 0;
        let mut failure = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(Ok(stats)) => {
                    finished += 1;
                    summary.merge(stats);
                }
                Ok(Err(e)) => {
                    summary.failed_workers += 1;
                    failure.get_or_insert(ScanError::Engine { source: e });
                }
                Err(e) => {
                    // The image in hand and this worker's counters are lost
                    log::error!("❌ Worker {} stopped: {}", worker, e);
                    summary.failed_workers += 1;
                    let _ = events
                        .send(ScanEvent::WorkerFailed {
                            worker,
                            error: e.to_string(),
                        })
                        .await;
                    failure.get_or_insert(ScanError::Join { source: e });
                }
            }
        }

        match failure {
            Some(e) if finished == 0 => return Err(e),
            Some(_) => log::warn!(
                "⚠️ {} worker(s) failed; the rest finished the batch",
                summary.failed_workers
            ),
            None => {}
        }

        log::info!(
            "✅ Batch done: {} image(s), {} failed, {} slice(s), {} reading(s), {} skipped{}",
            summary.images,
            summary.failed_images,
            summary.slices,
            summary.readings,
            summary.skipped.len(),
            if summary.cancelled { " (cancelled)" } else { "" }
        );
        let _ = events.send(ScanEvent::Finished(summary.clone())).await;
        Ok(summary)
    }
}

/// State moved onto one blocking worker thread
struct Worker {
    id: usize,
    scanner: Arc<CoinScanner>,
    templates: Arc<TemplateSet>,
    queue: Arc<Mutex<VecDeque<ScanJob>>>,
    factory: EngineFactory,
    cancel: CancelFlag,
    events: mpsc::Sender<ScanEvent>,
}

impl Worker {
    fn run(self) -> OcrResult<BatchSummary> {
        let mut engine = match (self.factory)() {
            Ok(engine) => engine,
            Err(e) => {
                log::error!("❌ Worker {} could not start OCR engine: {}", self.id, e);
                self.emit(ScanEvent::WorkerFailed {
                    worker: self.id,
                    error: e.to_string(),
                });
                return Err(e);
            }
        };
        log::debug!("🔧 Worker {} using OCR engine {}", self.id, engine.name());

        let mut summary = BatchSummary::default();
        loop {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let Some(job) = self.next_job() else {
                break;
            };
            self.scan_job(job, engine.as_mut(), &mut summary);
        }
        Ok(summary)
    }

    fn next_job(&self) -> Option<ScanJob> {
        self.queue.lock().ok()?.pop_front()
    }

    fn emit(&self, event: ScanEvent) {
        // Receiver gone means nobody is listening; scanning carries on
        let _ = self.events.blocking_send(event);
    }

    fn fail(&self, job: ScanJob, error: ScanError, summary: &mut BatchSummary) {
        log::error!("❌ {}", error);
        summary.failed_images += 1;
        self.emit(ScanEvent::ImageFailed {
            job,
            error: error.to_string(),
        });
    }

    fn scan_job(&self, job: ScanJob, engine: &mut dyn OcrEngine, summary: &mut BatchSummary) {
        log::info!("📸 Worker {} scanning {}", self.id, job.path.display());
        self.emit(ScanEvent::ImageStarted {
            job: job.clone(),
            worker: self.id,
        });

        let image = match image::open(&job.path) {
            Ok(image) => image.to_rgb8(),
            Err(source) => {
                let path = job.path.clone();
                self.fail(job, ScanError::ImageLoad { path, source }, summary);
                return;
            }
        };

        let reports = match self
            .scanner
            .scan_image(&image, self.templates.templates(), engine)
        {
            Ok(reports) => reports,
            Err(e) => {
                self.fail(job, e, summary);
                return;
            }
        };

        summary.images += 1;
        let stem = job.stem();
        for report in reports {
            summary.slices += 1;
            summary.detections += report.detections.len();

            for unit in &report.skipped {
                summary.skipped.push(unit.clone());
                self.emit(ScanEvent::Skipped {
                    job: job.clone(),
                    slice: report.slice_index,
                    unit: unit.clone(),
                });
            }
            for record in ReadingRecord::from_report(&stem, &report) {
                summary.readings += 1;
                self.emit(ScanEvent::Reading(record));
            }
            self.emit(ScanEvent::SliceFinished {
                job: job.clone(),
                report,
            });
        }
    }
}
