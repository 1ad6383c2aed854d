use coin_ocr_scan::args::Args;
use coin_ocr_scan::batch::{
    BatchRunner, CancelFlag, ResultSink, ScanEvent, ScreenshotSource, create_scan_channels,
};
use coin_ocr_scan::coin_scan::{CoinScanner, ScanResult, TemplateSet};
use coin_ocr_scan::ocr::{RecognitionDispatcher, default_engine_factory};
use coin_ocr_scan::run_config::RunConfig;
use std::sync::Arc;
use tokio::sync::mpsc;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("❌ Failed to start runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run(args)) {
        log::error!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> ScanResult<()> {
    let config = RunConfig::resolve(&args)?;

    let templates = TemplateSet::load_from_directory(&args.template_dir)?;
    if templates.is_empty() {
        log::warn!(
            "⚠️ No coin_template_*.png files in {}",
            args.template_dir.display()
        );
    } else {
        log::info!("📐 Loaded templates: {}", templates.names().join(", "));
    }

    let jobs = ScreenshotSource::new(&args.input_dir).jobs()?;
    let mut sink = ResultSink::new(&args.output_dir, args.report_path.clone());
    sink.prepare().await?;

    let scanner = CoinScanner::new(
        config.scan.clone(),
        RecognitionDispatcher::new(config.ocr.upscale_factor),
    );
    let runner = BatchRunner::new(scanner, args.worker_count());
    let cancel = CancelFlag::new();
    let (event_tx, event_rx) = create_scan_channels();

    let interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("⚠️ Interrupted, finishing images already in progress");
            interrupt.cancel();
        }
    });

    let (summary, ()) = tokio::join!(
        runner.run(
            jobs,
            Arc::new(templates),
            default_engine_factory(config.ocr.clone()),
            cancel,
            event_tx,
        ),
        consume_events(event_rx, &mut sink)
    );
    // Readings that came through are written even when the batch failed
    let report = sink.finish().await;
    let summary = summary?;

    if let Some(path) = report? {
        log::info!(
            "📝 {} reading(s) written to {}",
            sink.records().len(),
            path.display()
        );
    }
    if summary.failed_images > 0 {
        log::warn!("⚠️ {} image(s) could not be scanned", summary.failed_images);
    }
    Ok(())
}

async fn consume_events(mut events: mpsc::Receiver<ScanEvent>, sink: &mut ResultSink) {
    while let Some(event) = events.recv().await {
        match event {
            ScanEvent::Reading(record) => {
                log::info!(
                    "✅ number: {}, name: {}",
                    record.number,
                    record.name.as_deref().unwrap_or("(none)")
                );
                sink.record(record);
            }
            ScanEvent::SliceFinished { job, report } => {
                match sink.write_slice(&job, &report).await {
                    Ok(path) => log::debug!("🖼️ Saved {}", path.display()),
                    Err(e) => log::error!("❌ {}", e),
                }
            }
            ScanEvent::Skipped { job, slice, unit } => {
                log::debug!(
                    "{} slice {}: skipped {} ({:?})",
                    job.stem(),
                    slice,
                    unit.unit,
                    unit.reason
                );
            }
            ScanEvent::Finished(summary) => {
                log::debug!("🏁 {:?}", summary);
            }
            ScanEvent::ImageStarted { .. }
            | ScanEvent::ImageFailed { .. }
            | ScanEvent::WorkerFailed { .. } => {}
        }
    }
}
