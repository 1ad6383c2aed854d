// Communication channel for batch progress
use super::types::ScanEvent;
use tokio::sync::mpsc;

/// Events are buffered so slow output writing does not stall the workers for long
pub const EVENT_BUFFER: usize = 32;

/// Helper function to create the scan event channel
pub fn create_scan_channels() -> (mpsc::Sender<ScanEvent>, mpsc::Receiver<ScanEvent>) {
    mpsc::channel(EVENT_BUFFER)
}
