//! Output of annotated slices and the readings report

use super::types::{ReadingRecord, ScanJob};
use crate::coin_scan::{ScanError, ScanResult, SliceReport};
use image::ImageFormat;
use std::io::Cursor;
use std::path::PathBuf;
use time::OffsetDateTime;
use time::macros::format_description;

/// `yyyyMMdd_HHmmssfff`
pub fn timestamp(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[year][month][day]_[hour][minute][second][subsecond digits:3]"
    );
    at.format(&format)
        .unwrap_or_else(|_| (at.unix_timestamp_nanos() / 1_000_000).to_string())
}

pub fn slice_file_name(stem: &str, slice_index: usize, at: OffsetDateTime) -> String {
    format!("slice_{}_{}_{}.png", stem, slice_index, timestamp(at))
}

/// Writes annotated slices into the output directory and collects reading records
#[derive(Debug)]
pub struct ResultSink {
    output_dir: PathBuf,
    report_path: Option<PathBuf>,
    records: Vec<ReadingRecord>,
}

impl ResultSink {
    pub fn new(output_dir: impl Into<PathBuf>, report_path: Option<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            report_path,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[ReadingRecord] {
        &self.records
    }

    pub async fn prepare(&self) -> ScanResult<()> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ScanError::Io {
                path: self.output_dir.clone(),
                source,
            })
    }

    pub async fn write_slice(&self, job: &ScanJob, report: &SliceReport) -> ScanResult<PathBuf> {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        let path = self
            .output_dir
            .join(slice_file_name(&job.stem(), report.slice_index, now));

        let mut bytes = Vec::new();
        report
            .annotated
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(path)
    }

    pub fn record(&mut self, record: ReadingRecord) {
        self.records.push(record);
    }

    /// Write collected readings as JSON lines when a report file was requested
    pub async fn finish(&self) -> ScanResult<Option<PathBuf>> {
        let Some(path) = &self.report_path else {
            return Ok(None);
        };

        let mut lines = String::new();
        for record in &self.records {
            let line = serde_json::to_string(record).map_err(|e| ScanError::Io {
                path: path.clone(),
                source: std::io::Error::other(e),
            })?;
            lines.push_str(&line);
            lines.push('\n');
        }

        tokio::fs::write(path, lines)
            .await
            .map_err(|source| ScanError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Some(path.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coin_scan::Rect;
    use image::{Rgb, RgbImage};
    use time::macros::datetime;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("coin-ocr-scan-sink-{}-{}", label, std::process::id()))
    }

    fn report(index: usize) -> SliceReport {
        SliceReport {
            slice_index: index,
            origin: Rect::new(0, 0, 8, 6),
            detections: Vec::new(),
            skipped: Vec::new(),
            annotated: RgbImage::from_pixel(8, 6, Rgb([0, 255, 0])),
        }
    }

    #[test]
    fn test_timestamp_format() {
        let at = datetime!(2024-03-07 09:05:01.042 UTC);
        assert_eq!(timestamp(at), "20240307_090501042");
        assert_eq!(
            slice_file_name("shot", 2, at),
            "slice_shot_2_20240307_090501042.png"
        );
    }

    #[tokio::test]
    async fn test_write_slice_png() {
        let dir = temp_dir("png");
        let _ = std::fs::remove_dir_all(&dir);
        let sink = ResultSink::new(&dir, None);
        sink.prepare().await.unwrap();

        let job = ScanJob {
            id: 0,
            path: PathBuf::from("ScreenShot/result.png"),
        };
        let path = sink.write_slice(&job, &report(1)).await.unwrap();

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("slice_result_1_"));
        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.dimensions(), (8, 6));
        assert_eq!(written.get_pixel(3, 3).0, [0, 255, 0]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_report_json_lines() {
        let dir = temp_dir("report");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let report_path = dir.join("readings.jsonl");
        let mut sink = ResultSink::new(&dir, Some(report_path.clone()));

        for (number, name) in [("1,250", Some("たろう")), ("980", None)] {
            sink.record(ReadingRecord {
                image: "shot".to_string(),
                slice: 0,
                anchor: Rect::new(700, 100, 40, 40),
                template: "coin_template_1".to_string(),
                number: number.to_string(),
                name: name.map(str::to_string),
            });
        }

        assert_eq!(sink.finish().await.unwrap(), Some(report_path.clone()));
        let text = std::fs::read_to_string(&report_path).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["number"], "1,250");
        assert_eq!(lines[0]["name"], "たろう");
        assert!(lines[1]["name"].is_null());
        assert_eq!(lines[1]["anchor"]["x"], 700);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_no_report_path() {
        let sink = ResultSink::new(temp_dir("none"), None);
        assert_eq!(sink.finish().await.unwrap(), None);
    }
}
