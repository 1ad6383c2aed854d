//! Screenshot discovery

use super::types::ScanJob;
use crate::coin_scan::{ScanError, ScanResult};
use std::path::PathBuf;

/// A directory of `*.png` screenshots, scanned in file-name order
#[derive(Debug, Clone)]
pub struct ScreenshotSource {
    directory: PathBuf,
}

impl ScreenshotSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn list(&self) -> ScanResult<Vec<PathBuf>> {
        if !self.directory.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: self.directory.clone(),
            });
        }

        let entries = std::fs::read_dir(&self.directory).map_err(|source| ScanError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
            })
            .collect();
        paths.sort();
        Ok(paths)
    }

    /// Numbered jobs for the batch runner
    pub fn jobs(&self) -> ScanResult<Vec<ScanJob>> {
        Ok(self
            .list()?
            .into_iter()
            .enumerate()
            .map(|(id, path)| ScanJob { id, path })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_png_sorted() {
        let dir = std::env::temp_dir().join(format!("coin-ocr-scan-source-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("nested.png")).unwrap();
        for name in ["b.png", "a.PNG", "notes.txt", "c.jpg"] {
            std::fs::write(dir.join(name), b"x").unwrap();
        }

        let source = ScreenshotSource::new(&dir);
        let jobs = source.jobs().unwrap();
        let names: Vec<String> = jobs
            .iter()
            .map(|j| j.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.png"]);
        assert_eq!(jobs[1].id, 1);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_directory() {
        let source = ScreenshotSource::new("/nonexistent/screenshots");
        assert!(matches!(
            source.list(),
            Err(ScanError::DirectoryNotFound { .. })
        ));
    }
}
