//! Coin template loading

use super::error::{ScanError, ScanResult};
use crate::template_matching::Template;
use std::path::{Path, PathBuf};

/// Only files named `coin_template_*.png` are loaded as templates
pub const TEMPLATE_PREFIX: &str = "coin_template_";

/// Ordered, immutable collection of coin variants
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
}

impl TemplateSet {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    pub fn is_template_file(file_name: &str) -> bool {
        file_name.starts_with(TEMPLATE_PREFIX) && file_name.to_ascii_lowercase().ends_with(".png")
    }

    /// Scan directory for coin template files and load them as grayscale,
    /// sorted by file name. Unreadable files are skipped with a warning.
    pub fn load_from_directory(directory: &Path) -> ScanResult<Self> {
        if !directory.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        let entries = std::fs::read_dir(directory).map_err(|source| ScanError::Io {
            path: directory.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(Self::is_template_file)
            })
            .collect();
        paths.sort();

        let mut templates = Vec::with_capacity(paths.len());
        for path in paths {
            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();
            match image::open(&path) {
                Ok(img) => {
                    let gray = img.to_luma8();
                    if gray.width() == 0 || gray.height() == 0 {
                        log::warn!("⚠️ Empty template skipped: {}", path.display());
                        continue;
                    }
                    log::debug!("📐 Template {} {}x{}", name, gray.width(), gray.height());
                    templates.push(Template::new(name, gray));
                }
                Err(e) => {
                    log::warn!("⚠️ Failed to load template {}: {}", path.display(), e);
                }
            }
        }

        Ok(Self { templates })
    }

    /// Get all loaded templates
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn names(&self) -> Vec<String> {
        self.templates.iter().map(|t| t.name.clone()).collect()
    }

    /// Get template count
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "coin-ocr-scan-{}-{}",
            label,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_template_file_filter() {
        assert!(TemplateSet::is_template_file("coin_template_silver.png"));
        assert!(TemplateSet::is_template_file("coin_template_2.PNG"));
        assert!(!TemplateSet::is_template_file("coin_silver.png"));
        assert!(!TemplateSet::is_template_file("coin_template_1.jpg"));
    }

    #[test]
    fn test_load_sorted_and_filtered() {
        let dir = temp_dir("templates");
        GrayImage::from_pixel(40, 40, Luma([10]))
            .save(dir.join("coin_template_b.png"))
            .unwrap();
        GrayImage::from_pixel(30, 20, Luma([20]))
            .save(dir.join("coin_template_a.png"))
            .unwrap();
        GrayImage::from_pixel(5, 5, Luma([30]))
            .save(dir.join("background.png"))
            .unwrap();
        std::fs::write(dir.join("coin_template_broken.png"), b"not a png").unwrap();

        let set = TemplateSet::load_from_directory(&dir).unwrap();
        assert_eq!(set.names(), vec!["coin_template_a", "coin_template_b"]);
        assert_eq!(set.templates()[0].width(), 30);
        assert_eq!(set.templates()[0].height(), 20);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory() {
        let err = TemplateSet::load_from_directory(Path::new("/no/such/templates")).unwrap_err();
        assert!(matches!(err, ScanError::DirectoryNotFound { .. }));
    }
}
