/// Template matching data types
use image::GrayImage;
use std::sync::Arc;

/// A reference image for one coin variant
#[derive(Clone, Debug)]
pub struct Template {
    /// Identifier, usually the file stem (e.g., "coin_template_silver")
    pub name: String,
    /// Single-channel pixels, shared between workers
    pub image: Arc<GrayImage>,
}

/// A single match result
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchPoint {
    /// X offset inside the search region
    pub x: u32,
    /// Y offset inside the search region
    pub y: u32,
    /// Zero-mean normalized correlation (-1.0 to 1.0)
    pub score: f32,
}

impl Template {
    pub fn new(name: impl Into<String>, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            image: Arc::new(image),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Get the template name for display
    pub fn display_name(&self) -> String {
        format!("{}-[{}x{}]", self.name, self.width(), self.height())
    }
}

impl MatchPoint {
    pub fn new(x: u32, y: u32, score: f32) -> Self {
        Self { x, y, score }
    }

    /// Format match as string with score percentage
    pub fn describe(&self, template: &Template) -> String {
        let score_pct = (self.score * 100.0) as i32;
        format!("{} at ({},{}) - {}%", template.name, self.x, self.y, score_pct)
    }
}
