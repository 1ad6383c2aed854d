/// Template matching module for coin detection in screenshot slices
///
/// This module provides:
/// - Zero-mean normalized cross-correlation scoring
/// - Search restricted to a sub-region of the slice
/// - Threshold filtering in deterministic row-major order
pub mod matcher;
pub mod types;

pub use matcher::{
    ScoreSurface, TemplateMatcher, collect_match_points, match_template, score_surface,
};
pub use types::{MatchPoint, Template};
