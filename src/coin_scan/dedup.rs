//! Near-duplicate suppression for match points and anchor claiming
//!
//! Suppression is greedy and order dependent: points are visited in the
//! order the matcher produced them and the first point of a cluster wins.

use super::region::Rect;
use crate::template_matching::{MatchPoint, Template};

/// True when `a` and `b` are closer than `min_distance` on both axes
pub fn is_near(a: &MatchPoint, b: &MatchPoint, min_distance: u32) -> bool {
    let d = min_distance as i64;
    (a.x as i64 - b.x as i64).abs() < d && (a.y as i64 - b.y as i64).abs() < d
}

/// Keep each point unless an already kept point [`is_near`] it
pub fn suppress_near_duplicates(points: &[MatchPoint], min_distance: u32) -> Vec<MatchPoint> {
    let mut kept: Vec<MatchPoint> = Vec::new();
    for point in points {
        if !kept.iter().any(|k| is_near(k, point, min_distance)) {
            kept.push(*point);
        }
    }
    kept
}

/// A confirmed coin instance inside one slice
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorDetection {
    /// Slice-local bounding box (template size)
    pub rect: Rect,
    /// Template that claimed this anchor
    pub template: String,
    pub score: f32,
}

/// Set of pairwise non-intersecting rectangles. A rectangle is accepted only
/// if it overlaps nothing accepted before.
#[derive(Debug, Default, Clone)]
pub struct ClaimSet {
    rects: Vec<Rect>,
}

impl ClaimSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `rect` and return true, or return false if it overlaps a claim
    pub fn try_claim(&mut self, rect: Rect) -> bool {
        if self.rects.iter().any(|r| r.intersects(&rect)) {
            return false;
        }
        self.rects.push(rect);
        true
    }
}

/// Anchors claimed so far in one slice, across all templates
#[derive(Debug, Default)]
pub struct AnchorClaims {
    claims: ClaimSet,
    anchors: Vec<AnchorDetection>,
}

impl AnchorClaims {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a search-region match point into a slice anchor unless it
    /// overlaps an anchor claimed earlier in this slice.
    pub fn claim(
        &mut self,
        point: &MatchPoint,
        template: &Template,
        search_origin: (i32, i32),
    ) -> Option<AnchorDetection> {
        let rect = Rect::new(
            point.x as i32 + search_origin.0,
            point.y as i32 + search_origin.1,
            template.width() as i32,
            template.height() as i32,
        );
        if !self.claims.try_claim(rect) {
            return None;
        }
        let anchor = AnchorDetection {
            rect,
            template: template.name.clone(),
            score: point.score,
        };
        self.anchors.push(anchor.clone());
        Some(anchor)
    }

    pub fn anchors(&self) -> &[AnchorDetection] {
        &self.anchors
    }
}
