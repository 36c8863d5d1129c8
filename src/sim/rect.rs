//! Axis-aligned rectangle geometry
//!
//! Screen convention: x grows right, y grows down. A rectangle is its
//! top-left corner plus a size; edges are inclusive of `min` and exclusive of
//! `max` for overlap, so rectangles that only share an edge do not overlap.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Overlap test (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_max = self.max();
        let b_max = other.max();
        self.min.x < b_max.x && other.min.x < a_max.x && self.min.y < b_max.y && other.min.y < a_max.y
    }

    /// Point containment, half-open on the far edges
    pub fn contains_point(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    /// Strict interior containment (point on an edge is outside)
    pub fn strictly_contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x > self.min.x && point.x < max.x && point.y > self.min.y && point.y < max.y
    }

    /// Same rectangle moved by `delta`
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            min: self.min + delta,
            size: self.size,
        }
    }
}
