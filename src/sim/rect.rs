//! Axis-aligned rectangle geometry
//!
//! Coordinates are y-down screen space, matching the sprite atlas. The same
//! type serves as an atlas frame coordinate and as a collision hitbox; a
//! hitbox is just a rectangle that has usually been shrunk toward its center
//! with [`Rect::scaled`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle. Construction is by value; no method mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top edge (y grows downward)
    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Center point of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Shrink (or grow) the rectangle about its own center.
    ///
    /// The dimensional delta is split evenly across both edges, so the
    /// returned rectangle keeps the same center as `self`.
    pub fn scaled(&self, factor: f32) -> Rect {
        let width = self.width * factor;
        let height = self.height * factor;
        Rect {
            x: self.x + (self.width - width) * 0.5,
            y: self.y + (self.height - height) * 0.5,
            width,
            height,
        }
    }

    /// Overlap test. Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        if self.top() > other.bottom() || self.bottom() < other.top() {
            return false;
        }
        if self.right() < other.left() || self.left() > other.right() {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_derived_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
    }

    #[test]
    fn test_overlaps_disjoint_and_contained() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far = Rect::new(100.0, 100.0, 10.0, 10.0);
        assert!(!a.overlaps(&far));

        let inside = Rect::new(2.0, 2.0, 4.0, 4.0);
        assert!(a.overlaps(&inside));
        assert!(inside.overlaps(&a));
    }

    #[test]
    fn test_overlaps_edge_touching() {
        // Sharing an edge exactly counts as overlap
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right_of = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(a.overlaps(&right_of));
        assert!(a.overlaps(&below));

        // One unit of separation does not
        let apart = Rect::new(11.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&apart));
    }

    #[test]
    fn test_scaled_keeps_center() {
        let r = Rect::new(10.0, 20.0, 40.0, 60.0);
        let s = r.scaled(0.5);
        assert_eq!(s.width, 20.0);
        assert_eq!(s.height, 30.0);
        assert_eq!(s.center(), r.center());
        assert_eq!(s.x, 20.0);
        assert_eq!(s.y, 35.0);
    }

    proptest! {
        #[test]
        fn prop_overlap_symmetry(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 0.0f32..200.0, ah in 0.0f32..200.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 0.0f32..200.0, bh in 0.0f32..200.0,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_scaled_centering(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
            factor in 0.01f32..1.0,
        ) {
            let r = Rect::new(x, y, w, h);
            let s = r.scaled(factor);
            let c0 = r.center();
            let c1 = s.center();
            prop_assert!((c0.x - c1.x).abs() < 1e-3);
            prop_assert!((c0.y - c1.y).abs() < 1e-3);
            // Scaling back up restores the original extent
            let back = s.scaled(1.0 / factor);
            prop_assert!((back.width - r.width).abs() < 1e-2);
            prop_assert!((back.height - r.height).abs() < 1e-2);
        }
    }
}
