//! Axis-aligned pixel rectangles
//!
//! Everything in the playfield is a box: actors are 16x16, the viewport is
//! 128x96, the goal is a strip on the right edge of the map.

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in integer pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Square box with its origin at `pos`
    pub fn square(pos: IVec2, size: i32) -> Self {
        Self::new(pos.x, pos.y, size, size)
    }

    /// Non-negative size with far edges that fit in `i32`
    pub fn is_well_formed(&self) -> bool {
        self.w >= 0
            && self.h >= 0
            && self.x.checked_add(self.w).is_some()
            && self.y.checked_add(self.h).is_some()
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Strict overlap: boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Point test with both edges counted as inside
    pub fn contains_inclusive(&self, point: IVec2) -> bool {
        (self.x..=self.right()).contains(&point.x) && (self.y..=self.bottom()).contains(&point.y)
    }

    /// Point test against the pixels actually covered (`[x, x+w)`)
    pub fn contains(&self, point: IVec2) -> bool {
        (self.x..self.right()).contains(&point.x) && (self.y..self.bottom()).contains(&point.y)
    }

    /// Move this rect so it lies inside `bounds`.
    ///
    /// If `bounds` is smaller than the rect on an axis, the rect is pinned
    /// to the bounds origin on that axis.
    pub fn clamp_origin_within(&self, bounds: &Rect) -> Rect {
        let max_x = (bounds.right() - self.w).max(bounds.x);
        let max_y = (bounds.bottom() - self.h).max(bounds.y);
        Rect {
            x: self.x.clamp(bounds.x, max_x),
            y: self.y.clamp(bounds.y, max_y),
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_touching_edges_is_not_overlap() {
        let a = Rect::new(0, 0, 16, 16);
        let b = Rect::new(16, 0, 16, 16);
        assert!(!a.overlaps(&b));
        let c = Rect::new(15, 15, 16, 16);
        assert!(a.overlaps(&c));
    }

    #[test]
    fn test_well_formed() {
        assert!(Rect::new(479, 32, 0, 32).is_well_formed());
        assert!(Rect::new(-16, -16, 8, 8).is_well_formed());
        assert!(!Rect::new(0, 0, -1, 8).is_well_formed());
        assert!(!Rect::new(0, 0, 8, -1).is_well_formed());
        assert!(!Rect::new(i32::MAX - 10, 0, 11, 0).is_well_formed());
        assert!(!Rect::new(0, i32::MAX, 0, 1).is_well_formed());
    }

    #[test]
    fn test_contains_inclusive_counts_far_edge() {
        let r = Rect::new(10, 10, 16, 16);
        assert!(r.contains_inclusive(IVec2::new(26, 26)));
        assert!(!r.contains(IVec2::new(26, 26)));
        assert!(!r.contains_inclusive(IVec2::new(27, 10)));
        assert!(!r.contains_inclusive(IVec2::new(9, 10)));
    }

    #[test]
    fn test_clamp_small_bounds_pins_to_origin() {
        let view = Rect::new(50, -20, 128, 96);
        let bounds = Rect::new(0, 0, 64, 64);
        let clamped = view.clamp_origin_within(&bounds);
        assert_eq!(clamped.origin(), IVec2::ZERO);
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100i32..100, ay in -100i32..100,
            bx in -100i32..100, by in -100i32..100,
            aw in 1i32..40, ah in 1i32..40,
            bw in 1i32..40, bh in 1i32..40,
        ) {
            let a = Rect::new(ax, ay, aw, ah);
            let b = Rect::new(bx, by, bw, bh);
            prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
        }

        #[test]
        fn prop_clamped_rect_stays_inside(
            x in -1000i32..1000, y in -1000i32..1000,
        ) {
            let bounds = Rect::new(0, 0, 496, 320);
            let view = Rect::new(x, y, 128, 96).clamp_origin_within(&bounds);
            prop_assert!(view.x >= 0 && view.y >= 0);
            prop_assert!(view.right() <= bounds.right());
            prop_assert!(view.bottom() <= bounds.bottom());
        }
    }
}
