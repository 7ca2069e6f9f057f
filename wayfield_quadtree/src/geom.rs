// Copyright 2025 the Wayfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rectangle predicates with the edge conventions the tree relies on.

use kurbo::{Point, Rect};

/// Half-open point containment: `x0 <= x < x1` and `y0 <= y < y1`.
///
/// Quadrants share edges, so a center on an edge belongs to exactly one of them.
#[inline]
pub(crate) fn contains_point(area: Rect, p: Point) -> bool {
    area.x0 <= p.x && p.x < area.x1 && area.y0 <= p.y && p.y < area.y1
}

/// Strict overlap test; rectangles that only touch do not intersect.
#[inline]
pub(crate) fn intersects(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

/// Inclusive containment of `inner` in `outer`.
#[inline]
pub(crate) fn contains_rect(outer: Rect, inner: Rect) -> bool {
    outer.x0 <= inner.x0 && outer.y0 <= inner.y0 && inner.x1 <= outer.x1 && inner.y1 <= outer.y1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains_point(r, Point::new(0.0, 0.0)));
        assert!(contains_point(r, Point::new(9.999, 5.0)));
        assert!(!contains_point(r, Point::new(10.0, 5.0)));
        assert!(!contains_point(r, Point::new(5.0, 10.0)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!intersects(a, Rect::new(10.0, 0.0, 20.0, 10.0)));
        assert!(intersects(a, Rect::new(9.0, 9.0, 20.0, 20.0)));
        assert!(intersects(a, Rect::new(2.0, 2.0, 3.0, 3.0)));
    }

    #[test]
    fn rect_containment_is_inclusive() {
        let outer = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(contains_rect(outer, outer));
        assert!(contains_rect(outer, Rect::new(1.0, 1.0, 10.0, 10.0)));
        assert!(!contains_rect(outer, Rect::new(-0.5, 1.0, 5.0, 5.0)));
    }
}
