use crate::model::{Point, Rect};

/// Parametric interval over which the segment lies inside one axis slab.
fn slab_interval(origin: f32, delta: f32, min: f32, max: f32) -> Option<(f32, f32)> {
    if delta == 0.0 {
        // Parallel to the slab: unconstrained inside it, never inside otherwise.
        return (origin >= min && origin <= max).then_some((f32::NEG_INFINITY, f32::INFINITY));
    }
    let entry = (min - origin) / delta;
    let exit = (max - origin) / delta;
    Some((entry.min(exit), entry.max(exit)))
}

/// Slab test of the segment `start..=end` against `rect`, edges included, so a segment
/// that only grazes a corner counts as intersecting.
pub fn segment_intersects_rect(start: Point, end: Point, rect: Rect) -> bool {
    let Some((x_entry, x_exit)) = slab_interval(start.x, end.x - start.x, rect.x, rect.right())
    else {
        return false;
    };
    let Some((y_entry, y_exit)) = slab_interval(start.y, end.y - start.y, rect.y, rect.bottom())
    else {
        return false;
    };

    let t_min = x_entry.max(y_entry);
    let t_max = x_exit.min(y_exit);
    t_max >= 0.0 && t_min <= t_max && t_min <= 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: Rect = Rect::new(80.0, 80.0, 140.0, 140.0);

    #[test]
    fn diagonal_through_the_box_intersects() {
        assert!(segment_intersects_rect(Point::new(0.0, 0.0), Point::new(300.0, 300.0), BOX));
    }

    #[test]
    fn segment_stopping_short_of_the_box_does_not_intersect() {
        assert!(!segment_intersects_rect(Point::new(0.0, 0.0), Point::new(70.0, 70.0), BOX));
        assert!(!segment_intersects_rect(Point::new(300.0, 300.0), Point::new(230.0, 230.0), BOX));
    }

    #[test]
    fn corner_touch_counts_as_intersection() {
        assert!(segment_intersects_rect(Point::new(70.0, 90.0), Point::new(90.0, 70.0), BOX));
        assert!(!segment_intersects_rect(Point::new(69.0, 90.0), Point::new(89.0, 70.0), BOX));
    }

    #[test]
    fn vertical_segment_only_hits_inside_its_column() {
        assert!(segment_intersects_rect(Point::new(150.0, 0.0), Point::new(150.0, 300.0), BOX));
        assert!(!segment_intersects_rect(Point::new(50.0, 0.0), Point::new(50.0, 300.0), BOX));
        assert!(segment_intersects_rect(Point::new(80.0, 0.0), Point::new(80.0, 300.0), BOX));
    }

    #[test]
    fn horizontal_segment_only_hits_inside_its_row() {
        assert!(segment_intersects_rect(Point::new(0.0, 100.0), Point::new(300.0, 100.0), BOX));
        assert!(!segment_intersects_rect(Point::new(0.0, 10.0), Point::new(300.0, 10.0), BOX));
    }

    #[test]
    fn degenerate_point_segment_hits_only_when_inside() {
        let inside = Point::new(100.0, 100.0);
        let outside = Point::new(10.0, 10.0);
        assert!(segment_intersects_rect(inside, inside, BOX));
        assert!(!segment_intersects_rect(outside, outside, BOX));
    }
}
