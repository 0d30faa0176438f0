//! Quadratic and cubic Bézier curves.

use super::{ShapeTrait, polyline_path};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Bézier curve given by its control points.
///
/// Three points describe a quadratic curve and four a cubic one. While fewer
/// points are present the control polygon is used as outline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BezierCurve {
    pub points: Vec<Point>,
}

impl BezierCurve {
    pub const MAX_POINTS: usize = 4;

    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn is_complete(&self) -> bool {
        self.points.len() >= 3
    }
}

impl ShapeTrait for BezierCurve {
    fn to_path(&self) -> BezPath {
        match self.points.as_slice() {
            [p0, p1, p2] => {
                let mut path = BezPath::new();
                path.move_to(*p0);
                path.quad_to(*p1, *p2);
                path
            }
            [p0, p1, p2, p3, ..] => {
                let mut path = BezPath::new();
                path.move_to(*p0);
                path.curve_to(*p1, *p2, *p3);
                path
            }
            points => polyline_path(points, false),
        }
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn focus_point(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_curve_passes_through_midpoint() {
        let curve = BezierCurve::new(vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 10.0),
            Point::new(10.0, 0.0),
        ]);
        // B(0.5) = 0.25 p0 + 0.5 p1 + 0.25 p2
        assert!(curve.hit_test(Point::new(5.0, 5.0), 0.01));
        assert!(!curve.hit_test(Point::new(5.0, 9.0), 0.5));
    }

    #[test]
    fn test_incomplete_curve_uses_control_polygon() {
        let curve = BezierCurve::new(vec![Point::ZERO, Point::new(10.0, 0.0)]);
        assert!(!curve.is_complete());
        assert!(curve.hit_test(Point::new(5.0, 0.2), 0.5));
    }
}
