//! Polylines and polygons.

use super::{ShapeTrait, polyline_path};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    (sum / points.len() as f64).to_point()
}

/// Open sequence of connected points.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl ShapeTrait for Polyline {
    fn to_path(&self) -> BezPath {
        polyline_path(&self.points, false)
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
        centroid(&self.points)
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self.points.as_slice() {
            [] => false,
            [only] => only.distance(point) <= tolerance,
            points => super::point_to_polyline_dist(point, points) <= tolerance,
        }
    }
}

/// Closed ring of points. The closing segment is implicit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }
}

impl ShapeTrait for Polygon {
    fn to_path(&self) -> BezPath {
        polyline_path(&self.points, true)
    }

    fn is_closed(&self) -> bool {
        self.points.len() > 2
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
    }

    fn focus_point(&self) -> Point {
        centroid(&self.points)
    }

    fn control_points(&self) -> Vec<Point> {
        self.points.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn test_polygon_closing_segment_hits() {
        let polygon = Polygon::new(square());
        assert!(polygon.hit_test(Point::new(-0.5, 5.0), 1.0));
        assert!(polygon.hit_test(Point::new(5.0, 5.0), 0.0));
    }

    #[test]
    fn test_polyline_has_no_interior() {
        let polyline = Polyline::new(square());
        assert!(!polyline.hit_test(Point::new(5.0, 5.0), 1.0));
        assert!(polyline.hit_test(Point::new(5.0, 0.5), 1.0));
        assert!(!polyline.hit_test(Point::new(-0.5, 5.0), 0.1));
    }

    #[test]
    fn test_focus_point_is_centroid() {
        let polygon = Polygon::new(square());
        assert_eq!(polygon.focus_point(), Point::new(5.0, 5.0));
    }
}
