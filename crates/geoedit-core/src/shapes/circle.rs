//! Circles defined by center and radius, or by three points on the rim.

use super::{PATH_TOLERANCE, ShapeTrait, circumcircle, point_at_azimuth, polyline_path};
use kurbo::{BezPath, Circle, Point, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleByCenterPoint {
    pub center: Point,
    pub radius: f64,
}

impl CircleByCenterPoint {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Point on the rim at `azimuth` degrees.
    pub fn point_at(&self, azimuth: f64) -> Point {
        point_at_azimuth(self.center, azimuth, self.radius)
    }
}

impl ShapeTrait for CircleByCenterPoint {
    fn to_path(&self) -> BezPath {
        Circle::new(self.center, self.radius).to_path(PATH_TOLERANCE)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn focus_point(&self) -> Point {
        self.center
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.center]
    }
}

/// Circle through three points.
///
/// Collinear points describe no circle; the shape then degrades to the
/// polyline through them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleBy3Points {
    pub start: Point,
    pub intermediate: Point,
    pub end: Point,
}

impl CircleBy3Points {
    pub fn new(start: Point, intermediate: Point, end: Point) -> Self {
        Self {
            start,
            intermediate,
            end,
        }
    }

    /// Center and radius, if the points are not collinear.
    pub fn circle(&self) -> Option<(Point, f64)> {
        circumcircle(self.start, self.intermediate, self.end)
    }

    pub fn points(&self) -> [Point; 3] {
        [self.start, self.intermediate, self.end]
    }

    pub fn point_mut(&mut self, index: usize) -> Option<&mut Point> {
        match index {
            0 => Some(&mut self.start),
            1 => Some(&mut self.intermediate),
            2 => Some(&mut self.end),
            _ => None,
        }
    }
}

impl ShapeTrait for CircleBy3Points {
    fn to_path(&self) -> BezPath {
        match self.circle() {
            Some((center, radius)) => Circle::new(center, radius).to_path(PATH_TOLERANCE),
            None => polyline_path(&self.points(), false),
        }
    }

    fn is_closed(&self) -> bool {
        self.circle().is_some()
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.intermediate += delta;
        self.end += delta;
    }

    fn focus_point(&self) -> Point {
        self.circle().map_or(self.intermediate, |(center, _)| center)
    }

    fn control_points(&self) -> Vec<Point> {
        self.points().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_at_azimuth() {
        let c = CircleByCenterPoint::new(Point::new(10.0, 10.0), 5.0);
        let east = c.point_at(90.0);
        assert!((east.x - 15.0).abs() < 1e-9);
        assert!((east.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_three_point_circle() {
        let c = CircleBy3Points::new(
            Point::new(-1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        );
        let (center, radius) = c.circle().unwrap();
        assert!(center.distance(Point::ZERO) < 1e-9);
        assert!((radius - 1.0).abs() < 1e-9);
        assert!(c.hit_test(Point::new(0.0, -1.0), 0.01));
    }

    #[test]
    fn test_collinear_points_degrade() {
        let c = CircleBy3Points::new(Point::ZERO, Point::new(1.0, 0.0), Point::new(2.0, 0.0));
        assert!(c.circle().is_none());
        assert!(!c.is_closed());
        assert!(c.hit_test(Point::new(1.5, 0.0), 0.1));
    }
}
