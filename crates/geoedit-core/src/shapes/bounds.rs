//! Axis-aligned bounds shape.

use super::{PATH_TOLERANCE, ShapeTrait};
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned box anchored at its lower-left corner `(x, y)`.
///
/// Width and height are non-negative once normalized.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest bounds containing both points.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::new(
            a.x.min(b.x),
            a.y.min(b.y),
            (a.x - b.x).abs(),
            (a.y - b.y).abs(),
        )
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.x + self.width, self.y)
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.x, self.y + self.height)
    }

    pub fn upper_right(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn rect(&self) -> Rect {
        Rect::from_points(self.lower_left(), self.upper_right())
    }
}

impl ShapeTrait for Bounds {
    fn to_path(&self) -> BezPath {
        self.rect().to_path(PATH_TOLERANCE)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: Vec2) {
        self.x += delta.x;
        self.y += delta.y;
    }

    fn focus_point(&self) -> Point {
        self.center()
    }

    fn control_points(&self) -> Vec<Point> {
        vec![
            self.lower_left(),
            self.lower_right(),
            self.upper_right(),
            self.upper_left(),
        ]
    }

    fn bounds(&self) -> Rect {
        self.rect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes() {
        let b = Bounds::from_points(Point::new(10.0, 5.0), Point::new(0.0, 25.0));
        assert_eq!(b, Bounds::new(0.0, 5.0, 10.0, 20.0));
        assert_eq!(b.upper_right(), Point::new(10.0, 25.0));
    }

    #[test]
    fn test_hit_test_inside_and_near_edge() {
        let b = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(b.hit_test(Point::new(5.0, 5.0), 0.0));
        assert!(b.hit_test(Point::new(11.0, 5.0), 2.0));
        assert!(!b.hit_test(Point::new(15.0, 5.0), 2.0));
    }
}
