//! Ellipse and elliptical arc.

use super::{ShapeTrait, ellipse_point, polyline_path, sample_ellipse_arc};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Rotated ellipse. `a` is the semi-axis along `rotation_azimuth`, `b` the
/// perpendicular one.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point,
    pub a: f64,
    pub b: f64,
    /// Direction of the `a` axis, in degrees clockwise from north.
    pub rotation_azimuth: f64,
}

impl Ellipse {
    pub fn new(center: Point, a: f64, b: f64, rotation_azimuth: f64) -> Self {
        Self {
            center,
            a,
            b,
            rotation_azimuth,
        }
    }

    /// End of the `a` axis.
    pub fn a_axis_point(&self) -> Point {
        ellipse_point(self.center, self.a, self.b, self.rotation_azimuth, self.rotation_azimuth)
    }

    /// End of the `b` axis.
    pub fn b_axis_point(&self) -> Point {
        let azimuth = self.rotation_azimuth + 90.0;
        ellipse_point(self.center, self.a, self.b, self.rotation_azimuth, azimuth)
    }
}

impl ShapeTrait for Ellipse {
    fn to_path(&self) -> BezPath {
        let points = sample_ellipse_arc(self.center, self.a, self.b, self.rotation_azimuth, 0.0, 360.0);
        polyline_path(&points, true)
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
        vec![self.center, self.a_axis_point(), self.b_axis_point()]
    }
}

/// Part of an ellipse outline from `start_azimuth` over `sweep_angle`
/// degrees, clockwise when positive.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point,
    pub a: f64,
    pub b: f64,
    pub rotation_azimuth: f64,
    pub start_azimuth: f64,
    pub sweep_angle: f64,
}

impl Arc {
    pub fn ellipse(&self) -> Ellipse {
        Ellipse::new(self.center, self.a, self.b, self.rotation_azimuth)
    }

    pub fn start_point(&self) -> Point {
        ellipse_point(self.center, self.a, self.b, self.rotation_azimuth, self.start_azimuth)
    }

    pub fn end_point(&self) -> Point {
        let azimuth = self.start_azimuth + self.sweep_angle;
        ellipse_point(self.center, self.a, self.b, self.rotation_azimuth, azimuth)
    }
}

impl ShapeTrait for Arc {
    fn to_path(&self) -> BezPath {
        let points = sample_ellipse_arc(
            self.center,
            self.a,
            self.b,
            self.rotation_azimuth,
            self.start_azimuth,
            self.sweep_angle,
        );
        polyline_path(&points, false)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn focus_point(&self) -> Point {
        self.center
    }

    fn control_points(&self) -> Vec<Point> {
        vec![self.center, self.start_point(), self.end_point()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_points() {
        let e = Ellipse::new(Point::ZERO, 10.0, 5.0, 90.0);
        let a = e.a_axis_point();
        let b = e.b_axis_point();
        assert!((a.x - 10.0).abs() < 1e-9 && a.y.abs() < 1e-9);
        assert!(b.x.abs() < 1e-9 && (b.y + 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_arc_hit_test_is_open() {
        let arc = Arc {
            center: Point::ZERO,
            a: 10.0,
            b: 10.0,
            rotation_azimuth: 0.0,
            start_azimuth: 0.0,
            sweep_angle: 90.0,
        };
        assert!(arc.hit_test(Point::new(0.0, 10.0), 0.5));
        assert!(!arc.hit_test(Point::new(2.0, 2.0), 0.5));
        let end = arc.end_point();
        assert!((end.x - 10.0).abs() < 1e-9);
    }
}
