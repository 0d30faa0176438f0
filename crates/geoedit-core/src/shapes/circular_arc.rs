//! Circular arcs, sectors and arc bands.

use super::{
    ShapeTrait, azimuth_between, circumcircle, normalize_azimuth, point_at_azimuth, polyline_path,
    sample_ellipse_arc,
};
use kurbo::{BezPath, Point, Vec2};
use serde::{Deserialize, Serialize};

fn sample_circle_arc(center: Point, radius: f64, start: f64, sweep: f64) -> Vec<Point> {
    sample_ellipse_arc(center, radius, radius, 0.0, start, sweep)
}

/// Circular arc from `start_azimuth` over `sweep_angle` degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircularArcByCenterPoint {
    pub center: Point,
    pub radius: f64,
    pub start_azimuth: f64,
    pub sweep_angle: f64,
}

impl CircularArcByCenterPoint {
    pub fn start_point(&self) -> Point {
        point_at_azimuth(self.center, self.start_azimuth, self.radius)
    }

    pub fn end_point(&self) -> Point {
        point_at_azimuth(self.center, self.start_azimuth + self.sweep_angle, self.radius)
    }

    pub fn outline(&self) -> Vec<Point> {
        sample_circle_arc(self.center, self.radius, self.start_azimuth, self.sweep_angle)
    }
}

impl ShapeTrait for CircularArcByCenterPoint {
    fn to_path(&self) -> BezPath {
        polyline_path(&self.outline(), false)
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

/// Circular arc through three points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircularArcBy3Points {
    pub start: Point,
    pub intermediate: Point,
    pub end: Point,
}

impl CircularArcBy3Points {
    pub fn new(start: Point, intermediate: Point, end: Point) -> Self {
        Self {
            start,
            intermediate,
            end,
        }
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

    /// Equivalent center-point arc passing through the intermediate point.
    pub fn to_center_arc(&self) -> Option<CircularArcByCenterPoint> {
        let (center, radius) = circumcircle(self.start, self.intermediate, self.end)?;
        let start_azimuth = azimuth_between(center, self.start);
        let clockwise = normalize_azimuth(azimuth_between(center, self.end) - start_azimuth);
        let to_intermediate = normalize_azimuth(azimuth_between(center, self.intermediate) - start_azimuth);
        let sweep_angle = if to_intermediate <= clockwise {
            clockwise
        } else {
            clockwise - 360.0
        };
        Some(CircularArcByCenterPoint {
            center,
            radius,
            start_azimuth,
            sweep_angle,
        })
    }
}

impl ShapeTrait for CircularArcBy3Points {
    fn to_path(&self) -> BezPath {
        match self.to_center_arc() {
            Some(arc) => arc.to_path(),
            None => polyline_path(&self.points(), false),
        }
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.intermediate += delta;
        self.end += delta;
    }

    fn focus_point(&self) -> Point {
        self.intermediate
    }

    fn control_points(&self) -> Vec<Point> {
        self.points().to_vec()
    }
}

/// Pie slice: a circular arc closed through its center.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sector {
    pub center: Point,
    pub radius: f64,
    pub start_azimuth: f64,
    pub sweep_angle: f64,
}

impl Sector {
    pub fn arc(&self) -> CircularArcByCenterPoint {
        CircularArcByCenterPoint {
            center: self.center,
            radius: self.radius,
            start_azimuth: self.start_azimuth,
            sweep_angle: self.sweep_angle,
        }
    }
}

impl ShapeTrait for Sector {
    fn to_path(&self) -> BezPath {
        let mut points = vec![self.center];
        points.extend(self.arc().outline());
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
        self.arc().control_points()
    }
}

/// Ring segment between two radii.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ArcBand {
    pub center: Point,
    pub min_radius: f64,
    pub max_radius: f64,
    pub start_azimuth: f64,
    pub sweep_angle: f64,
}

impl ArcBand {
    /// Azimuth halfway along the sweep.
    pub fn mid_azimuth(&self) -> f64 {
        self.start_azimuth + self.sweep_angle / 2.0
    }

    pub fn inner_arc(&self) -> CircularArcByCenterPoint {
        self.arc_at(self.min_radius)
    }

    pub fn outer_arc(&self) -> CircularArcByCenterPoint {
        self.arc_at(self.max_radius)
    }

    fn arc_at(&self, radius: f64) -> CircularArcByCenterPoint {
        CircularArcByCenterPoint {
            center: self.center,
            radius,
            start_azimuth: self.start_azimuth,
            sweep_angle: self.sweep_angle,
        }
    }
}

impl ShapeTrait for ArcBand {
    fn to_path(&self) -> BezPath {
        let mut points = self.outer_arc().outline();
        let mut inner = self.inner_arc().outline();
        inner.reverse();
        points.extend(inner);
        polyline_path(&points, true)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
    }

    fn focus_point(&self) -> Point {
        let radius = (self.min_radius + self.max_radius) / 2.0;
        point_at_azimuth(self.center, self.mid_azimuth(), radius)
    }

    fn control_points(&self) -> Vec<Point> {
        let outer = self.outer_arc();
        let inner = self.inner_arc();
        vec![
            self.center,
            outer.start_point(),
            outer.end_point(),
            inner.start_point(),
            inner.end_point(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_point_arc_sweep_direction() {
        // Clockwise from west over north to east.
        let arc = CircularArcBy3Points::new(
            Point::new(-1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        );
        let center_arc = arc.to_center_arc().unwrap();
        assert!((center_arc.start_azimuth - 270.0).abs() < 1e-9);
        assert!((center_arc.sweep_angle - 180.0).abs() < 1e-9);

        // Same endpoints through the south go counter-clockwise.
        let arc = CircularArcBy3Points::new(
            Point::new(-1.0, 0.0),
            Point::new(0.0, -1.0),
            Point::new(1.0, 0.0),
        );
        let center_arc = arc.to_center_arc().unwrap();
        assert!((center_arc.sweep_angle + 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_sector_contains_center_region() {
        let sector = Sector {
            center: Point::ZERO,
            radius: 10.0,
            start_azimuth: 0.0,
            sweep_angle: 90.0,
        };
        assert!(sector.hit_test(Point::new(3.0, 3.0), 0.0));
        assert!(!sector.hit_test(Point::new(-3.0, -3.0), 0.0));
    }

    #[test]
    fn test_arc_band_excludes_hole() {
        let band = ArcBand {
            center: Point::ZERO,
            min_radius: 5.0,
            max_radius: 10.0,
            start_azimuth: 0.0,
            sweep_angle: 360.0,
        };
        assert!(band.hit_test(Point::new(0.0, 7.5), 0.0));
        assert!(!band.hit_test(Point::new(0.0, 1.0), 0.1));
        let focus = band.focus_point();
        assert!((focus.distance(Point::ZERO) - 7.5).abs() < 1e-9);
    }
}
