//! Shape model edited by handles.
//!
//! Coordinates are planar model units. Azimuths are degrees clockwise from
//! the +y axis ("north").

mod bezier;
mod bounds;
mod circle;
mod circular_arc;
mod composed;
mod ellipse;
mod point_list;

pub use bezier::BezierCurve;
pub use bounds::Bounds;
pub use circle::{CircleBy3Points, CircleByCenterPoint};
pub use circular_arc::{ArcBand, CircularArcBy3Points, CircularArcByCenterPoint, Sector};
pub use composed::{ComplexPolygon, ExtrudedShape, GeoBuffer, ShapeList};
pub use ellipse::{Arc, Ellipse};
pub use point_list::{Polygon, Polyline};

use crate::error::{EditError, EditResult};
use kurbo::{BezPath, ParamCurveNearest, Point, Rect, Shape as KurboShape, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flattening tolerance for curved outlines, in model units.
pub const PATH_TOLERANCE: f64 = 1e-3;

/// Segments used for a full turn when sampling arcs.
const ARC_SEGMENTS: f64 = 72.0;

/// Unit vector pointing at `azimuth` degrees.
pub fn azimuth_direction(azimuth: f64) -> Vec2 {
    let r = azimuth.to_radians();
    Vec2::new(r.sin(), r.cos())
}

pub fn point_at_azimuth(center: Point, azimuth: f64, distance: f64) -> Point {
    center + azimuth_direction(azimuth) * distance
}

/// Wrap an azimuth into `[0, 360)`.
pub fn normalize_azimuth(azimuth: f64) -> f64 {
    let a = azimuth.rem_euclid(360.0);
    if a >= 360.0 { 0.0 } else { a }
}

/// Azimuth of `to` as seen from `from`.
pub fn azimuth_between(from: Point, to: Point) -> f64 {
    normalize_azimuth((to.x - from.x).atan2(to.y - from.y).to_degrees())
}

/// Point on a rotated ellipse in direction `azimuth`, measured in the
/// ellipse's parametric angle.
pub fn ellipse_point(center: Point, a: f64, b: f64, rotation: f64, azimuth: f64) -> Point {
    let t = (azimuth - rotation).to_radians();
    center + azimuth_direction(rotation) * (a * t.cos()) + azimuth_direction(rotation + 90.0) * (b * t.sin())
}

/// Sample an elliptical arc. Includes both end points.
pub fn sample_ellipse_arc(
    center: Point,
    a: f64,
    b: f64,
    rotation: f64,
    start: f64,
    sweep: f64,
) -> Vec<Point> {
    let steps = ((sweep.abs() / 360.0 * ARC_SEGMENTS).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let azimuth = start + sweep * i as f64 / steps as f64;
            ellipse_point(center, a, b, rotation, azimuth)
        })
        .collect()
}

pub fn polyline_path(points: &[Point], closed: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    if closed {
        path.close_path();
    }
    path
}

/// Center and radius of the circle through three points.
pub fn circumcircle(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.to_vec2().hypot2();
    let b2 = b.to_vec2().hypot2();
    let c2 = c.to_vec2().hypot2();
    let x = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let y = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = Point::new(x, y);
    Some((center, center.distance(a)))
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    point.distance(a + seg * t)
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Minimum distance from a point to any segment of a path.
pub fn distance_to_path(path: &BezPath, point: Point) -> f64 {
    path.segments()
        .map(|seg| seg.nearest(point, 1e-6).distance_sq)
        .fold(f64::INFINITY, f64::min)
        .sqrt()
}

/// Geometry shared by every shape family.
pub trait ShapeTrait {
    /// Outline for drawing and hit testing.
    fn to_path(&self) -> BezPath;

    /// Whether the shape has an interior.
    fn is_closed(&self) -> bool;

    fn translate(&mut self, delta: Vec2);

    /// Representative point, used for labels and templates.
    fn focus_point(&self) -> Point;

    /// Points other features may snap to.
    fn control_points(&self) -> Vec<Point>;

    fn bounds(&self) -> Rect {
        self.to_path().bounding_box()
    }

    /// Check if a point (in model coordinates) hits this shape.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let path = self.to_path();
        (self.is_closed() && path.contains(point)) || distance_to_path(&path, point) <= tolerance
    }
}

/// Type tag of a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeType {
    Point,
    Bounds,
    CircleByCenterPoint,
    CircleBy3Points,
    Ellipse,
    Arc,
    CircularArcByCenterPoint,
    CircularArcBy3Points,
    ArcBand,
    Sector,
    GeoBuffer,
    Polyline,
    Polygon,
    BezierCurve,
    ShapeList,
    ComplexPolygon,
    ExtrudedShape,
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Enum wrapper for all shape types (for serialization and dispatch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Point(Point),
    Bounds(Bounds),
    CircleByCenterPoint(CircleByCenterPoint),
    CircleBy3Points(CircleBy3Points),
    Ellipse(Ellipse),
    Arc(Arc),
    CircularArcByCenterPoint(CircularArcByCenterPoint),
    CircularArcBy3Points(CircularArcBy3Points),
    ArcBand(ArcBand),
    Sector(Sector),
    GeoBuffer(GeoBuffer),
    Polyline(Polyline),
    Polygon(Polygon),
    BezierCurve(BezierCurve),
    ShapeList(ShapeList),
    ComplexPolygon(ComplexPolygon),
    ExtrudedShape(ExtrudedShape),
}

macro_rules! dispatch {
    ($shape:expr, $s:ident => $body:expr, point $p:ident => $point_body:expr) => {
        match $shape {
            Shape::Point($p) => $point_body,
            Shape::Bounds($s) => $body,
            Shape::CircleByCenterPoint($s) => $body,
            Shape::CircleBy3Points($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Arc($s) => $body,
            Shape::CircularArcByCenterPoint($s) => $body,
            Shape::CircularArcBy3Points($s) => $body,
            Shape::ArcBand($s) => $body,
            Shape::Sector($s) => $body,
            Shape::GeoBuffer($s) => $body,
            Shape::Polyline($s) => $body,
            Shape::Polygon($s) => $body,
            Shape::BezierCurve($s) => $body,
            Shape::ShapeList($s) => $body,
            Shape::ComplexPolygon($s) => $body,
            Shape::ExtrudedShape($s) => $body,
        }
    };
}

impl Shape {
    /// Empty shape of the given type, used as the seed of a creation.
    pub fn empty(shape_type: ShapeType) -> Shape {
        match shape_type {
            ShapeType::Point => Shape::Point(Point::ZERO),
            ShapeType::Bounds => Shape::Bounds(Bounds::default()),
            ShapeType::CircleByCenterPoint => Shape::CircleByCenterPoint(CircleByCenterPoint::default()),
            ShapeType::CircleBy3Points => Shape::CircleBy3Points(CircleBy3Points::default()),
            ShapeType::Ellipse => Shape::Ellipse(Ellipse::default()),
            ShapeType::Arc => Shape::Arc(Arc::default()),
            ShapeType::CircularArcByCenterPoint => {
                Shape::CircularArcByCenterPoint(CircularArcByCenterPoint::default())
            }
            ShapeType::CircularArcBy3Points => Shape::CircularArcBy3Points(CircularArcBy3Points::default()),
            ShapeType::ArcBand => Shape::ArcBand(ArcBand::default()),
            ShapeType::Sector => Shape::Sector(Sector::default()),
            ShapeType::GeoBuffer => Shape::GeoBuffer(GeoBuffer::new(Shape::Polyline(Polyline::default()), 0.0)),
            ShapeType::Polyline => Shape::Polyline(Polyline::default()),
            ShapeType::Polygon => Shape::Polygon(Polygon::default()),
            ShapeType::BezierCurve => Shape::BezierCurve(BezierCurve::default()),
            ShapeType::ShapeList => Shape::ShapeList(ShapeList::default()),
            ShapeType::ComplexPolygon => Shape::ComplexPolygon(ComplexPolygon::default()),
            ShapeType::ExtrudedShape => {
                Shape::ExtrudedShape(ExtrudedShape::new(Shape::Polygon(Polygon::default()), 0.0, 0.0))
            }
        }
    }

    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Point(_) => ShapeType::Point,
            Shape::Bounds(_) => ShapeType::Bounds,
            Shape::CircleByCenterPoint(_) => ShapeType::CircleByCenterPoint,
            Shape::CircleBy3Points(_) => ShapeType::CircleBy3Points,
            Shape::Ellipse(_) => ShapeType::Ellipse,
            Shape::Arc(_) => ShapeType::Arc,
            Shape::CircularArcByCenterPoint(_) => ShapeType::CircularArcByCenterPoint,
            Shape::CircularArcBy3Points(_) => ShapeType::CircularArcBy3Points,
            Shape::ArcBand(_) => ShapeType::ArcBand,
            Shape::Sector(_) => ShapeType::Sector,
            Shape::GeoBuffer(_) => ShapeType::GeoBuffer,
            Shape::Polyline(_) => ShapeType::Polyline,
            Shape::Polygon(_) => ShapeType::Polygon,
            Shape::BezierCurve(_) => ShapeType::BezierCurve,
            Shape::ShapeList(_) => ShapeType::ShapeList,
            Shape::ComplexPolygon(_) => ShapeType::ComplexPolygon,
            Shape::ExtrudedShape(_) => ShapeType::ExtrudedShape,
        }
    }

    pub fn to_path(&self) -> BezPath {
        dispatch!(self, s => s.to_path(), point _p => BezPath::new())
    }

    pub fn is_closed(&self) -> bool {
        dispatch!(self, s => s.is_closed(), point _p => false)
    }

    pub fn bounds(&self) -> Rect {
        dispatch!(self, s => s.bounds(), point p => Rect::from_points(*p, *p))
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        dispatch!(self, s => s.hit_test(point, tolerance), point p => p.distance(point) <= tolerance)
    }

    pub fn translate(&mut self, delta: Vec2) {
        dispatch!(self, s => s.translate(delta), point p => *p += delta)
    }

    pub fn focus_point(&self) -> Point {
        dispatch!(self, s => s.focus_point(), point p => *p)
    }

    pub fn control_points(&self) -> Vec<Point> {
        dispatch!(self, s => s.control_points(), point p => vec![*p])
    }

    /// Editable point sequence of polylines, polygons and Bézier curves.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Shape::Polyline(s) => Some(&s.points),
            Shape::Polygon(s) => Some(&s.points),
            Shape::BezierCurve(s) => Some(&s.points),
            _ => None,
        }
    }

    pub fn points_mut(&mut self) -> Option<&mut Vec<Point>> {
        match self {
            Shape::Polyline(s) => Some(&mut s.points),
            Shape::Polygon(s) => Some(&mut s.points),
            Shape::BezierCurve(s) => Some(&mut s.points),
            _ => None,
        }
    }

    pub fn point_count(&self) -> Option<usize> {
        self.points().map(<[Point]>::len)
    }

    pub fn point(&self, index: usize) -> Option<Point> {
        self.points().and_then(|points| points.get(index).copied())
    }

    /// Replace the point at `index`. Returns false if there is none.
    pub fn set_point(&mut self, index: usize, point: Point) -> bool {
        match self.points_mut().and_then(|points| points.get_mut(index)) {
            Some(p) => {
                *p = point;
                true
            }
            None => false,
        }
    }

    pub fn sub_shape_count(&self) -> usize {
        match self {
            Shape::ShapeList(s) => s.shapes.len(),
            Shape::ComplexPolygon(s) => s.polygons.len(),
            Shape::ExtrudedShape(_) | Shape::GeoBuffer(_) => 1,
            _ => 0,
        }
    }

    fn sub_shape_error(&self, index: usize) -> EditError {
        EditError::SubShapeOutOfRange {
            index,
            count: self.sub_shape_count(),
            shape_type: self.shape_type(),
        }
    }

    pub fn sub_shape(&self, index: usize) -> EditResult<&Shape> {
        let found = match self {
            Shape::ShapeList(s) => s.shapes.get(index),
            Shape::ComplexPolygon(s) => s.polygons.get(index),
            Shape::ExtrudedShape(s) if index == 0 => Some(&*s.base),
            Shape::GeoBuffer(s) if index == 0 => Some(&*s.base),
            _ => None,
        };
        found.ok_or_else(|| self.sub_shape_error(index))
    }

    pub fn sub_shape_mut(&mut self, index: usize) -> EditResult<&mut Shape> {
        let error = self.sub_shape_error(index);
        let found = match self {
            Shape::ShapeList(s) => s.shapes.get_mut(index),
            Shape::ComplexPolygon(s) => s.polygons.get_mut(index),
            Shape::ExtrudedShape(s) if index == 0 => Some(&mut *s.base),
            Shape::GeoBuffer(s) if index == 0 => Some(&mut *s.base),
            _ => None,
        };
        found.ok_or(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_azimuth_conventions() {
        let north = point_at_azimuth(Point::ZERO, 0.0, 1.0);
        assert!(north.x.abs() < 1e-9 && (north.y - 1.0).abs() < 1e-9);
        assert!((azimuth_between(Point::ZERO, Point::new(1.0, 0.0)) - 90.0).abs() < 1e-9);
        assert!((normalize_azimuth(-90.0) - 270.0).abs() < 1e-9);
        assert!((normalize_azimuth(720.0)).abs() < 1e-9);
    }

    #[test]
    fn test_point_to_segment_dist() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 3.0).abs() < 1e-9);
        let d = point_to_segment_dist(Point::new(-4.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_sub_shape_access() {
        let mut shape = Shape::ExtrudedShape(ExtrudedShape::new(
            Shape::Bounds(Bounds::new(0.0, 0.0, 1.0, 1.0)),
            0.0,
            10.0,
        ));
        assert_eq!(shape.sub_shape_count(), 1);
        assert_eq!(shape.sub_shape(0).unwrap().shape_type(), ShapeType::Bounds);
        assert!(matches!(
            shape.sub_shape_mut(1),
            Err(EditError::SubShapeOutOfRange { index: 1, count: 1, .. })
        ));
        assert!(Shape::Point(Point::ZERO).sub_shape(0).is_err());
    }

    #[test]
    fn test_point_accessors() {
        let mut shape = Shape::Polyline(Polyline::new(vec![Point::ZERO, Point::new(1.0, 1.0)]));
        assert_eq!(shape.point_count(), Some(2));
        assert!(shape.set_point(1, Point::new(2.0, 2.0)));
        assert!(!shape.set_point(2, Point::ZERO));
        assert_eq!(shape.point(1), Some(Point::new(2.0, 2.0)));
        assert_eq!(Shape::Point(Point::ZERO).point_count(), None);
    }

    #[test]
    fn test_point_shape_geometry() {
        let mut shape = Shape::Point(Point::new(1.0, 1.0));
        assert!(shape.hit_test(Point::new(1.5, 1.0), 1.0));
        shape.translate(Vec2::new(1.0, 0.0));
        assert_eq!(shape.focus_point(), Point::new(2.0, 1.0));
    }

    #[test]
    fn test_shape_serialization() {
        let shape = Shape::CircleByCenterPoint(CircleByCenterPoint::new(Point::new(1.0, 2.0), 3.0));
        let json = serde_json::to_string(&shape).unwrap();
        let back: Shape = serde_json::from_str(&json).unwrap();
        assert_eq!(back, shape);
    }
}
