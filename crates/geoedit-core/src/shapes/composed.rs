//! Shapes made of other shapes.

use super::{Shape, ShapeTrait, distance_to_path};
use kurbo::{BezPath, Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

fn concat_paths<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> BezPath {
    let mut path = BezPath::new();
    for shape in shapes {
        path.extend(shape.to_path());
    }
    path
}

fn union_bounds<'a>(shapes: impl IntoIterator<Item = &'a Shape>) -> Rect {
    shapes
        .into_iter()
        .map(Shape::bounds)
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
}

/// Ordered collection of independent shapes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShapeList {
    pub shapes: Vec<Shape>,
}

impl ShapeTrait for ShapeList {
    fn to_path(&self) -> BezPath {
        concat_paths(&self.shapes)
    }

    fn is_closed(&self) -> bool {
        false
    }

    fn translate(&mut self, delta: Vec2) {
        for shape in &mut self.shapes {
            shape.translate(delta);
        }
    }

    fn focus_point(&self) -> Point {
        self.bounds().center()
    }

    fn control_points(&self) -> Vec<Point> {
        self.shapes.iter().flat_map(Shape::control_points).collect()
    }

    fn bounds(&self) -> Rect {
        union_bounds(&self.shapes)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.shapes.iter().any(|s| s.hit_test(point, tolerance))
    }
}

/// Polygon with holes; the first ring is the outer boundary.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexPolygon {
    pub polygons: Vec<Shape>,
}

impl ShapeTrait for ComplexPolygon {
    fn to_path(&self) -> BezPath {
        concat_paths(&self.polygons)
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: Vec2) {
        for polygon in &mut self.polygons {
            polygon.translate(delta);
        }
    }

    fn focus_point(&self) -> Point {
        self.polygons
            .first()
            .map_or(Point::ZERO, Shape::focus_point)
    }

    fn control_points(&self) -> Vec<Point> {
        self.polygons.iter().flat_map(Shape::control_points).collect()
    }

    fn bounds(&self) -> Rect {
        union_bounds(&self.polygons)
    }

    /// Inside the outer ring and outside every hole, or near any ring.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let Some((outer, holes)) = self.polygons.split_first() else {
            return false;
        };
        if distance_to_path(&self.to_path(), point) <= tolerance {
            return true;
        }
        outer.hit_test(point, 0.0) && !holes.iter().any(|h| h.hit_test(point, 0.0))
    }
}

/// Footprint extruded between two heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudedShape {
    pub base: Box<Shape>,
    pub minimum_height: f64,
    pub maximum_height: f64,
}

impl ExtrudedShape {
    pub fn new(base: Shape, minimum_height: f64, maximum_height: f64) -> Self {
        Self {
            base: Box::new(base),
            minimum_height,
            maximum_height,
        }
    }
}

impl ShapeTrait for ExtrudedShape {
    fn to_path(&self) -> BezPath {
        self.base.to_path()
    }

    fn is_closed(&self) -> bool {
        self.base.is_closed()
    }

    fn translate(&mut self, delta: Vec2) {
        self.base.translate(delta);
    }

    fn focus_point(&self) -> Point {
        self.base.focus_point()
    }

    fn control_points(&self) -> Vec<Point> {
        self.base.control_points()
    }

    fn bounds(&self) -> Rect {
        self.base.bounds()
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.base.hit_test(point, tolerance)
    }
}

/// Area within `width / 2` of a base shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBuffer {
    pub base: Box<Shape>,
    pub width: f64,
}

impl GeoBuffer {
    pub fn new(base: Shape, width: f64) -> Self {
        Self {
            base: Box::new(base),
            width,
        }
    }

    /// Distance from `point` to the base outline, zero inside closed bases.
    pub fn distance_to_base(&self, point: Point) -> f64 {
        if let Shape::Point(p) = *self.base {
            return p.distance(point);
        }
        if self.base.is_closed() && self.base.hit_test(point, 0.0) {
            return 0.0;
        }
        distance_to_path(&self.base.to_path(), point)
    }
}

impl ShapeTrait for GeoBuffer {
    fn to_path(&self) -> BezPath {
        self.base.to_path()
    }

    fn is_closed(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: Vec2) {
        self.base.translate(delta);
    }

    fn focus_point(&self) -> Point {
        self.base.focus_point()
    }

    fn control_points(&self) -> Vec<Point> {
        self.base.control_points()
    }

    fn bounds(&self) -> Rect {
        self.base.bounds().inflate(self.width / 2.0, self.width / 2.0)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        self.distance_to_base(point) <= self.width / 2.0 + tolerance
    }
}
