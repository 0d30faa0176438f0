//! Construction lines drawn alongside the real handles.

use super::EditHandle;
use crate::canvas::GeoCanvas;
use crate::context::EditContext;
use crate::evented::{EventedSupport, HandleEvent};
use crate::shapes::{Polyline, Shape};
use kurbo::Point;

/// Which construction lines a [`HelperHandle`] draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    /// Radii from the center to both ends of an arc or sector.
    Arc,
    /// Radial edges and the mid radius of an arc band.
    ArcBand,
    /// Both semi-axes of an ellipse.
    EllipseAxis,
    /// Vertical extent of an extruded shape.
    ExtrudedShape,
    /// The base outline of a geo buffer.
    GeoBuffer,
    /// Outline of a point list, closed for polygons.
    PointList,
    /// Control polygon of a Bézier curve.
    BezierCurve,
}

/// Draws helper geometry and never handles input.
pub struct HelperHandle {
    kind: HelperKind,
    events: EventedSupport<HandleEvent>,
}

impl HelperHandle {
    pub fn new(kind: HelperKind) -> Self {
        Self {
            kind,
            events: EventedSupport::new(),
        }
    }

    pub fn kind(&self) -> HelperKind {
        self.kind
    }

    /// Helper lines for `shape`, each as a point sequence in model space.
    pub fn lines(&self, shape: &Shape) -> Vec<Vec<Point>> {
        match (self.kind, shape) {
            (HelperKind::Arc, Shape::Arc(arc)) => vec![vec![arc.start_point(), arc.center, arc.end_point()]],
            (HelperKind::Arc, Shape::CircularArcByCenterPoint(arc)) => {
                vec![vec![arc.start_point(), arc.center, arc.end_point()]]
            }
            (HelperKind::Arc, Shape::CircularArcBy3Points(arc)) => arc
                .to_center_arc()
                .map(|arc| vec![vec![arc.start_point(), arc.center, arc.end_point()]])
                .unwrap_or_default(),
            (HelperKind::Arc, Shape::Sector(sector)) => {
                let arc = sector.arc();
                vec![vec![arc.start_point(), arc.center, arc.end_point()]]
            }
            (HelperKind::ArcBand, Shape::ArcBand(band)) => {
                let (inner, outer) = (band.inner_arc(), band.outer_arc());
                let mid = band.mid_azimuth();
                vec![
                    vec![band.center, outer.start_point()],
                    vec![band.center, outer.end_point()],
                    vec![
                        crate::shapes::point_at_azimuth(band.center, mid, inner.radius),
                        crate::shapes::point_at_azimuth(band.center, mid, outer.radius),
                    ],
                ]
            }
            (HelperKind::EllipseAxis, Shape::Ellipse(ellipse)) => vec![
                vec![ellipse.center, ellipse.a_axis_point()],
                vec![ellipse.center, ellipse.b_axis_point()],
            ],
            (HelperKind::EllipseAxis, Shape::Arc(arc)) => {
                let ellipse = arc.ellipse();
                vec![
                    vec![ellipse.center, ellipse.a_axis_point()],
                    vec![ellipse.center, ellipse.b_axis_point()],
                ]
            }
            (HelperKind::ExtrudedShape, Shape::ExtrudedShape(extruded)) => {
                let focus = extruded.base.focus_point();
                vec![vec![
                    Point::new(focus.x, focus.y - extruded.minimum_height),
                    Point::new(focus.x, focus.y - extruded.maximum_height),
                ]]
            }
            (HelperKind::GeoBuffer, Shape::GeoBuffer(buffer)) => match &*buffer.base {
                Shape::Point(_) => Vec::new(),
                base => outline(base),
            },
            (HelperKind::PointList | HelperKind::BezierCurve, shape) => outline(shape),
            _ => Vec::new(),
        }
    }
}

fn outline(shape: &Shape) -> Vec<Vec<Point>> {
    match shape.points() {
        Some(points) if points.len() > 1 => {
            let mut line = points.to_vec();
            if matches!(shape, Shape::Polygon(_)) && points.len() > 2 {
                line.push(points[0]);
            }
            vec![line]
        }
        Some(_) => Vec::new(),
        None => vec![shape.control_points()],
    }
}

impl EditHandle for HelperHandle {
    fn on_draw(&self, canvas: &mut dyn GeoCanvas, ctx: &EditContext<'_>) {
        for line in self.lines(ctx.shape()) {
            let helper = Shape::Polyline(Polyline::new(line));
            canvas.draw_shape(&helper, &ctx.settings.styles.helper);
        }
    }

    fn events(&mut self) -> &mut EventedSupport<HandleEvent> {
        &mut self.events
    }
}
