//! Ellipse and elliptical arc editors.

use super::handles::{
    CreateByTemplateHandle, EditHandle, HelperHandle, HelperKind, dimension_handle, drag_handle,
};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::{Arc, Ellipse, Shape, ShapeType, azimuth_between, azimuth_direction, normalize_azimuth};
use kurbo::Point;

/// The geometric part shared by ellipses and arcs.
fn axes_mut(shape: &mut Shape) -> Option<(&mut Point, &mut f64, &mut f64, &mut f64)> {
    match shape {
        Shape::Ellipse(e) => Some((&mut e.center, &mut e.a, &mut e.b, &mut e.rotation_azimuth)),
        Shape::Arc(a) => Some((&mut a.center, &mut a.a, &mut a.b, &mut a.rotation_azimuth)),
        _ => None,
    }
}

fn ellipse_of(shape: &Shape) -> Option<Ellipse> {
    match shape {
        Shape::Ellipse(e) => Some(*e),
        Shape::Arc(a) => Some(a.ellipse()),
        _ => None,
    }
}

/// Center, both axis ends and the axis helper lines.
fn axis_handles() -> Vec<Box<dyn EditHandle>> {
    vec![
        Box::new(HelperHandle::new(HelperKind::EllipseAxis)),
        Box::new(dimension_handle(
            |shape| ellipse_of(shape).map(|e| e.a_axis_point()),
            |shape, point| {
                if let Some((center, a, _, rotation)) = axes_mut(shape) {
                    *a = center.distance(point);
                    if *a > 0.0 {
                        *rotation = azimuth_between(*center, point);
                    }
                }
            },
        )),
        Box::new(dimension_handle(
            |shape| ellipse_of(shape).map(|e| e.b_axis_point()),
            |shape, point| {
                if let Some((center, _, b, _)) = axes_mut(shape) {
                    *b = center.distance(point);
                }
            },
        )),
        Box::new(drag_handle(
            |shape| ellipse_of(shape).map(|e| e.center),
            |shape, point| {
                if let Some((center, ..)) = axes_mut(shape) {
                    *center = point;
                }
            },
        )),
    ]
}

/// Parametric azimuth of the ellipse point nearest in angle to `point`.
fn parametric_azimuth(ellipse: &Ellipse, point: Point) -> f64 {
    if ellipse.a <= 0.0 || ellipse.b <= 0.0 {
        return azimuth_between(ellipse.center, point);
    }
    let d = point - ellipse.center;
    let u = d.dot(azimuth_direction(ellipse.rotation_azimuth));
    let v = d.dot(azimuth_direction(ellipse.rotation_azimuth + 90.0));
    let t = (v / ellipse.b).atan2(u / ellipse.a).to_degrees();
    normalize_azimuth(ellipse.rotation_azimuth + t)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EllipseEditor;

impl Editor for EllipseEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Ellipse)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(axis_handles())
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| *shape = Shape::Ellipse(Ellipse::new(center, size, size / 2.0, 90.0)),
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "ellipse"
    }
}

/// Elliptical arcs: the ellipse handles plus both arc ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcEditor;

impl Editor for ArcEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Arc)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        let mut handles: Vec<Box<dyn EditHandle>> = vec![
            Box::new(HelperHandle::new(HelperKind::Arc)),
            Box::new(drag_handle(
                |shape| match shape {
                    Shape::Arc(arc) => Some(arc.start_point()),
                    _ => None,
                },
                |shape, point| {
                    if let Shape::Arc(arc) = shape {
                        let end = arc.start_azimuth + arc.sweep_angle;
                        arc.start_azimuth = parametric_azimuth(&arc.ellipse(), point);
                        arc.sweep_angle = normalize_azimuth(end - arc.start_azimuth);
                    }
                },
            )),
            Box::new(drag_handle(
                |shape| match shape {
                    Shape::Arc(arc) => Some(arc.end_point()),
                    _ => None,
                },
                |shape, point| {
                    if let Shape::Arc(arc) = shape {
                        let end = parametric_azimuth(&arc.ellipse(), point);
                        arc.sweep_angle = normalize_azimuth(end - arc.start_azimuth);
                    }
                },
            )),
        ];
        handles.extend(axis_handles());
        Ok(handles)
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| {
                *shape = Shape::Arc(Arc {
                    center,
                    a: size,
                    b: size / 2.0,
                    rotation_azimuth: 90.0,
                    start_azimuth: 0.0,
                    sweep_angle: 90.0,
                });
            },
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "arc"
    }
}
