//! Editors for circular arcs, sectors and arc bands.

use super::handles::{
    CreateByTemplateHandle, EditHandle, HelperHandle, HelperKind, default_point, dimension_handle,
    drag_handle,
};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::{
    ArcBand, CircularArcBy3Points, CircularArcByCenterPoint, Sector, Shape, ShapeType, azimuth_between,
    normalize_azimuth, point_at_azimuth,
};
use kurbo::Point;

/// Mutable view of a center-based arc. Bands keep their radii on separate
/// handles, so `radius` is `None` for them.
struct ArcParts<'a> {
    center: &'a mut Point,
    radius: Option<&'a mut f64>,
    start_azimuth: &'a mut f64,
    sweep_angle: &'a mut f64,
}

fn arc_parts(shape: &mut Shape) -> Option<ArcParts<'_>> {
    match shape {
        Shape::CircularArcByCenterPoint(a) => Some(ArcParts {
            center: &mut a.center,
            radius: Some(&mut a.radius),
            start_azimuth: &mut a.start_azimuth,
            sweep_angle: &mut a.sweep_angle,
        }),
        Shape::Sector(s) => Some(ArcParts {
            center: &mut s.center,
            radius: Some(&mut s.radius),
            start_azimuth: &mut s.start_azimuth,
            sweep_angle: &mut s.sweep_angle,
        }),
        Shape::ArcBand(b) => Some(ArcParts {
            center: &mut b.center,
            radius: None,
            start_azimuth: &mut b.start_azimuth,
            sweep_angle: &mut b.sweep_angle,
        }),
        _ => None,
    }
}

/// The arc whose ends carry the start and end handles.
fn outer_arc(shape: &Shape) -> Option<CircularArcByCenterPoint> {
    match shape {
        Shape::CircularArcByCenterPoint(a) => Some(*a),
        Shape::Sector(s) => Some(s.arc()),
        Shape::ArcBand(b) => Some(b.outer_arc()),
        _ => None,
    }
}

/// Center, start and end handles. Moving the start keeps the end in place.
fn center_arc_handles(helper: HelperKind) -> Vec<Box<dyn EditHandle>> {
    vec![
        Box::new(HelperHandle::new(helper)),
        Box::new(drag_handle(
            |shape| outer_arc(shape).map(|a| a.start_point()),
            |shape, point| {
                if let Some(parts) = arc_parts(shape) {
                    let end = *parts.start_azimuth + *parts.sweep_angle;
                    *parts.start_azimuth = azimuth_between(*parts.center, point);
                    *parts.sweep_angle = normalize_azimuth(end - *parts.start_azimuth);
                    if let Some(radius) = parts.radius {
                        *radius = parts.center.distance(point);
                    }
                }
            },
        )),
        Box::new(drag_handle(
            |shape| outer_arc(shape).map(|a| a.end_point()),
            |shape, point| {
                if let Some(parts) = arc_parts(shape) {
                    let end = azimuth_between(*parts.center, point);
                    *parts.sweep_angle = normalize_azimuth(end - *parts.start_azimuth);
                }
            },
        )),
        Box::new(drag_handle(
            |shape| outer_arc(shape).map(|a| a.center),
            |shape, point| {
                if let Some(parts) = arc_parts(shape) {
                    *parts.center = point;
                }
            },
        )),
    ]
}

fn quarter_arc(center: Point, size: f64) -> CircularArcByCenterPoint {
    CircularArcByCenterPoint {
        center,
        radius: size,
        start_azimuth: 0.0,
        sweep_angle: 90.0,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircularArcByCenterPointEditor;

impl Editor for CircularArcByCenterPointEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::CircularArcByCenterPoint)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(center_arc_handles(HelperKind::Arc))
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| *shape = Shape::CircularArcByCenterPoint(quarter_arc(center, size)),
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "circular arc by center point"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SectorEditor;

impl Editor for SectorEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Sector)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(center_arc_handles(HelperKind::Arc))
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| {
                let arc = quarter_arc(center, size);
                *shape = Shape::Sector(Sector {
                    center: arc.center,
                    radius: arc.radius,
                    start_azimuth: arc.start_azimuth,
                    sweep_angle: arc.sweep_angle,
                });
            },
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "sector"
    }
}

fn arc_point_handle(index: usize) -> Box<dyn EditHandle> {
    Box::new(drag_handle(
        move |shape| match shape {
            Shape::CircularArcBy3Points(a) => a.points().get(index).copied(),
            _ => None,
        },
        move |shape, point| {
            if let Shape::CircularArcBy3Points(a) = shape {
                if let Some(p) = a.point_mut(index) {
                    *p = point;
                }
            }
        },
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircularArcBy3PointsEditor;

impl Editor for CircularArcBy3PointsEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::CircularArcBy3Points)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        let mut handles: Vec<Box<dyn EditHandle>> = vec![Box::new(HelperHandle::new(HelperKind::Arc))];
        handles.extend((0..3).map(arc_point_handle));
        Ok(handles)
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| {
                *shape = Shape::CircularArcBy3Points(CircularArcBy3Points::new(
                    default_point(center, 270.0, size),
                    default_point(center, 0.0, size),
                    default_point(center, 90.0, size),
                ));
            },
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "circular arc by 3 points"
    }
}

/// Radius handle of a band, placed on the mid azimuth.
fn band_radius_handle(outer: bool) -> Box<dyn EditHandle> {
    Box::new(dimension_handle(
        move |shape| match shape {
            Shape::ArcBand(b) => {
                let radius = if outer { b.max_radius } else { b.min_radius };
                Some(point_at_azimuth(b.center, b.mid_azimuth(), radius))
            }
            _ => None,
        },
        move |shape, point| {
            if let Shape::ArcBand(b) = shape {
                let radius = b.center.distance(point);
                // Radii never cross.
                if outer {
                    b.max_radius = radius.max(b.min_radius);
                } else {
                    b.min_radius = radius.min(b.max_radius);
                }
            }
        },
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ArcBandEditor;

impl Editor for ArcBandEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::ArcBand)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        let mut handles = center_arc_handles(HelperKind::ArcBand);
        handles.push(band_radius_handle(false));
        handles.push(band_radius_handle(true));
        Ok(handles)
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| {
                *shape = Shape::ArcBand(ArcBand {
                    center,
                    min_radius: size / 2.0,
                    max_radius: size,
                    start_azimuth: 0.0,
                    sweep_angle: 90.0,
                });
            },
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "arc band"
    }
}
