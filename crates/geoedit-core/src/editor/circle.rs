//! Circle editors.

use super::handles::{
    CreateByTemplateHandle, EditHandle, default_point, dimension_handle, drag_handle,
};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::{CircleBy3Points, CircleByCenterPoint, Shape, ShapeType};

/// Azimuth of the radius handle: east of the center.
const RADIUS_AZIMUTH: f64 = 90.0;

fn center_handles() -> Vec<Box<dyn EditHandle>> {
    vec![
        Box::new(dimension_handle(
            |shape| match shape {
                Shape::CircleByCenterPoint(c) => Some(c.point_at(RADIUS_AZIMUTH)),
                _ => None,
            },
            |shape, point| {
                if let Shape::CircleByCenterPoint(c) = shape {
                    c.radius = c.center.distance(point);
                }
            },
        )),
        Box::new(drag_handle(
            |shape| match shape {
                Shape::CircleByCenterPoint(c) => Some(c.center),
                _ => None,
            },
            |shape, point| {
                if let Shape::CircleByCenterPoint(c) = shape {
                    c.center = point;
                }
            },
        )),
    ]
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleByCenterPointEditor;

impl Editor for CircleByCenterPointEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::CircleByCenterPoint)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(center_handles())
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| *shape = Shape::CircleByCenterPoint(CircleByCenterPoint::new(center, size)),
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "circle by center point"
    }
}

fn rim_handle(index: usize) -> Box<dyn EditHandle> {
    Box::new(drag_handle(
        move |shape| match shape {
            Shape::CircleBy3Points(c) => c.points().get(index).copied(),
            _ => None,
        },
        move |shape, point| {
            if let Shape::CircleBy3Points(c) = shape {
                if let Some(p) = c.point_mut(index) {
                    *p = point;
                }
            }
        },
    ))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CircleBy3PointsEditor;

impl Editor for CircleBy3PointsEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::CircleBy3Points)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok((0..3).map(rim_handle).collect())
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        let edit = self.edit_handle(ctx)?;
        Ok(Some(Box::new(CreateByTemplateHandle::new(
            |shape, center, size| {
                *shape = Shape::CircleBy3Points(CircleBy3Points::new(
                    default_point(center, 270.0, size),
                    default_point(center, 0.0, size),
                    default_point(center, 90.0, size),
                ));
            },
            Box::new(edit),
        ))))
    }

    fn name(&self) -> &'static str {
        "circle by 3 points"
    }
}
