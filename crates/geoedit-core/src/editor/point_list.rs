use super::handles::{
    BezierCurveCreateHandle, EditHandle, HelperHandle, HelperKind, PointListCreateHandle, bezier_curve_edit_handle,
    point_list_edit_handle,
};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::ShapeType;

/// Polylines and polygons.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointListEditor;

impl Editor for PointListEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Polyline) || is_type(ctx, ShapeType::Polygon)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(vec![
            Box::new(HelperHandle::new(HelperKind::PointList)),
            Box::new(point_list_edit_handle(ctx.shape(), ctx.settings)),
        ])
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(PointListCreateHandle::new())))
    }

    fn name(&self) -> &'static str {
        "point list"
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BezierCurveEditor;

impl Editor for BezierCurveEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::BezierCurve)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(vec![Box::new(bezier_curve_edit_handle(ctx.shape()))])
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(BezierCurveCreateHandle::new())))
    }

    fn name(&self) -> &'static str {
        "bezier curve"
    }
}
