use super::handles::{EditHandle, PointCreateHandle, PointTranslateHandle, ShapePoint};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::ShapeType;

/// Point shapes: the point itself is the only handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointEditor;

impl Editor for PointEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Point)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(vec![Box::new(PointTranslateHandle::new(ShapePoint))])
    }

    /// Dragging the point already moves the whole shape.
    fn create_translate_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(None)
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(PointCreateHandle::point())))
    }

    fn name(&self) -> &'static str {
        "point"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::test_support::Fixture;
    use crate::editor::handles::test_support::*;
    use crate::shapes::Shape;
    use kurbo::Point;

    #[test]
    fn test_single_handle_moves_point() {
        let mut fx = Fixture::new(Shape::Point(Point::new(5.0, 5.0)));
        let mut ctx = fx.ctx();
        let mut handle = PointEditor.edit_handle(&ctx).unwrap();
        assert_eq!(handle.len(), 1);
        let start = down(5.0, 5.0);
        handle.on_gesture_event(&start, &mut ctx);
        handle.on_gesture_event(&drag(&start, 9.0, 2.0), &mut ctx);
        assert_eq!(ctx.shape(), &Shape::Point(Point::new(9.0, 2.0)));
    }
}
