use super::handles::{BoundsCreateHandle, BoundsResizeHandle, EditHandle};
use super::{Editor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::ShapeType;

/// Axis-aligned bounds: one resize handle per corner.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsEditor;

impl Editor for BoundsEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, ShapeType::Bounds)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(BoundsResizeHandle::corners()
            .into_iter()
            .map(|h| Box::new(h) as Box<dyn EditHandle>)
            .collect())
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(BoundsCreateHandle::new())))
    }

    fn name(&self) -> &'static str {
        "bounds"
    }
}
