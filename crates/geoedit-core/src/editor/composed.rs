//! Editors for shapes made of sub-shapes.
//!
//! A composed editor asks its child editor for the handles of every
//! sub-shape and binds each set to its sub-shape through a
//! [`SubShapeHandle`]. One translate handle moves all sub-shapes together.
//! Composed shapes cannot be created interactively.

use super::handles::{
    CompositeEditHandle, EditHandle, EditMoveConstraint, HelperHandle, HelperKind, SubShapeHandle, dimension_handle,
};
use super::{Editor, PointListEditor, is_type};
use crate::context::EditContext;
use crate::error::EditResult;
use crate::shapes::{Shape, ShapeType};
use kurbo::Point;

/// Shared base of the composed editors.
pub struct ComposedShapeEditor {
    shape_type: ShapeType,
    child: Box<dyn Editor>,
}

impl ComposedShapeEditor {
    pub fn new(shape_type: ShapeType, child: Box<dyn Editor>) -> Self {
        Self { shape_type, child }
    }

    /// Handles of every sub-shape the child can edit.
    fn sub_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        let mut handles: Vec<Box<dyn EditHandle>> = Vec::new();
        for index in 0..ctx.shape().sub_shape_count() {
            match ctx.with_sub_shape(index, |sub| self.child.get_shape_handles(sub))? {
                Ok(sub_handles) => handles.push(Box::new(SubShapeHandle::new(
                    ctx.shape(),
                    index,
                    Box::new(CompositeEditHandle::new(sub_handles)),
                )?)),
                Err(e) => log::warn!("Sub-shape {index} has no handles: {e}"),
            }
        }
        Ok(handles)
    }
}

impl Editor for ComposedShapeEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        is_type(ctx, self.shape_type)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        self.sub_shape_handles(ctx)
    }

    fn name(&self) -> &'static str {
        "composed shape"
    }
}

pub struct ShapeListEditor {
    inner: ComposedShapeEditor,
}

impl ShapeListEditor {
    pub fn new(child: Box<dyn Editor>) -> Self {
        Self {
            inner: ComposedShapeEditor::new(ShapeType::ShapeList, child),
        }
    }
}

impl Editor for ShapeListEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        self.inner.can_edit(ctx)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        self.inner.sub_shape_handles(ctx)
    }

    fn name(&self) -> &'static str {
        "shape list"
    }
}

/// Outer ring and holes, each edited as a polygon.
pub struct ComplexPolygonEditor {
    inner: ComposedShapeEditor,
}

impl ComplexPolygonEditor {
    pub fn new() -> Self {
        Self {
            inner: ComposedShapeEditor::new(ShapeType::ComplexPolygon, Box::new(PointListEditor)),
        }
    }
}

impl Default for ComplexPolygonEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor for ComplexPolygonEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        self.inner.can_edit(ctx)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        self.inner.sub_shape_handles(ctx)
    }

    fn name(&self) -> &'static str {
        "complex polygon"
    }
}

/// Which height of an extruded shape a handle drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Height {
    Minimum,
    Maximum,
}

/// Vertical handle above the base's focus point. Heights never cross.
fn height_handle(height: Height) -> Box<dyn EditHandle> {
    let handle = dimension_handle(
        move |shape| match shape {
            Shape::ExtrudedShape(e) => {
                let focus = e.base.focus_point();
                let h = match height {
                    Height::Minimum => e.minimum_height,
                    Height::Maximum => e.maximum_height,
                };
                Some(Point::new(focus.x, focus.y - h))
            }
            _ => None,
        },
        move |shape, point| {
            if let Shape::ExtrudedShape(e) = shape {
                let h = e.base.focus_point().y - point.y;
                match height {
                    Height::Minimum => e.minimum_height = h.min(e.maximum_height),
                    Height::Maximum => e.maximum_height = h.max(e.minimum_height),
                }
            }
        },
    );
    Box::new(handle.with_constraint(EditMoveConstraint::Vertical))
}

/// Base footprint handles plus minimum and maximum height handles.
pub struct ExtrudedShapeEditor {
    inner: ComposedShapeEditor,
}

impl ExtrudedShapeEditor {
    pub fn new(child: Box<dyn Editor>) -> Self {
        Self {
            inner: ComposedShapeEditor::new(ShapeType::ExtrudedShape, child),
        }
    }
}

impl Editor for ExtrudedShapeEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        self.inner.can_edit(ctx)
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        let mut handles: Vec<Box<dyn EditHandle>> = vec![
            Box::new(HelperHandle::new(HelperKind::ExtrudedShape)),
            height_handle(Height::Minimum),
            height_handle(Height::Maximum),
        ];
        handles.extend(self.inner.sub_shape_handles(ctx)?);
        Ok(handles)
    }

    fn name(&self) -> &'static str {
        "extruded shape"
    }
}
