//! Editors: per shape family strategies that build handle graphs.
//!
//! An editor holds no session state. For a context it answers whether it
//! can edit the shape and builds the handles for editing or creating it.

pub mod handles;

mod bounds;
mod circle;
mod circular_arc;
mod composed;
mod ellipse;
mod geo_buffer;
mod point;
mod point_list;

pub use bounds::BoundsEditor;
pub use circle::{CircleBy3PointsEditor, CircleByCenterPointEditor};
pub use circular_arc::{ArcBandEditor, CircularArcBy3PointsEditor, CircularArcByCenterPointEditor, SectorEditor};
pub use composed::{ComplexPolygonEditor, ComposedShapeEditor, ExtrudedShapeEditor, ShapeListEditor};
pub use ellipse::{ArcEditor, EllipseEditor};
pub use geo_buffer::GeoBufferEditor;
pub use point::PointEditor;
pub use point_list::{BezierCurveEditor, PointListEditor};

use crate::context::EditContext;
use crate::error::{EditError, EditResult};
use crate::shapes::{Shape, ShapeType};
use handles::{CompositeEditHandle, EditHandle, ShapeTranslateHandle};

/// Snapshot taken before an edit session, used to undo it on cancel.
#[derive(Debug, Clone, PartialEq)]
pub enum SavedState {
    Shape(Shape),
}

pub trait Editor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool;

    /// Handles that change the shape's geometry, without the translate
    /// handle. Composed editors use these for their sub-shapes.
    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>>;

    /// Handle that moves the whole shape.
    fn create_translate_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(Some(Box::new(ShapeTranslateHandle::translate())))
    }

    /// Shape handles followed by the translate handle.
    fn get_edit_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        let mut handles = self.get_shape_handles(ctx)?;
        handles.extend(self.create_translate_handle(ctx)?);
        Ok(handles)
    }

    /// Handle that creates a new shape of this family, if supported.
    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.check(ctx)?;
        Ok(None)
    }

    fn save_state(&self, ctx: &EditContext<'_>) -> SavedState {
        SavedState::Shape(ctx.shape().clone())
    }

    fn restore_state(&self, state: SavedState, ctx: &mut EditContext<'_>) -> EditResult<()> {
        let SavedState::Shape(shape) = state;
        if shape.shape_type() != ctx.shape().shape_type() {
            return Err(EditError::mismatch(shape.shape_type().to_string(), ctx.shape().shape_type()));
        }
        *ctx.shape_mut() = shape;
        Ok(())
    }

    fn name(&self) -> &'static str;

    /// Error unless this editor accepts the context's shape.
    fn check(&self, ctx: &EditContext<'_>) -> EditResult<()> {
        if self.can_edit(ctx) {
            Ok(())
        } else {
            Err(EditError::mismatch(self.name(), ctx.shape().shape_type()))
        }
    }

    /// All edit handles wrapped into one co-active handle.
    fn edit_handle(&self, ctx: &EditContext<'_>) -> EditResult<CompositeEditHandle> {
        Ok(CompositeEditHandle::new(self.get_edit_handles(ctx)?))
    }
}

/// Routes every request to the first delegate that can edit the shape.
pub struct CompositeEditor {
    editors: Vec<Box<dyn Editor>>,
}

impl CompositeEditor {
    pub fn new(editors: Vec<Box<dyn Editor>>) -> Self {
        Self { editors }
    }

    /// Editors for every leaf shape family.
    pub fn leaf_editors() -> Self {
        Self::new(vec![
            Box::new(PointEditor),
            Box::new(BoundsEditor),
            Box::new(CircleByCenterPointEditor),
            Box::new(CircleBy3PointsEditor),
            Box::new(EllipseEditor),
            Box::new(ArcEditor),
            Box::new(CircularArcByCenterPointEditor),
            Box::new(CircularArcBy3PointsEditor),
            Box::new(ArcBandEditor),
            Box::new(SectorEditor),
            Box::new(GeoBufferEditor),
            Box::new(PointListEditor),
            Box::new(BezierCurveEditor),
        ])
    }

    pub fn push(&mut self, editor: Box<dyn Editor>) {
        self.editors.push(editor);
    }

    pub fn len(&self) -> usize {
        self.editors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.editors.is_empty()
    }

    fn delegate(&self, ctx: &EditContext<'_>) -> EditResult<&dyn Editor> {
        self.editors
            .iter()
            .find(|e| e.can_edit(ctx))
            .map(|e| e.as_ref())
            .ok_or(EditError::NoEditor(ctx.shape().shape_type()))
    }

    /// Name of the editor that handles the context's shape.
    pub fn editor_name(&self, ctx: &EditContext<'_>) -> EditResult<&'static str> {
        Ok(self.delegate(ctx)?.name())
    }
}

impl Default for CompositeEditor {
    /// Leaf editors followed by the composed-shape editors.
    fn default() -> Self {
        let mut editor = Self::leaf_editors();
        editor.push(Box::new(ShapeListEditor::new(Box::new(Self::leaf_editors()))));
        editor.push(Box::new(ComplexPolygonEditor::new()));
        editor.push(Box::new(ExtrudedShapeEditor::new(Box::new(Self::leaf_editors()))));
        editor
    }
}

impl Editor for CompositeEditor {
    fn can_edit(&self, ctx: &EditContext<'_>) -> bool {
        self.editors.iter().any(|e| e.can_edit(ctx))
    }

    fn get_shape_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.delegate(ctx)?.get_shape_handles(ctx)
    }

    fn create_translate_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.delegate(ctx)?.create_translate_handle(ctx)
    }

    fn get_edit_handles(&self, ctx: &EditContext<'_>) -> EditResult<Vec<Box<dyn EditHandle>>> {
        self.delegate(ctx)?.get_edit_handles(ctx)
    }

    fn get_create_handle(&self, ctx: &EditContext<'_>) -> EditResult<Option<Box<dyn EditHandle>>> {
        self.delegate(ctx)?.get_create_handle(ctx)
    }

    fn save_state(&self, ctx: &EditContext<'_>) -> SavedState {
        match self.delegate(ctx) {
            Ok(editor) => editor.save_state(ctx),
            Err(_) => SavedState::Shape(ctx.shape().clone()),
        }
    }

    fn restore_state(&self, state: SavedState, ctx: &mut EditContext<'_>) -> EditResult<()> {
        self.delegate(ctx)?.restore_state(state, ctx)
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

/// Whether the context holds a shape of type `shape_type`.
pub(crate) fn is_type(ctx: &EditContext<'_>, shape_type: ShapeType) -> bool {
    ctx.shape().shape_type() == shape_type
}
